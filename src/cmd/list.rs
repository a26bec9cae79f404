use clap::{command, Command};

use super::CommandType;
use crate::keychain::KeychainOperations;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::List.as_str()).about("List all key names")
}

pub fn run_list<W>(keychain: &impl KeychainOperations, writer: &mut W)
where
    W: OutErr,
{
    for name in keychain.list() {
        writer.write(&format!("{}\n", name));
    }
}
