//! gauth: two-factor authentication codes from a cleartext keychain.
//!
//! The keychain lives in `$HOME/.gauth` unless configured otherwise, one key
//! per line:
//!
//! ```text
//! <name> <digits> <base32 secret>[ <20 digit counter>]
//! ```
//!
//! Lines with a counter are HOTP keys and have their counter rewritten in
//! place every time a code is generated. Everything else is TOTP with a
//! 30 second step, so the system clock has to be reasonably accurate.

mod cmd;
mod config;
mod error;
mod hotp;
mod keychain;
mod totp;
mod utils;
mod writer;

#[cfg(test)]
mod tests;

use std::io;
use std::process;

use clap::ArgMatches;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Settings;
use crate::error::Result;
use crate::totp::Clock;
use crate::writer::{OtpWriter, OutErr};

fn main() {
    let matches = cmd::cli().get_matches();
    init_tracing(matches.is_present("verbose"));

    let mut writer = OtpWriter::new();
    if let Err(err) = run(&matches, &mut writer) {
        error!("{}", err);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = match verbose {
        true => Level::DEBUG,
        false => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("gauth: unable to set up logging: {}", err);
    }
}

fn run(matches: &ArgMatches, writer: &mut impl OutErr) -> Result<()> {
    let settings = match Settings::default_path() {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    let config = cmd::config_from_matches(matches, &settings)?;

    cmd::execute(config, &Clock::new(), &mut io::stdin().lock(), writer)
}
