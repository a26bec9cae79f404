use std::io::{self, BufRead};

use clap::{arg, command, Command};
use tracing::{debug, warn};

use super::CommandType;
use crate::error::{GauthError, Result};
use crate::keychain::KeychainOperations;
use crate::utils::{decode_key, is_base32_key, strip_whitespace, validate_digits, validate_name};
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Add.as_str())
        .about("Add a key to the keychain")
        .args(&[
            arg!(<NAME> "Name to store the key under"),
            arg!(--hotp "Counter-based HOTP (time-based TOTP is default)").required(false),
            arg!(-d --digits <DIGITS> "Length of generated codes")
                .required(false)
                .possible_values(["6", "7", "8"]),
            arg!(--key <KEY> "Base32 secret; prompted for when omitted")
                .required(false)
                .validator(is_base32_key),
        ])
}

pub fn run_add<R, W>(
    keychain: &impl KeychainOperations,
    name: &str,
    digits: u32,
    hotp: bool,
    key: Option<&str>,
    input: &mut R,
    writer: &mut W,
) -> Result<()>
where
    R: BufRead,
    W: OutErr,
{
    validate_name(name)?;
    let secret = match key {
        Some(key) => strip_whitespace(key),
        None => read_secret(name, input, writer)?,
    };

    add(keychain, name, &secret, digits, hotp)
}

/// Validates the entry and appends it to the keychain. A name that already
/// exists is shadowed by the new record once the keychain is reloaded.
pub fn add(
    keychain: &impl KeychainOperations,
    name: &str,
    secret: &str,
    digits: u32,
    hotp: bool,
) -> Result<()> {
    validate_name(name)?;
    validate_digits(digits)?;
    decode_key(secret)?;

    if keychain.get(name).is_some() {
        warn!("{:?} already exists, the new key replaces it", name);
    }

    keychain.append(name, digits, secret, hotp)?;
    debug!(
        "added {} key {:?}",
        if hotp { "HOTP" } else { "TOTP" },
        name
    );
    Ok(())
}

fn read_secret<R, W>(name: &str, input: &mut R, writer: &mut W) -> Result<String>
where
    R: BufRead,
    W: OutErr,
{
    writer.write_err(&format!("gauth key for {}: ", name));

    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(GauthError::ReadInput)?;
    if read == 0 || !line.ends_with('\n') {
        return Err(GauthError::ReadInput(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no key entered",
        )));
    }

    Ok(strip_whitespace(&line))
}
