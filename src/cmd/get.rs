use clap::{arg, command, Command};
use tracing::debug;

use super::CommandType;
use crate::error::{GauthError, Result};
use crate::hotp::get_hotp;
use crate::keychain::{KeychainOperations, OtpType};
use crate::totp::{get_totp, GetTime};
use crate::utils::pad_code;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Get.as_str())
        .about("Print the current code for a key")
        .args(&[arg!(<NAME> "Key to generate a code for")])
}

pub fn run_get<W>(
    keychain: &mut impl KeychainOperations,
    name: &str,
    clock: &impl GetTime,
    writer: &mut W,
) -> Result<()>
where
    W: OutErr,
{
    let otp = code(keychain, name, clock)?;
    writer.write(&format!("{}\n", otp));
    Ok(())
}

/// Generates the code for `name`.
///
/// HOTP counters are advanced and persisted before the code is returned, so a
/// code is never handed out twice. If persisting fails no code is returned.
pub fn code(keychain: &mut impl KeychainOperations, name: &str, clock: &impl GetTime) -> Result<String> {
    let key = keychain
        .get(name)
        .cloned()
        .ok_or_else(|| GauthError::UnknownKey(name.to_string()))?;

    let otp = match key.otp_type {
        OtpType::Hotp { counter_offset } => {
            let current = keychain.read_counter_at(counter_offset)?;
            let counter = current
                .checked_add(1)
                .ok_or_else(|| GauthError::CorruptCounter {
                    offset: counter_offset,
                    text: current.to_string(),
                })?;
            let otp = get_hotp(&key.secret, counter, key.digits);
            keychain.write_counter_at(counter_offset, counter)?;
            debug!("advanced {:?} to counter {}", name, counter);
            otp
        }
        OtpType::Totp => get_totp(&key.secret, clock.get_now(), key.digits),
    };

    Ok(pad_code(otp, key.digits))
}
