pub mod add;
pub mod all;
pub mod get;
pub mod list;

use std::io::BufRead;
use std::path::Path;

use clap::{arg, command, ArgMatches, Command};

use crate::config::{Config, Operation, Settings};
use crate::error::{GauthError, Result};
use crate::keychain::Keychain;
use crate::totp::GetTime;
use crate::utils::validate_name;
use crate::writer::OutErr;

pub enum CommandType {
    Add,
    List,
    Get,
}

impl CommandType {
    pub fn as_str(&self) -> &str {
        match self {
            CommandType::Add => "add",
            CommandType::List => "list",
            CommandType::Get => "get",
        }
    }
}

pub fn cli() -> Command<'static> {
    command!()
        .about("Two-factor authentication codes from a local keychain. Without a subcommand, prints every code.")
        .allow_external_subcommands(true)
        .args(&[
            arg!(-k --keychain <PATH> "Keychain file (default: $HOME/.gauth)")
                .required(false)
                .global(true),
            arg!(-v --verbose "Log debug diagnostics").global(true),
        ])
        .subcommand(add::subcommand())
        .subcommand(list::subcommand())
        .subcommand(get::subcommand())
}

/// Turns parsed arguments into the one operation this invocation performs.
/// `gauth <NAME>` is shorthand for `gauth get <NAME>`.
pub fn config_from_matches(matches: &ArgMatches, settings: &Settings) -> Result<Config> {
    let keychain = settings.resolve_keychain(matches.value_of("keychain").map(Path::new))?;

    let operation = match matches.subcommand() {
        None => Operation::All,
        Some((cmd, add_args)) if cmd == CommandType::Add.as_str() => {
            let name = required_name(add_args)?;
            let digits = match add_args.value_of("digits") {
                Some(digits) => digits
                    .parse()
                    .map_err(|_| GauthError::Usage(format!("invalid digit count {:?}", digits)))?,
                None => settings.default_digits(),
            };
            Operation::Add {
                name,
                digits,
                hotp: add_args.is_present("hotp"),
                key: add_args.value_of("key").map(String::from),
            }
        }
        Some((cmd, _)) if cmd == CommandType::List.as_str() => Operation::List,
        Some((cmd, get_args)) if cmd == CommandType::Get.as_str() => Operation::Get {
            name: required_name(get_args)?,
        },
        Some((name, extra_args)) => {
            if extra_args.values_of("").map_or(false, |mut v| v.next().is_some()) {
                return Err(GauthError::Usage(format!(
                    "unexpected arguments after {:?}",
                    name
                )));
            }
            validate_name(name)?;
            Operation::Get {
                name: name.to_string(),
            }
        }
    };

    Ok(Config {
        keychain,
        operation,
    })
}

fn required_name(args: &ArgMatches) -> Result<String> {
    let name = args
        .value_of("NAME")
        .ok_or_else(|| GauthError::Usage(String::from("a key name is required")))?;
    validate_name(name)?;
    Ok(name.to_string())
}

/// Loads the keychain and runs the configured operation against it.
pub fn execute<R, W>(config: Config, clock: &impl GetTime, input: &mut R, writer: &mut W) -> Result<()>
where
    R: BufRead,
    W: OutErr,
{
    let mut keychain = Keychain::load(&config.keychain)?;

    match config.operation {
        Operation::Add {
            name,
            digits,
            hotp,
            key,
        } => add::run_add(&keychain, &name, digits, hotp, key.as_deref(), input, writer),
        Operation::List => {
            list::run_list(&keychain, writer);
            Ok(())
        }
        Operation::Get { name } => get::run_get(&mut keychain, &name, clock, writer),
        Operation::All => {
            all::run_all(&keychain, clock, writer);
            Ok(())
        }
    }
}
