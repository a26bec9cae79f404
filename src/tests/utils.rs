use std::fs;
use std::path::PathBuf;

use clap::{ArgMatches, Command};
use tempfile::TempDir;

pub fn get_cmd_args(
    command_str: &str,
    subcommand: Command,
    arg_vec: &Vec<&str>,
) -> Result<ArgMatches, clap::Error> {
    let matches = Command::new("gauth")
        .subcommand(subcommand)
        .try_get_matches_from(arg_vec)?;

    let arg_matches = matches.subcommand().unwrap();
    let cmd_args = match arg_matches {
        (cmd, cmd_args) if cmd == command_str => cmd_args.clone(),
        _ => panic!("Expected {} subcommand", command_str),
    };
    Ok(cmd_args)
}

pub fn keychain_path(dir: &TempDir) -> PathBuf {
    dir.path().join(".gauth")
}

pub fn write_keychain(dir: &TempDir, contents: &str) -> PathBuf {
    let path = keychain_path(dir);
    fs::write(&path, contents).unwrap();
    path
}
