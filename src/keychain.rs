use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Seek, SeekFrom, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GauthError, Result};
use crate::utils::decode_key;

/// Width of the zero-padded decimal counter stored after HOTP records.
pub const COUNTER_LEN: usize = 20;

#[cfg(unix)]
const KEYCHAIN_MODE: u32 = 0o600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpType {
    Totp,
    /// `counter_offset` is the absolute position of the first counter digit
    /// in the keychain buffer.
    Hotp { counter_offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub secret: Vec<u8>,
    pub digits: u32,
    pub otp_type: OtpType,
}

pub trait KeychainOperations {
    fn get(&self, name: &str) -> Option<&Key>;
    /// All names, ascending.
    fn list(&self) -> Vec<String>;
    /// All entries, ascending by name.
    fn entries(&self) -> Vec<(&str, &Key)>;
    fn append(&self, name: &str, digits: u32, secret: &str, hotp: bool) -> Result<()>;
    fn read_counter_at(&self, offset: usize) -> Result<u64>;
    fn write_counter_at(&mut self, offset: usize, value: u64) -> Result<()>;
}

/// The keychain file held in memory.
///
/// `data` is the file exactly as it was read. HOTP entries refer to their
/// counter by offset into it, so it is only ever patched in place, never
/// reformatted.
///
/// There is no locking: two processes advancing the same HOTP counter at
/// once can both read the same value and hand out the same code.
#[derive(Debug)]
pub struct Keychain {
    path: PathBuf,
    data: Vec<u8>,
    keys: BTreeMap<String, Key>,
}

enum ParsedLine {
    Blank,
    Record(String, Key),
    Malformed,
}

impl Keychain {
    /// Reads the keychain at `path`. A missing file is an empty keychain.
    pub fn load(path: impl Into<PathBuf>) -> Result<Keychain> {
        let path = path.into();
        match fs::read(&path) {
            Ok(data) => Ok(Keychain::parse(path, data)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist, starting empty", path.display());
                Ok(Keychain::parse(path, Vec::new()))
            }
            Err(source) => Err(GauthError::StoreRead { path, source }),
        }
    }

    /// Indexes `data` line by line. Malformed lines are reported and skipped,
    /// and a later record replaces an earlier one with the same name.
    pub fn parse(path: PathBuf, data: Vec<u8>) -> Keychain {
        let mut keys = BTreeMap::new();
        let mut offset = 0;

        for (index, line) in data.split_inclusive(|&b| b == b'\n').enumerate() {
            offset += line.len();
            match parse_line(line, offset) {
                ParsedLine::Blank => {}
                ParsedLine::Record(name, key) => {
                    if keys.contains_key(&name) {
                        debug!("{}:{}: {:?} shadows an earlier record", path.display(), index + 1, name);
                    }
                    keys.insert(name, key);
                }
                ParsedLine::Malformed => {
                    let record = GauthError::MalformedRecord {
                        path: path.clone(),
                        line: index + 1,
                    };
                    warn!("{}", record);
                }
            }
        }

        Keychain { path, data, keys }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn write_error(&self, source: io::Error) -> GauthError {
        GauthError::StoreWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl KeychainOperations for Keychain {
    fn get(&self, name: &str) -> Option<&Key> {
        self.keys.get(name)
    }

    fn list(&self) -> Vec<String> {
        self.keys.keys().cloned().collect()
    }

    fn entries(&self) -> Vec<(&str, &Key)> {
        self.keys.iter().map(|(name, key)| (name.as_str(), key)).collect()
    }

    /// Appends one record to the file. The in-memory index is left as is;
    /// the record becomes visible on the next load.
    fn append(&self, name: &str, digits: u32, secret: &str, hotp: bool) -> Result<()> {
        let mut line = String::new();
        if self.data.last().map_or(false, |&b| b != b'\n') {
            line.push('\n');
        }
        line.push_str(&format!("{} {} {}", name, digits, secret));
        if hotp {
            line.push(' ');
            line.push_str(&"0".repeat(COUNTER_LEN));
        }
        line.push('\n');

        let mut file = open_for_append(&self.path).map_err(|e| self.write_error(e))?;
        // the file may predate us with looser permissions
        restrict_permissions(&file).map_err(|e| self.write_error(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.write_error(e))?;
        file.sync_all().map_err(|e| self.write_error(e))?;

        debug!("appended {:?} to {}", name, self.path.display());
        Ok(())
    }

    fn read_counter_at(&self, offset: usize) -> Result<u64> {
        counter_window(&self.data, offset)
            .and_then(parse_counter)
            .ok_or_else(|| corrupt_counter(&self.data, offset))
    }

    /// Overwrites exactly the 20 counter bytes at `offset`, on disk and in
    /// the buffer. Nothing else in the file is touched.
    fn write_counter_at(&mut self, offset: usize, value: u64) -> Result<()> {
        self.read_counter_at(offset)?;
        let text = format!("{:0width$}", value, width = COUNTER_LEN);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;
        file.seek(SeekFrom::Start(offset as u64))
            .map_err(|e| self.write_error(e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| self.write_error(e))?;
        file.sync_all().map_err(|e| self.write_error(e))?;

        self.data[offset..offset + COUNTER_LEN].copy_from_slice(text.as_bytes());
        Ok(())
    }
}

// <name> <digits:6|7|8> <base32-secret>[ <counter:20 digits>]
fn parse_line(line: &[u8], line_end: usize) -> ParsedLine {
    let terminated = line.last() == Some(&b'\n');
    let content = match terminated {
        true => &line[..line.len() - 1],
        false => line,
    };
    if content.is_empty() {
        return ParsedLine::Blank;
    }

    let fields: Vec<&[u8]> = content.split(|&b| b == b' ').collect();
    match parse_record(&fields, terminated, line_end) {
        Some((name, key)) => ParsedLine::Record(name, key),
        None => ParsedLine::Malformed,
    }
}

fn parse_record(fields: &[&[u8]], terminated: bool, line_end: usize) -> Option<(String, Key)> {
    let (name, digits, secret, counter) = match *fields {
        [name, digits, secret] => (name, digits, secret, None),
        [name, digits, secret, counter] => (name, digits, secret, Some(counter)),
        _ => return None,
    };

    let name = std::str::from_utf8(name).ok().filter(|n| !n.is_empty())?;
    let digits = match *digits {
        [d @ b'6'..=b'8'] => u32::from(d - b'0'),
        _ => return None,
    };
    let secret = decode_key(std::str::from_utf8(secret).ok()?).ok()?;

    let otp_type = match counter {
        None => OtpType::Totp,
        Some(counter) => {
            parse_counter(counter)?;
            OtpType::Hotp {
                counter_offset: line_end - COUNTER_LEN - usize::from(terminated),
            }
        }
    };

    Some((
        name.to_string(),
        Key {
            secret,
            digits,
            otp_type,
        },
    ))
}

/// The 20 bytes at `offset`, provided they end the line they sit on.
fn counter_window(data: &[u8], offset: usize) -> Option<&[u8]> {
    let end = offset.checked_add(COUNTER_LEN)?;
    let window = data.get(offset..end)?;
    match data.get(end) {
        None | Some(&b'\n') => Some(window),
        Some(_) => None,
    }
}

fn parse_counter(text: &[u8]) -> Option<u64> {
    if text.len() != COUNTER_LEN || !text.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(text).ok()?.parse().ok()
}

fn corrupt_counter(data: &[u8], offset: usize) -> GauthError {
    let start = offset.min(data.len());
    let end = offset.saturating_add(COUNTER_LEN).min(data.len());
    GauthError::CorruptCounter {
        offset,
        text: String::from_utf8_lossy(&data[start..end]).into_owned(),
    }
}

fn open_for_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(KEYCHAIN_MODE);
    options.open(path)
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> io::Result<()> {
    file.set_permissions(fs::Permissions::from_mode(KEYCHAIN_MODE))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}
