use data_encoding::BASE32;

use crate::error::{GauthError, Result};

/// Decodes a case-insensitive RFC 4648 base32 secret into raw key bytes.
///
/// Input must be padded with `=` to a multiple of 8 characters.
pub fn decode_key(key: &str) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(GauthError::InvalidSecret(String::from("empty secret")));
    }

    BASE32
        .decode(key.to_uppercase().as_bytes())
        .map_err(|err| GauthError::InvalidSecret(err.to_string()))
}

// Validate key provided in arguments is a valid base32 encoding
pub fn is_base32_key(value: &str) -> std::result::Result<(), String> {
    match decode_key(&strip_whitespace(value)) {
        Ok(_) => Ok(()),
        Err(_) => Err(String::from("the key is not a valid base32 encoding")),
    }
}

/// Removes every whitespace character, including ones embedded in the text.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(GauthError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub fn validate_digits(digits: u32) -> Result<u32> {
    match digits {
        6..=8 => Ok(digits),
        _ => Err(GauthError::InvalidDigits(digits)),
    }
}

/// Renders a code zero-padded to `digits` characters.
pub fn pad_code(code: u32, digits: u32) -> String {
    format!("{:0width$}", code, width = digits as usize)
}
