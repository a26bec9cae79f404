use hmac::{Hmac, Mac};
use sha1::Sha1;

// HOTP https://datatracker.ietf.org/doc/html/rfc4226

type HmacSha1 = Hmac<Sha1>;

const MAX_DIGITS: u32 = 8;

/// Counter-based one-time code for an already decoded secret.
///
/// `digits` is clamped to at most 8.
pub fn get_hotp(secret: &[u8], counter: u64, digits: u32) -> u32 {
    let hmac = make_hmac(secret, counter);
    truncate(&hmac, digits)
}

// HMAC_SHA-1 -> 20 byte string
fn make_hmac(secret: &[u8], counter: u64) -> [u8; 20] {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(&counter.to_be_bytes());

    let mut result = [0u8; 20];
    result.copy_from_slice(&mac.finalize().into_bytes());
    result
}

// reduce to 4 byte string
// then s to num mod 10^Digit
fn truncate(hmac: &[u8; 20], digits: u32) -> u32 {
    let base_code = dynamic_truncation(hmac);

    base_code % u32::pow(10, digits.min(MAX_DIGITS))
}

// Let OffsetBits be the low-order 4 bits of String[19]
// Return the last 31 bits of String[OffSet]...String[OffSet+3]
fn dynamic_truncation(hmac: &[u8; 20]) -> u32 {
    let offset = (hmac[19] & 0xf) as usize;
    let code = u32::from_be_bytes([
        hmac[offset],
        hmac[offset + 1],
        hmac[offset + 2],
        hmac[offset + 3],
    ]);

    code & 0x7fff_ffff
}
