use std::time::{Duration, SystemTime};

use crate::hotp::get_hotp;

// TOTP https://datatracker.ietf.org/doc/html/rfc6238

// HOTP with a time-based moving factor, fixed 30 second step from the Unix epoch
const TIME_STEP_NANOS: u128 = 30_000_000_000;

pub trait GetTime {
    fn get_now(&self) -> SystemTime;
}

pub struct Clock {}

impl Clock {
    pub fn new() -> Self {
        Clock {}
    }
}

impl GetTime for Clock {
    fn get_now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Number of whole 30 second steps elapsed since the Unix epoch.
/// Instants before the epoch map to step 0.
pub fn get_totp_moving_factor(now: SystemTime) -> u64 {
    let elapsed = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO);

    (elapsed.as_nanos() / TIME_STEP_NANOS) as u64
}

pub fn get_totp(secret: &[u8], now: SystemTime, digits: u32) -> u32 {
    get_hotp(secret, get_totp_moving_factor(now), digits)
}
