use crate::keychain::{KeychainOperations, OtpType};
use crate::totp::{get_totp, GetTime};
use crate::utils::pad_code;
use crate::writer::OutErr;

/// Every entry with its current code, sorted by name.
///
/// HOTP entries get a row of dashes instead of a code: generating one would
/// burn a counter value nobody asked for. Their counters are never read here,
/// so a corrupt counter cannot fail the listing.
pub fn all_codes(keychain: &impl KeychainOperations, clock: &impl GetTime) -> Vec<(String, String)> {
    let now = clock.get_now();

    keychain
        .entries()
        .into_iter()
        .map(|(name, key)| {
            let code = match key.otp_type {
                OtpType::Totp => pad_code(get_totp(&key.secret, now, key.digits), key.digits),
                OtpType::Hotp { .. } => "-".repeat(key.digits as usize),
            };
            (name.to_string(), code)
        })
        .collect()
}

pub fn run_all<W>(keychain: &impl KeychainOperations, clock: &impl GetTime, writer: &mut W)
where
    W: OutErr,
{
    let codes = all_codes(keychain, clock);
    let width = codes.iter().map(|(_, code)| code.len()).max().unwrap_or(0);

    for (name, code) in codes {
        writer.write(&format!("{:<width$}\t{}\n", code, name, width = width));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::tests::constants::*;
    use crate::tests::mocks::{MockClock, MockKeychain, MockOtpWriter};

    fn store() -> MockKeychain {
        MockKeychain::new()
            .with_totp("rfc", RFC_SECRET, 6)
            .with_hotp("counter", RFC_SECRET, 7, 5)
            .with_totp("long", RFC_SECRET, 8)
    }

    #[test]
    fn hotp_entries_show_placeholders() {
        let store = store();

        let codes = all_codes(&store, &MockClock::new());

        assert_eq!(
            codes,
            vec![
                (String::from("counter"), String::from("-------")),
                (String::from("long"), String::from("26969429")),
                (String::from("rfc"), String::from("969429")),
            ]
        );
        assert_eq!(store.counter("counter"), 5);
    }

    #[test]
    fn aligns_codes() {
        let mut writer = MockOtpWriter::new();

        run_all(&store(), &MockClock::new(), &mut writer);

        assert_eq!(
            String::from_utf8(writer.out).unwrap(),
            "------- \tcounter\n26969429\tlong\n969429  \trfc\n"
        );
    }

    #[test]
    fn empty_keychain_prints_nothing() {
        let mut writer = MockOtpWriter::new();

        run_all(&MockKeychain::new(), &MockClock::new(), &mut writer);

        assert_eq!(writer.out, Vec::new());
    }
}
