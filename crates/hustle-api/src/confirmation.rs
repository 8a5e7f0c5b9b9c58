//! Confirmation numbers for completed purchases.
//!
//! Format: `CONF-<unix millis, base 36>-<7 random base-36 digits>`, all
//! upper-case. Numbers are unique in practice but not guaranteed; the
//! transactions table rejects a duplicate.

use chrono::Utc;
use rand::Rng;

const PREFIX: &str = "CONF";
const RADIX: u32 = 36;
const SUFFIX_LEN: usize = 7;

pub fn generate() -> String {
    let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    generate_at(now_ms, &mut rand::rng())
}

pub fn generate_at<R: Rng>(unix_ms: u64, rng: &mut R) -> String {
    let suffix = fraction_digits(rng.random::<f64>(), SUFFIX_LEN);
    format!("{PREFIX}-{}-{suffix}", to_base36(unix_ms))
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(digit((n % u64::from(RADIX)) as u32));
        n /= u64::from(RADIX);
    }
    digits.iter().rev().collect()
}

/// First `len` base-36 digits after the point of `x` in [0, 1).
fn fraction_digits(mut x: f64, len: usize) -> String {
    (0..len)
        .map(|_| {
            x *= f64::from(RADIX);
            let d = x.floor();
            x -= d;
            digit((d as u32).min(RADIX - 1))
        })
        .collect()
}

fn digit(d: u32) -> char {
    char::from_digit(d, RADIX)
        .unwrap_or('0')
        .to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Check a string against the confirmation number format.
    fn is_well_formed(s: &str) -> bool {
        let upper_base36 = |c: char| c.is_ascii_digit() || c.is_ascii_uppercase();

        let mut parts = s.split('-');
        let (Some(prefix), Some(stamp), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        prefix == PREFIX
            && !stamp.is_empty()
            && stamp.chars().all(upper_base36)
            && suffix.len() == SUFFIX_LEN
            && suffix.chars().all(upper_base36)
    }

    #[test]
    fn test_timestamp_component() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn test_fraction_digits() {
        assert_eq!(fraction_digits(0.0, 7), "0000000");
        assert_eq!(fraction_digits(0.5, 7), "I000000");
        assert_eq!(fraction_digits(0.25, 7), "9000000");
        assert_eq!(fraction_digits(0.999_999_999_999, 7), "ZZZZZZZ");
    }

    #[test]
    fn test_generated_format() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let conf = generate_at(1_700_000_000_000, &mut rng);
            assert!(conf.starts_with("CONF-LOYW3V28-"), "{conf}");
            assert!(is_well_formed(&conf), "{conf}");
        }
        assert!(is_well_formed(&generate()));
    }

    #[test]
    fn test_same_millisecond_differs() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = generate_at(1_700_000_000_000, &mut rng);
        let b = generate_at(1_700_000_000_000, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_well_formed("CONF-LOYW3V28-abcdefg"));
        assert!(!is_well_formed("CONF-LOYW3V28-ABCDEF"));
        assert!(!is_well_formed("CONF--ABCDEFG"));
        assert!(!is_well_formed("TXN-LOYW3V28-ABCDEFG"));
        assert!(!is_well_formed("CONF-LOYW3V28-ABCDEFG-X"));
    }
}
