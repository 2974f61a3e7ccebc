//! License key generation.
//!
//! Keys are 10 characters sampled uniformly (with replacement) from the
//! 36-symbol alphabet `{A-Z, 0-9}`, a space of 36^10 keys.
//!
//! Collisions are not retried: a duplicate key is rejected by the store's
//! uniqueness constraint and surfaces to the caller as an internal error.

use rand::Rng;

/// Number of characters in a license key.
pub const KEY_LENGTH: usize = 10;

/// Alphabet a license key is drawn from: uppercase ASCII letters and digits.
const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random license key.
pub fn generate_key() -> String {
    let mut rng = rand::thread_rng();
    (0..KEY_LENGTH)
        .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_has_expected_length() {
        assert_eq!(generate_key().len(), KEY_LENGTH);
    }

    #[test]
    fn key_uses_only_uppercase_alphanumerics() {
        for _ in 0..100 {
            let key = generate_key();
            assert!(
                key.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "unexpected character in key: {key}"
            );
        }
    }

    #[test]
    fn consecutive_keys_differ() {
        // 36^10 key space — 100 consecutive draws colliding would indicate
        // a broken RNG, not bad luck.
        let keys: std::collections::HashSet<String> = (0..100).map(|_| generate_key()).collect();
        assert_eq!(keys.len(), 100);
    }
}
