// src/common/id_generator.rs
//! Crockford Base32 user ID generator
//!
//! Generates human-readable user IDs in the format U_XXXXXX.
//! The alphabet excludes I, L, O, U to avoid ambiguous characters,
//! which leaves ~1 billion combinations (32^6).

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Number of random characters after the prefix
const ID_LENGTH: usize = 6;

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a User ID (U_XXXXXX)
pub fn generate_user_id() -> String {
    format!("U_{}", generate_crockford_string(ID_LENGTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_user_id_format() {
        let id = generate_user_id();
        assert!(id.starts_with("U_"));
        assert_eq!(id.len(), 2 + ID_LENGTH);
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_user_id();
        for c in id[2..].chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "unexpected character '{}' in id {}",
                c,
                id
            );
        }
    }

    #[test]
    fn test_uniqueness() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate_user_id()), "duplicate id generated");
        }
    }
}
