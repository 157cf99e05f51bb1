//! Session key fingerprints for startup logs.
//!
//! Operators compare fingerprints across replicas to confirm they share a
//! key without the key material ever reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First eight bytes of the SHA-256 of the signing key, hex encoded.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use backend::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_secret_same_fingerprint() {
        let secret = [b's'; 64];
        assert_eq!(
            key_fingerprint(&Key::derive_from(&secret)),
            key_fingerprint(&Key::derive_from(&secret))
        );
    }

    #[rstest]
    fn distinct_secrets_differ() {
        assert_ne!(
            key_fingerprint(&Key::derive_from(&[b'a'; 64])),
            key_fingerprint(&Key::derive_from(&[b'b'; 64]))
        );
    }

    #[rstest]
    fn fingerprint_is_lowercase_hex() {
        let fp = key_fingerprint(&Key::generate());
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
