//! Content fingerprints and anonymized identities.
//!
//! The content fingerprint is a reversible base64 encoding of the normalized
//! core fields; the store's uniqueness constraint on it is what rejects
//! duplicate submissions. The identity hash is a salted SHA-256 of the
//! caller's network origin and is only used for client-side throttling.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};

/// Separator between fingerprinted fields.
const FIELD_DELIMITER: &str = "|";

/// Fixed salt mixed into identity hashes.
const IDENTITY_SALT: &str = "salt_2025";

/// Deterministic fingerprint of `(contact_number, domain, pain_point)`.
///
/// Each field is trimmed and lower-cased before joining, so case and
/// surrounding whitespace never produce distinct fingerprints.
#[must_use]
pub fn fingerprint(contact_number: &str, domain: &str, pain_point: &str) -> String {
    let joined = [contact_number, domain, pain_point]
        .iter()
        .map(|field| field.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(FIELD_DELIMITER);
    BASE64.encode(joined.as_bytes())
}

/// One-way, salted hash of a network origin identifier, hex-encoded.
#[must_use]
pub fn identity_hash(network_identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(network_identifier.as_bytes());
    hasher.update(IDENTITY_SALT.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_ignores_case_and_outer_whitespace() {
        let a = fingerprint("+919876543210", "Jewelry & Accessories", "Price questions all day long");
        let b = fingerprint(
            " +919876543210 ",
            "JEWELRY & ACCESSORIES",
            "  price questions ALL day long\n",
        );
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_differs_for_different_content() {
        let a = fingerprint("+919876543210", "Beauty & Cosmetics", "Price questions all day long");
        let b = fingerprint("+919876543210", "Beauty & Cosmetics", "Order tracking takes forever");
        let c = fingerprint("+919876543211", "Beauty & Cosmetics", "Price questions all day long");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fingerprint_is_reversible_base64_of_joined_fields() {
        let fp = fingerprint("+91", "Food", "Slow replies");
        let decoded = BASE64.decode(fp).unwrap();
        assert_eq!(decoded, b"+91|food|slow replies");
    }

    #[test]
    fn identity_hash_is_salted_sha256_hex() {
        let hash = identity_hash("127.0.0.1");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));

        let unsalted = hex::encode(Sha256::digest(b"127.0.0.1"));
        assert_ne!(hash, unsalted);
        assert_eq!(hash, hex::encode(Sha256::digest(b"127.0.0.1salt_2025")));
    }

    #[test]
    fn identity_hash_separates_origins() {
        assert_eq!(identity_hash("10.0.0.1"), identity_hash("10.0.0.1"));
        assert_ne!(identity_hash("10.0.0.1"), identity_hash("10.0.0.2"));
    }
}
