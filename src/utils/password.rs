use hex::encode;
use md5::{Digest, Md5};

/// Hex digest of the password's UTF-8 bytes.
///
/// Unsalted single-round MD5, matching the digests already stored for every
/// existing account. Do not change the scheme without a credential
/// migration plan.
pub fn digest_password(password: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(password.as_bytes());
    encode(hasher.finalize())
}

/// Recomputes the digest and compares it to the stored value, ignoring hex
/// casing.
pub fn verify_password(password: &str, stored_digest: &str) -> bool {
    digest_password(password).eq_ignore_ascii_case(stored_digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic_hex() {
        let d = digest_password("secret");
        assert_eq!(d, digest_password("secret"));
        assert_eq!(d.len(), 32);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn known_vector() {
        // RFC 1321 test suite value for "abc"
        assert_eq!(digest_password("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn verify_ignores_stored_casing() {
        let upper = digest_password("secret").to_uppercase();
        assert!(verify_password("secret", &upper));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let stored = digest_password("secret");
        assert!(!verify_password("secretx", &stored));
    }
}
