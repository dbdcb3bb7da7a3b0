use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Extra SHA-256 rounds applied on top of the salted digest
const HASH_ROUNDS: u32 = 10_000;

/// Generate a 16-byte random salt, hex-encoded
pub fn generate_salt() -> String {
    hex::encode(uuid::Uuid::new_v4().as_bytes())
}

/// Hash a password: SHA-256(salt || password), re-hashed `HASH_ROUNDS` times, as hex
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let mut digest = hasher.finalize();

    for _ in 0..HASH_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(digest);
        digest = hasher.finalize();
    }

    hex::encode(digest)
}

/// Verify a password candidate against a stored hash using constant-time comparison
pub fn verify_password(salt: &str, candidate: &str, stored_hash: &str) -> bool {
    let candidate_hash = hash_password(salt, candidate);
    candidate_hash.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let salt = generate_salt();
        let hash = hash_password(&salt, "correct horse battery");
        assert_eq!(hash.len(), 64);
        assert!(verify_password(&salt, "correct horse battery", &hash));
        assert!(!verify_password(&salt, "wrong horse battery", &hash));
    }

    #[test]
    fn test_salt_changes_hash() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();
        assert_eq!(salt1.len(), 32);
        assert_ne!(salt1, salt2);
        assert_ne!(hash_password(&salt1, "pw12345678"), hash_password(&salt2, "pw12345678"));
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_password("s", "p"), hash_password("s", "p"));
    }
}
