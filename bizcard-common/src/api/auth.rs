//! Password hashing for the single shared login
//!
//! # Algorithm
//!
//! 1. Generate 16 random salt bytes
//! 2. SHA-256 over `salt || password`
//! 3. Keep salt and digest; the plaintext is dropped
//!
//! Verification recomputes the digest and compares it in constant time.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Salted SHA-256 digest of the configured password
#[derive(Clone)]
pub struct PasswordHash {
    salt: [u8; SALT_LEN],
    digest: [u8; 32],
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Hash `password` with a fresh random salt
///
/// # Examples
///
/// ```
/// use bizcard_common::api::auth::hash_password;
///
/// let hash = hash_password("hunter2");
/// assert!(hash.verify("hunter2"));
/// assert!(!hash.verify("hunter3"));
/// ```
pub fn hash_password(password: &str) -> PasswordHash {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    PasswordHash::with_salt(password, salt)
}

impl PasswordHash {
    /// Hash with a caller-provided salt
    pub fn with_salt(password: &str, salt: [u8; SALT_LEN]) -> Self {
        Self {
            salt,
            digest: digest(&salt, password),
        }
    }

    /// True when `candidate` hashes to the stored digest
    pub fn verify(&self, candidate: &str) -> bool {
        let computed = digest(&self.salt, candidate);
        constant_time_eq(&computed, &self.digest)
    }
}

fn digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Compare without early exit on the first differing byte
fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("correct horse");
        assert!(hash.verify("correct horse"));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("correct horse");
        assert!(!hash.verify("correct horse "));
        assert!(!hash.verify(""));
    }

    #[test]
    fn test_salt_changes_digest() {
        let a = PasswordHash::with_salt("pw", [1; SALT_LEN]);
        let b = PasswordHash::with_salt("pw", [2; SALT_LEN]);
        assert_ne!(a.digest, b.digest);
        assert!(a.verify("pw") && b.verify("pw"));
    }

    #[test]
    fn test_fresh_salts_differ() {
        assert_ne!(hash_password("pw").salt, hash_password("pw").salt);
    }

    #[test]
    fn test_debug_redacts() {
        let shown = format!("{:?}", hash_password("secret"));
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(&[7; 32], &[7; 32]));
        let mut other = [7; 32];
        other[31] = 8;
        assert!(!constant_time_eq(&[7; 32], &other));
    }
}
