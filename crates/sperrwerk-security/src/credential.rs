// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Credential hashing — SHA-512 of secret||salt, hex-encoded.

use sha2::{Digest, Sha512};
use uuid::Uuid;

use sperrwerk_core::error::{Result, SperrwerkError};

/// A salted credential digest as stored in the principal directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialHash {
    /// Lowercase hex SHA-512 digest of `secret || salt`.
    pub digest: String,
    /// The salt that produced the digest.
    pub salt: String,
}

/// Hash `secret` with `salt`, generating a fresh random salt when none is
/// given.
///
/// A fresh salt is a v4 UUID rendered as 32 hex characters (128 bits of
/// entropy).  The digest is deterministic given the same secret and salt.
/// An empty secret is a caller error, not an authorization decision.
pub fn hash_secret(secret: &str, salt: Option<&str>) -> Result<CredentialHash> {
    if secret.is_empty() {
        return Err(SperrwerkError::Validation("empty secret given".into()));
    }

    let salt = match salt {
        Some(s) => s.to_owned(),
        None => Uuid::new_v4().simple().to_string(),
    };

    let mut hasher = Sha512::new();
    hasher.update(secret.as_bytes());
    hasher.update(salt.as_bytes());
    let digest = hex::encode(hasher.finalize());

    Ok(CredentialHash { digest, salt })
}

/// Check a presented secret against a stored salt and digest.
///
/// The digest comparison is constant-time so that a mismatch position
/// cannot be recovered through timing.
pub fn verify_secret(secret: &str, salt: &str, expected_digest: &str) -> Result<bool> {
    let computed = hash_secret(secret, Some(salt))?;
    Ok(ring::constant_time::verify_slices_are_equal(
        computed.digest.as_bytes(),
        expected_digest.as_bytes(),
    )
    .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-512("abc") — well-known vector; "ab" + salt "c" concatenates to
    /// exactly "abc".
    const ABC_SHA512: &str = "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                              2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f";

    #[test]
    fn digest_is_sha512_of_concatenation() {
        let hash = hash_secret("ab", Some("c")).unwrap();
        assert_eq!(hash.digest, ABC_SHA512);
        assert_eq!(hash.salt, "c");
    }

    #[test]
    fn deterministic_for_fixed_salt() {
        let a = hash_secret("Qwer1234!", Some("somesalt")).unwrap();
        let b = hash_secret("Qwer1234!", Some("somesalt")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fresh_salt_is_generated_and_unique() {
        let a = hash_secret("Qwer1234!", None).unwrap();
        let b = hash_secret("Qwer1234!", None).unwrap();
        assert_eq!(a.salt.len(), 32);
        assert!(a.salt.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn empty_secret_is_a_caller_error() {
        assert!(matches!(
            hash_secret("", None),
            Err(SperrwerkError::Validation(_))
        ));
        assert!(matches!(
            verify_secret("", "salt", "digest"),
            Err(SperrwerkError::Validation(_))
        ));
    }

    #[test]
    fn verify_accepts_only_the_right_secret() {
        let hash = hash_secret("Qwer1234!", None).unwrap();
        assert!(verify_secret("Qwer1234!", &hash.salt, &hash.digest).unwrap());
        assert!(!verify_secret("WRONG", &hash.salt, &hash.digest).unwrap());
        // Wrong salt also fails.
        assert!(!verify_secret("Qwer1234!", "othersalt", &hash.digest).unwrap());
    }
}
