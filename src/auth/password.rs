// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing with bcrypt.
//!
//! Both functions are CPU-bound; call them from `spawn_blocking`.

use super::AuthError;

/// Fixed bcrypt work factor for stored passwords.
pub const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::InternalError(format!("failed to hash password: {e}")))
}

/// Check a plaintext password against a stored bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash)
        .map_err(|e| AuthError::InternalError(format!("failed to verify password: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("p").unwrap();
        let second = hash_password("p").unwrap();

        assert_ne!(first, "p");
        assert_ne!(first, second, "each hash gets its own salt");
        assert!(first.starts_with("$2"));
        assert!(verify_password("p", &first).unwrap());
        assert!(!verify_password("wrong", &first).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_internal_error() {
        let result = verify_password("p", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(AuthError::InternalError(_))));
    }
}
