// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are keyed by email, which makes the uniqueness check at
//! registration part of the same write transaction as the insert.

use crate::models::User;

use super::super::{Database, StorageError, StorageResult, USERS};

/// Repository for user accounts.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Store a new user. Fails with `AlreadyExists` if the email is taken.
    pub fn create(&self, user: &User) -> StorageResult<()> {
        self.db
            .insert_unique(USERS, &user.email, user)
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => {
                    StorageError::AlreadyExists(format!("User {}", user.email))
                }
                other => other,
            })
    }

    /// Get a user by email.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        self.db.get(USERS, email)
    }

    /// List all users.
    pub fn list_all(&self) -> StorageResult<Vec<User>> {
        self.db.list(USERS, None)
    }
}
