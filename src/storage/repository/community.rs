// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Community post repository.

use crate::models::CommunityPost;

use super::super::{Database, StorageError, StorageResult, COMMUNITY};

/// Repository for community posts.
pub struct CommunityRepository<'a> {
    db: &'a Database,
}

impl<'a> CommunityRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create(&self, post: &CommunityPost) -> StorageResult<()> {
        self.db.insert(COMMUNITY, &post.id, post)
    }

    /// Get a post by ID.
    pub fn get(&self, post_id: &str) -> StorageResult<CommunityPost> {
        self.db
            .get(COMMUNITY, post_id)?
            .ok_or_else(|| StorageError::NotFound(format!("Community post {post_id}")))
    }

    pub fn list(&self, limit: Option<usize>) -> StorageResult<Vec<CommunityPost>> {
        self.db.list(COMMUNITY, limit)
    }
}
