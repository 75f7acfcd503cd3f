// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment repository.
//!
//! Comments reference a community post by an opaque string that is not
//! checked against the community collection. Filtering by post goes through
//! the `comment_post_index` table.

use crate::models::Comment;

use super::super::{Database, StorageResult, COMMENTS};

/// Repository for comments.
pub struct CommentRepository<'a> {
    db: &'a Database,
}

impl<'a> CommentRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Store a comment and index it under its post reference.
    pub fn create(&self, comment: &Comment) -> StorageResult<()> {
        self.db.insert_comment(&comment.id, &comment.post_id, comment)
    }

    /// List comments, all of them or only those for `post_id`.
    pub fn list(&self, post_id: Option<&str>) -> StorageResult<Vec<Comment>> {
        match post_id {
            Some(post_id) => self.db.list_comments_for(post_id),
            None => self.db.list(COMMENTS, None),
        }
    }
}
