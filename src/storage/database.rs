// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: email → serialized user document
//! - `supplies`: supply_id → serialized supply document
//! - `volunteers`: volunteer_id → serialized volunteer document
//! - `community`: post_id → serialized community post document
//! - `comments`: comment_id → serialized comment document
//! - `comment_post_index`: composite key (post_ref|0x00|comment_id) → ()
//!
//! Document ids are UUID v7 strings, so key order is creation order.

use std::path::Path;
use std::sync::Arc;

use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// A collection of JSON documents keyed by a string.
pub type Collection = TableDefinition<'static, &'static str, &'static [u8]>;

pub const USERS: Collection = TableDefinition::new("users");
pub const SUPPLIES: Collection = TableDefinition::new("supplies");
pub const VOLUNTEERS: Collection = TableDefinition::new("volunteers");
pub const COMMUNITY: Collection = TableDefinition::new("community");
pub const COMMENTS: Collection = TableDefinition::new("comments");

/// Index: composite key → unit, for filtering comments by post reference.
pub const COMMENT_POST_INDEX: TableDefinition<&[u8], ()> =
    TableDefinition::new("comment_post_index");

/// Separator between the post reference and the comment id in index keys.
const INDEX_SEPARATOR: u8 = 0x00;

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("blocking task failed: {0}")]
    Task(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the comment_post_index table.
///
/// Format: `post_ref | 0x00 | comment_id`
fn make_index_key(post_ref: &str, comment_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(post_ref.len() + 1 + comment_id.len());
    key.extend_from_slice(post_ref.as_bytes());
    key.push(INDEX_SEPARATOR);
    key.extend_from_slice(comment_id.as_bytes());
    key
}

/// Lower bound of a range scan over every comment of a post.
fn make_prefix(post_ref: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(post_ref.len() + 1);
    prefix.extend_from_slice(post_ref.as_bytes());
    prefix.push(INDEX_SEPARATOR);
    prefix
}

/// Exclusive upper bound of the same range.
fn make_prefix_end(post_ref: &str) -> Vec<u8> {
    let mut end = Vec::with_capacity(post_ref.len() + 1);
    end.extend_from_slice(post_ref.as_bytes());
    end.push(INDEX_SEPARATOR + 1);
    end
}

/// Extract the comment id portion from a composite index key.
fn extract_comment_id(post_ref: &str, key: &[u8]) -> Option<String> {
    let start = post_ref.len() + 1;
    key.get(start..)
        .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the embedded document store.
///
/// Cloning is cheap; all clones refer to the same open database file.
#[derive(Clone)]
pub struct Database {
    db: Arc<redb::Database>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = redb::Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            for collection in [USERS, SUPPLIES, VOLUNTEERS, COMMUNITY, COMMENTS] {
                let _ = write_txn.open_table(collection)?;
            }
            let _ = write_txn.open_table(COMMENT_POST_INDEX)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Document database opened");
        Ok(Self { db: Arc::new(db) })
    }

    /// Run a blocking storage operation on the blocking thread pool.
    ///
    /// redb commits fsync to disk, so request handlers go through here rather
    /// than touching the database on an async worker.
    pub async fn call<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Database) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }

    /// Confirm a read transaction can be opened (readiness probe).
    pub fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        Ok(())
    }

    // =========================================================================
    // Generic document operations
    // =========================================================================

    /// Insert a document, overwriting any existing value under the key.
    pub fn insert<T: Serialize>(&self, collection: Collection, key: &str, doc: &T) -> StorageResult<()> {
        let json = serde_json::to_vec(doc)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(collection)?;
            table.insert(key, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Insert a document only if the key is free.
    ///
    /// The lookup and the insert share one write transaction; redb serializes
    /// writers, so two concurrent calls for the same key cannot both succeed.
    pub fn insert_unique<T: Serialize>(
        &self,
        collection: Collection,
        key: &str,
        doc: &T,
    ) -> StorageResult<()> {
        let json = serde_json::to_vec(doc)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(collection)?;
            if table.get(key)?.is_some() {
                return Err(StorageError::AlreadyExists(key.to_string()));
            }
            table.insert(key, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a single document by key.
    pub fn get<T: DeserializeOwned>(&self, collection: Collection, key: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection)?;
        match table.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List documents in key order, stopping after `limit` when given.
    pub fn list<T: DeserializeOwned>(
        &self,
        collection: Collection,
        limit: Option<usize>,
    ) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection)?;

        let mut docs = Vec::new();
        for entry in table.iter()? {
            if limit.is_some_and(|limit| docs.len() >= limit) {
                break;
            }
            let (_, value) = entry?;
            docs.push(serde_json::from_slice(value.value())?);
        }
        Ok(docs)
    }

    /// Read-modify-write a document inside one write transaction.
    ///
    /// Fails with `NotFound` (and writes nothing) when the key is absent.
    pub fn update<T, F>(&self, collection: Collection, key: &str, apply: F) -> StorageResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(collection)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                let existing = table
                    .get(key)?
                    .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
                existing.value().to_vec()
            };

            let mut doc: T = serde_json::from_slice(&existing_bytes)?;
            apply(&mut doc);

            let json = serde_json::to_vec(&doc)?;
            table.insert(key, json.as_slice())?;
            doc
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Remove a document. Returns whether a document was removed.
    pub fn remove(&self, collection: Collection, key: &str) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(collection)?;
            let removed = table.remove(key)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    // =========================================================================
    // Comments and their post index
    // =========================================================================

    /// Insert a comment document together with its post index entry.
    pub fn insert_comment<T: Serialize>(
        &self,
        comment_id: &str,
        post_ref: &str,
        doc: &T,
    ) -> StorageResult<()> {
        let json = serde_json::to_vec(doc)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COMMENTS)?;
            table.insert(comment_id, json.as_slice())?;

            let mut idx_table = write_txn.open_table(COMMENT_POST_INDEX)?;
            let key = make_index_key(post_ref, comment_id);
            idx_table.insert(key.as_slice(), ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// All comments whose post reference equals `post_ref`, oldest first.
    pub fn list_comments_for<T: DeserializeOwned>(&self, post_ref: &str) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(COMMENT_POST_INDEX)?;
        let table = read_txn.open_table(COMMENTS)?;

        let start = make_prefix(post_ref);
        let end = make_prefix_end(post_ref);

        let mut docs = Vec::new();
        for entry in idx_table.range(start.as_slice()..end.as_slice())? {
            let (key, _) = entry?;
            let Some(comment_id) = extract_comment_id(post_ref, key.value()) else {
                continue;
            };
            if let Some(value) = table.get(comment_id.as_str())? {
                docs.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(docs)
    }
}

// =============================================================================
// Tests
// =============================================================================
