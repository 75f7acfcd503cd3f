// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage Module
//!
//! Persistent storage for every collection the API serves, kept in a single
//! redb file under `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   relief-hub.redb
//!     users               email → user JSON
//!     supplies            supply_id → supply JSON
//!     volunteers          volunteer_id → volunteer JSON
//!     community           post_id → community post JSON
//!     comments            comment_id → comment JSON
//!     comment_post_index  post_ref|0x00|comment_id → ()
//! ```
//!
//! ## Important Notes
//!
//! - All redb calls are blocking; handlers reach them through
//!   [`Database::call`], which moves the work onto the blocking pool.
//! - Repositories borrow the database and never hold transactions across
//!   calls.

pub mod database;
pub mod repository;

pub use database::{
    Database, StorageError, StorageResult, COMMENTS, COMMUNITY, SUPPLIES, USERS, VOLUNTEERS,
};
pub use repository::{
    CommentRepository, CommunityRepository, SupplyRepository, UserRepository, VolunteerRepository,
};

/// File name of the database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "relief-hub.redb";
