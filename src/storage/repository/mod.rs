// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides the operations for a specific collection, using
//! the generic [`Database`](super::Database) document calls underneath.

pub mod comments;
pub mod community;
pub mod supplies;
pub mod users;
pub mod volunteers;

pub use comments::CommentRepository;
pub use community::CommunityRepository;
pub use supplies::SupplyRepository;
pub use users::UserRepository;
pub use volunteers::VolunteerRepository;
