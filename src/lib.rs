// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relief Hub - Community & Volunteer Coordination API
//!
//! This crate provides the REST backend for a community relief site: supply
//! listings, volunteer sign-ups, community posts with comments, user accounts
//! with bcrypt/JWT authentication, and image upload through a media host.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and OpenAPI document
//! - `auth` - Password hashing, bearer tokens, the `Auth` extractor
//! - `config` - Environment configuration
//! - `providers` - Media host client
//! - `server` - Startup, transport selection and graceful shutdown
//! - `storage` - Embedded document store (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod server;
pub mod state;
pub mod storage;
