// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Account credentials and bearer tokens for the Relief Hub API.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/v1/register` stores the user with a bcrypt password hash
//! 2. `POST /api/v1/login` verifies the password and issues an HS256 JWT
//!    binding the user's email, valid for the configured lifetime
//! 3. Clients send `Authorization: Bearer <token>` on protected routes
//! 4. The [`Auth`] extractor verifies signature and expiry and yields the
//!    [`AuthenticatedUser`]
//!
//! ## Security
//!
//! - Login failures never reveal whether the email or the password was wrong
//! - Hashing and verification run on the blocking pool
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use password::{hash_password, verify_password, BCRYPT_COST};
pub use token::TokenService;
