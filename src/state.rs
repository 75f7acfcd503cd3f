// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::providers::CloudinaryClient;
use crate::storage::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
    /// `None` when media credentials are not configured.
    pub media: Option<Arc<CloudinaryClient>>,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenService) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            media: None,
        }
    }

    pub fn with_media(mut self, media: CloudinaryClient) -> Self {
        self.media = Some(Arc::new(media));
        self
    }
}

/// State backed by a throwaway database. Keep the `TempDir` alive for the
/// duration of the test.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    use std::time::Duration;

    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("test.redb")).unwrap();
    let tokens = TokenService::new("test-secret", Duration::from_secs(3600));
    (AppState::new(db, tokens), dir)
}
