// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Volunteer repository (create and list only).

use crate::models::Volunteer;

use super::super::{Database, StorageResult, VOLUNTEERS};

/// Repository for volunteer sign-ups.
pub struct VolunteerRepository<'a> {
    db: &'a Database,
}

impl<'a> VolunteerRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create(&self, volunteer: &Volunteer) -> StorageResult<()> {
        self.db.insert(VOLUNTEERS, &volunteer.id, volunteer)
    }

    pub fn list(&self, limit: Option<usize>) -> StorageResult<Vec<Volunteer>> {
        self.db.list(VOLUNTEERS, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::new_document_id;
    use crate::storage::database::tests::temp_db;

    #[test]
    fn create_then_list() {
        let (db, _dir) = temp_db();
        let repo = VolunteerRepository::new(&db);

        let volunteer = Volunteer {
            id: new_document_id(),
            image: "https://img/v.png".to_string(),
            name: "Sam".to_string(),
            email: "sam@x.com".to_string(),
            mobile: "555-0100".to_string(),
            location: "Dhaka".to_string(),
            passion: "Logistics".to_string(),
        };
        repo.create(&volunteer).unwrap();

        assert_eq!(repo.list(None).unwrap(), vec![volunteer]);
    }
}
