// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supply repository (full CRUD).

use crate::models::{Supply, UpdateSupplyRequest};

use super::super::{Database, StorageError, StorageResult, SUPPLIES};

/// Repository for supply listings.
pub struct SupplyRepository<'a> {
    db: &'a Database,
}

impl<'a> SupplyRepository<'a> {
    /// Create a new SupplyRepository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Store a new supply.
    pub fn create(&self, supply: &Supply) -> StorageResult<()> {
        self.db.insert(SUPPLIES, &supply.id, supply)
    }

    /// Get a supply by ID.
    pub fn get(&self, supply_id: &str) -> StorageResult<Supply> {
        self.db
            .get(SUPPLIES, supply_id)?
            .ok_or_else(|| StorageError::NotFound(format!("Supply {supply_id}")))
    }

    /// List supplies in creation order, optionally capped.
    pub fn list(&self, limit: Option<usize>) -> StorageResult<Vec<Supply>> {
        self.db.list(SUPPLIES, limit)
    }

    /// Apply the supplied fields to an existing supply.
    pub fn update(&self, supply_id: &str, changes: UpdateSupplyRequest) -> StorageResult<Supply> {
        self.db
            .update(SUPPLIES, supply_id, |supply: &mut Supply| changes.apply_to(supply))
            .map_err(|e| match e {
                StorageError::NotFound(_) => StorageError::NotFound(format!("Supply {supply_id}")),
                other => other,
            })
    }

    /// Delete a supply. Returns the number of removed documents (0 or 1).
    pub fn delete(&self, supply_id: &str) -> StorageResult<u64> {
        Ok(u64::from(self.db.remove(SUPPLIES, supply_id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{new_document_id, Amount};
    use crate::storage::database::tests::temp_db;

    fn test_supply(title: &str) -> Supply {
        Supply {
            id: new_document_id(),
            image: "https://img/1.png".to_string(),
            title: title.to_string(),
            category: "Food".to_string(),
            amount: Amount::Text("20".to_string()),
            description: "Canned beans".to_string(),
        }
    }

    #[test]
    fn create_and_get_supply() {
        let (db, _dir) = temp_db();
        let repo = SupplyRepository::new(&db);

        let supply = test_supply("Beans");
        repo.create(&supply).unwrap();

        assert_eq!(repo.get(&supply.id).unwrap(), supply);
    }

    #[test]
    fn list_returns_creation_order() {
        let (db, _dir) = temp_db();
        let repo = SupplyRepository::new(&db);

        let titles = ["first", "second", "third"];
        for title in titles {
            repo.create(&test_supply(title)).unwrap();
        }

        let listed: Vec<_> = repo.list(None).unwrap().into_iter().map(|s| s.title).collect();
        assert_eq!(listed, titles);
        assert_eq!(repo.list(Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn update_missing_supply_is_not_found() {
        let (db, _dir) = temp_db();
        let repo = SupplyRepository::new(&db);

        let result = repo.update("missing", UpdateSupplyRequest::default());
        assert!(matches!(result, Err(StorageError::NotFound(_))));
        assert!(repo.list(None).unwrap().is_empty());
    }

    #[test]
    fn delete_counts_removed_documents() {
        let (db, _dir) = temp_db();
        let repo = SupplyRepository::new(&db);

        let supply = test_supply("Beans");
        repo.create(&supply).unwrap();

        assert_eq!(repo.delete(&supply.id).unwrap(), 1);
        assert_eq!(repo.delete(&supply.id).unwrap(), 0);
        assert!(matches!(repo.get(&supply.id), Err(StorageError::NotFound(_))));
    }
}
