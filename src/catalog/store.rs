//! In-memory item store.

use std::collections::BTreeMap;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::catalog::item::{Category, Item, ItemPatch, ItemQuery};

/// Catalog errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Item with {0} does not exist.")]
    NotFound(i64),

    #[error("Item with {0} already exists.")]
    AlreadyExists(i64),

    #[error("No parameters provided for update.")]
    EmptyUpdate,
}

/// Items keyed by id, living for the lifetime of the process.
///
/// Every operation is atomic with respect to the key it touches.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: DashMap<i64, Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the shop's demo stock.
    pub fn with_demo_items() -> Self {
        let store = Self::new();
        for item in [
            Item::new(0, "Hammer", 9.99, 20, Category::Tools),
            Item::new(1, "Pliers", 5.99, 20, Category::Tools),
            Item::new(2, "Nails", 1.99, 100, Category::Consumables),
        ] {
            store.items.insert(item.id, item);
        }
        store
    }

    /// Snapshot of every item, ordered by id.
    pub fn all(&self) -> BTreeMap<i64, Item> {
        self.items
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    pub fn get(&self, id: i64) -> Result<Item, CatalogError> {
        self.items
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(CatalogError::NotFound(id))
    }

    /// Items matching the query, ordered by id.
    pub fn find(&self, query: &ItemQuery) -> Vec<Item> {
        let mut selection: Vec<Item> = self
            .items
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        selection.sort_by_key(|item| item.id);
        selection
    }

    /// Insert a new item. An existing item with the same id is left untouched.
    pub fn insert(&self, item: Item) -> Result<Item, CatalogError> {
        match self.items.entry(item.id) {
            Entry::Occupied(_) => Err(CatalogError::AlreadyExists(item.id)),
            Entry::Vacant(slot) => {
                slot.insert(item.clone());
                Ok(item)
            }
        }
    }

    pub fn update(&self, id: i64, patch: &ItemPatch) -> Result<Item, CatalogError> {
        let mut entry = self.items.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        if patch.is_empty() {
            return Err(CatalogError::EmptyUpdate);
        }
        patch.apply(entry.value_mut());
        Ok(entry.value().clone())
    }

    pub fn remove(&self, id: i64) -> Result<Item, CatalogError> {
        self.items
            .remove(&id)
            .map(|(_, item)| item)
            .ok_or(CatalogError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_items() {
        let store = ItemStore::with_demo_items();
        assert_eq!(store.len(), 3);

        let all = store.all();
        let names: Vec<_> = all.values().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Hammer", "Pliers", "Nails"]);
        assert!(ItemStore::new().is_empty());
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let store = ItemStore::with_demo_items();
        let duplicate = Item::new(0, "Saw", 12.5, 3, Category::Tools);

        assert_eq!(store.insert(duplicate), Err(CatalogError::AlreadyExists(0)));
        assert_eq!(store.get(0).unwrap().name, "Hammer");

        let screwdriver = Item::new(4, "Screwdriver", 3.99, 10, Category::Tools);
        assert_eq!(store.insert(screwdriver.clone()), Ok(screwdriver));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_get_missing() {
        let store = ItemStore::with_demo_items();
        assert_eq!(store.get(42), Err(CatalogError::NotFound(42)));
    }

    #[test]
    fn test_find_is_ordered_conjunction() {
        let store = ItemStore::with_demo_items();

        let tools = store.find(&ItemQuery {
            category: Some(Category::Tools),
            ..Default::default()
        });
        let ids: Vec<_> = tools.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![0, 1]);

        let hammers_with_twenty = store.find(&ItemQuery {
            name: Some("Hammer".into()),
            count: Some(20),
            ..Default::default()
        });
        assert_eq!(hammers_with_twenty.len(), 1);

        let none = store.find(&ItemQuery {
            name: Some("Nails".into()),
            category: Some(Category::Tools),
            ..Default::default()
        });
        assert!(none.is_empty());

        assert_eq!(store.find(&ItemQuery::default()).len(), 3);
    }

    #[test]
    fn test_update() {
        let store = ItemStore::with_demo_items();

        let patch = ItemPatch { count: Some(9001), ..Default::default() };
        let updated = store.update(0, &patch).unwrap();
        assert_eq!(updated.count, 9001);
        assert_eq!(store.get(0).unwrap().count, 9001);

        assert_eq!(store.update(0, &ItemPatch::default()), Err(CatalogError::EmptyUpdate));
        assert_eq!(store.update(99, &patch), Err(CatalogError::NotFound(99)));
        // Missing id wins over an empty patch
        assert_eq!(store.update(99, &ItemPatch::default()), Err(CatalogError::NotFound(99)));
    }

    #[test]
    fn test_remove() {
        let store = ItemStore::with_demo_items();

        let removed = store.remove(0).unwrap();
        assert_eq!(removed.name, "Hammer");
        assert_eq!(store.get(0), Err(CatalogError::NotFound(0)));
        assert_eq!(store.remove(0), Err(CatalogError::NotFound(0)));
        assert_eq!(store.len(), 2);
    }
}
