//! The hymn collection. A catalog is built once at startup, validated, sorted by
//! hymn number and then only ever read.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info};

use crate::db::FavoritesStore;
use crate::models::{Category, Hymn};

/// Sample collection compiled into the binary so the app works without any
/// external data file.
const BUNDLED_CATALOG: &str = include_str!("../data/hymns.json");

/// Problems found while reading or validating hymn data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("hymn data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("hymn number {0} appears more than once")]
    DuplicateId(u32),
    #[error("hymn number must be positive")]
    ZeroId,
    #[error("hymn {id} has an empty {field}")]
    EmptyField { id: u32, field: &'static str },
}

/// Immutable, id-ordered hymn collection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    hymns: Vec<Hymn>,
}

impl Catalog {
    /// Validate `hymns` and sort them by number.
    pub fn new(mut hymns: Vec<Hymn>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(hymns.len());
        for hymn in &hymns {
            if hymn.id == 0 {
                return Err(CatalogError::ZeroId);
            }
            if hymn.title.trim().is_empty() {
                return Err(CatalogError::EmptyField {
                    id: hymn.id,
                    field: "title",
                });
            }
            if hymn.category.trim().is_empty() {
                return Err(CatalogError::EmptyField {
                    id: hymn.id,
                    field: "category",
                });
            }
            if !seen.insert(hymn.id) {
                return Err(CatalogError::DuplicateId(hymn.id));
            }
        }

        hymns.sort_by_key(|hymn| hymn.id);
        Ok(Self { hymns })
    }

    /// Parse a JSON array of hymn records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let hymns: Vec<Hymn> = serde_json::from_str(json)?;
        Self::new(hymns)
    }

    /// The collection shipped with the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Read a catalog from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read hymn catalog {}", path.display()))?;
        let catalog = Self::from_json(&json)
            .with_context(|| format!("failed to load hymn catalog {}", path.display()))?;
        info!(path = %path.display(), hymns = catalog.len(), "loaded external catalog");
        Ok(catalog)
    }

    /// Use the external catalog when one is configured, the bundled one
    /// otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                let catalog = Self::bundled().context("bundled hymn catalog is invalid")?;
                debug!(hymns = catalog.len(), "loaded bundled catalog");
                Ok(catalog)
            }
        }
    }

    pub fn hymns(&self) -> &[Hymn] {
        &self.hymns
    }

    pub fn len(&self) -> usize {
        self.hymns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hymns.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Hymn> {
        self.hymns
            .binary_search_by_key(&id, |hymn| hymn.id)
            .ok()
            .map(|index| &self.hymns[index])
    }

    /// Category names with their hymn counts, in order of first appearance.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = Vec::new();
        for hymn in &self.hymns {
            match categories.iter_mut().find(|c| c.name == hymn.category) {
                Some(category) => category.count += 1,
                None => categories.push(Category {
                    name: hymn.category.clone(),
                    count: 1,
                }),
            }
        }
        categories
    }

    /// Hymns filed under `category`, in catalog order.
    pub fn in_category(&self, category: &str) -> Vec<&Hymn> {
        self.hymns
            .iter()
            .filter(|hymn| hymn.category == category)
            .collect()
    }

    /// Favorite hymns in catalog order. Ids in the store that no longer exist in
    /// the catalog are skipped.
    pub fn favorites(&self, store: &FavoritesStore) -> Vec<&Hymn> {
        self.hymns
            .iter()
            .filter(|hymn| store.contains(hymn.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_is_valid_and_sorted() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.is_empty());
        let ids: Vec<u32> = catalog.hymns().iter().map(|h| h.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn sorts_by_id() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": 3, "title": "c", "category": "x", "lyrics": ""},
                {"id": 1, "title": "a", "category": "y", "lyrics": "", "transliteration": "A"},
                {"id": 2, "title": "b", "category": "x", "lyrics": "", "composer": "Someone"}
            ]"#,
        )
        .unwrap();
        let ids: Vec<u32> = catalog.hymns().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.get(2).and_then(|h| h.composer()), Some("Someone"));
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn counts_categories_in_first_appearance_order() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": 1, "title": "a", "category": "y", "lyrics": ""},
                {"id": 2, "title": "b", "category": "x", "lyrics": ""},
                {"id": 3, "title": "c", "category": "y", "lyrics": ""}
            ]"#,
        )
        .unwrap();
        let categories = catalog.categories();
        assert_eq!(categories.len(), 2);
        assert_eq!((categories[0].name.as_str(), categories[0].count), ("y", 2));
        assert_eq!((categories[1].name.as_str(), categories[1].count), ("x", 1));
        assert_eq!(catalog.in_category("y").len(), 2);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::from_json(
            r#"[
                {"id": 1, "title": "a", "category": "y", "lyrics": ""},
                {"id": 1, "title": "b", "category": "y", "lyrics": ""}
            ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(1)));
    }

    #[test]
    fn rejects_blank_titles_and_zero_ids() {
        let err = Catalog::from_json(r#"[{"id": 4, "title": " ", "category": "y", "lyrics": ""}]"#)
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::EmptyField { id: 4, field: "title" }
        ));

        let err = Catalog::from_json(r#"[{"id": 0, "title": "a", "category": "y", "lyrics": ""}]"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::ZeroId));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
