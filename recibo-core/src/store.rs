//! Persisted category -> keywords store backing the classifier.
//!
//! The store is a single JSON document with one top-level key holding an
//! insertion-ordered mapping from category name to keyword list. Every
//! operation reloads the file and every mutation rewrites it in full; the
//! file is the single source of truth and there is no cross-operation
//! cache. Concurrent writers race as last-writer-wins, and an interrupted
//! write can truncate the document; callers must not treat the store as
//! crash-safe.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Category name -> keyword list, in persisted insertion order.
pub type Categories = IndexMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("category does not exist: {0}")]
    CategoryNotFound(String),

    #[error("keyword '{keyword}' does not exist in category '{category}'")]
    KeywordNotFound { category: String, keyword: String },

    #[error("category already exists: {0}")]
    CategoryExists(String),

    #[error("keyword '{keyword}' already exists in category '{category}'")]
    KeywordExists { category: String, keyword: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed category file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted document shape: `{"categories": {name: [keyword, ...]}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDoc {
    #[serde(default)]
    categories: Categories,
}

/// Handle over the persisted store file.
///
/// The path is injected once (no ambient global state) and the handle is
/// cheap to clone around; it holds no data beyond the path.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    path: PathBuf,
}

impl CategoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreDoc, StoreError> {
        if !self.path.exists() {
            return Ok(StoreDoc::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, doc: &StoreDoc) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Current category mapping. Empty when no document has been written yet.
    pub fn categories(&self) -> Result<Categories, StoreError> {
        Ok(self.load()?.categories)
    }

    /// Create a category with an optional starting keyword set. Name and
    /// keywords are lowercased; duplicate keywords in the input collapse.
    pub fn create_category(&self, name: &str, keywords: &[String]) -> Result<(), StoreError> {
        let name = name.to_lowercase();
        let mut doc = self.load()?;
        if doc.categories.contains_key(&name) {
            return Err(StoreError::CategoryExists(name));
        }
        let mut set: Vec<String> = Vec::with_capacity(keywords.len());
        for kw in keywords {
            let kw = kw.to_lowercase();
            if !set.contains(&kw) {
                set.push(kw);
            }
        }
        doc.categories.insert(name, set);
        self.save(&doc)
    }

    pub fn delete_category(&self, name: &str) -> Result<(), StoreError> {
        let name = name.to_lowercase();
        let mut doc = self.load()?;
        // shift_remove keeps the remaining categories in insertion order
        if doc.categories.shift_remove(&name).is_none() {
            return Err(StoreError::CategoryNotFound(name));
        }
        self.save(&doc)
    }

    pub fn add_keyword(&self, name: &str, keyword: &str) -> Result<(), StoreError> {
        let name = name.to_lowercase();
        let keyword = keyword.to_lowercase();
        let mut doc = self.load()?;
        let keywords = doc
            .categories
            .get_mut(&name)
            .ok_or_else(|| StoreError::CategoryNotFound(name.clone()))?;
        if keywords.contains(&keyword) {
            return Err(StoreError::KeywordExists {
                category: name,
                keyword,
            });
        }
        keywords.push(keyword);
        self.save(&doc)
    }

    pub fn remove_keyword(&self, name: &str, keyword: &str) -> Result<(), StoreError> {
        let name = name.to_lowercase();
        let keyword = keyword.to_lowercase();
        let mut doc = self.load()?;
        let keywords = doc
            .categories
            .get_mut(&name)
            .ok_or_else(|| StoreError::CategoryNotFound(name.clone()))?;
        let Some(pos) = keywords.iter().position(|k| *k == keyword) else {
            return Err(StoreError::KeywordNotFound {
                category: name,
                keyword,
            });
        };
        keywords.remove(pos);
        self.save(&doc)
    }

    /// Classify a description against a fresh snapshot of the store.
    pub fn classify(&self, description: &str) -> Result<String, StoreError> {
        Ok(crate::classify(description, &self.categories()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, CategoryStore) {
        let dir = TempDir::new().unwrap();
        let store = CategoryStore::open(dir.path().join("categories.json"));
        (dir, store)
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let (_dir, store) = temp_store();
        assert!(store.categories().unwrap().is_empty());
    }

    #[test]
    fn test_create_lowercases_name_and_keywords() {
        let (_dir, store) = temp_store();
        store
            .create_category("Lácteos", &["Leche".to_string(), "YOGUR".to_string()])
            .unwrap();

        let cats = store.categories().unwrap();
        assert_eq!(
            cats.get("lácteos").unwrap(),
            &vec!["leche".to_string(), "yogur".to_string()]
        );
    }

    #[test]
    fn test_create_duplicate_fails() {
        let (_dir, store) = temp_store();
        store.create_category("bebidas", &[]).unwrap();
        let err = store.create_category("Bebidas", &[]).unwrap_err();
        assert!(matches!(err, StoreError::CategoryExists(name) if name == "bebidas"));
    }

    #[test]
    fn test_delete_missing_category_fails() {
        let (_dir, store) = temp_store();
        let err = store.delete_category("bebidas").unwrap_err();
        assert!(matches!(err, StoreError::CategoryNotFound(_)));
    }

    #[test]
    fn test_add_then_remove_keyword_round_trips() {
        let (_dir, store) = temp_store();
        store
            .create_category("bebidas", &["agua".to_string()])
            .unwrap();
        let before = store.categories().unwrap();

        store.add_keyword("bebidas", "Zumo").unwrap();
        assert_eq!(
            store.categories().unwrap().get("bebidas").unwrap(),
            &vec!["agua".to_string(), "zumo".to_string()]
        );

        store.remove_keyword("bebidas", "zumo").unwrap();
        assert_eq!(store.categories().unwrap(), before);
    }

    #[test]
    fn test_duplicate_keyword_fails() {
        let (_dir, store) = temp_store();
        store
            .create_category("bebidas", &["agua".to_string()])
            .unwrap();
        let err = store.add_keyword("bebidas", "AGUA").unwrap_err();
        assert!(matches!(err, StoreError::KeywordExists { .. }));
    }

    #[test]
    fn test_remove_missing_keyword_fails() {
        let (_dir, store) = temp_store();
        store.create_category("bebidas", &[]).unwrap();
        let err = store.remove_keyword("bebidas", "agua").unwrap_err();
        assert!(matches!(err, StoreError::KeywordNotFound { .. }));
        let err = store.remove_keyword("nada", "agua").unwrap_err();
        assert!(matches!(err, StoreError::CategoryNotFound(_)));
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let (_dir, store) = temp_store();
        store.create_category("zz", &[]).unwrap();
        store.create_category("aa", &[]).unwrap();
        store.create_category("mm", &[]).unwrap();

        let names: Vec<String> = store.categories().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["zz", "aa", "mm"]);

        // order survives an unrelated mutation
        store.delete_category("aa").unwrap();
        let names: Vec<String> = store.categories().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["zz", "mm"]);
    }

    #[test]
    fn test_persists_across_handles() {
        let (dir, store) = temp_store();
        store
            .create_category("bollería", &["pan".to_string()])
            .unwrap();

        let reopened = CategoryStore::open(dir.path().join("categories.json"));
        let cats = reopened.categories().unwrap();
        assert_eq!(cats.get("bollería").unwrap(), &vec!["pan".to_string()]);
    }
}
