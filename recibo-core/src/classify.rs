//! Keyword classifier over a category store snapshot.

use crate::store::Categories;

/// Category returned when no keyword matches the description.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Classify a product description against a category snapshot.
///
/// The description is lowercased and categories are tried in stored
/// (insertion) order; the first category with a keyword occurring anywhere
/// in the description wins. Substring containment, not word-boundary
/// matching: the keyword "pan" matches "pantalón".
pub fn classify(description: &str, categories: &Categories) -> String {
    let description = description.to_lowercase();
    for (name, keywords) in categories {
        if keywords.iter().any(|kw| description.contains(kw.as_str())) {
            return name.clone();
        }
    }
    DEFAULT_CATEGORY.to_string()
}
