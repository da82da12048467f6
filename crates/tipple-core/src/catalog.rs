//! Curated collection definitions loaded from YAML.
//!
//! The catalog maps the tag slugs found in deal data (`collection_tags`) to
//! display metadata: a human-facing name, a blurb, and an ordering priority.
//! Slugs in the data that have no catalog entry are handled per
//! [`UnknownTagPolicy`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Priority assigned to collections synthesized for unknown tags; sorts
/// after every curated entry.
pub const AUTO_TITLE_PRIORITY: i32 = i32::MAX;

/// Display metadata for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Lower sorts first. Ties keep catalog order.
    #[serde(default)]
    pub priority: i32,
}

/// One entry as authored in the catalog file.
#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    slug: String,
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: i32,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    collections: Vec<CatalogEntry>,
}

/// What to do with a tag slug that has no catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTagPolicy {
    /// Synthesize a collection titled from the slug, sorted last.
    AutoTitle,
    /// Ignore the tag entirely.
    #[default]
    Drop,
}

/// The loaded catalog, indexed by lowercased slug.
#[derive(Debug, Clone, Default)]
pub struct CollectionCatalog {
    by_slug: HashMap<String, CollectionMeta>,
}

impl CollectionCatalog {
    /// Build a catalog from entries, validating as the loader does.
    ///
    /// Duplicate display names are allowed here; collections sharing a name
    /// merge at assembly time instead.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for an empty slug, an empty
    /// display name, or a slug that repeats (case-insensitively).
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, CollectionMeta)>,
    ) -> Result<CollectionCatalog, CatalogError> {
        let mut by_slug = HashMap::new();
        for (slug, meta) in entries {
            let key = slug.trim().to_lowercase();
            if key.is_empty() {
                return Err(CatalogError::Validation(
                    "catalog entry with empty slug".to_owned(),
                ));
            }
            if meta.display_name.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "collection '{key}' has an empty display name"
                )));
            }
            if by_slug.insert(key.clone(), meta).is_some() {
                return Err(CatalogError::Validation(format!(
                    "duplicate collection slug '{key}'"
                )));
            }
        }
        Ok(CollectionCatalog { by_slug })
    }

    /// Look up a slug, case-insensitively.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&CollectionMeta> {
        self.by_slug.get(&slug.trim().to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}

/// Load and validate a collection catalog from a YAML file.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] when the file cannot be read,
/// [`CatalogError::Parse`] for malformed YAML, and
/// [`CatalogError::Validation`] for entries that fail
/// [`CollectionCatalog::from_entries`] checks.
pub fn load_catalog(path: &Path) -> Result<CollectionCatalog, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: CatalogFile = serde_yaml::from_str(&raw)?;
    let catalog = CollectionCatalog::from_entries(file.collections.into_iter().map(|entry| {
        (
            entry.slug,
            CollectionMeta {
                display_name: entry.display_name,
                description: entry.description,
                priority: entry.priority,
            },
        )
    }))?;
    tracing::debug!(path = %path.display(), collections = catalog.len(), "loaded collection catalog");
    Ok(catalog)
}

/// Title-case a slug for a synthesized collection: `"beers_under_10"`
/// becomes `"Beers Under 10"`. A slug with no word characters keeps its
/// raw form, so the display name is never empty.
#[must_use]
pub fn auto_title(slug: &str) -> String {
    let title = slug
        .split(|c: char| c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    if title.is_empty() {
        slug.to_owned()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn meta(name: &str, priority: i32) -> CollectionMeta {
        CollectionMeta {
            display_name: name.to_owned(),
            description: String::new(),
            priority,
        }
    }

    // -----------------------------------------------------------------------
    // from_entries / get
    // -----------------------------------------------------------------------

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = CollectionCatalog::from_entries([
            ("Wine_Deals".to_owned(), meta("Wine Deals", 10)),
        ])
        .unwrap();
        assert!(catalog.get("wine_deals").is_some());
        assert!(catalog.get("WINE_DEALS").is_some());
        assert!(catalog.get(" wine_deals ").is_some());
        assert!(catalog.get("whisky").is_none());
    }

    #[test]
    fn empty_slug_rejected() {
        let err = CollectionCatalog::from_entries([("  ".to_owned(), meta("X", 0))]).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn empty_display_name_rejected() {
        let err = CollectionCatalog::from_entries([("x".to_owned(), meta(" ", 0))]).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn duplicate_slug_rejected_case_insensitively() {
        let err = CollectionCatalog::from_entries([
            ("wine".to_owned(), meta("Wine", 0)),
            ("WINE".to_owned(), meta("Also Wine", 1)),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn duplicate_display_names_allowed() {
        // Two slugs may share a display name; they merge during assembly.
        let catalog = CollectionCatalog::from_entries([
            ("one_for_one".to_owned(), meta("1-for-1 Deals", 0)),
            ("bogo".to_owned(), meta("1-for-1 Deals", 5)),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    // -----------------------------------------------------------------------
    // load_catalog
    // -----------------------------------------------------------------------

    #[test]
    fn parses_yaml_catalog() {
        let dir = std::env::temp_dir().join("tipple-catalog-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.yaml");
        std::fs::write(
            &path,
            "collections:\n  - slug: wine_deals\n    display_name: Wine Deals\n    description: By the glass or bottle.\n    priority: 20\n  - slug: late_night\n    display_name: Late Night\n",
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        let wine = catalog.get("wine_deals").unwrap();
        assert_eq!(wine.display_name, "Wine Deals");
        assert_eq!(wine.priority, 20);
        let late = catalog.get("late_night").unwrap();
        assert_eq!(late.description, "");
        assert_eq!(late.priority, 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let dir = std::env::temp_dir().join("tipple-catalog-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.yaml");
        std::fs::write(&path, "collections: {not: [valid").unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn shipped_catalog_loads() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/collections.yaml");
        let catalog = load_catalog(&path).unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.get("one_for_one_deals").is_some());
    }

    // -----------------------------------------------------------------------
    // auto_title
    // -----------------------------------------------------------------------

    #[test]
    fn auto_title_from_snake_case() {
        assert_eq!(auto_title("beers_under_10"), "Beers Under 10");
    }

    #[test]
    fn auto_title_from_kebab_and_mixed() {
        assert_eq!(auto_title("late-night"), "Late Night");
        assert_eq!(auto_title("wine"), "Wine");
        assert_eq!(auto_title("__odd__"), "Odd");
    }

    #[test]
    fn auto_title_of_bare_separators_keeps_the_slug() {
        assert_eq!(auto_title("_"), "_");
        assert_eq!(auto_title("--"), "--");
    }
}
