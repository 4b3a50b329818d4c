//! Static class catalog.
//!
//! Classes are immutable records loaded once from a JSON dataset and looked up
//! by numeric identifier.  The catalog is injected into the chat session as a
//! [`ClassCatalog`] so tests can substitute their own.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const BUNDLED_CLASSES: &str = include_str!("../data/classes.json");

/// Numeric class identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub u32);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClassId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim().parse::<u32>().map(ClassId).map_err(|_| {
            Error::validation(
                format!("class id must be a non-negative integer, got {s:?}"),
                Some("class".to_string()),
            )
        })
    }
}

/// One course in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Catalog identifier.
    pub id: ClassId,
    /// Course code, e.g. `CS101`.  Keys the assistant binding.
    #[serde(rename = "Class Code")]
    pub code: String,
    /// Display name.
    #[serde(rename = "Class Name")]
    pub name: String,
}

impl ClassRecord {
    /// Creates a class record.
    pub fn new(id: u32, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ClassId(id),
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Read-only lookup of class records.
pub trait ClassCatalog: Send + Sync {
    /// Returns the record for `id`, if present.
    fn lookup(&self, id: ClassId) -> Option<ClassRecord>;

    /// Returns the record for `id` or a not-found error.
    fn resolve(&self, id: ClassId) -> Result<ClassRecord> {
        self.lookup(id).ok_or_else(|| {
            Error::not_found(
                "Class not found",
                Some("class".to_string()),
                Some(id.to_string()),
            )
        })
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    classes: Vec<ClassRecord>,
}

/// A catalog held entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    classes: Vec<ClassRecord>,
}

impl StaticCatalog {
    /// Creates a catalog from records.  The first record wins on duplicate ids.
    pub fn new(classes: Vec<ClassRecord>) -> Self {
        Self { classes }
    }

    /// Parses a catalog from the `{"classes": [...]}` JSON layout.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.classes))
    }

    /// Loads a catalog from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            Error::io(format!("failed to read class catalog {}", path.display()), err)
        })?;
        Self::from_json(&json)
    }

    /// The dataset compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CLASSES)
    }

    /// All records in dataset order.
    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }
}

impl ClassCatalog for StaticCatalog {
    fn lookup(&self, id: ClassId) -> Option<ClassRecord> {
        self.classes.iter().find(|class| class.id == id).cloned()
    }
}
