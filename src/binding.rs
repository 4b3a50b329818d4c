//! Assistant bindings keyed by class code.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const BUNDLED_BINDINGS: &str = include_str!("../data/assistants.yaml");

/// The backend context a class's conversation is routed to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantBinding {
    /// Identifier of the remote assistant.
    pub assistant_id: String,
    /// Identifier of the vector store backing the assistant, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_storage_id: Option<String>,
}

impl AssistantBinding {
    /// Creates a binding.
    pub fn new(assistant_id: impl Into<String>, vector_storage_id: Option<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            vector_storage_id,
        }
    }

    /// True if the binding names an assistant.  A blank id routes nowhere.
    pub fn is_bound(&self) -> bool {
        !self.assistant_id.trim().is_empty()
    }
}

/// Read-only lookup from class code to binding.
pub trait AssistantDirectory: Send + Sync {
    /// Returns the binding for `class_code`, or `None` when the code is unmapped.
    fn binding_for(&self, class_code: &str) -> Option<AssistantBinding>;
}

#[derive(Debug, Default, Deserialize)]
struct BindingEntry {
    #[serde(default)]
    assistant_id: Option<String>,
    #[serde(default)]
    vector_storage_id: Option<String>,
}

/// A binding table held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    bindings: BTreeMap<String, AssistantBinding>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the binding for `class_code`.
    pub fn with_binding(mut self, class_code: impl Into<String>, binding: AssistantBinding) -> Self {
        self.bindings.insert(class_code.into(), binding);
        self
    }

    /// Parses a YAML map of `code: {assistant_id, vector_storage_id}`.
    ///
    /// Entries without an assistant id are dropped; they are indistinguishable
    /// from unmapped codes.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let entries: BTreeMap<String, BindingEntry> = serde_yaml::from_str(yaml)?;
        let bindings = entries
            .into_iter()
            .filter_map(|(code, entry)| {
                let assistant_id = entry.assistant_id.filter(|id| !id.trim().is_empty())?;
                let vector_storage_id = entry.vector_storage_id.filter(|id| !id.trim().is_empty());
                Some((code, AssistantBinding::new(assistant_id, vector_storage_id)))
            })
            .collect();
        Ok(Self { bindings })
    }

    /// Loads a YAML binding table from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|err| {
            Error::io(
                format!("failed to read assistant bindings {}", path.display()),
                err,
            )
        })?;
        Self::from_yaml(&yaml)
    }

    /// The binding table compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_BINDINGS)
    }

    /// Number of mapped class codes.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if no class code is mapped.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl AssistantDirectory for StaticDirectory {
    fn binding_for(&self, class_code: &str) -> Option<AssistantBinding> {
        self.bindings.get(class_code).cloned()
    }
}
