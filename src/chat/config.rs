//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::binding::StaticDirectory;
use crate::catalog::{ClassId, StaticCatalog};
use crate::error::Result;

/// Class opened when none is given.
const DEFAULT_CLASS_ID: u32 = 1;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the tutorius-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Class to open.
    #[arrrg(optional, "Class id to chat about (default: 1)", "ID")]
    pub class: Option<u32>,

    /// Class catalog JSON file.
    #[arrrg(optional, "Class catalog JSON (default: bundled)", "PATH")]
    pub classes: Option<String>,

    /// Assistant binding YAML file.
    #[arrrg(optional, "Assistant bindings YAML (default: bundled)", "PATH")]
    pub bindings: Option<String>,

    /// Root URL of the assistant service.
    #[arrrg(optional, "Assistant service base URL", "URL")]
    pub base_url: Option<String>,

    /// Request timeout.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The class the session opens on.
    pub class_id: ClassId,

    /// Catalog file; `None` uses the bundled dataset.
    pub classes_path: Option<PathBuf>,

    /// Binding file; `None` uses the bundled table.
    pub bindings_path: Option<PathBuf>,

    /// Assistant service URL; `None` defers to the environment.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Class: 1
    /// - Catalog and bindings: bundled
    /// - Timeout: 60 seconds
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            class_id: ClassId(DEFAULT_CLASS_ID),
            classes_path: None,
            bindings_path: None,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_color: true,
        }
    }

    /// Sets the class to open.
    pub fn with_class(mut self, class_id: ClassId) -> Self {
        self.class_id = class_id;
        self
    }

    /// Sets the catalog file.
    pub fn with_classes_path(mut self, path: Option<PathBuf>) -> Self {
        self.classes_path = path;
        self
    }

    /// Sets the bindings file.
    pub fn with_bindings_path(mut self, path: Option<PathBuf>) -> Self {
        self.bindings_path = path;
        self
    }

    /// Sets the assistant service URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Loads the configured class catalog.
    pub fn load_catalog(&self) -> Result<StaticCatalog> {
        match &self.classes_path {
            Some(path) => StaticCatalog::from_path(path),
            None => StaticCatalog::bundled(),
        }
    }

    /// Loads the configured binding table.
    pub fn load_directory(&self) -> Result<StaticDirectory> {
        match &self.bindings_path {
            Some(path) => StaticDirectory::from_path(path),
            None => StaticDirectory::bundled(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            class_id: ClassId(args.class.unwrap_or(DEFAULT_CLASS_ID)),
            classes_path: args.classes.map(PathBuf::from),
            bindings_path: args.bindings.map(PathBuf::from),
            base_url: args.base_url,
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            use_color: !args.no_color,
        }
    }
}
