// Public modules
pub mod binding;
pub mod catalog;
pub mod chat;
pub mod client;
pub mod completion;
pub mod error;
pub mod markdown;
pub mod observability;
pub mod page;
pub mod render;

// Re-exports
pub use binding::{AssistantBinding, AssistantDirectory, StaticDirectory};
pub use catalog::{ClassCatalog, ClassId, ClassRecord, StaticCatalog};
pub use client::AssistantService;
pub use completion::Completion;
pub use error::{Error, Result};
pub use markdown::render_markdown;
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
