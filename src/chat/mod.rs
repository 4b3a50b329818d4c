//! Chat sessions bound to a single class.
//!
//! - [`state`]: transcript, input buffer, loading flag and error slot
//! - [`exchange`]: the send round trip as pure updates over the state
//! - [`session`]: class resolution, binding, and the async driver
//! - [`commands`]: slash command parsing
//! - [`config`]: CLI argument parsing and configuration

mod commands;
mod config;
pub mod exchange;
mod session;
mod state;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use exchange::{Begin, FALLBACK_ERROR, PendingExchange, Settled, SkipReason};
pub use session::{ClassChat, SendOutcome};
pub use state::{ChatState, Message, Sender};
