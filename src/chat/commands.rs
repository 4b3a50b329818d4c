//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the assistant.

use crate::catalog::ClassId;

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the assistant.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start a new chat (clear the transcript).
    NewChat,

    /// Show or hide the class sidebar.
    ToggleSidebar,

    /// Switch to another class.
    Class(ClassId),

    /// Redraw the whole view.
    Show,

    /// Write the current view as an HTML page.
    Export(String),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use tutorius::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/class 2").is_some());
/// assert!(parse_command("What is a pointer?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" | "clear" => ChatCommand::NewChat,
        "sidebar" => ChatCommand::ToggleSidebar,
        "show" => ChatCommand::Show,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "class" => match argument {
            Some(arg) => match arg.parse::<ClassId>() {
                Ok(id) => ChatCommand::Class(id),
                Err(_) => ChatCommand::Invalid("/class expects a numeric class id".to_string()),
            },
            None => ChatCommand::Invalid("/class requires a class id".to_string()),
        },
        "export" => match argument {
            Some(arg) => ChatCommand::Export(arg.to_string()),
            None => ChatCommand::Invalid("/export requires a file path".to_string()),
        },
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a new chat (alias: /clear)
  /sidebar               Open or close the class sidebar
  /class <id>            Switch to another class
  /show                  Redraw the conversation
  /export <file>         Write the conversation as an HTML page
  /help                  Show this help message
  /quit                  Exit the chat"#
}
