//! Terminal rendering for chat sessions.
//!
//! This module provides the renderer trait the chat session reports through,
//! and a plain-text implementation for interactive terminals.

use std::io::{self, Stdout, Write};

use crate::catalog::ClassRecord;
use crate::chat::{Message, Sender};
use crate::markdown::html_to_text;

/// ANSI escape code for bold text (used for headers).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for the loading indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for blue text (used for the class name).
const ANSI_BLUE: &str = "\x1b[34m";

/// ANSI escape code for cyan text (used for assistant labels).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for the error banner).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI sequence that erases the current line and returns the cursor.
const ERASE_LINE: &str = "\r\x1b[2K";

/// Trait for rendering chat output.
///
/// The session calls these as state changes; a renderer never reads state
/// back.
pub trait Renderer: Send {
    /// Print the title line for the bound class.
    fn print_header(&mut self, class: &ClassRecord);

    /// Print the sidebar panel for the bound class.
    fn print_sidebar(&mut self, class: &ClassRecord);

    /// Print one transcript entry.
    fn print_message(&mut self, message: &Message);

    /// Called when an exchange's completion call starts.
    fn start_loading(&mut self);

    /// Called when the completion call settles, before the outcome is printed.
    fn finish_loading(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    loading_shown: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            loading_shown: false,
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_header(&mut self, class: &ClassRecord) {
        let title = format!("{} Assistant", class.name);
        println!("{}", self.styled(&format!("{ANSI_BOLD}{ANSI_BLUE}"), &title));
    }

    fn print_sidebar(&mut self, class: &ClassRecord) {
        println!("{}", self.styled(ANSI_BOLD, "Class Sidebar"));
        println!("  Code: {}", class.code);
        println!("  Id:   {}", class.id);
    }

    fn print_message(&mut self, message: &Message) {
        match message.sender {
            Sender::User => println!("You: {}", message.text),
            Sender::Assistant => {
                println!("{}", self.styled(ANSI_CYAN, "Assistant:"));
                println!("{}", html_to_text(&message.text));
            }
        }
        self.flush();
    }

    fn start_loading(&mut self) {
        print!("{}", self.styled(ANSI_DIM, "..."));
        self.loading_shown = true;
        self.flush();
    }

    fn finish_loading(&mut self) {
        if self.loading_shown {
            if self.use_color {
                print!("{ERASE_LINE}");
            } else {
                println!();
            }
            self.loading_shown = false;
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        let line = format!("Error: {error}");
        eprintln!("{}", self.styled(ANSI_RED, &line));
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }
}
