//! Single-page HTML view of a chat session.

use std::fmt::Write;

use time::format_description::well_known::Rfc3339;

use crate::chat::{ClassChat, Message, Sender};
use crate::completion::Completion;
use crate::markdown::escape_text;

/// Renders the session as a standalone HTML document.
///
/// User text is escaped.  Assistant text is inserted as-is; it was sanitized
/// when the reply was appended.
pub fn render_page<C: Completion>(chat: &ClassChat<C>) -> String {
    let class = chat.class();
    let state = chat.state();
    let title = escape_text(&format!("{} Assistant", class.name));

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(page, "<title>{title}</title>");
    page.push_str("</head>\n<body>\n<div class=\"container\">\n");

    if chat.sidebar_open() {
        page.push_str("<aside class=\"sidebar\">\n<h2>Class Sidebar</h2>\n");
        let _ = writeln!(
            page,
            "<dl><dt>Code</dt><dd>{}</dd><dt>Id</dt><dd>{}</dd></dl>",
            escape_text(&class.code),
            class.id
        );
        page.push_str("</aside>\n");
    }

    page.push_str("<main class=\"chat\">\n<header>\n");
    let _ = writeln!(page, "<h1>{title}</h1>");
    page.push_str("<button type=\"button\" class=\"new-chat-button\" aria-label=\"Start a new chat\">New Chat</button>\n");
    let toggle = if chat.sidebar_open() {
        "Close Sidebar"
    } else {
        "Open Sidebar"
    };
    let _ = writeln!(
        page,
        "<button type=\"button\" class=\"sidebar-toggle-button\" aria-label=\"{toggle}\">{toggle}</button>"
    );
    page.push_str("</header>\n<section class=\"messages\">\n");
    for message in state.messages() {
        push_message(&mut page, message);
    }
    if state.is_loading() {
        page.push_str("<div class=\"spinner\" role=\"status\">Loading…</div>\n");
    }
    page.push_str("</section>\n");

    if let Some(error) = state.error() {
        let _ = writeln!(page, "<div class=\"error\" role=\"alert\">{}</div>", escape_text(error));
    }

    page.push_str("<form class=\"composer\">\n");
    let _ = writeln!(
        page,
        "<input type=\"text\" name=\"message\" placeholder=\"Type your message here...\" value=\"{}\">",
        escape_text(state.input())
    );
    page.push_str("<button type=\"submit\" class=\"send-button\" aria-label=\"Send message\">Send</button>\n");
    page.push_str("</form>\n</main>\n</div>\n</body>\n</html>\n");
    page
}

fn push_message(page: &mut String, message: &Message) {
    let (class, body) = match message.sender {
        Sender::User => ("message user", escape_text(&message.text)),
        Sender::Assistant => ("message assistant", message.text.clone()),
    };
    let timestamp = message.timestamp.format(&Rfc3339).unwrap_or_default();
    let _ = writeln!(
        page,
        "<div class=\"{class}\"><time datetime=\"{timestamp}\"></time><div>{body}</div></div>"
    );
}
