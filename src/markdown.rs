//! Markdown to display-safe HTML.
//!
//! Assistant replies arrive as markdown.  They are rendered with CommonMark
//! semantics and then passed through an allow-list sanitizer, so stored
//! assistant messages never carry scripts, event handlers, or foreign markup.

use pulldown_cmark::{Options, Parser, html};
use pulldown_cmark_escape::escape_html;

/// Renders markdown into sanitized HTML.
///
/// Tables and strikethrough are enabled in addition to CommonMark.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut unsafe_html = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut unsafe_html, parser);
    sanitize_html(&unsafe_html)
}

/// Cleans HTML against ammonia's default allow-list.
pub fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

/// Escapes plain text for HTML text or quoted attribute values.
///
/// Only `&`, `<`, `>`, `"` and `'` are replaced.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = escape_html(&mut escaped, text);
    escaped
}

/// Reduces rendered HTML to readable plain text for terminals.
pub fn html_to_text(html: &str) -> String {
    let stripped = ammonia::Builder::empty().clean(html).to_string();
    let decoded = decode_entities(&stripped);
    let mut out = String::with_capacity(decoded.len());
    let mut blank_run = 0;
    for line in decoded.trim().lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line.trim_end());
    }
    out
}

/// Decodes the named references the HTML serializer emits, plus decimal and
/// hex character references.  Anything else is left as written.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}
