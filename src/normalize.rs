//! Input cleanup applied before format detection.

use ::scraper::{ElementRef, Html, Node, Selector};
use itertools::Itertools;

use crate::error::Result;

const HTML_MARKERS: [&str; 6] = ["<html", "<body", "<br", "<p>", "<div", "<table"];
const BLOCK_ELEMENTS: [&str; 12] = [
    "p", "div", "br", "tr", "li", "table", "h1", "h2", "h3", "h4", "h5", "h6",
];
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "head"];

/// Collapse the invisible characters and line endings that survive copy-paste
/// out of mail clients, and trim every line.
pub fn clean_text(raw: &str) -> String {
    raw.replace('\u{a0}', " ")
        .replace(['\u{200b}', '\u{200c}', '\u{200d}', '\u{feff}'], "")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::trim_end)
        .join("\n")
        .trim()
        .to_string()
}

/// Whether the paste looks like the HTML source of an email.
pub fn looks_like_html(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    HTML_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Render pasted email source to plain text, one line per block element.
/// Plain-text input only goes through [`clean_text`].
pub fn to_plain_text(raw: &str) -> Result<String> {
    if !looks_like_html(raw) {
        return Ok(clean_text(raw));
    }

    let document = Html::parse_document(raw);
    let body_selector = Selector::parse("body")?;
    let Some(body) = document.select(&body_selector).next() else {
        return Ok(clean_text(raw));
    };

    let mut text = String::new();
    render(body, &mut text);

    let text = clean_text(&text);
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .join("\n"))
}

/// Append the text under `element`, with every block element on lines of its own.
fn render(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(chunk) => out.push_str(chunk),
            Node::Element(e) if SKIPPED_ELEMENTS.contains(&e.name()) => {}
            Node::Element(e) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_ELEMENTS.contains(&e.name());
                if block {
                    out.push('\n');
                }
                render(child, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}
