//! Best-effort conversion of model-emitted markup into readable HTML.
//!
//! A small-step transformer over a tokenized line stream: each line is
//! classified once (heading, list item, blank, text), consecutive list
//! items are grouped into a single `<ul>`, bold spans are resolved inside
//! a line, and remaining line breaks become `<br />`. Not a markdown
//! parser; the contract is readable HTML, not semantic fidelity.

use html_escape::encode_text;

const MAX_HEADING_LEVEL: usize = 4;

#[derive(Debug, PartialEq)]
enum Line<'a> {
    Heading(usize, &'a str),
    Bullet(&'a str),
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let stripped = line.trim();
    if stripped.is_empty() {
        return Line::Blank;
    }

    let hashes = stripped.chars().take_while(|&c| c == '#').count();
    if (1..=MAX_HEADING_LEVEL).contains(&hashes) {
        return Line::Heading(hashes, stripped[hashes..].trim());
    }

    if let Some(item) = stripped
        .strip_prefix("- ")
        .or_else(|| stripped.strip_prefix("* "))
    {
        return Line::Bullet(item.trim());
    }

    Line::Text(stripped)
}

/// Resolves `**bold**` spans in one line, escaping everything else.
/// A dangling `**` with no closing marker stays literal.
fn render_inline(text: &str) -> String {
    let pieces: Vec<&str> = text.split("**").collect();
    if pieces.len() < 3 {
        return encode_text(text).into_owned();
    }

    let mut out = String::new();
    for (index, piece) in pieces.iter().enumerate() {
        let inside_span = index % 2 == 1;
        if inside_span && index + 1 < pieces.len() {
            out.push_str("<strong>");
            out.push_str(&encode_text(piece));
            out.push_str("</strong>");
        } else {
            if inside_span {
                out.push_str("**");
            }
            out.push_str(&encode_text(piece));
        }
    }
    out
}

fn close_list(items: &mut Vec<String>) -> String {
    let body = items.drain(..).collect::<Vec<_>>().join("\n");
    format!("<ul>\n{body}\n</ul>")
}

pub fn to_html(raw: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut list_items: Vec<String> = Vec::new();

    for line in raw.lines() {
        let token = classify(line);

        if !matches!(token, Line::Bullet(_)) && !list_items.is_empty() {
            out.push(close_list(&mut list_items));
        }

        match token {
            Line::Heading(level, text) => {
                out.push(format!("<h{level}>{}</h{level}>", render_inline(text)));
            }
            Line::Bullet(item) => {
                list_items.push(format!("<li>{}</li>", render_inline(item)));
            }
            Line::Blank => out.push("<br />".to_string()),
            Line::Text(text) => out.push(format!("{}<br />", render_inline(text))),
        }
    }

    if !list_items.is_empty() {
        out.push(close_list(&mut list_items));
    }

    out.join("\n")
}
