//! HTML comment removal and whitespace minification.
//!
//! Single left-to-right pass over tag spans (`<` to `>`) and text spans
//! (runs of non-`<`). No DOM is built. A boolean flag tracks whether the
//! scan is inside a formatting-sensitive tag (`pre`, `textarea`, `code`);
//! content inside one passes through byte-identical.
//!
//! The flag is toggled by tag name alone, not nesting depth: a same-name
//! tag nested inside a `<pre>` will clear the flag early. Fine for
//! real-world documents, which do not nest preserve tags.

use crate::scanner::{self, BlockRules};
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static MULTI_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Tags whose inner text must not be whitespace-collapsed.
const PRESERVE_TAGS: &[&str] = &["pre", "textarea", "code"];

/// Delete `<!-- ... -->` comments.
///
/// Comment stripping is blind to surrounding context: a comment inside a
/// `<script>` block is removed like any other. (An alternative would be to
/// skip comments that sit inside script/style blocks; the blind variant is
/// the documented choice here.)
pub fn remove_comments(content: &str) -> String {
    scanner::strip_structural(content, BlockRules::HTML_COMMENTS)
}

/// Minify HTML: strip comments, then collapse whitespace outside
/// preserve tags.
///
/// Tags outside a preserve span get internal whitespace runs collapsed to a
/// single space and are trimmed. Text outside a preserve span loses its
/// newlines, and runs of two or more whitespace characters collapse to one
/// space. Preserve tags themselves and everything between them pass through
/// unmodified.
pub fn minify(content: &str) -> String {
    let content = remove_comments(content);
    let bytes = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut in_preserved = false;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'<' {
            let end = match bytes[pos + 1..].iter().position(|&b| b == b'>') {
                Some(i) => pos + 1 + i + 1,
                None => bytes.len(),
            };
            let tag = &content[pos..end];
            if is_preserve_tag(tag) {
                in_preserved = !tag.starts_with("</");
                out.push_str(tag);
            } else if in_preserved {
                out.push_str(tag);
            } else {
                out.push_str(WHITESPACE_RUN.replace_all(tag, " ").trim());
            }
            pos = end;
        } else {
            let end = match bytes[pos..].iter().position(|&b| b == b'<') {
                Some(i) => pos + i,
                None => bytes.len(),
            };
            let text = &content[pos..end];
            if in_preserved {
                out.push_str(text);
            } else {
                let stripped: String =
                    text.chars().filter(|&c| c != '\n' && c != '\r').collect();
                out.push_str(&MULTI_WHITESPACE.replace_all(&stripped, " "));
            }
            pos = end;
        }
    }

    out
}

/// Whether a raw tag span names one of the preserve tags.
fn is_preserve_tag(tag: &str) -> bool {
    let name = tag_name(tag);
    PRESERVE_TAGS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(&name))
}

/// Extract the tag name from a raw `<...>` span: drop the angle brackets
/// and slash, take everything up to the first space.
fn tag_name(tag: &str) -> String {
    tag.chars()
        .filter(|c| !matches!(c, '<' | '/' | '>'))
        .collect::<String>()
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_string()
}
