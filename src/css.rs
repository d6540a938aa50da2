//! CSS comment removal and whitespace minification.
//!
//! Regex/string-pass based, not a CSS parser. Comment removal is
//! string-aware (a `/*` inside a quoted value is content, see
//! [`crate::scanner`]); the whitespace rules that follow are deliberately
//! not. They collapse space around delimiters wherever it appears, so a
//! quoted value containing `" ; "` will be collapsed too. Acceptable for
//! the best-effort contract.

use crate::scanner::{self, BlockRules};
use regex::Regex;
use std::sync::LazyLock;

static AROUND_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([{}:;,\n])\s*").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Delete `/* ... */` comments, leaving quoted strings untouched.
///
/// A comment left open at end of input is removed to the end.
pub fn remove_comments(content: &str) -> String {
    scanner::strip_structural(content, BlockRules::CSS_COMMENTS)
}

/// Minify CSS: remove comments, then apply the whitespace rules in order.
///
/// Collapse whitespace around `{` `}` `:` `;` `,` and newlines into the
/// delimiter alone, collapse remaining whitespace runs to a single space,
/// drop semicolons directly before a closing brace, trim.
pub fn minify(content: &str) -> String {
    let content = remove_comments(content);
    let content = AROUND_DELIMITERS.replace_all(&content, "$1");
    let content = WHITESPACE_RUN.replace_all(&content, " ");
    let content = content.replace(";}", "}");
    content.trim().to_string()
}
