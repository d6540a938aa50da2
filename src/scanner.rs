//! Comment/quote span classification.
//!
//! The CSS and HTML passes both need to tell "text that must survive
//! verbatim" apart from "structure that is a candidate for removal":
//! a `/*` inside a CSS string is content, a `/*` outside one opens a
//! comment. This module is the single scanner both passes share.
//!
//! The scanner is a hand-written single left-to-right pass rather than a
//! regex: the awkward cases (a quote character inside the other kind of
//! quoted string, an unterminated quote or block at end of input) are
//! exactly the ones that push regexes into lookbehind/backreference
//! territory.
//!
//! ## Contract
//!
//! - A quote character opens a literal span that runs to the matching
//!   unescaped quote. Quote characters of the other kind inside it do not
//!   open a nested span.
//! - An unterminated quote is literal to end of input.
//! - A block delimiter (e.g. `/*`) outside a quoted span opens a structural
//!   span that runs to the closing delimiter, or to end of input when
//!   unterminated.
//! - Everything else is literal.

/// Classification of a scanned span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Content that must be preserved verbatim.
    Literal,
    /// Removal/collapse candidate (comment block).
    Structural,
}

/// A half-open byte range `[start, end)` of the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

/// What the scanner treats as structure vs. protected literals.
///
/// `quotes` lists the characters that open a protected string span; pass an
/// empty slice for a blind scan (the HTML comment pass deliberately ignores
/// quoting).
#[derive(Debug, Clone, Copy)]
pub struct BlockRules<'a> {
    /// Opening delimiter of the structural block, e.g. `/*` or `<!--`.
    pub open: &'a str,
    /// Closing delimiter, e.g. `*/` or `-->`.
    pub close: &'a str,
    /// Quote characters that protect literal spans from block matching.
    pub quotes: &'a [char],
}

impl BlockRules<'_> {
    /// CSS comment rules: `/* ... */` blocks, strings in `"` or `'`.
    pub const CSS_COMMENTS: BlockRules<'static> = BlockRules {
        open: "/*",
        close: "*/",
        quotes: &['"', '\''],
    };

    /// HTML comment rules: `<!-- ... -->` blocks, no quote protection.
    pub const HTML_COMMENTS: BlockRules<'static> = BlockRules {
        open: "<!--",
        close: "-->",
        quotes: &[],
    };
}

/// Scan `text` into a complete, ordered, non-overlapping span sequence.
///
/// Adjacent literal spans are merged, so the output alternates between
/// literal and structural. The concatenation of all spans reproduces the
/// input exactly.
pub fn classify(text: &str, rules: BlockRules) -> Vec<Span> {
    // Byte-wise scan: all delimiters and quote characters are ASCII, so
    // every span boundary lands on a UTF-8 character boundary.
    let bytes = text.as_bytes();
    let mut spans: Vec<Span> = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let rest = &bytes[pos..];

        if let Some(&quote) = rules
            .quotes
            .iter()
            .find(|&&q| q.is_ascii() && rest.first() == Some(&(q as u8)))
        {
            // Quoted string: literal through the matching unescaped close
            // quote, or to end of input when unterminated.
            pos += 1;
            loop {
                match bytes.get(pos) {
                    None => break,
                    Some(b'\\') => pos = (pos + 2).min(bytes.len()),
                    Some(&b) if b == quote as u8 => {
                        pos += 1;
                        break;
                    }
                    Some(_) => pos += 1,
                }
            }
            continue;
        }

        if rest.starts_with(rules.open.as_bytes()) {
            if literal_start < pos {
                push_literal(&mut spans, literal_start, pos);
            }
            let body = pos + rules.open.len();
            let end = match find_bytes(&bytes[body..], rules.close.as_bytes()) {
                Some(i) => body + i + rules.close.len(),
                None => bytes.len(),
            };
            spans.push(Span {
                kind: SpanKind::Structural,
                start: pos,
                end,
            });
            pos = end;
            literal_start = end;
            continue;
        }

        pos += 1;
    }

    if literal_start < bytes.len() {
        push_literal(&mut spans, literal_start, bytes.len());
    }

    spans
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn push_literal(spans: &mut Vec<Span>, start: usize, end: usize) {
    // Merge with a preceding literal so output strictly alternates.
    if let Some(last) = spans.last_mut()
        && last.kind == SpanKind::Literal
        && last.end == start
    {
        last.end = end;
        return;
    }
    spans.push(Span {
        kind: SpanKind::Literal,
        start,
        end,
    });
}

/// Concatenate the literal spans of `text`, deleting all structural ones.
pub fn strip_structural(text: &str, rules: BlockRules) -> String {
    let mut out = String::with_capacity(text.len());
    for span in classify(text, rules) {
        if span.kind == SpanKind::Literal {
            out.push_str(&text[span.start..span.end]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds<'a>(text: &'a str, rules: BlockRules) -> Vec<(SpanKind, &'a str)> {
        classify(text, rules)
            .into_iter()
            .map(|s| (s.kind, &text[s.start..s.end]))
            .collect()
    }

    #[test]
    fn plain_text_is_one_literal() {
        let spans = kinds("hello", BlockRules::CSS_COMMENTS);
        assert_eq!(spans, vec![(SpanKind::Literal, "hello")]);
    }

    #[test]
    fn comment_is_structural() {
        let spans = kinds("a/* x */b", BlockRules::CSS_COMMENTS);
        assert_eq!(
            spans,
            vec![
                (SpanKind::Literal, "a"),
                (SpanKind::Structural, "/* x */"),
                (SpanKind::Literal, "b"),
            ]
        );
    }

    #[test]
    fn comment_open_inside_string_is_literal() {
        let spans = kinds(r#"x"str/*not*/"y"#, BlockRules::CSS_COMMENTS);
        assert_eq!(spans, vec![(SpanKind::Literal, r#"x"str/*not*/"y"#)]);
    }

    #[test]
    fn other_quote_kind_inside_string_does_not_nest() {
        // The apostrophe inside the double-quoted string must not open a
        // single-quoted span that would swallow the comment.
        let spans = kinds(r#""it's"/*c*/"#, BlockRules::CSS_COMMENTS);
        assert_eq!(
            spans,
            vec![
                (SpanKind::Literal, r#""it's""#),
                (SpanKind::Structural, "/*c*/"),
            ]
        );
    }

    #[test]
    fn escaped_quote_stays_inside_string() {
        let spans = classify(r#""a\"b"/*c*/"#, BlockRules::CSS_COMMENTS);
        assert_eq!(spans[0], Span {
            kind: SpanKind::Literal,
            start: 0,
            end: 6,
        });
        assert_eq!(spans[1].kind, SpanKind::Structural);
    }

    #[test]
    fn unterminated_quote_is_literal_to_end() {
        let spans = kinds(r#"a"unterminated /* x "#, BlockRules::CSS_COMMENTS);
        assert_eq!(
            spans,
            vec![(SpanKind::Literal, r#"a"unterminated /* x "#)]
        );
    }

    #[test]
    fn unterminated_block_is_structural_to_end() {
        let spans = kinds("a/* runs off", BlockRules::CSS_COMMENTS);
        assert_eq!(
            spans,
            vec![
                (SpanKind::Literal, "a"),
                (SpanKind::Structural, "/* runs off"),
            ]
        );
    }

    #[test]
    fn html_rules_ignore_quotes() {
        let spans = kinds(r#""<!-- c -->""#, BlockRules::HTML_COMMENTS);
        assert_eq!(
            spans,
            vec![
                (SpanKind::Literal, "\""),
                (SpanKind::Structural, "<!-- c -->"),
                (SpanKind::Literal, "\""),
            ]
        );
    }

    #[test]
    fn spans_cover_input_exactly() {
        let text = "a/*b*/'c/*'d/* e";
        let spans = classify(text, BlockRules::CSS_COMMENTS);
        let rebuilt: String = spans.iter().map(|s| &text[s.start..s.end]).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn strip_structural_removes_comments_only() {
        assert_eq!(
            strip_structural("a/* x */b/* y */c", BlockRules::CSS_COMMENTS),
            "abc"
        );
    }

    #[test]
    fn strip_structural_empty_input() {
        assert_eq!(strip_structural("", BlockRules::CSS_COMMENTS), "");
    }
}
