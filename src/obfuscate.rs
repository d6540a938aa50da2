//! HTML attribute obfuscation.
//!
//! Rewrites every opening tag that carries attributes, wrapping each real
//! attribute in free-floating decoy tokens and padding `class` lists with
//! decoy class names. Browsers ignore the extra words as unknown boolean
//! attributes; naive selector-based scrapers get a much noisier document.
//!
//! `meta` and `noscript` tags are never touched so document metadata
//! parsing keeps working.
//!
//! There is no seeding contract for the decoys. The RNG is an explicit
//! parameter on [`obfuscate_with`] so tests can pass a seeded [`StdRng`]
//! and assert structural properties of the output without pinning exact
//! strings.
//!
//! [`StdRng`]: rand::rngs::StdRng

use rand::Rng;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Opening tag with optional attribute string and optional self-closing
/// slash. Attribute scanning is bounded by `>` only; quoting is handled at
/// the token level below.
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(\w+)(\s[^>]*?)?(\s*/)?>").unwrap());

/// One attribute token: quoted-value attribute (either quote kind) or a
/// bare word. Quote-aware so a space inside `"..."` does not split a token.
static ATTR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\S+="[^"]*"|\S+='[^']*'|\S+"#).unwrap());

static CLASS_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class=['"]([^'"]*)['"]"#).unwrap());

/// Tags the obfuscator must leave untouched.
const EXEMPT_TAGS: &[&str] = &["meta", "noscript"];

/// Obfuscate attribute structure using the thread RNG.
pub fn obfuscate(html: &str) -> String {
    obfuscate_with(html, &mut rand::rng())
}

/// Obfuscate attribute structure with a caller-supplied random source.
///
/// For every opening tag with at least one attribute (except the exempt
/// tags): the `class` value gains 1 to 3 random lowercase tokens of length
/// 6 to 7, and every attribute token is wrapped in a random lowercase token
/// of length 5 to 7 on each side. Real attribute order is preserved; the
/// self-closing slash, if present, survives.
pub fn obfuscate_with<R: Rng>(html: &str, rng: &mut R) -> String {
    TAG.replace_all(html, |caps: &Captures| {
        let tag_name = &caps[1];
        let attributes = caps.get(2).map_or("", |m| m.as_str());
        let self_closing = caps.get(3).is_some();

        if attributes.trim().is_empty()
            || EXEMPT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag_name))
        {
            return caps[0].to_string();
        }

        let obfuscated: Vec<String> = ATTR_TOKEN
            .find_iter(attributes.trim())
            .map(|token| {
                let attr = rewrite_class(token.as_str(), rng);
                let before = random_token(rng, 5, 7);
                let after = random_token(rng, 5, 7);
                format!("{before} {attr} {after}")
            })
            .collect();

        let slash = if self_closing { " /" } else { "" };
        format!("<{tag_name} {}{slash}>", obfuscated.join(" "))
    })
    .into_owned()
}

/// Pad a `class="..."` token with decoy class names; other tokens pass
/// through unchanged.
fn rewrite_class<R: Rng>(token: &str, rng: &mut R) -> String {
    if !(token.starts_with("class=\"") || token.starts_with("class='")) {
        return token.to_string();
    }
    let Some(caps) = CLASS_VALUE.captures(token) else {
        return token.to_string();
    };

    let mut classes: Vec<String> = caps[1].split_whitespace().map(str::to_string).collect();
    let decoys = rng.random_range(1..=3);
    for _ in 0..decoys {
        classes.push(random_token(rng, 6, 7));
    }
    format!("class=\"{}\"", classes.join(" "))
}

/// Uniform random lowercase ASCII string of uniform random length in
/// `min..=max`.
fn random_token<R: Rng>(rng: &mut R, min: usize, max: usize) -> String {
    let len = rng.random_range(min..=max);
    (0..len)
        .map(|_| char::from(b'a' + rng.random_range(0..26u8)))
        .collect()
}
