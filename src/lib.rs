//! # webpress
//!
//! Minify web assets and optionally obfuscate them for deployment. The
//! input is a directory of HTML, CSS, JS, and passthrough resources; the
//! output is a mirrored tree in which every source file has been shrunk
//! and, in DRM mode, made hostile to scrapers and casual readers.
//!
//! # Architecture: One Pass Per File
//!
//! ```text
//! scan      input/   →  Vec<PathBuf>       (discovery + validation)
//! process   file     →  output/<rel-path>  (dispatch by extension)
//! ```
//!
//! Each file is read once, transformed in memory, and written once. Files
//! are independent, so the pipeline runs them in parallel; a single
//! unrecoverable error aborts the whole run after copying the offending
//! file verbatim, so the output tree is always complete even when the run
//! fails.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Input tree discovery, readability and empty-dir validation |
//! | [`process`] | Per-file dispatch: transform chains, smart mode, fail-fast policy |
//! | [`scanner`] | Shared comment/quote span classifier (literal vs. structural) |
//! | [`css`] | CSS comment removal and whitespace minification |
//! | [`html`] | HTML comment removal and preserve-tag-aware minification |
//! | [`obfuscate`] | HTML attribute obfuscation with decoy classes and tokens |
//! | [`js`] | JS minify/obfuscate collaborators behind the [`js::JsBackend`] trait |
//! | [`output`] | Console formatting: pure `format_*` functions + colored `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## String Passes, Not Parsers
//!
//! The HTML and CSS transforms are single-pass string scans with no DOM
//! and no stylesheet AST. This keeps them tolerant of the slightly broken
//! markup real sites ship: a transform that refuses to parse is a
//! transform that blocks a deployment. The cost is well-defined edge cases
//! (documented per module) rather than correctness guarantees.
//!
//! ## JS Is Someone Else's Problem
//!
//! JavaScript is the one asset class where naive string passes would break
//! behavior, so JS work is delegated to [oxc](https://oxc.rs) behind the
//! [`js::JsBackend`] trait. The trait boundary keeps the pipeline testable
//! with mock backends and keeps this crate out of the JS-rewriting
//! business entirely.
//!
//! ## Obfuscation Is Noise, Not Crypto
//!
//! DRM mode pads every tag's attribute list with random decoy tokens and
//! decoy class names. Browsers ignore them; scrapers keying on class
//! selectors or attribute positions drown in them. Nothing is encrypted
//! and nothing is secret; the goal is to raise the cost of automated
//! extraction, not to make it impossible.

pub mod css;
pub mod html;
pub mod js;
pub mod obfuscate;
pub mod output;
pub mod process;
pub mod scan;
pub mod scanner;
