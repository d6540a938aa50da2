//! Per-file transform pipeline.
//!
//! Dispatches each discovered file by extension:
//!
//! - `.js`: obfuscate (when enabled) then minify through the [`JsBackend`].
//!   Any backend error copies the original file verbatim and aborts the
//!   whole run. One broken script means the deployment is incomplete, so
//!   the batch fails rather than silently shipping a partial transform.
//! - `.css`: comment stripping then whitespace minification.
//! - `.html`/`.htm`: optional attribute obfuscation, inline `<script>`
//!   rewriting (recoverable per script), then HTML minification.
//! - anything else: byte-for-byte copy to the mirrored path.
//!
//! Smart mode skips `.js`/`.css` files that already look minified.
//!
//! Files are independent, so they are processed in parallel with rayon;
//! `try_for_each` turns the fail-fast policy into a whole-run abort.
//! Progress is reported over an optional mpsc channel so the printer stays
//! out of the worker threads.

use crate::js::{JsBackend, JsError};
use crate::{css, html, obfuscate, scan};
use rayon::prelude::*;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Inline script block: opening tag with its attribute string, body, close.
static INLINE_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script>").unwrap());

/// `src` as a whole word inside a script tag's attribute string.
static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bsrc\b").unwrap());

/// Content length above which a newline-free `.js`/`.css` file is assumed
/// to be already minified (smart mode).
const SMART_SIZE_THRESHOLD: usize = 250;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scan(#[from] scan::ScanError),
    #[error("Processing {path} failed: {message}")]
    File { path: PathBuf, message: String },
}

/// Process-wide toggles, read-only after CLI parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Obfuscate JS and HTML attribute structure (DRM mode).
    pub obfuscate: bool,
    /// Skip files that already look minified.
    pub smart: bool,
}

/// Progress event emitted once per file (plus once per failed inline
/// script), consumed by the console printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// File was transformed and written.
    Compiled { source: PathBuf, output: PathBuf },
    /// File was copied verbatim (passthrough resource or smart-mode skip).
    Copied {
        source: PathBuf,
        output: PathBuf,
        skipped: bool,
    },
    /// File hit an unrecoverable error and was copied verbatim; the run
    /// aborts after this event.
    CopiedOnError {
        source: PathBuf,
        output: PathBuf,
        message: String,
    },
    /// An inline script could not be processed; its original body was kept.
    InlineScriptError { source: PathBuf, message: String },
}

/// Run the pipeline over `files` with the given backend.
///
/// Every file produces exactly one artifact at its mirrored relative path
/// under `output_root`, whether transformed, copied verbatim, or copied as
/// an error fallback. The first unrecoverable error aborts the run.
pub fn run(
    backend: &impl JsBackend,
    files: &[PathBuf],
    input_root: &Path,
    output_root: &Path,
    options: Options,
    events: Option<Sender<FileEvent>>,
) -> Result<(), ProcessError> {
    files
        .par_iter()
        .try_for_each_with(events, |events, file| {
            scan::check_readable(file)?;
            process_file(backend, file, input_root, output_root, options, events)
        })
}

fn process_file(
    backend: &impl JsBackend,
    file: &Path,
    input_root: &Path,
    output_root: &Path,
    options: Options,
    events: &Option<Sender<FileEvent>>,
) -> Result<(), ProcessError> {
    let rel = file.strip_prefix(input_root).unwrap_or(file);
    let out_path = output_root.join(rel);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let ext = file
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "js" | "css" | "html" | "htm" => {}
        _ => {
            // Passthrough resource.
            fs::copy(file, &out_path)?;
            send(events, FileEvent::Copied {
                source: file.to_path_buf(),
                output: out_path,
                skipped: false,
            });
            return Ok(());
        }
    }

    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(err) => {
            // Mis-labeled binary (or worse). Ship it untouched, then stop.
            return fallback_copy(file, &out_path, events, err.to_string());
        }
    };

    if options.smart && (ext == "js" || ext == "css") && looks_minified(file, &ext, &content) {
        fs::copy(file, &out_path)?;
        send(events, FileEvent::Copied {
            source: file.to_path_buf(),
            output: out_path,
            skipped: true,
        });
        return Ok(());
    }

    let transformed = match ext.as_str() {
        "js" => match transform_js(backend, &content, options.obfuscate) {
            Ok(code) => code,
            Err(err) => return fallback_copy(file, &out_path, events, err.to_string()),
        },
        "css" => css::minify(&content),
        _ => {
            let content = if options.obfuscate {
                obfuscate::obfuscate(&content)
            } else {
                content
            };
            let content = rewrite_inline_scripts(backend, &content, options.obfuscate, file, events);
            html::minify(&content)
        }
    };

    fs::write(&out_path, transformed)?;
    send(events, FileEvent::Compiled {
        source: file.to_path_buf(),
        output: out_path,
    });
    Ok(())
}

/// Obfuscate (optionally) then minify a JS source text.
fn transform_js(
    backend: &impl JsBackend,
    content: &str,
    obfuscate: bool,
) -> Result<String, JsError> {
    let content = if obfuscate {
        backend.obfuscate(content)?
    } else {
        content.to_string()
    };
    backend.minify(&content)
}

/// Rewrite inline `<script>` bodies through the JS chain.
///
/// Scripts with a `src` attribute are left alone. A script that fails to
/// process keeps its original text; unlike whole `.js` files this path is
/// recoverable, because one broken inline snippet should not block an
/// otherwise valid page.
fn rewrite_inline_scripts(
    backend: &impl JsBackend,
    content: &str,
    obfuscate: bool,
    file: &Path,
    events: &Option<Sender<FileEvent>>,
) -> String {
    INLINE_SCRIPT
        .replace_all(content, |caps: &Captures| {
            let attributes = &caps[1];
            let body = &caps[2];
            if SRC_ATTR.is_match(attributes) {
                return caps[0].to_string();
            }
            match transform_js(backend, body, obfuscate) {
                Ok(code) => format!("<script>{code}</script>"),
                Err(err) => {
                    send(events, FileEvent::InlineScriptError {
                        source: file.to_path_buf(),
                        message: err.to_string(),
                    });
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// Smart-mode heuristic: names ending in `min.js`/`min.css` (dotless
/// suffix match, so `admin.js` counts), or long single-line content, mean
/// the file has already been through a minifier.
fn looks_minified(file: &Path, ext: &str, content: &str) -> bool {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    name.ends_with(&format!("min.{ext}"))
        || (content.len() > SMART_SIZE_THRESHOLD && !content.contains('\n'))
}

/// Copy the original file to the output path and return the fail-fast
/// error for it. Always returns `Err`.
fn fallback_copy(
    file: &Path,
    out_path: &Path,
    events: &Option<Sender<FileEvent>>,
    message: String,
) -> Result<(), ProcessError> {
    fs::copy(file, out_path)?;
    send(events, FileEvent::CopiedOnError {
        source: file.to_path_buf(),
        output: out_path.to_path_buf(),
        message: message.clone(),
    });
    Err(ProcessError::File {
        path: file.to_path_buf(),
        message,
    })
}

fn send(events: &Option<Sender<FileEvent>>, event: FileEvent) {
    if let Some(tx) = events {
        // The printer hanging up is not a processing failure.
        let _ = tx.send(event);
    }
}
