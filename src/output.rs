//! Console output formatting.
//!
//! Stateless presentation layer: each piece of output has a pure
//! `format_*` function (testable, returns plain strings) and a `print_*`
//! wrapper that adds color and writes to the terminal. No state, no
//! lifecycle; color comes from `owo-colors` and degrades to plain text on
//! non-tty outputs.

use crate::process::FileEvent;
use owo_colors::{OwoColorize, Stream};
use std::path::Path;

/// Extensions the pipeline transforms; everything else is a resource.
const SOURCE_EXTENSIONS: &[&str] = &["js", "css", "html", "htm"];

// ============================================================================
// Run statistics
// ============================================================================

/// Counts shown before processing starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub source: usize,
    pub resource: usize,
}

/// Split the discovered files into transformable sources and passthrough
/// resources.
pub fn file_stats(files: &[std::path::PathBuf]) -> FileStats {
    let source = files
        .iter()
        .filter(|f| {
            f.extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e.as_str()))
        })
        .count();
    FileStats {
        source,
        resource: files.len() - source,
    }
}

/// Format the pre-run stats block: file counts and compilation mode.
pub fn format_file_stats(stats: FileStats, obfuscate: bool) -> Vec<String> {
    let mode = if obfuscate {
        "DRM protection"
    } else {
        "Preprocess only"
    };
    vec![
        format!("Source files detected: {}", stats.source),
        format!("Resource files detected: {}", stats.resource),
        String::new(),
        format!("Compilation mode: {mode}"),
        String::new(),
    ]
}

/// Print the stats block, with the mode highlighted.
pub fn print_file_stats(stats: FileStats, obfuscate: bool) {
    println!(
        "Source files detected: {}",
        stats.source.if_supports_color(Stream::Stdout, |c| c.cyan())
    );
    println!(
        "Resource files detected: {}",
        stats
            .resource
            .if_supports_color(Stream::Stdout, |c| c.yellow())
    );
    println!();
    let mode = if obfuscate {
        "DRM protection"
    } else {
        "Preprocess only"
    };
    println!(
        "Compilation mode: {}",
        mode.if_supports_color(Stream::Stdout, |c| c.magenta())
    );
    println!();
}

// ============================================================================
// Per-file progress
// ============================================================================

/// Format a single pipeline event as a display line.
pub fn format_file_event(event: &FileEvent) -> Vec<String> {
    match event {
        FileEvent::Compiled { source, output } => {
            vec![format!(
                "Compiled: {} -> {}",
                source.display(),
                output.display()
            )]
        }
        FileEvent::Copied {
            source,
            output,
            skipped,
        } => {
            let suffix = if *skipped { " (skipped)" } else { "" };
            vec![format!(
                "Copied: {} -> {}{suffix}",
                source.display(),
                output.display()
            )]
        }
        FileEvent::CopiedOnError {
            source,
            output,
            message,
        } => vec![
            format!("Error processing {}: {message}", source.display()),
            format!(
                "Copied without minification due to error: {} -> {}",
                source.display(),
                output.display()
            ),
        ],
        FileEvent::InlineScriptError { source, message } => {
            vec![format!(
                "Error processing inline script in {}: {message}",
                source.display()
            )]
        }
    }
}

/// Print a pipeline event with a colored status label.
pub fn print_file_event(event: &FileEvent) {
    match event {
        FileEvent::Compiled { source, output } => {
            println!(
                "{} {} -> {}",
                "Compiled:".if_supports_color(Stream::Stdout, |c| c.green()),
                source.display(),
                output.display()
            );
        }
        FileEvent::Copied {
            source,
            output,
            skipped,
        } => {
            let suffix = if *skipped { " (skipped)" } else { "" };
            println!(
                "{} {} -> {}{suffix}",
                "Copied:".if_supports_color(Stream::Stdout, |c| c.blue()),
                source.display(),
                output.display()
            );
        }
        FileEvent::CopiedOnError {
            source,
            output,
            message,
        } => {
            eprintln!(
                "{} processing {}: {message}",
                "Error".if_supports_color(Stream::Stderr, |c| c.red()),
                source.display()
            );
            println!(
                "{} {} -> {}",
                "Copied without minification due to error:"
                    .if_supports_color(Stream::Stdout, |c| c.yellow()),
                source.display(),
                output.display()
            );
        }
        FileEvent::InlineScriptError { source, message } => {
            eprintln!(
                "{} processing inline script in {}: {message}",
                "Error".if_supports_color(Stream::Stderr, |c| c.red()),
                source.display()
            );
        }
    }
}

// ============================================================================
// Run boundaries
// ============================================================================

/// Format the short usage line shown when positional args are missing.
pub fn format_usage(bin: &str) -> Vec<String> {
    vec![
        format!("Usage: {bin} <input_dir> <output_dir> [--drm] [--smart]"),
        "Use --help for more detailed usage instructions.".to_string(),
    ]
}

pub fn print_usage(bin: &str) {
    for line in format_usage(bin) {
        println!("{line}");
    }
}

pub fn print_output_dir_created(output: &Path) {
    println!(
        "{} {}",
        "Output directory created:".if_supports_color(Stream::Stdout, |c| c.green()),
        output.display()
    );
}

/// Format the final success line.
pub fn format_done(obfuscate: bool) -> String {
    let protected = if obfuscate { " and protected" } else { "" };
    format!("[Done!] The web application files are compiled{protected}.")
}

pub fn print_done(obfuscate: bool) {
    let protected = if obfuscate { " and protected" } else { "" };
    println!(
        "\n{} The web application files are compiled{protected}.",
        "[Done!]".if_supports_color(Stream::Stdout, |c| c.bright_green())
    );
}

/// Print a fatal error as a single formatted message.
pub fn print_error(message: &str) {
    eprintln!(
        "{} {message}",
        "Error:".if_supports_color(Stream::Stderr, |c| c.red())
    );
}
