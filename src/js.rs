//! JavaScript minification and obfuscation backends.
//!
//! JS handling is delegated entirely to [oxc](https://oxc.rs): this crate
//! never rewrites JS syntax itself. The [`JsBackend`] trait is the seam
//! between the file pipeline and the collaborator, so tests can swap in a
//! failing or recording backend and exercise the pipeline's error policy
//! without a real minifier.
//!
//! The production implementation is [`OxcBackend`]:
//! - `minify`: compress + identifier mangling + minified codegen.
//! - `obfuscate`: top-level identifier mangling with no compression, so the
//!   output stays structurally intact but loses its meaningful names.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsError {
    #[error("JS parse failed: {0}")]
    Parse(String),
    #[error("JS processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for JavaScript processing backends.
///
/// Both operations take source text and return rewritten source text, or an
/// error when the input cannot be processed. `Sync` so the pipeline can run
/// files in parallel against a shared backend.
pub trait JsBackend: Sync {
    /// Rename identifiers to meaningless ones without changing behavior.
    fn obfuscate(&self, source: &str) -> Result<String, JsError>;

    /// Compress and mangle source into the smallest equivalent text.
    fn minify(&self, source: &str) -> Result<String, JsError>;
}

/// Production backend built on oxc.
#[derive(Debug, Default)]
pub struct OxcBackend;

impl OxcBackend {
    pub fn new() -> Self {
        Self
    }

    fn rewrite(&self, source: &str, options: MinifierOptions, compact: bool) -> Result<String, JsError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        if !ret.errors.is_empty() {
            let messages: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
            return Err(JsError::Parse(messages.join("; ")));
        }
        let mut program = ret.program;
        let ret = Minifier::new(options).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: compact,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;
        Ok(code)
    }
}

impl JsBackend for OxcBackend {
    fn obfuscate(&self, source: &str) -> Result<String, JsError> {
        let options = MinifierOptions {
            mangle: Some(MangleOptions {
                top_level: Some(true),
                ..MangleOptions::default()
            }),
            compress: None,
        };
        self.rewrite(source, options, false)
    }

    fn minify(&self, source: &str) -> Result<String, JsError> {
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        };
        self.rewrite(source, options, true)
    }
}
