//! End-to-end pipeline tests: real filesystem, real oxc backend.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use webpress::js::{JsBackend, JsError, OxcBackend};
use webpress::process::{self, FileEvent, Options, ProcessError};
use webpress::scan;

/// Backend whose minify always fails, for fail-fast coverage from outside
/// the crate.
struct BrokenMinifier;

impl JsBackend for BrokenMinifier {
    fn obfuscate(&self, source: &str) -> Result<String, JsError> {
        Ok(source.to_string())
    }

    fn minify(&self, _source: &str) -> Result<String, JsError> {
        Err(JsError::ProcessingFailed("simulated failure".into()))
    }
}

fn run(
    backend: &impl JsBackend,
    input: &Path,
    output: &Path,
    options: Options,
) -> (Result<(), ProcessError>, Vec<FileEvent>) {
    let files = scan::collect_files(input).unwrap();
    let (tx, rx) = std::sync::mpsc::channel();
    let result = process::run(backend, &files, input, output, options, Some(tx));
    (result, rx.into_iter().collect())
}

#[test]
fn mixed_tree_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = (tmp.path().join("site"), tmp.path().join("dist"));
    fs::create_dir_all(input.join("css")).unwrap();
    fs::create_dir_all(input.join("js")).unwrap();
    fs::create_dir_all(input.join("fonts")).unwrap();

    fs::write(input.join("css/site.css"), "/* c */ .x { color: red; }").unwrap();
    fs::write(
        input.join("js/app.js"),
        "function add(first, second) {\n  return first + second;\n}\nconsole.log(add(1, 2));\n",
    )
    .unwrap();
    fs::write(
        input.join("index.html"),
        "<!-- header -->\n<html>\n  <body>\n    <h1>Hi   there</h1>\n  </body>\n</html>\n",
    )
    .unwrap();
    fs::write(input.join("fonts/a.woff2"), [0u8, 1, 2, 3]).unwrap();

    let (result, events) = run(&OxcBackend::new(), &input, &output, Options::default());
    result.unwrap();

    // CSS at the mirrored path, fully minified.
    assert_eq!(
        fs::read_to_string(output.join("css/site.css")).unwrap(),
        ".x{color:red}"
    );

    // JS shrank and lost its newline structure.
    let js = fs::read_to_string(output.join("js/app.js")).unwrap();
    assert!(js.contains("console.log"));
    assert!(js.len() < 90, "not minified: {js}");

    // HTML lost comments and collapsed whitespace.
    let html = fs::read_to_string(output.join("index.html")).unwrap();
    assert!(!html.contains("<!--"));
    assert!(!html.contains('\n'));
    assert!(html.contains("<h1>Hi there</h1>"));

    // Resource copied byte-for-byte.
    assert_eq!(
        fs::read(output.join("fonts/a.woff2")).unwrap(),
        vec![0u8, 1, 2, 3]
    );

    // One artifact and one event per input file.
    assert_eq!(events.len(), 4);
}

#[test]
fn smart_mode_never_touches_preminified_js() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = (tmp.path().join("in"), tmp.path().join("out"));
    fs::create_dir_all(&input).unwrap();
    let body = "var a=1;var b=2;function c(){return a+b}";
    fs::write(input.join("app.min.js"), body).unwrap();

    // A backend that fails on contact proves the skip happens up front.
    let options = Options {
        obfuscate: false,
        smart: true,
    };
    let (result, events) = run(&BrokenMinifier, &input, &output, options);
    result.unwrap();

    assert_eq!(fs::read_to_string(output.join("app.min.js")).unwrap(), body);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, FileEvent::Copied { skipped: true, .. }))
    );
}

#[test]
fn js_failure_aborts_run_but_ships_the_file() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = (tmp.path().join("in"), tmp.path().join("out"));
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("broken.js"), "var x = 1;").unwrap();

    let (result, events) = run(&BrokenMinifier, &input, &output, Options::default());

    assert!(result.is_err());
    assert_eq!(
        fs::read_to_string(output.join("broken.js")).unwrap(),
        "var x = 1;"
    );
    assert!(
        events
            .iter()
            .any(|e| matches!(e, FileEvent::CopiedOnError { .. }))
    );
}

#[test]
fn unparseable_js_with_real_backend_aborts() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = (tmp.path().join("in"), tmp.path().join("out"));
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("broken.js"), "function ( {{{").unwrap();

    let (result, _) = run(&OxcBackend::new(), &input, &output, Options::default());

    assert!(result.is_err());
    // The original still reaches the output tree.
    assert_eq!(
        fs::read_to_string(output.join("broken.js")).unwrap(),
        "function ( {{{"
    );
}

#[test]
fn drm_mode_obfuscates_html_and_js() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = (tmp.path().join("in"), tmp.path().join("out"));
    fs::create_dir_all(&input).unwrap();
    fs::write(
        input.join("index.html"),
        concat!(
            r#"<meta charset="utf-8">"#,
            r#"<div class="hero main">content</div>"#,
            "<script>const secretName = 'x'; console.log(secretName);</script>",
        ),
    )
    .unwrap();

    let options = Options {
        obfuscate: true,
        smart: false,
    };
    let (result, _) = run(&OxcBackend::new(), &input, &output, options);
    result.unwrap();

    let html = fs::read_to_string(output.join("index.html")).unwrap();

    // Metadata tags are exempt.
    assert!(html.contains(r#"<meta charset="utf-8">"#));

    // Real classes survive among the decoys.
    assert!(html.contains("hero"));
    assert!(html.contains("main"));

    // The inline script was mangled: behavior kept, name gone.
    assert!(html.contains("console.log"));
    assert!(!html.contains("secretName"));

    // Text content is never obfuscated.
    assert!(html.contains(">content</div>"));
}

#[test]
fn preserve_tags_survive_full_pipeline() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = (tmp.path().join("in"), tmp.path().join("out"));
    fs::create_dir_all(&input).unwrap();
    let pre = "<pre>line one\n    line two\n\ttabbed</pre>";
    fs::write(
        input.join("doc.html"),
        format!("<html>\n<body>\n{pre}\n</body>\n</html>"),
    )
    .unwrap();

    let (result, _) = run(&OxcBackend::new(), &input, &output, Options::default());
    result.unwrap();

    let html = fs::read_to_string(output.join("doc.html")).unwrap();
    assert!(html.contains(pre), "pre content altered: {html}");
}

#[test]
fn deep_trees_mirror_exactly() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = (tmp.path().join("in"), tmp.path().join("out"));
    fs::create_dir_all(input.join("a/b/c")).unwrap();
    fs::write(input.join("a/b/c/deep.css"), ".d{margin:0}").unwrap();
    fs::write(input.join("top.txt"), "hello").unwrap();

    let (result, _) = run(&OxcBackend::new(), &input, &output, Options::default());
    result.unwrap();

    assert!(output.join("a/b/c/deep.css").is_file());
    assert_eq!(
        fs::read_to_string(output.join("top.txt")).unwrap(),
        "hello"
    );
}
