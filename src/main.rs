use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use webpress::process::Options;
use webpress::{js, output, process, scan};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "webpress")]
#[command(about = "Minify web assets and optionally obfuscate them for deployment")]
#[command(long_about = "\
Minify web assets and optionally obfuscate them for deployment

Walks the input directory, transforms every web source file it finds, and
writes the results to the same relative paths under the output directory:

  .js          minified (oxc); obfuscated first in DRM mode
  .css         comments stripped, whitespace collapsed
  .html/.htm   comments stripped, whitespace collapsed outside pre/textarea/
               code; inline <script> bodies go through the JS chain; DRM
               mode pads tag attributes with decoy tokens and classes
  anything     copied byte-for-byte

DRM mode (--drm) makes the published code noisy for scrapers and casual
readers; it does not change behavior in the browser. Smart mode (--smart)
leaves files that already look minified (*.min.js, *.min.css, long
single-line content) untouched.

One unprocessable .js file aborts the whole run with a non-zero exit code
after copying that file verbatim, so a broken deployment never goes
unnoticed. Broken inline scripts only lose their minification.")]
#[command(version = version_string())]
// Lowercase -v for version, not clap's default -V.
#[command(disable_version_flag = true)]
struct Cli {
    /// Directory containing the source files
    input_dir: Option<PathBuf>,

    /// Directory where processed files will be saved
    output_dir: Option<PathBuf>,

    /// Enable code obfuscation (DRM protection)
    #[arg(short = 'd', long)]
    drm: bool,

    /// Skip already-minified JS/CSS files
    #[arg(short = 's', long)]
    smart: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            return match err.kind() {
                // Help and version are success paths.
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = err.print();
                    ExitCode::SUCCESS
                }
                _ => {
                    output::print_error(&err.to_string());
                    ExitCode::FAILURE
                }
            };
        }
    };

    // Missing positionals are a usage hint, not an error.
    let (Some(input), Some(output_dir)) = (cli.input_dir, cli.output_dir) else {
        output::print_usage("webpress");
        return ExitCode::SUCCESS;
    };

    let options = Options {
        obfuscate: cli.drm,
        smart: cli.smart,
    };

    match run(&input, &output_dir, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path, output_dir: &Path, options: Options) -> Result<(), Box<dyn std::error::Error>> {
    if scan::ensure_output_dir(output_dir)? {
        output::print_output_dir_created(output_dir);
    }

    let files = scan::collect_files(input)?;
    output::print_file_stats(output::file_stats(&files), options.obfuscate);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_file_event(&event);
        }
    });

    let backend = js::OxcBackend::new();
    let result = process::run(&backend, &files, input, output_dir, options, Some(tx));
    printer.join().unwrap();
    result?;

    output::print_done(options.obfuscate);
    Ok(())
}
