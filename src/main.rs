// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for md2richtext.
//!
//! This binary provides the `md2richtext` command for converting markdown or
//! plain-text files into rich-text document JSON, and for rendering such
//! documents back into markdown.

use lexopt::prelude::*;
use md2richtext::{RenderOptions, TextFormat, convert, parse_document, render_document};
use snafu::{OptionExt, ensure, prelude::*};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when walking directories for text input.
const TEXT_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Where to write the converted output.
#[derive(Clone)]
enum OutputTarget {
    /// Write each file to the specified directory.
    Directory(PathBuf),
    /// Write to stdout.
    Stdout,
}

#[allow(clippy::struct_excessive_bools)]
struct Cli {
    input: Vec<PathBuf>,
    output: OutputTarget,
    format: TextFormat,
    compact: bool,
    reverse: bool,
    heading_offset: u8,
    verbose: bool,
    quiet: bool,
    dry_run: bool,
    force: bool,
}

impl Cli {
    /// Extension of the files this run writes.
    const fn output_extension(&self) -> &'static str {
        if self.reverse { "md" } else { "json" }
    }

    /// Whether a file found while walking a directory should be processed.
    fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        if self.reverse {
            ext == "json"
        } else {
            TEXT_EXTENSIONS.contains(&ext)
        }
    }
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("heading-offset must be 0-5"))]
    InvalidHeadingOffset,

    #[snafu(display("at least one input file or directory is required"))]
    NoInputFiles,

    #[snafu(display("cannot output multiple files to stdout"))]
    MultipleFilesToStdout,

    #[snafu(display("reading from stdin requires --output -"))]
    StdinToDirectory,

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: std::io::Error },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to read stdin: {source}"))]
    ReadStdin { source: std::io::Error },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseDocument {
        path: PathBuf,
        source: md2richtext::ParseError,
    },

    #[snafu(display("failed to encode document: {source}"))]
    EncodeJson { source: serde_json::Error },

    #[snafu(display("invalid input filename: no file stem"))]
    InvalidFilename,

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert markdown or plain text into rich-text document JSON

Usage: {name} [OPTIONS] -o <OUTPUT> <INPUT>...

Arguments:
  <INPUT>...  Input files, directories containing them, or - for stdin

Options:
  -o, --output <OUTPUT>     Output directory (or - for stdout)
      --markdown            Parse input as markdown (default)
      --plain               Treat input as plain text, one paragraph per line
      --pretty              Pretty-print JSON output (default)
      --compact             Write JSON on a single line
  -r, --reverse             Read document JSON and write markdown
      --heading-offset <N>  With --reverse, shift heading levels by N (0-5, default: 0)

Other options:
  -v, --verbose             Log conversion details (RUST_LOG overrides)
  -q, --quiet               Suppress progress messages
  -n, --dry-run             Show what would be processed without writing
  -f, --force               Overwrite existing output files
  -h, --help                Print help
  -V, --version             Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output: Option<OutputTarget> = None;
    let mut format = TextFormat::Markdown;
    let mut compact = false;
    let mut reverse = false;
    let mut heading_offset: u8 = 0;
    let mut verbose = false;
    let mut quiet = false;
    let mut dry_run = false;
    let mut force = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                let val: PathBuf = parser.value()?.parse()?;
                output = Some(if val == Path::new("-") {
                    OutputTarget::Stdout
                } else {
                    OutputTarget::Directory(val)
                });
            }
            // Format and encoding flags - last one wins
            Long("markdown") => format = TextFormat::Markdown,
            Long("plain") => format = TextFormat::PlainText,
            Long("pretty") => compact = false,
            Long("compact") => compact = true,
            Short('r') | Long("reverse") => reverse = true,
            Long("heading-offset") => {
                heading_offset = parser
                    .value()?
                    .parse()
                    .map_err(|_| "heading-offset must be a number 0-5")?;
            }
            Short('v') | Long("verbose") => verbose = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('f') | Long("force") => force = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output: output.ok_or("missing required option: --output")?,
        format,
        compact,
        reverse,
        heading_offset,
        verbose,
        quiet,
        dry_run,
        force,
    })
}

/// Installs the logger; `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;
    init_logging(cli.verbose);

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);
    ensure!(cli.heading_offset <= 5, InvalidHeadingOffsetSnafu);

    // Collect all input files first
    let files = collect_input_files(&cli);
    log::debug!("collected {} input files", files.len());

    match &cli.output {
        OutputTarget::Stdout => {
            // Without a directory, only one document can be written
            ensure!(files.len() == 1, MultipleFilesToStdoutSnafu);
            process_to_stdout(&files[0], &cli)?;
        }
        OutputTarget::Directory(dir) => {
            ensure!(!files.iter().any(|f| is_stdin(f)), StdinToDirectorySnafu);
            if !cli.dry_run {
                std::fs::create_dir_all(dir).context(CreateOutputDirSnafu)?;
            }
            for file in &files {
                process_file(file, dir, &cli)?;
            }
        }
    }

    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

/// Collects all input files from the given inputs (files and directories).
fn collect_input_files(cli: &Cli) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in &cli.input {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file() && cli.accepts(e.path()))
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Reads one input, from stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String, Error> {
    if is_stdin(path) {
        std::io::read_to_string(std::io::stdin()).context(ReadStdinSnafu)
    } else {
        std::fs::read_to_string(path).context(ReadFileSnafu { path })
    }
}

/// Converts the text of one input into the output for this run.
fn transform(text: &str, source: &Path, cli: &Cli) -> Result<String, Error> {
    if cli.reverse {
        let doc = parse_document(text).context(ParseDocumentSnafu { path: source })?;
        let opts = RenderOptions {
            heading_offset: cli.heading_offset,
            ..Default::default()
        };
        return Ok(render_document(&doc, &opts));
    }

    let doc = convert(text, cli.format);
    let mut json = if cli.compact {
        serde_json::to_string(&doc)
    } else {
        serde_json::to_string_pretty(&doc)
    }
    .context(EncodeJsonSnafu)?;
    json.push('\n');
    Ok(json)
}

/// Processes a single input and outputs to stdout.
fn process_to_stdout(input: &Path, cli: &Cli) -> Result<(), Error> {
    if cli.dry_run {
        eprintln!("Would output {}", input.display());
        return Ok(());
    }

    let text = read_input(input)?;
    let output = transform(&text, input, cli)?;

    print!("{output}");
    Ok(())
}

/// Processes a single file and writes to the output directory.
fn process_file(input: &Path, out_dir: &Path, cli: &Cli) -> Result<(), Error> {
    let out_name = input.file_stem().context(InvalidFilenameSnafu)?;
    let out_path = out_dir.join(format!(
        "{}.{}",
        out_name.to_string_lossy(),
        cli.output_extension()
    ));

    // Handle dry-run mode
    if cli.dry_run {
        eprintln!("Would write {}", out_path.display());
        return Ok(());
    }

    // Check if output exists and handle overwrite
    if out_path.exists() && !cli.force {
        eprintln!(
            "Skipping {} (already exists, use --force to overwrite)",
            out_path.display()
        );
        return Ok(());
    }

    log::debug!("converting {}", input.display());
    let text = read_input(input)?;
    let output = transform(&text, input, cli)?;

    std::fs::write(&out_path, &output).context(WriteFileSnafu { path: &out_path })?;

    if !cli.quiet {
        eprintln!("Wrote {}", out_path.display());
    }
    Ok(())
}
