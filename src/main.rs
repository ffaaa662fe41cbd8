// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for shark2uml.
//!
//! This binary provides the `shark2uml` command for converting packet-capture
//! JSON exports to PlantUML sequence diagrams.

use lexopt::prelude::*;
use shark2uml::{capture, converter};
use snafu::{OptionExt, ensure, prelude::*};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
use walkdir::WalkDir;

/// Where to write the generated diagrams.
#[derive(Clone)]
enum OutputTarget {
    /// Write each diagram to the specified directory.
    Directory(PathBuf),
    /// Write to stdout.
    Stdout,
}

#[allow(clippy::struct_excessive_bools)]
struct Cli {
    input: Vec<PathBuf>,
    output: OutputTarget,
    concat: bool,
    max_message_size: u32,
    participant: String,
    verbose: u8,
    quiet: bool,
    dry_run: bool,
    force: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("max-message-size must be a positive number"))]
    InvalidMaxMessageSize,

    #[snafu(display("no input JSON files found"))]
    NoInputFiles,

    #[snafu(display("cannot output multiple files to stdout without --concat"))]
    MultipleFilesToStdout,

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: std::io::Error },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseFile {
        path: PathBuf,
        source: capture::ParseError,
    },

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
Convert packet-capture JSON exports to PlantUML sequence diagrams

Usage: {name} [OPTIONS] -o <OUTPUT> <INPUT>...

Arguments:
  <INPUT>...  Capture JSON files or directories containing exports

Options:
  -o, --output <OUTPUT>       Output directory (or file with --concat, or - for stdout)
      --concat                Merge all inputs into a single diagram
      --max-message-size <N>  Wrap messages wider than N pixels (default: 500)
      --participant <NAME>    Name of the local participant (default: local)

Other options:
  -v, --verbose               Log diagnostics to stderr (repeat for more)
  -q, --quiet                 Suppress progress messages
  -n, --dry-run               Show what would be processed without writing
  -f, --force                 Overwrite existing output files
  -h, --help                  Print help
  -V, --version               Print version

The RUST_LOG environment variable overrides the log level set by -v.",
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

    let defaults = converter::ConvertOptions::default();
    let mut input = Vec::new();
    let mut output: Option<OutputTarget> = None;
    let mut concat = false;
    let mut max_message_size = defaults.max_message_size;
    let mut participant = defaults.local_participant;
    let mut verbose: u8 = 0;
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
            Long("concat") => concat = true,
            Long("max-message-size") => {
                max_message_size = parser
                    .value()?
                    .parse()
                    .map_err(|_| "max-message-size must be a positive number")?;
            }
            Long("participant") => participant = parser.value()?.string()?,
            Short('v') | Long("verbose") => verbose = verbose.saturating_add(1),
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
        concat,
        max_message_size,
        participant,
        verbose,
        quiet,
        dry_run,
        force,
    })
}

/// Installs the stderr log subscriber.
///
/// Warnings are shown by default; each `-v` raises the level one step.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;
    init_tracing(cli.verbose);

    ensure!(cli.max_message_size > 0, InvalidMaxMessageSizeSnafu);
    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);

    let files = collect_input_files(&cli.input);
    ensure!(!files.is_empty(), NoInputFilesSnafu);
    tracing::info!(files = files.len(), "collected input files");

    let opts = make_convert_options(&cli);
    for diagram in plan_diagrams(files, &cli)? {
        write_diagram(&diagram, &opts, &cli)?;
    }

    Ok(())
}

/// Where one generated diagram goes.
enum Target {
    Stdout,
    File(PathBuf),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One diagram to produce and the capture files it is built from.
///
/// A diagram with several sources treats them as one capture, so a host
/// seen in one file still applies to responses in the next.
struct Diagram {
    sources: Vec<PathBuf>,
    target: Target,
}

/// Decides which diagrams to write for the collected input files.
fn plan_diagrams(files: Vec<PathBuf>, cli: &Cli) -> Result<Vec<Diagram>, Error> {
    match (&cli.output, cli.concat) {
        (OutputTarget::Stdout, concat) => {
            // Without concat, we can only output one file to stdout
            ensure!(concat || files.len() == 1, MultipleFilesToStdoutSnafu);
            Ok(vec![Diagram {
                sources: files,
                target: Target::Stdout,
            }])
        }
        // In concat mode, the output path names a file, not a directory
        (OutputTarget::Directory(path), true) => Ok(vec![Diagram {
            sources: files,
            target: Target::File(path.clone()),
        }]),
        (OutputTarget::Directory(dir), false) => files
            .into_iter()
            .map(|file| -> Result<Diagram, Error> {
                let stem = file.file_stem().context(InvalidFilenameSnafu)?;
                let target = Target::File(dir.join(format!("{}.puml", stem.to_string_lossy())));
                Ok(Diagram {
                    sources: vec![file],
                    target,
                })
            })
            .collect(),
    }
}

/// Collects all JSON files from the given inputs (files and directories).
///
/// Directory entries are sorted by name so output order is stable.
fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Creates conversion options from CLI arguments.
fn make_convert_options(cli: &Cli) -> converter::ConvertOptions {
    converter::ConvertOptions {
        max_message_size: cli.max_message_size,
        local_participant: cli.participant.clone(),
    }
}

fn read_json(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).context(ReadFileSnafu { path })
}

/// Converts a diagram's sources to markup.
fn convert_sources(
    sources: &[PathBuf],
    opts: &converter::ConvertOptions,
) -> Result<String, Error> {
    if let [path] = sources {
        let json = read_json(path)?;
        return converter::convert_json(&json, opts).context(ParseFileSnafu { path });
    }

    let mut records = Vec::new();
    for path in sources {
        let json = read_json(path)?;
        let parsed = capture::parse_capture(&json).context(ParseFileSnafu { path })?;
        tracing::debug!(path = %path.display(), records = parsed.len(), "parsed capture");
        records.extend(parsed);
    }
    Ok(converter::convert_with(&records, opts))
}

/// Converts and writes one diagram, honouring dry-run and overwrite rules.
fn write_diagram(
    diagram: &Diagram,
    opts: &converter::ConvertOptions,
    cli: &Cli,
) -> Result<(), Error> {
    let count = diagram.sources.len();

    if cli.dry_run {
        eprintln!("Would write {} ({count} capture files)", diagram.target);
        return Ok(());
    }

    if let Target::File(path) = &diagram.target
        && path.exists()
        && !cli.force
    {
        eprintln!(
            "Skipping {} (already exists, use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    let markup = convert_sources(&diagram.sources, opts)?;

    match &diagram.target {
        Target::Stdout => print!("{markup}"),
        Target::File(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).context(CreateOutputDirSnafu)?;
            }
            std::fs::write(path, &markup).context(WriteFileSnafu { path })?;
            if !cli.quiet {
                eprintln!("Wrote {} ({count} capture files)", path.display());
            }
        }
    }
    Ok(())
}
