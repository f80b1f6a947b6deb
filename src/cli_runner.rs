//! CLI runner shared by `main`: resolves configuration, loads the document, runs the extractor
//! and prints the summary.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::cli::{self, Args};
use crate::error::SplitError;
use crate::extract::{extract, ExtractionResult};
use crate::fsx::{DiskFs, DryRunFs, Filesystem};
use crate::input::{self, TextEncoding};
use crate::report::RunSummary;

/// Settings for one run, resolved from [`Args`] and the environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub encoding: Option<TextEncoding>,
    pub dry_run: bool,
    pub json: bool,
    pub strict: bool,
}

/// How a completed run should end the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Clean,
    /// Some blocks were rejected and `--strict` was given.
    Rejected,
}

impl RunConfig {
    /// Resolves the run settings, prompting on stdin for the input path if it was not given.
    pub fn from_args(args: Args) -> Result<Self, SplitError> {
        let stdin = io::stdin();
        let input = cli::input_path_or_prompt(args.input, &mut stdin.lock(), &mut io::stdout())?
            .ok_or(SplitError::MissingInput)?;
        Ok(Self {
            input,
            output_dir: cli::get_output_dir_from_opt_or_env(args.output),
            encoding: args.encoding,
            dry_run: args.dry_run,
            json: args.json,
            strict: args.strict,
        })
    }
}

/// Installs the stderr log subscriber for the binary.
pub fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Loads the input and extracts it according to `config`.
pub fn execute(config: &RunConfig) -> Result<(TextEncoding, ExtractionResult), SplitError> {
    info!("Processing compacted file: {}", config.input.display());
    let document = input::read_document(&config.input, config.encoding)?;
    info!("Input file encoding detected as: {}", document.encoding);

    let mut fs: Box<dyn Filesystem> = if config.dry_run {
        Box::new(DryRunFs::new(&config.output_dir))
    } else {
        Box::new(DiskFs::new(&config.output_dir))
    };
    let result = extract(&document.lines, &mut *fs);
    Ok((document.encoding, result))
}

/// Public entry for running the CLI end to end.
pub fn run_cli_app() -> Result<RunOutcome, Box<dyn std::error::Error>> {
    let args = cli::run();
    init_logging(&args)?;
    let config = RunConfig::from_args(args)?;

    let (encoding, result) = execute(&config)?;
    let summary = RunSummary {
        input: &config.input,
        encoding,
        dry_run: config.dry_run,
        result: &result,
    };
    if config.json {
        println!("{}", summary.to_json()?);
    } else {
        print!("{}", summary);
    }

    if config.strict && !result.is_clean() {
        Ok(RunOutcome::Rejected)
    } else {
        Ok(RunOutcome::Clean)
    }
}
