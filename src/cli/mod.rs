use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::input::TextEncoding;

/// Environment variable consulted when `--output` is not given.
pub const OUTPUT_DIR_ENV: &str = "CODESPLIT_OUTPUT_DIR";

/// Split a compacted document of fenced code blocks back into files.
///
/// Every block must open with a recognized language fence (python, py, ts, tsx, json, prisma,
/// js, sql) followed by a `# File: <path>` marker line. The marker line is written as the first
/// line of the extracted file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The compacted input document. Prompted for on stdin when omitted.
    pub input: Option<PathBuf>,

    /// Directory that marker paths are resolved against. Falls back to CODESPLIT_OUTPUT_DIR, then the current directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Decode the input with this encoding instead of detecting it.
    #[arg(long, value_enum)]
    pub encoding: Option<TextEncoding>,

    /// Scan and report without creating directories or writing files.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Exit with status 2 if any block was rejected.
    #[arg(long)]
    pub strict: bool,

    /// Log every recognized fence and marker.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Gets the output directory from the command-line option or the `CODESPLIT_OUTPUT_DIR` environment variable.
///
/// Priority:
/// 1. `--output` command-line argument.
/// 2. `CODESPLIT_OUTPUT_DIR` environment variable (ignored when empty).
/// 3. The current directory.
pub fn get_output_dir_from_opt_or_env(output_opt: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = output_opt {
        return dir;
    }
    match std::env::var_os(OUTPUT_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("."),
    }
}

/// Returns the input path from the command line, or asks for it on `reader`.
///
/// `Ok(None)` means the prompt got an empty answer or end of input.
pub fn input_path_or_prompt<R: BufRead, W: Write>(
    input_opt: Option<PathBuf>,
    reader: &mut R,
    prompt_out: &mut W,
) -> io::Result<Option<PathBuf>> {
    if let Some(path) = input_opt {
        return Ok(Some(path));
    }
    write!(prompt_out, "Enter the path to the compacted input file: ")?;
    prompt_out.flush()?;

    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    let answer = answer.trim_end_matches(['\r', '\n']);
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(answer)))
    }
}

/// Parses command-line arguments using `clap`.
///
/// Exits the process on `--help`, `--version` or invalid arguments.
pub fn run() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "codesplit", "doc.md", "-o", "out", "--encoding", "cp1252", "--dry-run", "--json", "--strict", "-v",
        ])
        .unwrap();
        assert_eq!(args.input, Some(PathBuf::from("doc.md")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.encoding, Some(TextEncoding::Cp1252));
        assert!(args.dry_run && args.json && args.strict && args.verbose);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["codesplit", "-v", "-q"]).is_err());
    }

    #[test]
    fn explicit_output_wins() {
        assert_eq!(get_output_dir_from_opt_or_env(Some("x".into())), PathBuf::from("x"));
    }

    #[test]
    fn prompt_is_skipped_when_path_given() {
        let mut out = Vec::new();
        let got = input_path_or_prompt(Some("a.md".into()), &mut Cursor::new(""), &mut out).unwrap();
        assert_eq!(got, Some(PathBuf::from("a.md")));
        assert!(out.is_empty());
    }

    #[test]
    fn prompt_reads_one_line() {
        let mut out = Vec::new();
        let got = input_path_or_prompt(None, &mut Cursor::new("doc.md\r\nrest"), &mut out).unwrap();
        assert_eq!(got, Some(PathBuf::from("doc.md")));
        assert!(String::from_utf8(out).unwrap().starts_with("Enter the path"));
    }

    #[test]
    fn prompt_keeps_surrounding_spaces() {
        let mut out = Vec::new();
        let got = input_path_or_prompt(None, &mut Cursor::new("  spaced name.md \n"), &mut out).unwrap();
        assert_eq!(got, Some(PathBuf::from("  spaced name.md ")));
    }

    #[test]
    fn empty_prompt_answer_is_none() {
        let mut out = Vec::new();
        assert_eq!(input_path_or_prompt(None, &mut Cursor::new(""), &mut out).unwrap(), None);
    }
}
