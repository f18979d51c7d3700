use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use hookarray_core::{
    Comparison, ErrorKind, Grammar, HexToken, HookError, RegionPolicy, ScanOptions, Verification,
    EXIT_MISMATCH,
};

/// Check that two hook headers embed the same array
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    first: PathBuf,

    second: PathBuf,

    #[arg(short, long, default_value = "any")]
    grammar: Grammar,

    /// Compare byte values instead of token spelling
    #[arg(long)]
    by_value: bool,

    /// Use the leftmost array when a header contains several
    #[arg(long)]
    first_region: bool,
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Matched,
    Mismatched,
    ExtractionFailed(u8),
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Matched => ExitCode::SUCCESS,
            Outcome::Mismatched => ExitCode::from(EXIT_MISMATCH),
            Outcome::ExtractionFailed(code) => ExitCode::from(code),
        }
    }
}

fn report_side(
    out: &mut impl Write,
    path: &Path,
    side: &Result<Vec<HexToken>, HookError>,
) -> std::io::Result<()> {
    match side {
        Ok(tokens) => writeln!(out, "{}", tokens.len()),
        Err(e) => {
            log::error!("Error: {}", e);
            match e {
                HookError::NotFound { .. } => writeln!(out, "{}: not found", path.display()),
                HookError::Parse { source, .. } => writeln!(out, "{}: {}", path.display(), source),
                _ => writeln!(out, "{}: {}", path.display(), e),
            }
        }
    }
}

fn run(args: &Args, out: &mut impl Write) -> std::io::Result<Outcome> {
    let policy = if args.first_region {
        RegionPolicy::First
    } else {
        RegionPolicy::Unique
    };
    let options = ScanOptions::new(args.grammar, policy);
    let comparison = if args.by_value {
        Comparison::ByValue
    } else {
        Comparison::Exact
    };

    let verification = Verification::run(&args.first, &args.second, &options);
    report_side(out, &args.first, &verification.left)?;
    report_side(out, &args.second, &verification.right)?;

    let outcome = match verification.into_verdict(comparison) {
        Ok(verdict) => {
            writeln!(out, "{}", verdict)?;
            if verdict.matched {
                Outcome::Matched
            } else {
                Outcome::Mismatched
            }
        }
        Err(e) => Outcome::ExtractionFailed(e.kind().exit_code()),
    };
    Ok(outcome)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let stdout = std::io::stdout();
    match run(&args, &mut stdout.lock()) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            log::error!("Error: {}", e);
            ExitCode::from(ErrorKind::Io.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Run {
        outcome: Outcome,
        lines: Vec<String>,
    }

    fn verify(argv: &[&str]) -> Run {
        let mut full = vec!["verifier"];
        full.extend_from_slice(argv);
        let args = Args::try_parse_from(full).unwrap();
        let mut out = Vec::new();
        let outcome = run(&args, &mut out).unwrap();
        let lines = String::from_utf8(out).unwrap().lines().map(str::to_string).collect();
        Run { outcome, lines }
    }

    fn write(dir: &Path, name: &str, text: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn matching_headers() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.h", "static const std::vector<uint8_t> AHook = {0x01U, 0x02U};\n");
        let b = write(dir.path(), "b.h", "static const std::vector<uint8_t> BHook = {\n0x01U,\n0x02U\n};\n");

        let run = verify(&[&a, &b]);
        assert_eq!(run.outcome, Outcome::Matched);
        assert_eq!(run.lines, vec!["2", "2", "match"]);
    }

    #[test]
    fn different_headers() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.h", "A = {0x01U, 0x02U};\n");
        let b = write(dir.path(), "b.h", "B = {0x01U};\n");

        let run = verify(&[&a, &b]);
        assert_eq!(run.outcome, Outcome::Mismatched);
        assert_eq!(run.lines, vec!["2", "1", "no match"]);
    }

    #[test]
    fn case_only_difference() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.h", "A = {0xABU};\n");
        let b = write(dir.path(), "b.h", "B = {0xabu};\n");

        assert_eq!(verify(&[&a, &b]).outcome, Outcome::Mismatched);
        assert_eq!(verify(&[&a, &b, "--by-value"]).outcome, Outcome::Matched);
    }

    #[test]
    fn missing_file_skips_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.h", "A = {0x01U};\n");
        let missing = dir.path().join("gone.h");

        let run = verify(&[&a, missing.to_str().unwrap()]);
        assert_eq!(run.outcome, Outcome::ExtractionFailed(3));
        assert_eq!(run.lines.len(), 2);
        assert_eq!(run.lines[0], "1");
        assert_eq!(run.lines[1], format!("{}: not found", missing.display()));
    }

    #[test]
    fn ambiguous_header_fails_unless_first_region() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.h", "A = {0x01U};\n");
        let two = write(dir.path(), "two.h", "A = {0x01U};\nB = {0x02U};\n");

        let failed = verify(&[&a, &two]);
        assert_eq!(failed.outcome, Outcome::ExtractionFailed(4));
        assert_eq!(failed.lines.len(), 2);
        assert_eq!(
            failed.lines[1],
            format!("{}: found 2 array regions, expected exactly one", two)
        );
        assert_eq!(verify(&[&a, &two, "--first-region"]).outcome, Outcome::Matched);
    }
}
