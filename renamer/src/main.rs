use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use hookarray_core::rename::{source_files, PrefixMap};

/// Rewrite include prefixes across C++ source folders
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Folders to walk
    #[arg(default_values = ["src/ripple", "src/test"])]
    folders: Vec<PathBuf>,

    /// TOML rule table (`[[rule]] from = ".." to = ".."`), replaces the built-in table
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// File extensions to rewrite
    #[arg(short, long, value_delimiter = ',', default_values = ["h", "cpp"])]
    extensions: Vec<String>,

    /// Only report files that would change
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    updated: usize,
    unchanged: usize,
    failed: usize,
}

fn load_map(args: &Args) -> Result<PrefixMap> {
    let map = match &args.map {
        Some(path) => PrefixMap::load(path)?,
        None => PrefixMap::builtin(),
    };
    for (shadowed, by) in map.shadowed() {
        let rules = map.rules();
        log::warn!(
            "rule {} ({:?}) is already rewritten by rule {} ({:?})",
            shadowed,
            rules[shadowed].from,
            by,
            rules[by].from
        );
    }
    Ok(map)
}

fn process_file(map: &PrefixMap, path: &Path, dry_run: bool) -> Result<bool> {
    if dry_run {
        let planned = map
            .plan_file(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return Ok(planned.is_some());
    }
    map.rewrite_file(path)
        .with_context(|| format!("rewriting {}", path.display()))
}

fn run(args: &Args, out: &mut impl Write) -> Result<Summary> {
    let map = load_map(args).context("loading rename map")?;
    let extensions: Vec<&str> = args.extensions.iter().map(String::as_str).collect();
    let mut summary = Summary::default();

    for folder in &args.folders {
        let files = match source_files(folder, &extensions) {
            Ok(files) => files,
            Err(e) => {
                log::error!("Error: {}", e);
                summary.failed += 1;
                continue;
            }
        };
        log::debug!("{}: {} files", folder.display(), files.len());

        for path in files {
            match process_file(&map, &path, args.dry_run) {
                Ok(true) => {
                    let verb = if args.dry_run { "Would update" } else { "Updated" };
                    writeln!(out, "{}: {}", verb, path.display())?;
                    summary.updated += 1;
                }
                Ok(false) => summary.unchanged += 1,
                Err(e) => {
                    log::error!("Error: {:#}", e);
                    summary.failed += 1;
                }
            }
        }
    }

    log::info!(
        "{} updated, {} unchanged, {} failed",
        summary.updated,
        summary.unchanged,
        summary.failed
    );
    Ok(summary)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let stdout = std::io::stdout();
    match run(&args, &mut stdout.lock()) {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("Error: {:#}", e);
            let code = e
                .downcast_ref::<hookarray_core::HookError>()
                .map(|e| e.exit_code())
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
