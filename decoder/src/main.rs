use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hookarray_core::fs::write_atomic;
use hookarray_core::{decode_file, Grammar, HookError, RegionPolicy, ScanOptions};

/// Recover the bytes embedded in a hook header
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Header containing one `{ 0x..U, ... };` array
    header: PathBuf,

    /// Also write the recovered binary to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, default_value = "any")]
    grammar: Grammar,

    /// Use the leftmost array when the header contains several
    #[arg(long)]
    first_region: bool,
}

impl Args {
    fn scan_options(&self) -> ScanOptions {
        let policy = if self.first_region {
            RegionPolicy::First
        } else {
            RegionPolicy::Unique
        };
        ScanOptions::new(self.grammar, policy)
    }
}

fn run(args: &Args, out: &mut impl Write) -> Result<Vec<u8>, HookError> {
    let literal = decode_file(&args.header, &args.scan_options())?;
    let bytes = literal.to_bytes();

    writeln!(out, "{}", hex::encode_upper(&bytes)).map_err(|e| HookError::io("<stdout>", e))?;

    if let Some(output) = &args.output {
        write_atomic(output, &bytes)?;
        log::info!("recovered {} bytes into {}", bytes.len(), output.display());
    }

    Ok(bytes)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let stdout = std::io::stdout();
    match run(&args, &mut stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
