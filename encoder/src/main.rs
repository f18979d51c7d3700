use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hookarray_core::fs::{read_blob, write_atomic};
use hookarray_core::layout::hook_ident;
use hookarray_core::{encode, Case, HookError, HookLayout};

/// Embed a compiled hook into a C++ header as a byte array
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Hook name: reads `<build-dir>/<name>.wasm`, writes `<hook-dir>/<name>_a.h`
    name: String,

    /// Read the binary from here instead of the build directory
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write the header here instead of the hook directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Declared identifier, defaults to `<Name>Hook`
    #[arg(long)]
    ident: Option<String>,

    #[arg(short, long, default_value = "upper")]
    case: Case,

    #[arg(long, default_value = "build")]
    build_dir: PathBuf,

    #[arg(long, default_value = "hook")]
    hook_dir: PathBuf,
}

fn run(args: &Args) -> Result<PathBuf, HookError> {
    let layout = HookLayout::new(&args.build_dir, &args.hook_dir);
    let input = args.input.clone().unwrap_or_else(|| layout.binary_path(&args.name));
    let output = args.output.clone().unwrap_or_else(|| layout.header_path(&args.name));
    let ident = args.ident.clone().unwrap_or_else(|| hook_ident(&args.name));
    log::debug!("{} -> {} as {}", input.display(), output.display(), ident);

    let wasm = read_blob(&input)?;
    let header = encode(&wasm, &ident, args.case)?;
    write_atomic(&output, header.as_bytes())?;
    log::info!("embedded {} bytes from {} into {}", wasm.len(), input.display(), output.display());

    Ok(output)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookarray_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn args(dir: &Path, extra: &[&str]) -> Args {
        let build = dir.join("build");
        let hook = dir.join("hook");
        let mut argv = vec![
            "encoder".to_string(),
            "--build-dir".to_string(),
            build.display().to_string(),
            "--hook-dir".to_string(),
            hook.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn encodes_conventional_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("build")).unwrap();
        std::fs::write(dir.path().join("build/tsh.wasm"), [0x00, 0x61, 0x73, 0x6d]).unwrap();

        let output = run(&args(dir.path(), &["tsh"])).unwrap();
        assert_eq!(output, dir.path().join("hook/tsh_a.h"));
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "static const std::vector<uint8_t> TshHook = {0x00U, 0x61U, 0x73U, 0x6DU};\n"
        );
    }

    #[test]
    fn overrides() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("custom.bin");
        let output = dir.path().join("tsh.h");
        std::fs::write(&input, [0xab]).unwrap();

        run(&args(
            dir.path(),
            &[
                "tsh",
                "--input",
                input.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
                "--ident",
                "TSHook",
                "--case",
                "lower",
            ],
        ))
        .unwrap();
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "static const std::vector<uint8_t> TSHook = {0xabu};\n"
        );
    }

    #[test]
    fn missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args(dir.path(), &["nope"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!dir.path().join("hook/nope_a.h").exists());
    }

    #[test]
    fn invalid_name_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("build")).unwrap();
        std::fs::write(dir.path().join("build/my-hook.wasm"), [1]).unwrap();

        let err = run(&args(dir.path(), &["my-hook"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName);
        assert!(!dir.path().join("hook").exists());
    }

    #[test]
    fn unknown_case_is_a_usage_error() {
        let err = Args::try_parse_from(["encoder", "tsh", "--case", "mixed"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
