use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{HookError, Result};

pub fn read_blob(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| HookError::io(path, e))
}

/// Read a text document. Bytes that are not UTF-8 are replaced; they can only
/// appear outside of tokens, which are plain ASCII.
pub fn read_document(path: impl AsRef<Path>) -> Result<String> {
    let bytes = read_blob(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let pid = std::process::id();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(name) => format!(".{name}.part_{pid}_{now}"),
        None => format!(".hookarray.part_{pid}_{now}"),
    };
    path.with_file_name(tmp_name)
}

/// Replace `path` with `data`.
///
/// The data goes to a sibling temporary file first and is renamed over the
/// destination once it is complete, so readers see either the old file or the
/// new one. The temporary file is removed on failure.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| HookError::io(parent, e))?;
        }
    }

    let tmp_path = temp_path_for(path);
    let written: std::io::Result<()> = (|| {
        let mut dst = fs::File::create(&tmp_path)?;
        dst.write_all(data)?;
        dst.sync_all()
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(HookError::io(path, e));
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(HookError::io(path, e));
    }

    log::debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
