//! Conventional locations: hooks are built to `build/<name>.wasm` and
//! embedded as `hook/<name>_a.h` declaring `<Name>Hook`.

use std::path::PathBuf;

use crate::error::{HookError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookLayout {
    pub build_dir: PathBuf,
    pub hook_dir: PathBuf,
}

impl Default for HookLayout {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("build"),
            hook_dir: PathBuf::from("hook"),
        }
    }
}

impl HookLayout {
    pub fn new(build_dir: impl Into<PathBuf>, hook_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            hook_dir: hook_dir.into(),
        }
    }

    pub fn binary_path(&self, name: &str) -> PathBuf {
        self.build_dir.join(format!("{name}.wasm"))
    }

    pub fn header_path(&self, name: &str) -> PathBuf {
        self.hook_dir.join(format!("{name}_a.h"))
    }
}

/// `tsh` -> `TshHook`, `GOV_hook` -> `Gov_hookHook`.
///
/// The first character is uppercased and the rest lowercased.
pub fn hook_ident(name: &str) -> String {
    let mut chars = name.chars();
    let mut ident = String::with_capacity(name.len() + 4);
    if let Some(first) = chars.next() {
        ident.extend(first.to_uppercase());
        for c in chars {
            ident.extend(c.to_lowercase());
        }
    }
    ident.push_str("Hook");
    ident
}

/// Identifiers are written verbatim into the header, so they must already be
/// valid C identifiers.
pub fn validate_ident(ident: &str) -> Result<()> {
    let mut bytes = ident.bytes();
    let valid = match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
            bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(HookError::InvalidName(ident.to_string()))
    }
}
