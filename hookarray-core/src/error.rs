use std::path::{Path, PathBuf};

use thiserror::Error;

/// Exit status of a verifier run whose documents parsed but differ.
pub const EXIT_MISMATCH: u8 = 1;

/// Coarse classification of a [`HookError`], stable across versions.
///
/// Every binary in the workspace exits with [`ErrorKind::exit_code`], so a
/// calling script can branch on the status without reading the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Parse,
    Io,
    InvalidName,
    Config,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::NotFound => 3,
            ErrorKind::Parse => 4,
            ErrorKind::Io => 5,
            ErrorKind::InvalidName => 6,
            ErrorKind::Config => 7,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no `{{ ... }};` array region found")]
    NoRegion,

    #[error("found {count} array regions, expected exactly one")]
    AmbiguousRegion { count: usize },

    #[error("invalid token `{text}` at offset {offset}")]
    InvalidToken { offset: usize, text: String },
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid identifier `{0}`: expected [A-Za-z_][A-Za-z0-9_]*")]
    InvalidName(String),

    #[error("unknown {what} `{value}`")]
    UnknownChoice { what: &'static str, value: String },

    #[error("invalid rename map {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl HookError {
    /// Wrap an I/O failure, promoting `NotFound` to its own kind.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == std::io::ErrorKind::NotFound {
            HookError::NotFound { path }
        } else {
            HookError::Io { path, source }
        }
    }

    pub fn parse(path: impl AsRef<Path>, source: ParseError) -> Self {
        HookError::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            HookError::NotFound { .. } => ErrorKind::NotFound,
            HookError::Parse { .. } => ErrorKind::Parse,
            HookError::Io { .. } => ErrorKind::Io,
            HookError::InvalidName(_) => ErrorKind::InvalidName,
            HookError::UnknownChoice { .. } | HookError::Config { .. } => ErrorKind::Config,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }
}

pub type Result<T> = std::result::Result<T, HookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let err = HookError::io(
            "build/tsh.wasm",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "file not found: build/tsh.wasm");
    }

    #[test]
    fn exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::NotFound,
            ErrorKind::Parse,
            ErrorKind::Io,
            ErrorKind::InvalidName,
            ErrorKind::Config,
        ];
        let mut codes: Vec<u8> = kinds.iter().map(|k| k.exit_code()).collect();
        codes.push(EXIT_MISMATCH);
        codes.push(0);
        // clap's usage error
        codes.push(2);
        let len = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), len);
    }
}
