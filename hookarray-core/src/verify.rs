//! Comparing two embeddings token by token.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::codec::decode_file;
use crate::error::{ErrorKind, HookError};
use crate::scan::ScanOptions;
use crate::token::HexToken;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Comparison {
    /// Tokens must be spelled identically, case included.
    #[default]
    Exact,
    /// Only the byte values must agree.
    ByValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub left: usize,
    pub right: usize,
    pub matched: bool,
}

impl Verdict {
    pub fn compare(left: &[HexToken], right: &[HexToken], comparison: Comparison) -> Self {
        let matched = match comparison {
            Comparison::Exact => left == right,
            Comparison::ByValue => {
                left.len() == right.len() && left.iter().zip(right).all(|(a, b)| a.value() == b.value())
            }
        };
        Self {
            left: left.len(),
            right: right.len(),
            matched,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched {
            f.write_str("match")
        } else {
            f.write_str("no match")
        }
    }
}

#[derive(Debug, Error)]
#[error("token extraction failed")]
pub struct VerifyError {
    pub left: Option<HookError>,
    pub right: Option<HookError>,
}

impl VerifyError {
    /// Kind of the first failing side.
    pub fn kind(&self) -> ErrorKind {
        self.left
            .as_ref()
            .or(self.right.as_ref())
            .map(HookError::kind)
            .unwrap_or(ErrorKind::Parse)
    }
}

/// Extraction results of both documents. Both sides are always attempted so
/// each one can be reported.
#[derive(Debug)]
pub struct Verification {
    pub left: Result<Vec<HexToken>, HookError>,
    pub right: Result<Vec<HexToken>, HookError>,
}

impl Verification {
    pub fn run(left: impl AsRef<Path>, right: impl AsRef<Path>, options: &ScanOptions) -> Self {
        let extract = |path: &Path| decode_file(path, options).map(|literal| literal.into_tokens());
        Self {
            left: extract(left.as_ref()),
            right: extract(right.as_ref()),
        }
    }

    pub fn into_verdict(self, comparison: Comparison) -> Result<Verdict, VerifyError> {
        match (self.left, self.right) {
            (Ok(left), Ok(right)) => Ok(Verdict::compare(&left, &right, comparison)),
            (left, right) => Err(VerifyError {
                left: left.err(),
                right: right.err(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Case, Grammar};
    use pretty_assertions::assert_eq;

    fn tokens(bytes: &[u8], case: Case) -> Vec<HexToken> {
        bytes.iter().map(|&b| HexToken::new(b, case)).collect()
    }

    #[test]
    fn exact_comparison_is_case_sensitive() {
        let upper = tokens(&[1, 0xab], Case::Upper);
        let lower = tokens(&[1, 0xab], Case::Lower);
        let verdict = Verdict::compare(&upper, &lower, Comparison::Exact);
        assert_eq!(
            verdict,
            Verdict {
                left: 2,
                right: 2,
                matched: false
            }
        );
        assert!(Verdict::compare(&upper, &lower, Comparison::ByValue).matched);
    }

    #[test]
    fn length_mismatch() {
        let a = tokens(&[1, 2, 3], Case::Upper);
        let b = tokens(&[1, 2], Case::Upper);
        let verdict = Verdict::compare(&a, &b, Comparison::ByValue);
        assert!(!verdict.matched);
        assert_eq!((verdict.left, verdict.right), (3, 2));
        assert_eq!(verdict.to_string(), "no match");
    }

    #[test]
    fn failure_on_one_side() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.h");
        std::fs::write(&good, "X = {0x01U};\n").unwrap();
        let missing = dir.path().join("missing.h");

        let verification = Verification::run(&good, &missing, &ScanOptions::new(Grammar::Upper, Default::default()));
        assert_eq!(verification.left.as_ref().map(Vec::len).ok(), Some(1));
        let err = verification.into_verdict(Comparison::Exact).unwrap_err();
        assert!(err.left.is_none());
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
