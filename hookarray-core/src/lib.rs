//! This crate implements the core functionality of hookarray
//!
//! A hook is a compiled binary module that gets embedded into a C++ build as a
//! `std::vector<uint8_t>` initializer. This crate converts between the binary
//! and that array literal, compares two embeddings, and carries the prefix
//! rename engine used when moving hook sources between trees.

#![allow(clippy::uninlined_format_args)]

pub mod codec;
pub mod error;
pub mod fs;
pub mod layout;
pub mod rename;
pub mod scan;
pub mod token;
pub mod verify;

pub use codec::{decode, decode_file, encode, extract_tokens, ArrayLiteral, DECL_TYPE};
pub use error::{ErrorKind, HookError, ParseError, EXIT_MISMATCH};
pub use layout::HookLayout;
pub use scan::{RegionPolicy, ScanOptions};
pub use token::{Case, Grammar, HexToken};
pub use verify::{Comparison, Verdict, Verification, VerifyError};
