use std::path::Path;

use crate::error::{HookError, ParseError, Result};
use crate::fs::read_document;
use crate::layout::validate_ident;
use crate::scan::{select_region, ScanOptions};
use crate::token::{Case, HexToken};

/// Type the embedded constant is declared with.
pub const DECL_TYPE: &str = "static const std::vector<uint8_t>";

/// A hook embedded as `static const std::vector<uint8_t> Ident = {...};`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLiteral {
    ident: Option<String>,
    tokens: Vec<HexToken>,
}

impl ArrayLiteral {
    pub fn from_bytes(ident: impl Into<String>, bytes: &[u8], case: Case) -> Self {
        Self {
            ident: Some(ident.into()),
            tokens: bytes.iter().map(|&b| HexToken::new(b, case)).collect(),
        }
    }

    pub fn parse(doc: &str, options: &ScanOptions) -> std::result::Result<Self, ParseError> {
        let region = select_region(doc, options)?;
        let tokens = region.tokens(options.grammar)?;
        Ok(Self {
            ident: region.ident().map(str::to_string),
            tokens,
        })
    }

    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    pub fn tokens(&self) -> &[HexToken] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<HexToken> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.tokens.iter().map(HexToken::value).collect()
    }

    /// Render the header source. Tokens are joined by `", "` on a single line
    /// and the file ends with `};\n`.
    pub fn render(&self) -> String {
        let ident = self.ident.as_deref().unwrap_or("Hook");
        let mut out = String::with_capacity(DECL_TYPE.len() + ident.len() + self.tokens.len() * (HexToken::LEN + 2) + 8);
        out.push_str(DECL_TYPE);
        out.push(' ');
        out.push_str(ident);
        out.push_str(" = {");
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&token.to_string());
        }
        out.push_str("};\n");
        out
    }
}

/// Render `bytes` as a header declaring `ident`.
pub fn encode(bytes: &[u8], ident: &str, case: Case) -> Result<String> {
    validate_ident(ident)?;
    Ok(ArrayLiteral::from_bytes(ident, bytes, case).render())
}

/// Recover the embedded bytes from a document.
pub fn decode(doc: &str, options: &ScanOptions) -> std::result::Result<Vec<u8>, ParseError> {
    ArrayLiteral::parse(doc, options).map(|literal| literal.to_bytes())
}

/// Token extraction without byte conversion, as used by the verifier.
pub fn extract_tokens(doc: &str, options: &ScanOptions) -> std::result::Result<Vec<HexToken>, ParseError> {
    ArrayLiteral::parse(doc, options).map(ArrayLiteral::into_tokens)
}

/// Read and parse the array literal of the document at `path`.
pub fn decode_file(path: impl AsRef<Path>, options: &ScanOptions) -> Result<ArrayLiteral> {
    let path = path.as_ref();
    let doc = read_document(path)?;
    let literal = ArrayLiteral::parse(&doc, options).map_err(|e| HookError::parse(path, e))?;
    log::debug!(
        "{}: {} tokens in {}",
        path.display(),
        literal.len(),
        literal.ident().unwrap_or("<anonymous>")
    );
    Ok(literal)
}
