//! Locating and tokenizing array regions in a document.
//!
//! A region is a `{ ... }` pair that contains no other brace and whose closing
//! brace is immediately followed by `;`. Function bodies and namespaces never
//! end in `};` at the innermost level, so in a hook header the byte array is
//! the only region. The body of a region is a comma separated token list; any
//! element that is not a token under the selected [`Grammar`] is an error.

use crate::error::ParseError;
use crate::token::{Grammar, HexToken};

/// What to do when a document holds more than one region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegionPolicy {
    /// Exactly one region, anything else is [`ParseError::AmbiguousRegion`].
    #[default]
    Unique,
    /// Use the leftmost region and ignore the rest.
    First,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub grammar: Grammar,
    pub policy: RegionPolicy,
}

impl ScanOptions {
    pub fn new(grammar: Grammar, policy: RegionPolicy) -> Self {
        Self { grammar, policy }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    /// Declaration text between the previous statement and the opening brace.
    pub header: &'a str,
    /// Text between the braces.
    pub body: &'a str,
    /// Byte offset of `body` in the document.
    pub body_offset: usize,
}

impl<'a> Region<'a> {
    /// The identifier being declared, i.e. the last identifier before `=`.
    pub fn ident(&self) -> Option<&'a str> {
        let lhs = self.header.trim_end().strip_suffix('=')?.trim_end();
        let start = lhs
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
            .last()
            .map(|(i, _)| i)?;
        Some(&lhs[start..])
    }

    pub fn tokens(&self, grammar: Grammar) -> Result<Vec<HexToken>, ParseError> {
        parse_body(self.body, self.body_offset, grammar)
    }
}

/// All regions of `doc`, left to right.
pub fn find_regions(doc: &str) -> Vec<Region<'_>> {
    let bytes = doc.as_bytes();
    let mut regions = Vec::new();
    let mut stmt_start = 0usize;
    // (offset of '{', start of its header)
    let mut open: Option<(usize, usize)> = None;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => {
                open = Some((i, stmt_start));
                stmt_start = i + 1;
            }
            b'}' => {
                if let Some((brace, header_start)) = open.take() {
                    if bytes.get(i + 1) == Some(&b';') {
                        regions.push(Region {
                            header: doc[header_start..brace].trim(),
                            body: &doc[brace + 1..i],
                            body_offset: brace + 1,
                        });
                    }
                }
                stmt_start = i + 1;
            }
            b';' => stmt_start = i + 1,
            _ => {}
        }
    }

    regions
}

/// Pick the region `options.policy` designates.
pub fn select_region<'a>(doc: &'a str, options: &ScanOptions) -> Result<Region<'a>, ParseError> {
    let regions = find_regions(doc);
    match (regions.len(), options.policy) {
        (0, _) => Err(ParseError::NoRegion),
        (1, _) | (_, RegionPolicy::First) => Ok(regions[0]),
        (count, RegionPolicy::Unique) => Err(ParseError::AmbiguousRegion { count }),
    }
}

fn parse_body(body: &str, base: usize, grammar: Grammar) -> Result<Vec<HexToken>, ParseError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let pieces: Vec<&str> = body.split(',').collect();
    let last = pieces.len() - 1;
    let mut tokens = Vec::with_capacity(body.len() / (HexToken::LEN + 2) + 1);
    let mut pos = base;

    for (idx, piece) in pieces.iter().enumerate() {
        let text = piece.trim();
        let offset = pos + (piece.len() - piece.trim_start().len());
        pos += piece.len() + 1;

        // trailing comma
        if text.is_empty() && idx == last && idx > 0 {
            break;
        }

        match HexToken::parse(text, grammar) {
            Some(token) => tokens.push(token),
            None => {
                return Err(ParseError::InvalidToken {
                    offset,
                    text: text.to_string(),
                })
            }
        }
    }

    Ok(tokens)
}
