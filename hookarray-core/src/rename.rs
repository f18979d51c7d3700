//! Ordered prefix substitution over source trees.
//!
//! Rules run in order, each one over the output of the previous one, so a
//! rule whose `from` contains an earlier rule's `from` never sees its text.
//! [`PrefixMap::shadowed`] reports those.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HookError, Result};
use crate::fs::{read_blob, read_document, write_atomic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub from: String,
    pub to: String,
}

impl PrefixRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Include path table used when moving sources from the `xrpl`/`xrpld`
/// layout back to the `ripple` layout.
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("xrpld/app/", "ripple/app/"),
    ("xrpld/core/", "ripple/core/"),
    ("xrpld/nodestore/", "ripple/nodestore/"),
    ("xrpl/basics/", "ripple/basics/"),
    ("xrpl/protocol/", "ripple/protocol/"),
    ("xrpl/json/", "ripple/json/"),
    ("xrpld/overlay/", "ripple/overlay/"),
    ("xrpl/resource/", "ripple/resource/"),
    ("xrpl/crypto/", "ripple/crypto/"),
    ("xrpl/beast/", "ripple/beast/"),
    ("xrpld/shamap/", "ripple/shamap/"),
    ("xrpld/rpc/", "ripple/rpc/"),
    ("xrpld/perflog/", "ripple/perflog/"),
    ("xrpld/nodestore/detail/", "ripple/nodestore/impl/"),
    ("xrpld/ledger/", "ripple/ledger/"),
    ("xrpld/app/misc/detail/AccountTxPaging.h", "ripple/app/misc/impl/AccountTxPaging.h"),
    ("xrpld/perflog/PerfLog.h", "ripple/basics/PerfLog.h"),
    ("xrpld/rpc/detail/RPCHelpers.h", "ripple/rpc/impl/RPCHelpers.h"),
    ("xrpld/protocol/RPCErr.h", "ripple/net/RPCErr.h"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixMap {
    #[serde(rename = "rule", default)]
    rules: Vec<PrefixRule>,
}

impl PrefixMap {
    pub fn new(rules: Vec<PrefixRule>) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_RULES.iter().map(|(from, to)| PrefixRule::new(*from, *to)).collect())
    }

    /// Parse a TOML rule table:
    ///
    /// ```toml
    /// [[rule]]
    /// from = "xrpld/app/"
    /// to = "ripple/app/"
    /// ```
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, String> {
        let map: PrefixMap = toml::from_str(s).map_err(|e| e.to_string())?;
        if let Some(rule) = map.rules.iter().find(|r| r.from.is_empty()) {
            return Err(format!("rule with empty `from` (to = {:?})", rule.to));
        }
        Ok(map)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_document(path)?;
        Self::from_toml_str(&text).map_err(|message| HookError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn rules(&self) -> &[PrefixRule] {
        &self.rules
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| acc.replace(&rule.from, &rule.to))
    }

    /// `(shadowed, by)` index pairs: rule `shadowed` contains the `from` text
    /// of the earlier rule `by`, which rewrites it first.
    pub fn shadowed(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (j, later) in self.rules.iter().enumerate() {
            if let Some(i) = self.rules[..j].iter().position(|earlier| later.from.contains(&earlier.from)) {
                out.push((j, i));
            }
        }
        out
    }

    /// Byte-level [`PrefixMap::apply`]. Bytes outside the matched prefixes
    /// are kept as they are, so files that are not UTF-8 survive a rewrite.
    pub fn apply_bytes(&self, data: &[u8]) -> Vec<u8> {
        self.rules.iter().fold(data.to_vec(), |acc, rule| {
            replace_bytes(&acc, rule.from.as_bytes(), rule.to.as_bytes())
        })
    }

    /// The new content of the file at `path`, or `None` when no rule matches.
    pub fn plan_file(&self, path: impl AsRef<Path>) -> Result<Option<Vec<u8>>> {
        let content = read_blob(path)?;
        let updated = self.apply_bytes(&content);
        Ok((updated != content).then_some(updated))
    }

    /// Apply the map to one file. Returns whether the file changed; unchanged
    /// files are not rewritten.
    pub fn rewrite_file(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        match self.plan_file(path)? {
            Some(updated) => {
                write_atomic(path, &updated)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// non-overlapping, left to right, like `str::replace`
fn replace_bytes(haystack: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    if from.is_empty() {
        return haystack.to_vec();
    }
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if haystack[i..].starts_with(from) {
            out.extend_from_slice(to);
            i += from.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}

/// Every file under `root` whose extension is one of `extensions`, sorted.
pub fn source_files(root: impl AsRef<Path>, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(HookError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let escaped = glob::Pattern::escape(&root.to_string_lossy());
    let mut files = Vec::new();
    for ext in extensions {
        let pattern = format!("{escaped}/**/*.{ext}");
        let paths = glob::glob(&pattern).map_err(|e| HookError::Config {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("skipping {}: {}", e.path().display(), e.error()),
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}
