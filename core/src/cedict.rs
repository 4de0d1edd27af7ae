//! CC-CEDICT dictionary loader.
//!
//! Line format:
//!
//! ```text
//! 中國 中国 [Zhong1 guo2] /China/
//! ```
//!
//! Entries are keyed by the simplified form. Every line for the same word adds
//! another pinyin variant and another gloss variant, in file order; variants
//! are never merged or deduplicated. Pinyin is stored in diacritic form and
//! lower-cased; the gloss block is stored as one string with its `/`
//! separators rewritten as `"; "`.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, VocabError};
use crate::tone::to_diacritic;

/// Separator used when presenting several variants as one string.
pub const VARIANT_SEPARATOR: &str = " / ";

/// All readings and glosses recorded for one simplified word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictEntry {
    pub pinyin: Vec<String>,
    pub definitions: Vec<String>,
}

/// One parsed dictionary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CedictLine<'a> {
    pub traditional: &'a str,
    pub simplified: &'a str,
    /// Diacritic, lower-cased pinyin.
    pub pinyin: String,
    /// Glosses joined with `"; "`.
    pub definitions: String,
}

/// Parse one dictionary line. Returns `None` for comments, blank lines and
/// malformed lines.
pub fn parse_line(line: &str) -> Option<CedictLine<'_>> {
    if line.starts_with('#') {
        return None;
    }
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut parts = line.splitn(3, ' ');
    let (traditional, simplified, rest) = (parts.next()?, parts.next()?, parts.next()?);

    let (reading, glosses) = rest.split_once(']')?;
    let reading = reading.strip_prefix('[').unwrap_or(reading);
    let glosses = glosses.trim_start();
    let glosses = glosses.strip_prefix('/').unwrap_or(glosses);
    let glosses = glosses.strip_suffix('/').unwrap_or(glosses);

    Some(CedictLine {
        traditional,
        simplified,
        pinyin: to_diacritic(reading).to_lowercase(),
        definitions: glosses.replace('/', "; "),
    })
}

/// Simplified word → readings and glosses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dictionary {
    entries: AHashMap<String, DictEntry>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a CC-CEDICT file. The dictionary is required, so a missing file is
    /// reported as `VocabError::MissingResource`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VocabError::MissingResource {
                kind: "dictionary",
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse dictionary lines from any reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut dict = Self::new();
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line?;
            match parse_line(&line) {
                Some(parsed) => dict.push(parsed.simplified, parsed.pinyin, parsed.definitions),
                None => {
                    if is_malformed(&line) {
                        skipped += 1;
                    }
                }
            }
        }
        if skipped > 0 {
            debug!(skipped, "skipped malformed dictionary lines");
        }
        Ok(dict)
    }

    /// Append one reading/gloss pair for `simplified`.
    pub fn push<W: Into<String>>(&mut self, simplified: W, pinyin: String, definitions: String) {
        let entry = self.entries.entry(simplified.into()).or_default();
        entry.pinyin.push(pinyin);
        entry.definitions.push(definitions);
    }

    pub fn entry(&self, word: &str) -> Option<&DictEntry> {
        self.entries.get(word)
    }

    /// All glosses for `word`, variants joined with `" / "`.
    pub fn definitions(&self, word: &str) -> Option<String> {
        self.entry(word).and_then(|e| join_variants(&e.definitions))
    }

    /// All readings for `word`, variants joined with `" / "`.
    pub fn pinyin(&self, word: &str) -> Option<String> {
        self.entry(word).and_then(|e| join_variants(&e.pinyin))
    }

    /// Number of distinct simplified words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn join_variants(variants: &[String]) -> Option<String> {
    (!variants.is_empty()).then(|| variants.join(VARIANT_SEPARATOR))
}

fn is_malformed(line: &str) -> bool {
    !line.starts_with('#') && !line.trim().is_empty()
}
