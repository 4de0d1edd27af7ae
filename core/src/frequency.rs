//! Word frequency table.
//!
//! The table is a `|`-delimited file with a header row, pre-sorted by
//! descending frequency. A word's rank is the 1-based position of its data row;
//! its weight is the occurrences-per-million column divided by 1,000,000, i.e.
//! the probability of meeting the word in the reference corpus.
//!
//! ```text
//! Word|W/million
//! 的|50000
//! 了|12000
//! ```

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, VocabError};

pub const DEFAULT_WORD_COLUMN: &str = "Word";
pub const DEFAULT_WEIGHT_COLUMN: &str = "W/million";

const PER_MILLION: f64 = 1_000_000.0;

/// Rank and weight of one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub word: String,
    /// 1-based row position.
    pub rank: u32,
    /// Occurrence probability; 0.0 when the source field was unusable.
    pub weight: f64,
}

/// Frequency table keeping entries in file order plus a word index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
    index: AHashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from `path`. The table is required, so a missing file is
    /// reported as `VocabError::MissingResource`.
    pub fn load<P: AsRef<Path>>(path: P, word_column: &str, weight_column: &str) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VocabError::MissingResource {
                kind: "frequency",
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        Self::from_reader(file, word_column, weight_column)
    }

    /// Parse a `|`-delimited table from any reader.
    pub fn from_reader<R: Read>(reader: R, word_column: &str, weight_column: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| VocabError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let word_idx = column(word_column)?;
        let weight_idx = column(weight_column)?;

        let mut table = Self::new();
        let mut zero_weight = 0usize;
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let rank = u32::try_from(row + 1).unwrap_or(u32::MAX);
            let word = match record.get(word_idx) {
                Some(w) if !w.is_empty() => w,
                _ => continue,
            };
            let weight = record.get(weight_idx).and_then(parse_weight).unwrap_or_else(|| {
                zero_weight += 1;
                0.0
            });
            table.insert(word, rank, weight);
        }
        if zero_weight > 0 {
            debug!(zero_weight, "frequency rows without a usable weight");
        }
        Ok(table)
    }

    /// Insert or overwrite the entry for `word`. An existing entry keeps its
    /// position in file order.
    pub fn insert<W: Into<String>>(&mut self, word: W, rank: u32, weight: f64) {
        let word = word.into();
        match self.index.get(&word) {
            Some(&i) => {
                self.entries[i].rank = rank;
                self.entries[i].weight = weight;
            }
            None => {
                self.index.insert(word.clone(), self.entries.len());
                self.entries.push(FrequencyEntry { word, rank, weight });
            }
        }
    }

    pub fn entry(&self, word: &str) -> Option<&FrequencyEntry> {
        self.index.get(word).map(|&i| &self.entries[i])
    }

    pub fn rank(&self, word: &str) -> Option<u32> {
        self.entry(word).map(|e| e.rank)
    }

    pub fn weight(&self, word: &str) -> Option<f64> {
        self.entry(word).map(|e| e.weight)
    }

    /// Sum of every weight: the share of the corpus covered if every word in
    /// the table were known. Summed in file order on every call.
    pub fn total_mass(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrequencyEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Occurrences-per-million field → probability. Non-numeric, non-finite and
/// negative values are rejected.
fn parse_weight(field: &str) -> Option<f64> {
    let per_million: f64 = field.trim().parse().ok()?;
    (per_million.is_finite() && per_million >= 0.0).then(|| per_million / PER_MILLION)
}
