//! zhvocab-core
//!
//! Reference data and metrics for Chinese vocabulary flashcards: HSK grade,
//! CC-CEDICT definitions, diacritic pinyin, corpus frequency rank/weight, and
//! a frequency-weighted estimate of how much running text a learner can read.
//!
//! Resources are parsed once into an immutable `ReferenceData` registry and
//! queried through `Vocabulary`. The host flashcard application owns notes,
//! cards and scheduling; this crate only computes values for it.
//!
//! Public API:
//! - `tone::to_diacritic` - numeric-tone pinyin to tone-marked pinyin
//! - `ReferenceData` - graded lists, dictionary and frequency table, built once
//! - `Vocabulary` - word lookups (`WordRecord`) with an LRU record cache
//! - `estimate_comprehension`, `RecallTracker` - coverage and per-review deltas
//! - `NoteFields` - note field strings for a `WordRecord`
//! - `Config` - resource locations and tuning, loadable from TOML
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod error;
pub use error::{Result, VocabError};

pub mod tone;
pub use tone::{strip_tone_marks, to_diacritic};

pub mod grades;
pub use grades::{Grade, GradeMap};

pub mod cedict;
pub use cedict::{DictEntry, Dictionary};

pub mod frequency;
pub use frequency::{FrequencyEntry, FrequencyTable};

pub mod registry;
pub use registry::ReferenceData;

pub mod lookup;
pub use lookup::{Vocabulary, WordRecord};

pub mod comprehension;
pub use comprehension::{
    estimate_comprehension, recall_delta, Comprehension, KnownWord, RecallTracker, UnitId,
};

pub mod notes;
pub use notes::NoteFields;

/// Resource locations and tuning.
///
/// Relative resource paths are resolved against `assets_dir`. Every field has
/// a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the resource files.
    pub assets_dir: PathBuf,

    /// Directory of the graded lists, relative to `assets_dir`.
    pub grade_dir: PathBuf,
    /// File name of a graded list; `{level}` is replaced by 1..=grade_levels.
    pub grade_file_pattern: String,
    /// Number of graded lists.
    pub grade_levels: Grade,

    /// CC-CEDICT file, relative to `assets_dir`.
    pub dictionary_file: PathBuf,

    /// Pipe-delimited frequency table, relative to `assets_dir`.
    pub frequency_file: PathBuf,
    /// Header of the word column.
    pub frequency_word_column: String,
    /// Header of the occurrences-per-million column.
    pub frequency_weight_column: String,

    /// Maximum number of memoized lookup records.
    pub max_cache_size: usize,
    /// Maximum number of review units remembered by `RecallTracker`.
    pub recall_tracker_capacity: usize,

    /// Optional bincode snapshot of the parsed registry.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            grade_dir: PathBuf::from("hsk"),
            grade_file_pattern: "hsk{level}.csv".to_string(),
            grade_levels: 6,
            dictionary_file: PathBuf::from("cedict_ts.u8"),
            frequency_file: PathBuf::from("word-freq.csv"),
            frequency_word_column: frequency::DEFAULT_WORD_COLUMN.to_string(),
            frequency_weight_column: frequency::DEFAULT_WEIGHT_COLUMN.to_string(),
            max_cache_size: 1000,
            recall_tracker_capacity: 4096,
            snapshot_path: None,
        }
    }
}

impl Config {
    /// Default configuration with resources under `assets_dir`.
    pub fn with_assets_dir<P: Into<PathBuf>>(assets_dir: P) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn grade_dir_path(&self) -> PathBuf {
        self.assets_dir.join(&self.grade_dir)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.assets_dir.join(&self.dictionary_file)
    }

    pub fn frequency_path(&self) -> PathBuf {
        self.assets_dir.join(&self.frequency_file)
    }

    /// A `RecallTracker` sized by this configuration.
    pub fn recall_tracker(&self) -> RecallTracker {
        RecallTracker::new(self.recall_tracker_capacity)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
