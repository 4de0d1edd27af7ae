//! Note field rendering.
//!
//! A vocabulary note carries five text fields derived from a `WordRecord`.
//! Notes for words without both definitions and pinyin are left alone.
//! Frequency weights are shown as odds, e.g. `1 / 20k` for a word seen about
//! once every twenty thousand words.

use serde::{Deserialize, Serialize};

use crate::lookup::WordRecord;

/// Weight used when a word has no (or zero) frequency weight.
pub const MIN_DISPLAY_WEIGHT: f64 = 0.000_000_000_1;

/// Text values of the note fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFields {
    pub hsk: String,
    pub definition: String,
    pub pinyin: String,
    pub freq_rank: String,
    pub freq_weight: String,
}

impl NoteFields {
    /// Render `record` as note fields. Returns `None` when the record lacks
    /// definitions or pinyin.
    pub fn from_record(record: &WordRecord) -> Option<Self> {
        let definition = record.definitions.as_deref().filter(|s| !s.is_empty())?;
        let pinyin = record.pinyin.as_deref().filter(|s| !s.is_empty())?;
        let weight = record
            .freq_weight
            .filter(|w| *w > 0.0)
            .unwrap_or(MIN_DISPLAY_WEIGHT);

        Some(Self {
            hsk: record.grade.map(|g| g.to_string()).unwrap_or_default(),
            definition: definition.to_string(),
            pinyin: pinyin.to_string(),
            freq_rank: record.freq_rank.map(|r| r.to_string()).unwrap_or_default(),
            freq_weight: format_odds(weight),
        })
    }

    /// True if writing `self` over `current` would change the note.
    pub fn differs_from(&self, current: &NoteFields) -> bool {
        self != current
    }
}

/// Render a probability as `1 / <readable 1/p>`.
pub fn format_odds(probability: f64) -> String {
    format!("1 / {}", readable_number(1.0 / probability))
}

/// Render a coverage change from a single review, flooring it at
/// `MIN_DISPLAY_WEIGHT` so losses and tiny gains stay printable.
pub fn format_comprehension_change(delta: f64) -> String {
    format_odds(delta.max(MIN_DISPLAY_WEIGHT))
}

/// Compact magnitude: `bil`, `mil` and `k` suffixes, rounded half to even.
pub fn readable_number(x: f64) -> String {
    if x > 1_000_000_000.0 {
        return format!("{}bil", round_even(x / 1_000_000_000.0));
    }
    if x > 1_000_000.0 {
        return format!("{}mil", round_even(x / 1_000_000.0));
    }
    if x > 1_000.0 {
        return format!("{}k", round_even(x / 1_000.0));
    }
    round_even(x).to_string()
}

fn round_even(x: f64) -> i64 {
    x.round_ties_even() as i64
}
