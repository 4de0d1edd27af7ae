//! Comprehension estimates from a learner's known words.
//!
//! A word's frequency weight is the probability of meeting it in running
//! text, so the weights of the known words, divided by the table's total
//! mass, estimate how much of a typical text the learner can read.
//!
//! Two figures are produced:
//! - basic coverage counts every known word as fully known;
//! - retrieval-weighted coverage discounts each word by the probability the
//!   learner would recall it right now (supplied by the host's scheduler).
//!
//! `RecallTracker` keeps the last observed recall probability per review unit
//! so the change caused by a single review can be reported.

use ahash::AHashMap;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

use crate::frequency::FrequencyTable;

/// A known word, optionally with its current recall probability.
/// A missing recall counts as certain recall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownWord {
    pub word: String,
    pub recall: Option<f64>,
}

impl KnownWord {
    pub fn new<W: Into<String>>(word: W, recall: Option<f64>) -> Self {
        Self {
            word: word.into(),
            recall,
        }
    }
}

/// Coverage percentages (0-100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Comprehension {
    pub basic_percent: f64,
    pub retrieval_weighted_percent: f64,
    /// Number of distinct known words the estimate is based on.
    pub word_count: usize,
}

impl fmt::Display for Comprehension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Basic estimated comprehension: {:.4}%", self.basic_percent)?;
        writeln!(
            f,
            "Retrievability-weighted: {:.4}%",
            self.retrieval_weighted_percent
        )?;
        write!(f, "Based on {} words", self.word_count)
    }
}

/// Estimate coverage of `table` by `known` words.
///
/// Duplicate words collapse to one entry at their first position, carrying
/// the last recall given. Words missing from the table weigh nothing. An
/// empty table yields zero coverage.
pub fn estimate_comprehension<I>(table: &FrequencyTable, known: I) -> Comprehension
where
    I: IntoIterator<Item = KnownWord>,
{
    let known = dedup_known(known);

    // summed in input order so repeated runs agree to the last bit
    let mut basic_mass = 0.0;
    let mut retrieval_mass = 0.0;
    for (word, recall) in &known {
        let weight = table.weight(word).unwrap_or(0.0);
        basic_mass += weight;
        retrieval_mass += weight * recall.map_or(1.0, clamp_probability);
    }

    let total_mass = table.total_mass();
    Comprehension {
        basic_percent: percent_of(basic_mass, total_mass),
        retrieval_weighted_percent: percent_of(retrieval_mass, total_mass),
        word_count: known.len(),
    }
}

fn dedup_known<I>(known: I) -> Vec<(String, Option<f64>)>
where
    I: IntoIterator<Item = KnownWord>,
{
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut words: Vec<(String, Option<f64>)> = Vec::new();
    for k in known {
        match index.get(&k.word) {
            Some(&i) => words[i].1 = k.recall,
            None => {
                index.insert(k.word.clone(), words.len());
                words.push((k.word, k.recall));
            }
        }
    }
    words
}

/// Change in basic coverage (as a fraction, not a percentage) caused by a
/// word's recall probability moving from `recall_before` to `recall_after`.
pub fn recall_delta(
    freq_weight: f64,
    recall_before: f64,
    recall_after: f64,
    total_mass: f64,
) -> f64 {
    if total_mass == 0.0 {
        return 0.0;
    }
    freq_weight * (recall_after - recall_before) / total_mass
}

fn percent_of(mass: f64, total_mass: f64) -> f64 {
    if total_mass == 0.0 {
        0.0
    } else {
        mass / total_mass * 100.0
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Identifier of a reviewable unit (a card id in the host application).
pub type UnitId = i64;

/// Last observed recall probability per review unit.
///
/// Bounded by an LRU policy; units that fall out simply have no previous
/// observation the next time they are reviewed.
pub struct RecallTracker {
    last: LruCache<UnitId, f64>,
}

impl RecallTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            last: LruCache::new(capacity),
        }
    }

    /// Store `recall` as the latest observation for `unit` and return the
    /// previous one, if any.
    pub fn record_observed_recall(&mut self, unit: UnitId, recall: f64) -> Option<f64> {
        self.last.put(unit, clamp_probability(recall))
    }

    /// Latest observation for `unit` without touching it.
    pub fn last_recall(&self, unit: UnitId) -> Option<f64> {
        self.last.peek(&unit).copied()
    }

    /// Record the recall measured after a review and report the resulting
    /// coverage change.
    ///
    /// Returns `None` when there is no usable previous observation (never
    /// seen, or last seen at zero recall) or when the table mass is zero.
    pub fn observe_review(
        &mut self,
        unit: UnitId,
        freq_weight: f64,
        recall_after: f64,
        total_mass: f64,
    ) -> Option<f64> {
        let before = self.record_observed_recall(unit, recall_after)?;
        if before == 0.0 || total_mass == 0.0 {
            return None;
        }
        Some(recall_delta(
            freq_weight,
            before,
            clamp_probability(recall_after),
            total_mass,
        ))
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
