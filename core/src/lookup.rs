// core/src/lookup.rs
//
// Word lookup facade over the reference registry.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::comprehension::{estimate_comprehension, Comprehension, KnownWord};
use crate::grades::Grade;
use crate::registry::ReferenceData;
use crate::utils::normalize;
use crate::Config;

/// Everything known about one word. Every field is independent and absent
/// when the corresponding resource has no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub grade: Option<Grade>,
    /// Gloss variants joined with `" / "`.
    pub definitions: Option<String>,
    /// Diacritic pinyin variants joined with `" / "`.
    pub pinyin: Option<String>,
    pub freq_rank: Option<u32>,
    pub freq_weight: Option<f64>,
}

impl WordRecord {
    /// True if no resource knows the word.
    pub fn is_empty(&self) -> bool {
        self.grade.is_none()
            && self.definitions.is_none()
            && self.pinyin.is_none()
            && self.freq_rank.is_none()
            && self.freq_weight.is_none()
    }
}

/// Query front end combining the graded lists, dictionary and frequency table.
///
/// Records are memoized in an LRU cache sized by `Config::max_cache_size`.
/// The cache uses interior mutability, so `Vocabulary` is meant to be used
/// from one thread.
pub struct Vocabulary {
    data: Arc<ReferenceData>,
    cache: RefCell<LruCache<String, WordRecord>>,
    cache_hits: RefCell<usize>,
    cache_misses: RefCell<usize>,
}

impl Vocabulary {
    pub fn new(data: Arc<ReferenceData>, config: &Config) -> Self {
        let capacity = NonZeroUsize::new(config.max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            data,
            cache: RefCell::new(LruCache::new(capacity)),
            cache_hits: RefCell::new(0),
            cache_misses: RefCell::new(0),
        }
    }

    /// Shared registry backing this facade.
    pub fn data(&self) -> &Arc<ReferenceData> {
        &self.data
    }

    /// Look up `word` (NFC-normalized and trimmed first).
    pub fn lookup(&self, word: &str) -> WordRecord {
        let key = normalize(word);
        if let Some(cached) = self.cache.borrow_mut().get(&key) {
            *self.cache_hits.borrow_mut() += 1;
            return cached.clone();
        }
        *self.cache_misses.borrow_mut() += 1;

        let record = self.build_record(&key);
        self.cache.borrow_mut().put(key, record.clone());
        record
    }

    fn build_record(&self, word: &str) -> WordRecord {
        let data = &self.data;
        let freq = data.frequency.entry(word);
        WordRecord {
            grade: data.grades.grade(word),
            definitions: data.dictionary.definitions(word),
            pinyin: data.dictionary.pinyin(word),
            freq_rank: freq.map(|e| e.rank),
            freq_weight: freq.map(|e| e.weight),
        }
    }

    /// Single-field accessors normalize `word` the same way `lookup` does.
    pub fn grade(&self, word: &str) -> Option<Grade> {
        self.data.grades.grade(&normalize(word))
    }

    pub fn frequency_rank(&self, word: &str) -> Option<u32> {
        self.data.frequency.rank(&normalize(word))
    }

    pub fn frequency_weight(&self, word: &str) -> Option<f64> {
        self.data.frequency.weight(&normalize(word))
    }

    /// Sum of every frequency weight.
    pub fn total_frequency_mass(&self) -> f64 {
        self.data.frequency.total_mass()
    }

    /// Coverage estimate for a set of known words against this registry's
    /// frequency table.
    pub fn estimate_comprehension<I>(&self, known: I) -> Comprehension
    where
        I: IntoIterator<Item = KnownWord>,
    {
        estimate_comprehension(&self.data.frequency, known)
    }

    /// Get (hits, misses, current size, capacity) of the record cache.
    pub fn cache_stats(&self) -> (usize, usize, usize, usize) {
        let cache = self.cache.borrow();
        (
            *self.cache_hits.borrow(),
            *self.cache_misses.borrow(),
            cache.len(),
            cache.cap().get(),
        )
    }

    /// Drop all memoized records and reset the counters.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        *self.cache_hits.borrow_mut() = 0;
        *self.cache_misses.borrow_mut() = 0;
    }
}
