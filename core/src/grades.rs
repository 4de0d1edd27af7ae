//! Graded vocabulary lists (HSK 1-6).
//!
//! Each list is a line-oriented file whose first `|`-separated field is a
//! word. The list's ordinal is the grade of every word in it. Lists are
//! applied in ascending order and later lists overwrite earlier ones, so a
//! word that appears in both list 3 and list 5 is graded 5.
//!
//! Public API:
//! - `GradeMap::load_dir` — read `hsk{level}.csv`-style files, skipping missing ones
//! - `GradeMap::insert_list` — add one list from any reader
//! - `GradeMap::grade` — total lookup (`None` = ungraded)

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Grade level of a word (1 = easiest).
pub type Grade = u8;

/// Word → grade map. Immutable once the registry is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeMap {
    map: AHashMap<String, Grade>,
}

impl GradeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the list file for `level`, substituting `{level}` in `pattern`.
    pub fn list_path(dir: &Path, pattern: &str, level: Grade) -> PathBuf {
        dir.join(pattern.replace("{level}", &level.to_string()))
    }

    /// Load lists `1..=levels` from `dir`. Missing list files are skipped.
    pub fn load_dir<P: AsRef<Path>>(dir: P, pattern: &str, levels: Grade) -> Result<Self> {
        let dir = dir.as_ref();
        let mut grades = Self::new();
        for level in 1..=levels {
            let path = Self::list_path(dir, pattern, level);
            if !path.exists() {
                debug!(level, path = %path.display(), "grade list not present, skipping");
                continue;
            }
            let file = File::open(&path)?;
            grades.insert_list(level, BufReader::new(file))?;
        }
        Ok(grades)
    }

    /// Add every word of one list at `level`, overwriting earlier grades.
    pub fn insert_list<R: BufRead>(&mut self, level: Grade, reader: R) -> Result<usize> {
        let mut added = 0;
        for line in reader.lines() {
            let line = line?;
            if let Some(word) = list_word(&line) {
                self.map.insert(word.to_string(), level);
                added += 1;
            }
        }
        debug!(level, added, "grade list loaded");
        Ok(added)
    }

    /// Set the grade of one word.
    pub fn insert<W: Into<String>>(&mut self, word: W, level: Grade) {
        self.map.insert(word.into(), level);
    }

    pub fn grade(&self, word: &str) -> Option<Grade> {
        self.map.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The word of a list line: text before the first `|`, trimmed.
fn list_word(line: &str) -> Option<&str> {
    let word = line.split('|').next().unwrap_or("").trim();
    (!word.is_empty()).then_some(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_field_is_the_word() {
        assert_eq!(list_word("爱|ài|love"), Some("爱"));
        assert_eq!(list_word("  八  |bā"), Some("八"));
        assert_eq!(list_word("爸爸"), Some("爸爸"));
        assert_eq!(list_word("   "), None);
        assert_eq!(list_word("|bā"), None);
    }

    #[test]
    fn later_lists_overwrite() {
        let mut g = GradeMap::new();
        g.insert_list(3, "学习|xuéxí\n经济|jīngjì\n".as_bytes()).unwrap();
        g.insert_list(5, "经济|jīngjì\n".as_bytes()).unwrap();
        assert_eq!(g.grade("学习"), Some(3));
        assert_eq!(g.grade("经济"), Some(5));
        assert_eq!(g.grade("电脑"), None);
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn list_path_substitutes_level() {
        let p = GradeMap::list_path(Path::new("assets/hsk"), "hsk{level}.csv", 4);
        assert_eq!(p, PathBuf::from("assets/hsk/hsk4.csv"));
    }

    #[test]
    fn missing_directory_yields_empty_map() {
        let g = GradeMap::load_dir("/nonexistent/zhvocab/hsk", "hsk{level}.csv", 6).unwrap();
        assert!(g.is_empty());
    }
}
