// Tab-separated input files for the notes, comprehension and reviews commands.
// Blank lines and lines starting with '#' are ignored everywhere.

use anyhow::{anyhow, Context, Result};
use std::io::BufRead;
use zhvocab_core::{KnownWord, NoteFields, UnitId};

/// A note as the host currently stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRow {
    pub word: String,
    pub current: NoteFields,
}

/// One answered review: the unit's recall probability when it was shown and
/// again after the answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEvent {
    pub unit: UnitId,
    pub word: String,
    pub recall_before: f64,
    pub recall_after: f64,
}

fn data_lines<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, std::io::Result<String>)> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| match line {
            Ok(l) => !l.trim().is_empty() && !l.starts_with('#'),
            Err(_) => true,
        })
}

/// `word<TAB>hsk<TAB>definition<TAB>pinyin<TAB>freq-rank<TAB>freq-weight`;
/// trailing columns may be omitted and count as empty.
pub fn read_notes<R: BufRead>(reader: R) -> Result<Vec<NoteRow>> {
    let mut rows = Vec::new();
    for (_, line) in data_lines(reader) {
        let line = line?;
        let mut cols = line.split('\t').map(|c| c.trim().to_string());
        let word = cols.next().unwrap_or_default();
        let mut next = || cols.next().unwrap_or_default();
        let current = NoteFields {
            hsk: next(),
            definition: next(),
            pinyin: next(),
            freq_rank: next(),
            freq_weight: next(),
        };
        rows.push(NoteRow { word, current });
    }
    Ok(rows)
}

/// `word[<TAB>recall]`.
pub fn read_known_words<R: BufRead>(reader: R) -> Result<Vec<KnownWord>> {
    let mut known = Vec::new();
    for (lineno, line) in data_lines(reader) {
        let line = line?;
        let mut cols = line.split('\t');
        let word = cols.next().unwrap_or_default().trim();
        let recall = match cols.next().map(str::trim).filter(|c| !c.is_empty()) {
            Some(r) => Some(
                r.parse::<f64>()
                    .with_context(|| format!("line {}: bad recall `{}`", lineno, r))?,
            ),
            None => None,
        };
        known.push(KnownWord::new(word, recall));
    }
    Ok(known)
}

fn parse_recall(lineno: usize, col: &str) -> Result<f64> {
    col.parse()
        .with_context(|| format!("line {}: bad recall `{}`", lineno, col))
}

/// `unit<TAB>word<TAB>before<TAB>after`, where `before` is the recall
/// probability when the unit was shown and `after` the one once answered.
pub fn read_reviews<R: BufRead>(reader: R) -> Result<Vec<ReviewEvent>> {
    let mut events = Vec::new();
    for (lineno, line) in data_lines(reader) {
        let line = line?;
        let cols: Vec<&str> = line.split('\t').map(str::trim).collect();
        let [unit, word, before, after] = cols.as_slice() else {
            return Err(anyhow!("line {}: expected 4 columns, found {}", lineno, cols.len()));
        };
        events.push(ReviewEvent {
            unit: unit
                .parse()
                .with_context(|| format!("line {}: bad unit id `{}`", lineno, unit))?,
            word: word.to_string(),
            recall_before: parse_recall(lineno, before)?,
            recall_after: parse_recall(lineno, after)?,
        });
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_with_missing_columns() {
        let rows = read_notes("# header\n你好\t1\thello\n\n中国\n".as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].word, "你好");
        assert_eq!(rows[0].current.hsk, "1");
        assert_eq!(rows[0].current.definition, "hello");
        assert_eq!(rows[0].current.pinyin, "");
        assert_eq!(rows[1].current, NoteFields::default());
    }

    #[test]
    fn known_words_with_optional_recall() {
        let known = read_known_words("你好\t0.8\n中国\n学习\t\n".as_bytes()).unwrap();
        assert_eq!(
            known,
            vec![
                KnownWord::new("你好", Some(0.8)),
                KnownWord::new("中国", None),
                KnownWord::new("学习", None),
            ]
        );
    }

    #[test]
    fn bad_recall_reports_line() {
        let err = read_known_words("你好\t0.8\n中国\thigh\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn review_events() {
        let text = "# unit\tword\tbefore\tafter\n17\t你好\t0.5\t0.9\n17\t你好\t0.6\t0.95\n";
        let events = read_reviews(text.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].unit, 17);
        assert_eq!(events[1].recall_before, 0.6);
        assert_eq!(events[1].recall_after, 0.95);
    }

    #[test]
    fn review_rows_need_both_recalls() {
        let err = read_reviews("17\t你好\t0.9\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("expected 4 columns"));
        let err = read_reviews("17\t你好\t0.9\t0.95\n17\t你好\tx\t0.95\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
