// Subcommand bodies. Each writes its report to `out` so it can be tested
// against an in-memory buffer.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tracing::info;
use zhvocab_core::notes::format_comprehension_change;
use zhvocab_core::{to_diacritic, KnownWord, NoteFields, RecallTracker, Vocabulary, WordRecord};

use crate::input::{NoteRow, ReviewEvent};

#[derive(Serialize)]
struct LookupLine<'a> {
    word: &'a str,
    #[serde(flatten)]
    record: &'a WordRecord,
}

fn or_dash<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn lookup<W: Write>(
    vocab: &Vocabulary,
    words: &[String],
    json: bool,
    out: &mut W,
) -> Result<()> {
    for word in words {
        let record = vocab.lookup(word);
        if json {
            let line = LookupLine {
                word,
                record: &record,
            };
            writeln!(out, "{}", serde_json::to_string(&line)?)?;
            continue;
        }
        writeln!(out, "{}", word)?;
        writeln!(out, "  hsk:         {}", or_dash(record.grade))?;
        writeln!(out, "  pinyin:      {}", or_dash(record.pinyin.as_deref()))?;
        writeln!(out, "  definitions: {}", or_dash(record.definitions.as_deref()))?;
        writeln!(out, "  freq rank:   {}", or_dash(record.freq_rank))?;
        writeln!(out, "  freq weight: {}", or_dash(record.freq_weight))?;
    }
    Ok(())
}

pub fn pinyin<W: Write>(text: &[String], out: &mut W) -> Result<()> {
    writeln!(out, "{}", to_diacritic(&text.join(" ")))?;
    Ok(())
}

/// Print the new fields of every note that changes; returns how many did.
pub fn notes<W: Write>(vocab: &Vocabulary, rows: &[NoteRow], out: &mut W) -> Result<usize> {
    let mut updated = 0;
    for row in rows {
        let Some(fields) = NoteFields::from_record(&vocab.lookup(&row.word)) else {
            continue;
        };
        if !fields.differs_from(&row.current) {
            continue;
        }
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.word,
            fields.hsk,
            fields.definition,
            fields.pinyin,
            fields.freq_rank,
            fields.freq_weight
        )?;
        updated += 1;
        if updated % 100 == 0 {
            info!(updated, "updated chinese notes");
        }
    }
    Ok(updated)
}

pub fn comprehension<W: Write>(
    vocab: &Vocabulary,
    known: Vec<KnownWord>,
    out: &mut W,
) -> Result<()> {
    let estimate = vocab.estimate_comprehension(known);
    writeln!(out, "{}", estimate)?;
    Ok(())
}

/// Replay review events in order, printing the coverage change of every
/// review whose unit was shown with a non-zero recall probability.
pub fn reviews<W: Write>(
    vocab: &Vocabulary,
    tracker: &mut RecallTracker,
    events: &[ReviewEvent],
    out: &mut W,
) -> Result<()> {
    let total_mass = vocab.total_frequency_mass();
    for event in events {
        let weight = vocab.frequency_weight(&event.word).unwrap_or(0.0);
        tracker.record_observed_recall(event.unit, event.recall_before);
        let change = tracker.observe_review(event.unit, weight, event.recall_after, total_mass);
        if let Some(delta) = change {
            writeln!(
                out,
                "{}\t{}\tComprehension change: {}",
                event.unit,
                event.word,
                format_comprehension_change(delta)
            )?;
        }
    }
    Ok(())
}
