// core/src/tone.rs
//
// Numeric-tone pinyin ("ni3 hao3") to diacritic pinyin ("nǐhǎo").
//
// Placement follows the usual orthographic rule: `a`, `o` or `e` carries the
// mark when present; in `iu` the mark goes on `u`, in `ui` on `i`; otherwise
// the last vowel of the syllable takes it.

/// Marked forms of each vowel for tones 1-4 (macron, acute, caron, grave).
const TONE_MARKS: [(char, [char; 4]); 6] = [
    ('a', ['ā', 'á', 'ǎ', 'à']),
    ('e', ['ē', 'é', 'ě', 'è']),
    ('i', ['ī', 'í', 'ǐ', 'ì']),
    ('o', ['ō', 'ó', 'ǒ', 'ò']),
    ('u', ['ū', 'ú', 'ǔ', 'ù']),
    ('ü', ['ǖ', 'ǘ', 'ǚ', 'ǜ']),
];

const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'ü'];

/// Neutral tone. Syllables without a tone digit are neutral.
pub const NEUTRAL_TONE: u32 = 5;

/// Convert whitespace-separated numeric-tone syllables to diacritic pinyin.
///
/// Syllable results are concatenated without a separator, so
/// `"ni3 hao3"` becomes `"nǐhǎo"`. The conversion never fails: a syllable
/// whose tone cannot be placed is emitted without a mark.
///
/// ```
/// # use zhvocab_core::tone::to_diacritic;
/// assert_eq!(to_diacritic("liu2 xue2 sheng1"), "liúxuéshēng");
/// assert_eq!(to_diacritic("nu:3 er2"), "nǚér");
/// ```
pub fn to_diacritic(pinyin: &str) -> String {
    pinyin.split_whitespace().map(convert_syllable).collect()
}

/// Convert one syllable, e.g. `"lv4"` → `"lǜ"`.
pub fn convert_syllable(syllable: &str) -> String {
    let (base, tone) = split_tone(syllable);
    let base = normalize_umlaut(base);

    // digits outside 1-4 carry no mark
    if !(1..=4).contains(&tone) {
        return base;
    }

    match bearing_vowel(&base) {
        Some(vowel) => match marked(vowel, tone) {
            Some(mark) => base.replacen(vowel, &mark.to_string(), 1),
            None => base,
        },
        None => base,
    }
}

/// Split a trailing tone digit off a syllable. Returns the base and the tone,
/// `NEUTRAL_TONE` when the syllable has no digit.
pub fn split_tone(syllable: &str) -> (&str, u32) {
    match syllable.chars().last() {
        Some(c) if c.is_ascii_digit() => {
            let base = &syllable[..syllable.len() - c.len_utf8()];
            (base, c.to_digit(10).unwrap_or(NEUTRAL_TONE))
        }
        _ => (syllable, NEUTRAL_TONE),
    }
}

/// Rewrite the alternate u-umlaut spellings (`u:` and `v`) as `ü`.
pub fn normalize_umlaut(base: &str) -> String {
    base.replace("u:", "ü").replace('v', "ü")
}

/// Pick the vowel that carries the tone mark.
fn bearing_vowel(base: &str) -> Option<char> {
    if let Some(v) = ['a', 'o', 'e'].into_iter().find(|v| base.contains(*v)) {
        return Some(v);
    }
    if base.contains("iu") {
        return Some('u');
    }
    if base.contains("ui") {
        return Some('i');
    }
    base.chars().rev().find(|c| VOWELS.contains(c))
}

fn marked(vowel: char, tone: u32) -> Option<char> {
    let idx = usize::try_from(tone).ok()?.checked_sub(1)?;
    TONE_MARKS
        .iter()
        .find(|(v, _)| *v == vowel)
        .and_then(|(_, marks)| marks.get(idx).copied())
}

/// Remove tone marks, mapping every marked vowel back to its plain form.
/// `ü` is kept as is.
pub fn strip_tone_marks(text: &str) -> String {
    text.chars()
        .map(|c| {
            TONE_MARKS
                .iter()
                .find(|(_, marks)| marks.contains(&c))
                .map(|(v, _)| *v)
                .unwrap_or(c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vowel_priority() {
        assert_eq!(to_diacritic("hao3"), "hǎo");
        assert_eq!(to_diacritic("liu2"), "liú");
        assert_eq!(to_diacritic("gui3"), "guǐ");
        assert_eq!(to_diacritic("zhou1"), "zhōu");
        assert_eq!(to_diacritic("xie4"), "xiè");
        assert_eq!(to_diacritic("ni3"), "nǐ");
    }

    #[test]
    fn neutral_tone_is_identity_after_umlaut_normalization() {
        assert_eq!(to_diacritic("de5"), "de");
        assert_eq!(to_diacritic("ma"), "ma");
        assert_eq!(to_diacritic("lv5"), "lü");
        assert_eq!(to_diacritic("nu:"), "nü");
    }

    #[test]
    fn umlaut_spellings() {
        assert_eq!(to_diacritic("lv4"), "lǜ");
        assert_eq!(to_diacritic("nu:3"), "nǚ");
        assert_eq!(to_diacritic("lve4"), "lüè");
    }

    #[test]
    fn syllables_are_concatenated() {
        assert_eq!(to_diacritic("zhong1 guo2"), "zhōngguó");
        assert_eq!(to_diacritic("  ni3   hao3 "), "nǐhǎo");
        assert_eq!(to_diacritic(""), "");
    }

    #[test]
    fn no_bearing_vowel_degrades_to_base() {
        assert_eq!(to_diacritic("m2"), "m");
        assert_eq!(to_diacritic("hm4"), "hm");
        assert_eq!(to_diacritic("xx5"), "xx");
    }

    #[test]
    fn out_of_range_digit_is_unmarked() {
        assert_eq!(to_diacritic("ma0"), "ma");
        assert_eq!(to_diacritic("ma7"), "ma");
    }

    #[test]
    fn uppercase_vowels_are_not_matched() {
        // callers lower-case after conversion
        assert_eq!(to_diacritic("Bei3"), "Běi");
        assert_eq!(to_diacritic("A1"), "A");
    }

    #[test]
    fn exactly_one_mark_and_strip_recovers_base() {
        let bases = [
            "ba", "po", "me", "di", "tu", "nü", "lao", "gei", "dou", "xiu", "dui", "zhuang",
            "xiong", "yue", "er", "quan",
        ];
        for base in bases {
            for tone in 1..=4 {
                let out = to_diacritic(&format!("{}{}", base, tone));
                let marks = out
                    .chars()
                    .filter(|c| strip_tone_marks(&c.to_string()) != c.to_string())
                    .count();
                assert_eq!(marks, 1, "{} tone {} -> {}", base, tone, out);
                assert_eq!(strip_tone_marks(&out), base);
            }
        }
    }

    #[test]
    fn split_tone_handles_missing_digit() {
        assert_eq!(split_tone("hao3"), ("hao", 3));
        assert_eq!(split_tone("hao"), ("hao", NEUTRAL_TONE));
        assert_eq!(split_tone(""), ("", NEUTRAL_TONE));
    }
}
