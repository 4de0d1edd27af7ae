// core/tests/reference_data.rs
//
// End-to-end tests over a small asset tree written to a temp directory:
// - graded lists (including a missing level and a word in two levels)
// - CC-CEDICT dictionary with comments and variants
// - pipe-delimited frequency table
// - required-resource failures
// - snapshot reuse and invalidation

use std::fs;
use std::path::Path;
use std::sync::Arc;

use zhvocab_core::{Config, KnownWord, NoteFields, ReferenceData, VocabError, Vocabulary};

const CEDICT: &str = "\
# CC-CEDICT
# fixture
你好 你好 [ni3 hao3] /hello/hi/
中國 中国 [Zhong1 guo2] /China/
學習 学习 [xue2 xi2] /to learn/to study/
經濟 经济 [jing1 ji4] /economy/economic/
長 长 [chang2] /long/
長 长 [zhang3] /chief/
女兒 女儿 [nu:3 er2] /daughter/
broken-line
";

const FREQ: &str = "\
Word|W/million|Count
的|40000|400000
你好|5000|50000
中国|3000|30000
学习|1500|15000
长|500|5000
女儿|n/a|0
";

fn write_assets(root: &Path, with_dictionary: bool, with_frequency: bool) {
    let hsk = root.join("hsk");
    fs::create_dir_all(&hsk).unwrap();
    fs::write(hsk.join("hsk1.csv"), "你好|nǐhǎo|hello\n中国|Zhōngguó|China\n").unwrap();
    fs::write(hsk.join("hsk3.csv"), "学习|xuéxí\n经济|jīngjì\n").unwrap();
    // no hsk2, hsk4, hsk6
    fs::write(hsk.join("hsk5.csv"), "经济|jīngjì\n\n  \n").unwrap();
    if with_dictionary {
        fs::write(root.join("cedict_ts.u8"), CEDICT).unwrap();
    }
    if with_frequency {
        fs::write(root.join("word-freq.csv"), FREQ).unwrap();
    }
}

fn load(root: &Path) -> Vocabulary {
    let config = Config::with_assets_dir(root);
    let data = ReferenceData::load(&config).expect("load reference data");
    Vocabulary::new(Arc::new(data), &config)
}

#[test]
fn word_in_all_tables_has_every_field() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let v = load(dir.path());

    let r = v.lookup("你好");
    assert_eq!(r.grade, Some(1));
    assert_eq!(r.definitions.as_deref(), Some("hello; hi"));
    assert_eq!(r.pinyin.as_deref(), Some("nǐhǎo"));
    assert_eq!(r.freq_rank, Some(2));
    assert!((r.freq_weight.unwrap() - 0.005).abs() < 1e-12);
}

#[test]
fn word_in_no_table_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let v = load(dir.path());

    let r = v.lookup("电脑");
    assert!(r.grade.is_none());
    assert!(r.definitions.is_none());
    assert!(r.pinyin.is_none());
    assert!(r.is_empty());
}

#[test]
fn pinyin_is_lowercased_and_variants_joined() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let v = load(dir.path());

    assert_eq!(v.lookup("中国").pinyin.as_deref(), Some("zhōngguó"));
    assert_eq!(v.lookup("女儿").pinyin.as_deref(), Some("nǚér"));
    let r = v.lookup("长");
    assert_eq!(r.pinyin.as_deref(), Some("cháng / zhǎng"));
    assert_eq!(r.definitions.as_deref(), Some("long / chief"));
}

#[test]
fn duplicate_grade_takes_the_higher_list() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let v = load(dir.path());

    assert_eq!(v.grade("经济"), Some(5));
    assert_eq!(v.grade("学习"), Some(3));
    assert_eq!(v.data().grades.len(), 4);
}

#[test]
fn unusable_weight_is_zero_but_ranked() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let v = load(dir.path());

    assert_eq!(v.frequency_weight("女儿"), Some(0.0));
    assert_eq!(v.frequency_rank("女儿"), Some(6));
}

#[test]
fn total_mass_is_sum_of_weights_and_stable() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let v = load(dir.path());

    let expected: f64 = [0.04, 0.005, 0.003, 0.0015, 0.0005].iter().sum();
    let first = v.total_frequency_mass();
    assert!((first - expected).abs() < 1e-12);
    assert_eq!(v.total_frequency_mass(), first);
}

#[test]
fn comprehension_over_loaded_table() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let v = load(dir.path());

    let mass = v.total_frequency_mass();
    let c = v.estimate_comprehension(vec![
        KnownWord::new("你好", Some(0.5)),
        KnownWord::new("中国", None),
        KnownWord::new("电脑", Some(1.0)),
    ]);
    assert_eq!(c.word_count, 3);
    assert!((c.basic_percent - 0.008 / mass * 100.0).abs() < 1e-9);
    assert!((c.retrieval_weighted_percent - 0.0055 / mass * 100.0).abs() < 1e-9);

    let empty = v.estimate_comprehension(Vec::new());
    assert_eq!((empty.basic_percent, empty.retrieval_weighted_percent), (0.0, 0.0));
}

#[test]
fn note_fields_for_loaded_words() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let v = load(dir.path());

    let f = NoteFields::from_record(&v.lookup("中国")).unwrap();
    assert_eq!(f.hsk, "1");
    assert_eq!(f.freq_rank, "3");
    assert_eq!(f.freq_weight, "1 / 333");
    // in the frequency table only
    assert!(NoteFields::from_record(&v.lookup("的")).is_none());
}

#[test]
fn missing_grade_lists_are_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    fs::remove_dir_all(dir.path().join("hsk")).unwrap();
    let v = load(dir.path());

    assert_eq!(v.grade("你好"), None);
    assert!(v.lookup("你好").definitions.is_some());
}

#[test]
fn missing_dictionary_refuses_to_load() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), false, true);
    let err = ReferenceData::load(&Config::with_assets_dir(dir.path())).unwrap_err();
    assert!(matches!(err, VocabError::MissingResource { kind: "dictionary", .. }));
}

#[test]
fn missing_frequency_table_refuses_to_load() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, false);
    let err = ReferenceData::load(&Config::with_assets_dir(dir.path())).unwrap_err();
    assert!(matches!(err, VocabError::MissingResource { kind: "frequency", .. }));
}

fn snapshot_config(root: &Path) -> Config {
    Config {
        snapshot_path: Some(root.join("reference.bin")),
        ..Config::with_assets_dir(root)
    }
}

#[test]
fn snapshot_is_written_then_reused() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let config = snapshot_config(dir.path());

    let built = ReferenceData::load_or_build(&config).unwrap();
    assert!(dir.path().join("reference.bin").exists());

    let reused = ReferenceData::load_or_build(&config).unwrap();
    assert_eq!(
        reused.dictionary.pinyin("学习"),
        built.dictionary.pinyin("学习")
    );
    assert_eq!(reused.frequency.total_mass(), built.frequency.total_mass());
}

#[test]
fn snapshot_does_not_stand_in_for_a_missing_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let config = snapshot_config(dir.path());
    ReferenceData::load_or_build(&config).unwrap();

    fs::remove_file(dir.path().join("cedict_ts.u8")).unwrap();
    let err = ReferenceData::load_or_build(&config).unwrap_err();
    assert!(matches!(err, VocabError::MissingResource { kind: "dictionary", .. }));
}

#[test]
fn edited_resources_invalidate_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let config = snapshot_config(dir.path());
    let built = ReferenceData::load_or_build(&config).unwrap();
    assert!(built.dictionary.entry("猫").is_none());

    fs::write(
        dir.path().join("cedict_ts.u8"),
        format!("{}貓 猫 [mao1] /cat/\n", CEDICT),
    )
    .unwrap();
    fs::write(
        dir.path().join("word-freq.csv"),
        FREQ.replace("你好|5000|50000", "你好|9000|90000\n猫|100|1000"),
    )
    .unwrap();

    let data = ReferenceData::load_or_build(&config).unwrap();
    assert_eq!(data.dictionary.definitions("猫").as_deref(), Some("cat"));
    assert!((data.frequency.weight("你好").unwrap() - 0.009).abs() < 1e-12);

    // the rewritten snapshot now carries the edits
    let again = ReferenceData::load_or_build(&config).unwrap();
    assert_eq!(again.frequency.rank("猫"), Some(3));
}

#[test]
fn column_change_is_not_masked_by_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), true, true);
    let config = snapshot_config(dir.path());
    ReferenceData::load_or_build(&config).unwrap();

    let renamed = Config {
        frequency_weight_column: "Nope".to_string(),
        ..config
    };
    let err = ReferenceData::load_or_build(&renamed).unwrap_err();
    assert!(matches!(err, VocabError::MissingColumn { ref column } if column == "Nope"));
}
