// core/src/registry.rs
//
// The reference-data registry: graded lists, dictionary and frequency table,
// parsed once at startup and shared read-only afterwards.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::cedict::Dictionary;
use crate::error::{Result, VocabError};
use crate::frequency::FrequencyTable;
use crate::grades::GradeMap;
use crate::Config;

/// Leading bytes of a fingerprinted snapshot file.
const SNAPSHOT_MAGIC: &[u8; 8] = b"ZHVSNAP1";

/// Immutable lookup structures built from the static resources.
///
/// Build it once with `load` (or `load_or_build`) and hand it to
/// `Vocabulary` behind an `Arc`. Nothing mutates it after construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    pub grades: GradeMap,
    pub dictionary: Dictionary,
    pub frequency: FrequencyTable,
}

/// Path, size and modification time of one resource file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FileStamp {
    path: PathBuf,
    len: u64,
    modified: Option<Duration>,
}

impl FileStamp {
    /// `None` when the file does not exist.
    fn of(path: PathBuf) -> Result<Option<Self>> {
        let meta = match std::fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok());
        Ok(Some(Self {
            path,
            len: meta.len(),
            modified,
        }))
    }

    fn required(kind: &'static str, path: PathBuf) -> Result<Self> {
        match Self::of(path.clone())? {
            Some(stamp) => Ok(stamp),
            None => Err(VocabError::MissingResource { kind, path }),
        }
    }
}

/// Everything a snapshot was built from. A snapshot is only reused while
/// its stored fingerprint equals the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    dictionary: FileStamp,
    frequency: FileStamp,
    frequency_word_column: String,
    frequency_weight_column: String,
    /// One slot per configured level; `None` for an absent list.
    grade_lists: Vec<(PathBuf, Option<FileStamp>)>,
}

impl SourceFingerprint {
    /// Stat every resource named by `config`. Fails with `MissingResource`
    /// when the dictionary or the frequency table does not exist.
    pub fn of(config: &Config) -> Result<Self> {
        let dictionary = FileStamp::required("dictionary", config.dictionary_path())?;
        let frequency = FileStamp::required("frequency", config.frequency_path())?;
        let grade_dir = config.grade_dir_path();
        let grade_lists = (1..=config.grade_levels)
            .map(|level| {
                let path = GradeMap::list_path(&grade_dir, &config.grade_file_pattern, level);
                FileStamp::of(path.clone()).map(|stamp| (path, stamp))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            dictionary,
            frequency,
            frequency_word_column: config.frequency_word_column.clone(),
            frequency_weight_column: config.frequency_weight_column.clone(),
            grade_lists,
        })
    }
}

impl ReferenceData {
    pub fn new(grades: GradeMap, dictionary: Dictionary, frequency: FrequencyTable) -> Self {
        Self {
            grades,
            dictionary,
            frequency,
        }
    }

    /// Parse all resources named by `config`.
    ///
    /// Graded lists are optional; the dictionary and the frequency table are
    /// required and their absence is an error.
    pub fn load(config: &Config) -> Result<Self> {
        let grades = GradeMap::load_dir(
            config.grade_dir_path(),
            &config.grade_file_pattern,
            config.grade_levels,
        )?;
        let dictionary = Dictionary::load(config.dictionary_path())?;
        let frequency = FrequencyTable::load(
            config.frequency_path(),
            &config.frequency_word_column,
            &config.frequency_weight_column,
        )?;

        let data = Self::new(grades, dictionary, frequency);
        info!(
            graded = data.grades.len(),
            dictionary = data.dictionary.len(),
            frequency = data.frequency.len(),
            "reference data loaded"
        );
        Ok(data)
    }

    /// Load from `config.snapshot_path` when the snapshot there was built
    /// from the current resources, otherwise parse the text resources and
    /// (re)write the snapshot. Without a snapshot path this is `load`.
    ///
    /// The dictionary and frequency files must exist either way.
    pub fn load_or_build(config: &Config) -> Result<Self> {
        let Some(snapshot) = config.snapshot_path.as_deref() else {
            return Self::load(config);
        };
        let fingerprint = SourceFingerprint::of(config)?;
        if snapshot.exists() {
            match Self::read_snapshot(snapshot) {
                Ok((stored, data)) if stored == fingerprint => {
                    debug!(path = %snapshot.display(), "loading reference snapshot");
                    return Ok(data);
                }
                Ok(_) => debug!(path = %snapshot.display(), "reference snapshot is stale"),
                Err(e) => {
                    warn!(path = %snapshot.display(), error = %e, "unreadable reference snapshot")
                }
            }
        }
        let data = Self::load(config)?;
        data.write_snapshot(&fingerprint, snapshot)?;
        debug!(path = %snapshot.display(), "reference snapshot written");
        Ok(data)
    }

    /// Parse the resources named by `config` and write a snapshot to `path`
    /// that `load_or_build` will accept while the resources are unchanged.
    pub fn build_snapshot<P: AsRef<Path>>(config: &Config, path: P) -> Result<Self> {
        let fingerprint = SourceFingerprint::of(config)?;
        let data = Self::load(config)?;
        data.write_snapshot(&fingerprint, path.as_ref())?;
        Ok(data)
    }

    fn write_snapshot(&self, fingerprint: &SourceFingerprint, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(SNAPSHOT_MAGIC)?;
        bincode::serialize_into(&mut writer, &(fingerprint, self))?;
        writer.flush()?;
        Ok(())
    }

    fn read_snapshot(path: &Path) -> Result<(SourceFingerprint, Self)> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != SNAPSHOT_MAGIC {
            let err = io::Error::new(io::ErrorKind::InvalidData, "not a reference snapshot");
            return Err(err.into());
        }
        Ok(bincode::deserialize_from(reader)?)
    }

    /// Save the registry to a file using bincode serialization.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Load a registry from a bincode file produced by `save_bincode`.
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let data: Self = bincode::deserialize_from(reader)?;
        Ok(data)
    }
}
