//! Labelled reference vectors and their on-disk form.

use crate::Digit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use sudoku_ocr_core::FeatureVector;

/// Version tag written into every saved reference set.
pub const REFERENCE_FORMAT_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ReferenceIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("unsupported reference format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Feature vectors grouped by digit.
///
/// Labels iterate in ascending order and vectors keep their insertion order,
/// which fixes the tie-breaking order used by the classifier. The set is
/// immutable once built; share it by reference between readers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferenceSet {
    labels: BTreeMap<Digit, Vec<FeatureVector>>,
}

#[derive(Serialize)]
struct ReferenceFileRef<'a> {
    format_version: u32,
    labels: &'a BTreeMap<Digit, Vec<FeatureVector>>,
}

#[derive(Deserialize)]
struct ReferenceFile {
    format_version: u32,
    labels: BTreeMap<Digit, Vec<FeatureVector>>,
}

impl ReferenceSet {
    pub(crate) fn from_labels(labels: BTreeMap<Digit, Vec<FeatureVector>>) -> Self {
        Self { labels }
    }

    /// Total number of reference vectors over all labels.
    pub fn len(&self) -> usize {
        self.labels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels present in the set, including ones with no vectors.
    pub fn labels(&self) -> impl Iterator<Item = Digit> + '_ {
        self.labels.keys().copied()
    }

    /// Vectors recorded for `digit`, empty if none.
    pub fn samples(&self, digit: Digit) -> &[FeatureVector] {
        self.labels.get(&digit).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Vector count per label.
    pub fn counts(&self) -> BTreeMap<Digit, usize> {
        self.labels.iter().map(|(&d, v)| (d, v.len())).collect()
    }

    /// Every `(label, vector)` pair, labels ascending, vectors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Digit, &FeatureVector)> + '_ {
        self.labels
            .iter()
            .flat_map(|(&digit, vectors)| vectors.iter().map(move |v| (digit, v)))
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<(), ReferenceIoError> {
        let file = ReferenceFileRef {
            format_version: REFERENCE_FORMAT_VERSION,
            labels: &self.labels,
        };
        serde_json::to_writer(writer, &file)?;
        Ok(())
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ReferenceIoError> {
        let file: ReferenceFile = serde_json::from_reader(reader)?;
        if file.format_version != REFERENCE_FORMAT_VERSION {
            return Err(ReferenceIoError::UnsupportedVersion {
                found: file.format_version,
                expected: REFERENCE_FORMAT_VERSION,
            });
        }
        Ok(Self {
            labels: file.labels,
        })
    }

    /// Write the set as JSON, replacing `path` atomically.
    ///
    /// The data goes to a temporary file next to `path` which is then renamed
    /// over it, so readers never observe a partially written model.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ReferenceIoError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.to_writer(&mut writer)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        log::debug!("saved {} reference vectors to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReferenceIoError> {
        let path = path.as_ref();
        let set = Self::from_reader(BufReader::new(File::open(path)?))?;
        log::debug!("loaded {} reference vectors from {}", set.len(), path.display());
        Ok(set)
    }
}

impl FromIterator<(Digit, FeatureVector)> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = (Digit, FeatureVector)>>(iter: I) -> Self {
        let mut labels: BTreeMap<Digit, Vec<FeatureVector>> = BTreeMap::new();
        for (digit, v) in iter {
            labels.entry(digit).or_default().push(v);
        }
        Self { labels }
    }
}
