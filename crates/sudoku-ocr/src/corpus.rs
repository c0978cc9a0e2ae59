//! Labelled sample corpus on disk: `<root>/<digit>/<image files>`.

use crate::raster::load_pixel_grid;
use std::fs;
use std::path::{Path, PathBuf};
use sudoku_ocr_core::DEFAULT_INK_THRESHOLD;
use sudoku_ocr_knn::{BuildReport, Digit, ReferenceSet, ReferenceSetBuilder};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum CorpusError {
    #[error("corpus root {0} is not a directory")]
    MissingRoot(PathBuf),
    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Regular files directly inside `dir`, sorted by file name.
///
/// Entries that cannot be read are recorded on `builder` as skipped samples.
fn sample_files(
    dir: &Path,
    digit: Digit,
    builder: &mut ReferenceSetBuilder,
) -> Result<Vec<PathBuf>, CorpusError> {
    let entries = fs::read_dir(dir).map_err(|source| CorpusError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(collect_files(
        dir,
        digit,
        entries.map(|e| e.map(|e| e.path())),
        builder,
    ))
}

fn collect_files(
    dir: &Path,
    digit: Digit,
    entries: impl Iterator<Item = std::io::Result<PathBuf>>,
    builder: &mut ReferenceSetBuilder,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(err) => builder.skip(digit, dir.display().to_string(), err),
        }
    }
    files.sort();
    files
}

/// Feed every sample under `root` into `builder`.
///
/// Labels are visited `1..=9` and files in name order, so the resulting
/// reference set is reproducible. A missing label directory only leaves that
/// label empty; an unreadable file is recorded as skipped.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(root = %root.display()))
)]
pub fn load_corpus(root: &Path, builder: &mut ReferenceSetBuilder) -> Result<(), CorpusError> {
    if !root.is_dir() {
        return Err(CorpusError::MissingRoot(root.to_path_buf()));
    }
    for digit in Digit::all() {
        builder.register_label(digit);
        let dir = root.join(digit.to_string());
        if !dir.is_dir() {
            log::warn!("no sample directory for digit {digit} at {}", dir.display());
            continue;
        }
        let files = sample_files(&dir, digit, builder)?;
        log::debug!("digit {digit}: {} candidate samples", files.len());
        for path in files {
            let source = path.display().to_string();
            match load_pixel_grid(&path) {
                Ok(image) => {
                    builder.add_sample_or_skip(digit, source, &image);
                }
                Err(err) => builder.skip(digit, source, err),
            }
        }
    }
    Ok(())
}

/// Build a reference set from a corpus directory.
pub fn build_reference_from_dir(
    root: impl AsRef<Path>,
    ink_threshold: u8,
) -> Result<(ReferenceSet, BuildReport), CorpusError> {
    let mut builder = ReferenceSetBuilder::new(ink_threshold);
    load_corpus(root.as_ref(), &mut builder)?;
    Ok(builder.build())
}

/// [`build_reference_from_dir`] with the default ink threshold.
pub fn build_reference_default(
    root: impl AsRef<Path>,
) -> Result<(ReferenceSet, BuildReport), CorpusError> {
    build_reference_from_dir(root, DEFAULT_INK_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn bar_image(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, _| {
            if x >= w / 2 - 1 && x <= w / 2 + 1 {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_reference_default(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CorpusError::MissingRoot(_)));
    }

    #[test]
    fn loads_labels_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let ones = dir.path().join("1");
        fs::create_dir(&ones).unwrap();
        bar_image(10, 20).save(ones.join("b.png")).unwrap();
        bar_image(12, 24).save(ones.join("a.png")).unwrap();
        fs::write(ones.join("c.png"), b"garbage").unwrap();
        GrayImage::from_pixel(8, 8, Luma([255]))
            .save(ones.join("d.png"))
            .unwrap();
        fs::create_dir(dir.path().join("7")).unwrap();

        let (reference, report) = build_reference_default(dir.path()).unwrap();
        assert_eq!(reference.samples(Digit::new(1).unwrap()).len(), 2);
        assert_eq!(reference.labels().count(), 9);
        assert_eq!(report.total_accepted(), 2);

        let skipped: Vec<String> = report
            .skipped
            .iter()
            .map(|s| {
                Path::new(&s.source)
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(skipped, vec!["c.png", "d.png"]);
    }

    #[test]
    fn unreadable_entries_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.png");
        fs::write(&good, b"x").unwrap();
        let entries = vec![
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "entry vanished",
            )),
            Ok(dir.path().join("missing.png")),
            Ok(good.clone()),
        ];

        let digit = Digit::new(4).unwrap();
        let mut builder = ReferenceSetBuilder::default();
        let files = collect_files(dir.path(), digit, entries.into_iter(), &mut builder);
        assert_eq!(files, vec![good]);

        let (_, report) = builder.build();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].digit, digit);
        assert!(report.skipped[0].reason.contains("entry vanished"));
    }
}
