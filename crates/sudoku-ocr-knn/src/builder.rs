//! Offline construction of a [`ReferenceSet`] from labelled sample images.

use crate::{Digit, ReferenceSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use sudoku_ocr_core::{
    binarize, extract_features, shrink_to_content, FeatureVector, InputError, PixelGrid,
    DEFAULT_INK_THRESHOLD,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Sample that did not make it into the reference set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedSample {
    pub digit: Digit,
    /// Caller-supplied identifier, usually a file path.
    pub source: String,
    pub reason: String,
}

/// Summary of a finished build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Accepted vectors per label (labels with zero samples included).
    pub accepted: BTreeMap<Digit, usize>,
    pub skipped: Vec<SkippedSample>,
}

impl BuildReport {
    pub fn total_accepted(&self) -> usize {
        self.accepted.values().sum()
    }
}

/// Descriptor of a pre-isolated single-digit sample.
///
/// The sample is binarized and shrunk to its content with no frame
/// assumption; glyph isolation is not run.
pub fn sample_features(image: &PixelGrid, ink_threshold: u8) -> Result<FeatureVector, InputError> {
    let mask = binarize(image, ink_threshold);
    let rect = shrink_to_content(&mask)?;
    Ok(extract_features(&mask.crop(rect)?))
}

/// Accumulates feature vectors per label, then freezes them into a
/// [`ReferenceSet`].
///
/// Bad samples are logged and skipped; they never abort the build.
#[derive(Debug)]
pub struct ReferenceSetBuilder {
    ink_threshold: u8,
    labels: BTreeMap<Digit, Vec<FeatureVector>>,
    skipped: Vec<SkippedSample>,
}

impl Default for ReferenceSetBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_INK_THRESHOLD)
    }
}

impl ReferenceSetBuilder {
    pub fn new(ink_threshold: u8) -> Self {
        Self {
            ink_threshold,
            labels: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }

    /// Make sure `digit` appears in the output even if no sample is accepted.
    pub fn register_label(&mut self, digit: Digit) {
        self.labels.entry(digit).or_default();
    }

    /// Extract and store the descriptor of one sample.
    pub fn add_sample(
        &mut self,
        digit: Digit,
        image: &PixelGrid,
    ) -> Result<&FeatureVector, InputError> {
        let features = sample_features(image, self.ink_threshold)?;
        let bucket = self.labels.entry(digit).or_default();
        bucket.push(features);
        Ok(&bucket[bucket.len() - 1])
    }

    /// Like [`add_sample`](Self::add_sample), but a failure is recorded as a
    /// skipped sample instead of being returned. Returns `true` if accepted.
    pub fn add_sample_or_skip(
        &mut self,
        digit: Digit,
        source: impl Into<String>,
        image: &PixelGrid,
    ) -> bool {
        match self.add_sample(digit, image) {
            Ok(_) => true,
            Err(err) => {
                self.skip(digit, source, err);
                false
            }
        }
    }

    /// Record a sample that could not even be read.
    pub fn skip(&mut self, digit: Digit, source: impl Into<String>, reason: impl fmt::Display) {
        self.register_label(digit);
        let sample = SkippedSample {
            digit,
            source: source.into(),
            reason: reason.to_string(),
        };
        log::warn!(
            "skipping sample {} for digit {}: {}",
            sample.source,
            digit,
            sample.reason
        );
        self.skipped.push(sample);
    }

    /// Freeze the accumulated vectors.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
    pub fn build(self) -> (ReferenceSet, BuildReport) {
        let report = BuildReport {
            accepted: self.labels.iter().map(|(&d, v)| (d, v.len())).collect(),
            skipped: self.skipped,
        };
        for (digit, n) in &report.accepted {
            if *n == 0 {
                log::warn!("digit {digit} has no reference samples");
            }
        }
        log::info!(
            "reference set built: {} vectors, {} skipped",
            report.total_accepted(),
            report.skipped.len()
        );
        (ReferenceSet::from_labels(self.labels), report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn digit(v: u8) -> Digit {
        Digit::new(v).unwrap()
    }

    /// White canvas with a dark bar at `x0..x1, y0..y1`.
    fn bar(w: usize, h: usize, x0: usize, x1: usize, y0: usize, y1: usize) -> PixelGrid {
        PixelGrid::from_fn(w, h, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                20
            } else {
                240
            }
        })
        .unwrap()
    }

    #[test]
    fn sample_features_ignore_surrounding_margin() {
        let tight = bar(12, 30, 0, 12, 0, 30);
        let padded = bar(40, 50, 10, 22, 7, 37);
        let a = sample_features(&tight, DEFAULT_INK_THRESHOLD).unwrap();
        let b = sample_features(&padded, DEFAULT_INK_THRESHOLD).unwrap();
        assert_eq!(a, b);
        assert_relative_eq!(a.global_mean(), 1.0);
    }

    #[test]
    fn blank_sample_is_skipped_not_fatal() {
        let mut builder = ReferenceSetBuilder::default();
        assert!(builder.add_sample_or_skip(digit(1), "one.png", &bar(20, 20, 8, 12, 2, 18)));
        assert!(!builder.add_sample_or_skip(
            digit(1),
            "blank.png",
            &PixelGrid::filled(20, 20, 255).unwrap()
        ));
        builder.skip(digit(4), "broken.png", "not an image");

        let (reference, report) = builder.build();
        assert_eq!(reference.len(), 1);
        assert_eq!(reference.samples(digit(1)).len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.accepted.get(&digit(4)), Some(&0));
        assert_eq!(report.total_accepted(), 1);
    }

    #[test]
    fn registered_labels_survive_without_samples() {
        let mut builder = ReferenceSetBuilder::default();
        for d in Digit::all() {
            builder.register_label(d);
        }
        let (reference, report) = builder.build();
        assert!(reference.is_empty());
        assert_eq!(reference.labels().count(), 9);
        assert_eq!(report.accepted.len(), 9);
    }
}
