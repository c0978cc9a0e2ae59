//! Digit reference sets and nearest-neighbour classification.
//!
//! A [`ReferenceSet`] is built offline from labelled single-digit images with
//! [`ReferenceSetBuilder`], persisted as JSON, and loaded read-only at
//! recognition time. [`KnnClassifier`] borrows it and assigns a label to each
//! query [`FeatureVector`](sudoku_ocr_core::FeatureVector) by majority vote.
//!
//! ```
//! use sudoku_ocr_core::PixelGrid;
//! use sudoku_ocr_knn::{Digit, KnnClassifier, ReferenceSetBuilder, sample_features};
//!
//! let one = PixelGrid::from_fn(20, 20, |x, _| if (8..12).contains(&x) { 0 } else { 255 }).unwrap();
//! let mut builder = ReferenceSetBuilder::default();
//! builder.add_sample(Digit::new(1).unwrap(), &one).unwrap();
//! let (reference, _report) = builder.build();
//!
//! let knn = KnnClassifier::new(&reference, 10).unwrap();
//! let query = sample_features(&one, 128).unwrap();
//! assert_eq!(knn.classify(&query).unwrap().digit.get(), 1);
//! ```

mod builder;
mod classifier;
mod digit;
mod reference;

pub use builder::{sample_features, BuildReport, ReferenceSetBuilder, SkippedSample};
pub use classifier::{Classification, ClassifyError, KnnClassifier, Neighbor, DEFAULT_K};
pub use digit::{Digit, DigitError};
pub use reference::{ReferenceIoError, ReferenceSet, REFERENCE_FORMAT_VERSION};
