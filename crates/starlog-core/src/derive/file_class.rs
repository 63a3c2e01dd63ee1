//! File dimensionality and size-bucket derivation.

use crate::storage::models::{FileType, SizeLabel};

const BYTES_PER_PIXEL: f64 = 4.0;
const MB: f64 = 1_048_576.0;

/// Upper bucket bounds in MB, smallest-first. Buckets are left-open /
/// right-closed: `(0,1], (1,10], …, (1048576,10485760]`. These constants
/// are shared with the presentation layer's legend ordering.
const SIZE_BOUNDS_MB: [f64; 9] = [
    0.0,
    1.0,
    10.0,
    100.0,
    1024.0,
    10_240.0,
    102_400.0,
    1_048_576.0,
    10_485_760.0,
];

/// Classify image dimensions into a semantic file type. Strict `>1` tests,
/// checked most-specific-first so the four labels partition the
/// width>1 ∧ height>1 space. Anything without both width and height above 1
/// stays unclassified.
pub fn classify(width: u64, height: u64, depth: u64, stokes: u64) -> Option<FileType> {
    if width <= 1 || height <= 1 {
        return None;
    }
    match (depth > 1, stokes > 1) {
        (true, true) => Some(FileType::ThreeDimStokes),
        (false, true) => Some(FileType::TwoDimStokes),
        (true, false) => Some(FileType::ThreeDim),
        (false, false) => Some(FileType::TwoDim),
    }
}

/// Estimated in-memory size in MB assuming 4 bytes per pixel.
pub fn file_size_mb(width: u64, height: u64, depth: u64, stokes: u64) -> f64 {
    (width * height * depth * stokes) as f64 * BYTES_PER_PIXEL / MB
}

/// Map a size in MB to its bucket. Exactly 0 or beyond the last bound
/// yields no label.
pub fn size_bucket(size_mb: f64) -> Option<SizeLabel> {
    for (i, label) in SizeLabel::ALL.iter().enumerate() {
        if size_mb > SIZE_BOUNDS_MB[i] && size_mb <= SIZE_BOUNDS_MB[i + 1] {
            return Some(*label);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_precedence() {
        assert_eq!(classify(2, 2, 2, 2), Some(FileType::ThreeDimStokes));
        assert_eq!(classify(2, 2, 1, 2), Some(FileType::TwoDimStokes));
        assert_eq!(classify(2, 2, 2, 1), Some(FileType::ThreeDim));
        assert_eq!(classify(2, 2, 1, 1), Some(FileType::TwoDim));
    }

    #[test]
    fn test_classification_requires_both_spatial_axes() {
        assert_eq!(classify(1, 2, 2, 2), None);
        assert_eq!(classify(2, 1, 2, 2), None);
        assert_eq!(classify(1, 1, 1, 1), None);
    }

    #[test]
    fn test_partition_completeness() {
        // For every width>1 ∧ height>1 combination exactly one label applies.
        for depth in [1u64, 2, 100] {
            for stokes in [1u64, 2, 4] {
                assert!(classify(64, 64, depth, stokes).is_some());
            }
        }
    }

    #[test]
    fn test_size_boundaries_right_closed() {
        // Exactly 1.0 MB stays in the smallest bucket.
        assert_eq!(size_bucket(1.0), Some(SizeLabel::Below1Mb));
        assert_eq!(size_bucket(1.000_000_1), Some(SizeLabel::Mb1To10));
        assert_eq!(size_bucket(1024.0), Some(SizeLabel::Mb100To1Gb));
        assert_eq!(size_bucket(1024.1), Some(SizeLabel::Gb1To10));
    }

    #[test]
    fn test_size_out_of_range() {
        assert_eq!(size_bucket(0.0), None);
        assert_eq!(size_bucket(-1.0), None);
        assert_eq!(size_bucket(20_000_000.0), None);
    }

    #[test]
    fn test_worked_example_100x100() {
        // 100×100×1×1 → 2D, ≈0.038 MB → <1MB.
        assert_eq!(classify(100, 100, 1, 1), Some(FileType::TwoDim));
        let mb = file_size_mb(100, 100, 1, 1);
        assert!((mb - 0.0381).abs() < 0.001, "got {}", mb);
        assert_eq!(size_bucket(mb), Some(SizeLabel::Below1Mb));
    }
}
