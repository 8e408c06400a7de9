//! Row-band partitioning for parallel frame rendering.
//!
//! The image is split into horizontal bands of whole rows, one per worker.
//! Bands never overlap, so each can be written without synchronization.

use std::ops::Range;

/// A contiguous run of image rows rendered by one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    /// Index of this band in top-to-bottom order
    pub index: usize,
    /// Rows covered, `start..end`
    pub rows: Range<usize>,
}

impl Band {
    /// Number of rows in this band.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Split `[0, height)` into `bands` contiguous ranges.
///
/// Every band gets `height / bands` rows and the last one absorbs the
/// remainder. Bands that would be empty (more bands than rows) are
/// omitted, so the result may be shorter than `bands`.
pub fn partition_rows(height: usize, bands: usize) -> Vec<Band> {
    let bands = bands.max(1);
    let rows_per_band = height / bands;

    (0..bands)
        .filter_map(|i| {
            let start = i * rows_per_band;
            let end = if i == bands - 1 { height } else { start + rows_per_band };
            (start < end).then_some(start..end)
        })
        .enumerate()
        .map(|(index, rows)| Band { index, rows })
        .collect()
}
