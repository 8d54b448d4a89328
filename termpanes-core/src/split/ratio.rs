//! Ratio allocation for split groups
//!
//! Pure geometry for the split layout: normalizing ratio arrays,
//! turning ratios into pixel sizes, and converting a pointer-drag pixel
//! delta into a paired ratio adjustment. Keeping this free of any
//! widget toolkit allows property-based testing of the resize math.

/// Sizing parameters for a split container.
#[derive(Debug, Clone, Copy)]
pub struct SizingConfig {
    /// Minimum pixel size of a pane along the group axis.
    pub min_pane_size: f64,
    /// Pixel thickness of the sash rendered between adjacent panes.
    pub sash_size: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            min_pane_size: 120.0,
            sash_size: 4.0,
        }
    }
}

/// The pair of adjacent ratios produced by a drag step.
///
/// Both entries must be committed together by the caller — committing
/// only one would break the sum invariant beyond the allowed clamp
/// drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioPair {
    /// Index of the sash that was dragged (= index of the first pane).
    pub sash_index: usize,
    /// New ratio for the pane before the sash.
    pub first: f64,
    /// New ratio for the pane after the sash.
    pub second: f64,
}

/// Returns an equal split across `pane_count` panes.
///
/// Returns an empty vector for a count of zero.
#[must_use]
pub fn equal_split(pane_count: usize) -> Vec<f64> {
    if pane_count == 0 {
        return Vec::new();
    }
    vec![1.0 / pane_count as f64; pane_count]
}

/// Rescales a ratio array so its entries sum to 1.
///
/// A zero or non-finite sum (including the empty-after-removal case)
/// falls back to an equal split across all entries.
#[must_use]
pub fn normalize(ratios: &[f64]) -> Vec<f64> {
    let sum: f64 = ratios.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return equal_split(ratios.len());
    }
    ratios.iter().map(|r| r / sum).collect()
}

/// Returns the space left for panes after all sashes are accounted for.
///
/// `container - (pane_count - 1) * sash_size`, floored at zero.
#[must_use]
pub fn available_size(container: f64, pane_count: usize, config: &SizingConfig) -> f64 {
    let sashes = pane_count.saturating_sub(1) as f64;
    (container - sashes * config.sash_size).max(0.0)
}

/// Computes per-pane pixel sizes from a container size and ratio array.
///
/// Each size is clamped up to `min_pane_size`, so under extreme ratios
/// the sizes can sum to more than the available space. That overshoot
/// is accepted rather than corrected; the view clips the overflow and
/// the next renormalizing mutation restores sane ratios.
///
/// A ratio array whose length does not match `pane_count` is treated as
/// stale and replaced by an equal split for this computation.
#[must_use]
pub fn compute_sizes(
    container: f64,
    ratios: &[f64],
    pane_count: usize,
    config: &SizingConfig,
) -> Vec<f64> {
    let available = available_size(container, pane_count, config);
    let regenerated;
    let effective = if ratios.len() == pane_count {
        ratios
    } else {
        regenerated = equal_split(pane_count);
        &regenerated
    };
    effective
        .iter()
        .map(|r| (available * r).max(config.min_pane_size))
        .collect()
}

/// Converts a pointer-drag pixel delta on a sash into new adjacent ratios.
///
/// The delta is shared between the panes on either side of the sash:
/// the first grows by `pixel_delta / available` and the second shrinks
/// by the same amount. Both candidates are clamped independently to the
/// minimum ratio — any amount absorbed by clamping on one side is *not*
/// transferred back to the other, so the pair's sum can drift slightly
/// under heavy clamping.
///
/// Returns `None` for an out-of-range sash index or a degenerate
/// container.
#[must_use]
pub fn drag_delta(
    ratios: &[f64],
    sash_index: usize,
    pixel_delta: f64,
    container: f64,
    config: &SizingConfig,
) -> Option<RatioPair> {
    if sash_index + 1 >= ratios.len() {
        return None;
    }
    let available = available_size(container, ratios.len(), config);
    if available <= 0.0 {
        return None;
    }

    let delta = pixel_delta / available;
    let min_ratio = config.min_pane_size / available;

    Some(RatioPair {
        sash_index,
        first: (ratios[sash_index] + delta).max(min_ratio),
        second: (ratios[sash_index + 1] - delta).max(min_ratio),
    })
}
