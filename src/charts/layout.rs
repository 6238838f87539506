//! Horizontal bar sizing.
//!
//! Bars take 60% of their share of the container height, clamped to
//! `[MIN_BAR, MAX_BAR]`; whatever height is left is spread between rows as a
//! gap clamped to `[MIN_GAP, MAX_GAP]`.

use serde::Serialize;

pub const MIN_BAR: f64 = 18.0;
pub const MAX_BAR: f64 = 35.0;
pub const MIN_GAP: f64 = 2.0;
pub const MAX_GAP: f64 = 20.0;
pub const DEFAULT_CONTAINER_HEIGHT: f64 = 235.0;

const BAR_SHARE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarLayout {
    pub bar_thickness: f64,
    pub gap: f64,
}

/// Bar thickness and inter-row gap for `rows` bars in `container_height` pixels.
///
/// `rows == 0` is laid out as a single row. A non-finite or negative height is
/// treated as 0, which still yields clamped, non-negative values.
pub fn bar_layout(rows: usize, container_height: f64) -> BarLayout {
    let rows = rows.max(1);
    let height = if container_height.is_finite() {
        container_height.max(0.0)
    } else {
        0.0
    };

    let bar_thickness = (height / rows as f64 * BAR_SHARE).clamp(MIN_BAR, MAX_BAR);
    let gap = if rows > 1 {
        let remaining = height - bar_thickness * rows as f64;
        (remaining / (rows - 1) as f64).clamp(MIN_GAP, MAX_GAP)
    } else {
        0.0
    };

    BarLayout { bar_thickness, gap }
}
