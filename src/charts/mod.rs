//! Chart rendering logic, without any drawing.
//!
//! - `layout`: horizontal bar thickness and row gap for a fixed-height container
//! - `tooltip`: segment percentages and hover tooltip state
//! - `reveal`: two-phase entrance animation keyed by content fingerprint

pub mod layout;
pub mod reveal;
pub mod tooltip;

use serde::Serialize;

use crate::types::{ComplaintTypeSlice, DivisionMetric};

/// GRC division bars.
pub const GRC_PALETTE: [&str; 10] = [
    "#2563eb", "#22c55e", "#eab308", "#a21caf", "#ef4444", "#6366f1", "#ec4899", "#6b7280",
    "#f59e42", "#14b8a6",
];

/// Complaint-type pie slices.
pub const COMPLAINT_TYPE_PALETTE: [&str; 4] = ["#0d1d39ff", "#2ec693ff", "#f97316", "#ec4899"];

/// Colours for `count` series entries. Wraps around once the palette runs out.
pub fn palette_for(palette: &[&'static str], count: usize) -> Vec<&'static str> {
    palette.iter().copied().cycle().take(count).collect()
}

/// One labelled, coloured value of a bar or pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColoredDatum {
    pub label: String,
    pub value: i64,
    pub color: &'static str,
}

pub fn grc_bar_series(rows: &[DivisionMetric]) -> Vec<ColoredDatum> {
    rows.iter()
        .zip(palette_for(&GRC_PALETTE, rows.len()))
        .map(|(row, color)| ColoredDatum {
            label: row.division.clone(),
            value: row.count,
            color,
        })
        .collect()
}

pub fn complaint_type_series(slices: &[ComplaintTypeSlice]) -> Vec<ColoredDatum> {
    slices
        .iter()
        .zip(palette_for(&COMPLAINT_TYPE_PALETTE, slices.len()))
        .map(|(slice, color)| ColoredDatum {
            label: slice.kind.clone(),
            value: slice.count,
            color,
        })
        .collect()
}
