//! Complaint status bar segments and the hover tooltip.

use serde::Serialize;

use super::reveal::RevealPhase;
use crate::types::ComplaintStatusRow;

/// Tooltip position offset from the pointer, in pixels.
pub const POINTER_OFFSET: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Segment {
    /// `Y`, animated first.
    Completed,
    /// `N`, animated second.
    Pending,
}

impl Segment {
    pub fn label(&self) -> &'static str {
        match self {
            Segment::Completed => "Completed",
            Segment::Pending => "Pending",
        }
    }
}

/// `value` as a percentage of `value + other`; 0 when the total is not positive.
/// Negative counts are treated as 0.
pub fn share(value: i64, other: i64) -> f64 {
    let (value, other) = (value.max(0), other.max(0));
    let total = value.saturating_add(other);
    if total <= 0 {
        return 0.0;
    }
    value as f64 / total as f64 * 100.0
}

pub fn format_percentage(percentage: f64) -> String {
    format!("{:.1}%", percentage)
}

/// One stacked horizontal bar of the complaint status chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBar {
    pub division: String,
    pub completed: i64,
    pub pending: i64,
    pub completed_percentage: f64,
    pub pending_percentage: f64,
}

impl StatusBar {
    pub fn from_row(row: &ComplaintStatusRow) -> Self {
        Self {
            division: row.division.clone(),
            completed: row.y,
            pending: row.n,
            completed_percentage: share(row.y, row.n),
            pending_percentage: share(row.n, row.y),
        }
    }

    pub fn count(&self, segment: Segment) -> i64 {
        match segment {
            Segment::Completed => self.completed,
            Segment::Pending => self.pending,
        }
    }

    pub fn percentage(&self, segment: Segment) -> f64 {
        match segment {
            Segment::Completed => self.completed_percentage,
            Segment::Pending => self.pending_percentage,
        }
    }

    /// Rendered segment widths (percent of the bar) at the given reveal phase.
    pub fn widths_at(&self, phase: RevealPhase) -> (f64, f64) {
        match phase {
            RevealPhase::Idle => (0.0, 0.0),
            RevealPhase::Primary => (self.completed_percentage, 0.0),
            RevealPhase::Secondary => (self.completed_percentage, self.pending_percentage),
        }
    }
}

pub fn status_bars(rows: &[ComplaintStatusRow]) -> Vec<StatusBar> {
    rows.iter().map(StatusBar::from_row).collect()
}

/// Floating tooltip contents and position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub label: &'static str,
    pub percentage: String,
    pub count: i64,
    pub x: f64,
    pub y: f64,
}

/// Hover state of one chart. At most one tooltip is visible.
#[derive(Debug, Clone, Default)]
pub struct TooltipState {
    current: Option<Tooltip>,
}

impl TooltipState {
    pub fn pointer_over(&mut self, bar: &StatusBar, segment: Segment, pointer_x: f64, pointer_y: f64) {
        self.current = Some(Tooltip {
            label: segment.label(),
            percentage: format_percentage(bar.percentage(segment)),
            count: bar.count(segment),
            x: pointer_x + POINTER_OFFSET,
            y: pointer_y + POINTER_OFFSET,
        });
    }

    pub fn pointer_out(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Tooltip> {
        self.current.as_ref()
    }
}
