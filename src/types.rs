//! Shared dashboard types.
//!
//! Payload structs mirror the backend's snake_case JSON and are deliberately
//! forgiving: every field defaults, per-company maps tolerate the wrong shape,
//! and numeric fields coerce garbage to zero (see `util`). View-model structs
//! that the frontend consumes serialize as camelCase.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::{
    lenient_company_rows, lenient_company_totals, lenient_count, lenient_section, lenient_string,
};

/// Company scope: both the filter value and the tag carried by each action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Company {
    #[default]
    All,
    Cgcel,
    Cgpisl,
}

impl Company {
    /// Sub-companies that own data, in merge order.
    pub const SOURCES: [Company; 2] = [Company::Cgcel, Company::Cgpisl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Cgcel => "CGCEL",
            Self::Cgpisl => "CGPISL",
        }
    }

    /// Whether something tagged with `self` is visible while `filter` is active.
    pub fn visible_under(&self, filter: Company) -> bool {
        *self == filter || *self == Company::All
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Company {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "CGCEL" => Ok(Self::Cgcel),
            "CGPISL" => Ok(Self::Cgpisl),
            other => Err(format!("Unknown company '{}'. Expected ALL, CGCEL or CGPISL", other)),
        }
    }
}

/// Role of the signed-in user, as carried by the auth context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
    Technician,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            "TECHNICIAN" => Ok(Self::Technician),
            other => Err(format!("Unknown role '{}'. Expected ADMIN, USER or TECHNICIAN", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Menu catalog
// ---------------------------------------------------------------------------

/// One navigable action inside a menu section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntry {
    pub label: String,
    pub path: String,
    pub company: Company,
    /// `None` means "show"; only an explicit `false` hides the dashboard shortcut.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_in_dashboard: Option<bool>,
}

impl ActionEntry {
    pub fn new(label: &str, path: &str, company: Company) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
            company,
            show_in_dashboard: None,
        }
    }

    pub fn hidden_from_dashboard(mut self) -> Self {
        self.show_in_dashboard = Some(false);
        self
    }

    pub fn shown_in_dashboard(&self) -> bool {
        self.show_in_dashboard != Some(false)
    }
}

/// A business area of the dashboard (complaint, stock, GRC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub key: String,
    pub title: String,
    pub icon: String,
    pub bg_color: String,
    pub actions: Vec<ActionEntry>,
}

/// A card ready to render: the section with its actions filtered for the
/// active company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredCard {
    pub key: String,
    pub title: String,
    pub icon: String,
    pub bg_color: String,
    pub actions: Vec<ActionEntry>,
    pub dashboard_actions: Vec<ActionEntry>,
}

// ---------------------------------------------------------------------------
// Chart rows
// ---------------------------------------------------------------------------

/// Count of records for one product division.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionMetric {
    #[serde(default, deserialize_with = "lenient_string")]
    pub division: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: i64,
}

impl DivisionMetric {
    pub fn new(division: &str, count: i64) -> Self {
        Self {
            division: division.to_string(),
            count,
        }
    }
}

/// Resolved (`Y`) and pending (`N`) complaint counts for one division.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintStatusRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub division: String,
    #[serde(rename = "Y", default, deserialize_with = "lenient_count")]
    pub y: i64,
    #[serde(rename = "N", default, deserialize_with = "lenient_count")]
    pub n: i64,
}

impl ComplaintStatusRow {
    pub fn new(division: &str, y: i64, n: i64) -> Self {
        Self {
            division: division.to_string(),
            y,
            n,
        }
    }
}

/// Complaint count for one complaint type (SERVICE, INSTALL, SALE...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintTypeSlice {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: i64,
}

impl ComplaintTypeSlice {
    pub fn new(kind: &str, count: i64) -> Self {
        Self {
            kind: kind.to_string(),
            count,
        }
    }
}

/// Per-company row arrays keyed by company code.
pub type CompanyRows<T> = HashMap<String, Vec<T>>;

/// Per-company scalar totals keyed by company code.
pub type CompanyTotals = HashMap<String, i64>;

// ---------------------------------------------------------------------------
// Dashboard payload (GET menu/dashboard)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardPayload {
    #[serde(deserialize_with = "lenient_section")]
    pub complaint: ComplaintSection,
    #[serde(deserialize_with = "lenient_section")]
    pub stock: StockSection,
    #[serde(deserialize_with = "lenient_section")]
    pub grc: GrcSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplaintSection {
    #[serde(deserialize_with = "lenient_company_rows")]
    pub division_wise_status: CompanyRows<ComplaintStatusRow>,
    #[serde(deserialize_with = "lenient_company_rows")]
    pub complaint_type: CompanyRows<ComplaintTypeSlice>,
    #[serde(deserialize_with = "lenient_company_totals")]
    pub crm_open_complaints: CompanyTotals,
    #[serde(deserialize_with = "lenient_company_totals")]
    pub crm_escalation_complaints: CompanyTotals,
    #[serde(deserialize_with = "lenient_company_totals")]
    pub md_escalation_complaints: CompanyTotals,
    #[serde(deserialize_with = "lenient_company_totals")]
    pub spare_pending_complaints: CompanyTotals,
    #[serde(deserialize_with = "lenient_company_totals")]
    pub high_priority_complaints: CompanyTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockSection {
    #[serde(deserialize_with = "lenient_company_rows")]
    pub division_wise_donut: CompanyRows<DivisionMetric>,
    #[serde(deserialize_with = "lenient_company_totals")]
    pub number_of_items_in_stock: CompanyTotals,
    #[serde(deserialize_with = "lenient_company_totals")]
    pub number_of_items_in_godown: CompanyTotals,
    #[serde(deserialize_with = "lenient_company_totals")]
    pub number_of_items_issued_in_advance: CompanyTotals,
    #[serde(deserialize_with = "lenient_company_totals")]
    pub number_of_items_under_process: CompanyTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrcSection {
    #[serde(deserialize_with = "lenient_company_rows")]
    pub division_wise_donut: CompanyRows<DivisionMetric>,
}

// ---------------------------------------------------------------------------
// Notifications and landing overlays
// ---------------------------------------------------------------------------

/// An unresolved task assigned to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub details: String,
}

/// Unresolved notification count shown on the admin bell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminNotificationCount {
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub details: String,
}

/// Celebration data handed over by the login screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingState {
    pub birthday_names: Vec<String>,
    pub holiday: Option<Holiday>,
}
