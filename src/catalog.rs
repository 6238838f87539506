//! Menu catalog and card composition.
//!
//! The catalog is the single source for both the navigation bar and the
//! dashboard cards. It is built once and never mutated; cards are derived
//! from it on every filter change.

use std::sync::OnceLock;

use crate::types::{ActionEntry, Company, FilteredCard, MenuSection};

pub const COMPLAINT_CARD: &str = "complaint";
pub const STOCK_CARD: &str = "stock";
pub const GRC_CARD: &str = "grc";

/// The process-wide menu catalog, in card layout order.
pub fn menu_catalog() -> &'static [MenuSection] {
    static CATALOG: OnceLock<Vec<MenuSection>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

fn build_catalog() -> Vec<MenuSection> {
    use Company::{All, Cgcel, Cgpisl};

    vec![
        MenuSection {
            key: COMPLAINT_CARD.to_string(),
            title: "Complaint Addressal".to_string(),
            icon: "exclamation-triangle".to_string(),
            bg_color: "#ffe4ec".to_string(),
            actions: vec![
                ActionEntry::new("Complaint Enquiry", "/ComplaintEnquiry", All),
                ActionEntry::new("Add New Complaint", "/CreateComplaint", All),
                ActionEntry::new("Update Complaint", "/UpdateComplaint", All),
                ActionEntry::new("Report Generation", "/ReportGeneration", All),
                ActionEntry::new("Upload Complaints", "/UploadComplaints", All),
                ActionEntry::new("Create RFR Record", "/CreateRFRRecord", Cgcel),
            ],
        },
        MenuSection {
            key: STOCK_CARD.to_string(),
            title: "Stock Maintenance".to_string(),
            icon: "boxes".to_string(),
            bg_color: "#f0f4f8".to_string(),
            actions: vec![
                ActionEntry::new("Upload CGCEL Stock", "/UploadCGCELStockRecords", Cgcel),
                ActionEntry::new("Upload Stock Records", "/UploadCGPISLStockRecords", Cgpisl),
                ActionEntry::new("View CGCEL Stock", "/ViewCGCELStockRecords", Cgcel),
                ActionEntry::new("View Stock Records", "/ViewCGPISLStockRecords", Cgpisl),
                ActionEntry::new("CGCEL Spare Indent", "/RaiseCGCELSpareIndent", Cgcel),
                ActionEntry::new("Raise Spare Indent", "/RaiseCGPISLSpareIndent", Cgpisl),
                ActionEntry::new("CGCEL Generate Indent", "/GenerateCGCELSpareIndent", Cgcel),
                ActionEntry::new("Generate Spare Indent", "/GenerateCGPISLSpareIndent", Cgpisl),
                ActionEntry::new("CGCEL Indent Details", "/IndentDetailsCGCEL", Cgcel),
                ActionEntry::new("Indent Details", "/IndentDetailsCGPISL", Cgpisl),
                ActionEntry::new("Update CGCEL Stock", "/UpdateCGCELStock", Cgcel),
            ],
        },
        MenuSection {
            key: GRC_CARD.to_string(),
            title: "Goods Returnable Challan".to_string(),
            icon: "file-alt".to_string(),
            bg_color: "#e7d7f8ff".to_string(),
            actions: vec![
                ActionEntry::new("Upload CGCEL GRC", "/UploadCGCELGRCRecords", Cgcel),
                ActionEntry::new("Upload GRC Records", "/UploadCGPISLGRCRecords", Cgpisl),
                ActionEntry::new("View CGCEL GRC", "/ViewCGCELGRCRecords", Cgcel),
                ActionEntry::new("View GRC Records", "/ViewCGPISLGRCRecords", Cgpisl),
                ActionEntry::new("CGCEL Spare Return", "/GRCCGCELSpareReturn", Cgcel),
                ActionEntry::new("Spare Return", "/GRCCGPISLSpareReturn", Cgpisl),
                ActionEntry::new("GRC CGCEL Enquiry", "/GRCCGCELEnquiry", Cgcel),
                ActionEntry::new("GRC Enquiry", "/GRCCGPISLEnquiry", Cgpisl),
            ],
        },
    ]
}

/// Derive the visible cards for `filter`.
///
/// An action is visible when it is tagged with the filter's company or with
/// `ALL`. Sections left without visible actions are dropped, and catalog
/// order is kept.
pub fn compose_cards(catalog: &[MenuSection], filter: Company) -> Vec<FilteredCard> {
    catalog
        .iter()
        .filter_map(|section| {
            let actions: Vec<ActionEntry> = section
                .actions
                .iter()
                .filter(|a| a.company.visible_under(filter))
                .cloned()
                .collect();
            if actions.is_empty() {
                return None;
            }
            let dashboard_actions = actions
                .iter()
                .filter(|a| a.shown_in_dashboard())
                .cloned()
                .collect();
            Some(FilteredCard {
                key: section.key.clone(),
                title: section.title.clone(),
                icon: section.icon.clone(),
                bg_color: section.bg_color.clone(),
                actions,
                dashboard_actions,
            })
        })
        .collect()
}
