//! Per-chart normalizers over the dashboard payload.
//!
//! Every division-wise, company-scoped dataset goes through the same two
//! rules: under `ALL` the CGCEL and CGPISL rows are concatenated and grouped
//! by key with summed metrics (first-seen order), under a single company that
//! company's rows are returned as-is. Scalar company totals follow the same
//! split. Zero-coercion of bad values already happened at deserialization, so
//! nothing here can fail.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{
    Company, CompanyRows, CompanyTotals, ComplaintStatusRow, ComplaintTypeSlice,
    DashboardPayload, DivisionMetric,
};

/// A row that can be merged with other rows sharing its key.
pub trait KeyedRow: Clone {
    fn key(&self) -> &str;
    fn absorb(&mut self, other: &Self);
}

impl KeyedRow for DivisionMetric {
    fn key(&self) -> &str {
        &self.division
    }

    fn absorb(&mut self, other: &Self) {
        self.count = self.count.saturating_add(other.count);
    }
}

impl KeyedRow for ComplaintStatusRow {
    fn key(&self) -> &str {
        &self.division
    }

    fn absorb(&mut self, other: &Self) {
        self.y = self.y.saturating_add(other.y);
        self.n = self.n.saturating_add(other.n);
    }
}

impl KeyedRow for ComplaintTypeSlice {
    fn key(&self) -> &str {
        &self.kind
    }

    fn absorb(&mut self, other: &Self) {
        self.count = self.count.saturating_add(other.count);
    }
}

/// Group rows by key, summing metrics. Output order is first-seen key order.
pub fn group_by_key<R: KeyedRow>(rows: impl IntoIterator<Item = R>) -> Vec<R> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<R> = Vec::new();
    for row in rows {
        match index.get(row.key()) {
            Some(&i) => merged[i].absorb(&row),
            None => {
                index.insert(row.key().to_string(), merged.len());
                merged.push(row);
            }
        }
    }
    merged
}

/// Rows for the active filter: merged across companies under `ALL`,
/// verbatim for a single company. Absent company keys count as empty.
pub fn company_rows<R: KeyedRow>(series: &CompanyRows<R>, filter: Company) -> Vec<R> {
    match filter {
        Company::All => group_by_key(
            Company::SOURCES
                .iter()
                .filter_map(|c| series.get(c.as_str()))
                .flatten()
                .cloned(),
        ),
        company => series.get(company.as_str()).cloned().unwrap_or_default(),
    }
}

/// Scalar total for the active filter; absent companies contribute 0.
pub fn company_total(totals: &CompanyTotals, filter: Company) -> i64 {
    let value_for = |c: Company| totals.get(c.as_str()).copied().unwrap_or(0);
    match filter {
        Company::All => Company::SOURCES
            .iter()
            .map(|c| value_for(*c))
            .fold(0, i64::saturating_add),
        company => value_for(company),
    }
}

/// Aggregate tiles shown next to the stock donut.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMeta {
    pub total_stock: i64,
    pub total_godown: i64,
    pub total_issued_in_advance: i64,
    pub total_under_process: i64,
}

/// Complaint headline counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintCounters {
    pub crm_open: i64,
    pub crm_escalation: i64,
    pub md_escalation: i64,
    pub spare_pending: i64,
    pub high_priority: i64,
}

pub fn stock_donut(payload: &DashboardPayload, filter: Company) -> Vec<DivisionMetric> {
    company_rows(&payload.stock.division_wise_donut, filter)
}

pub fn stock_meta(payload: &DashboardPayload, filter: Company) -> StockMeta {
    let stock = &payload.stock;
    StockMeta {
        total_stock: company_total(&stock.number_of_items_in_stock, filter),
        total_godown: company_total(&stock.number_of_items_in_godown, filter),
        total_issued_in_advance: company_total(&stock.number_of_items_issued_in_advance, filter),
        total_under_process: company_total(&stock.number_of_items_under_process, filter),
    }
}

/// Division status rows for the active filter (not yet chart-merged).
pub fn complaint_status(payload: &DashboardPayload, filter: Company) -> Vec<ComplaintStatusRow> {
    company_rows(&payload.complaint.division_wise_status, filter)
}

/// Chart-level merge: duplicate divisions collapse regardless of filter.
pub fn merge_status_rows(rows: Vec<ComplaintStatusRow>) -> Vec<ComplaintStatusRow> {
    group_by_key(rows)
}

pub fn complaint_types(payload: &DashboardPayload, filter: Company) -> Vec<ComplaintTypeSlice> {
    company_rows(&payload.complaint.complaint_type, filter)
}

pub fn complaint_counters(payload: &DashboardPayload, filter: Company) -> ComplaintCounters {
    let complaint = &payload.complaint;
    ComplaintCounters {
        crm_open: company_total(&complaint.crm_open_complaints, filter),
        crm_escalation: company_total(&complaint.crm_escalation_complaints, filter),
        md_escalation: company_total(&complaint.md_escalation_complaints, filter),
        spare_pending: company_total(&complaint.spare_pending_complaints, filter),
        high_priority: company_total(&complaint.high_priority_complaints, filter),
    }
}

pub fn grc_bars(payload: &DashboardPayload, filter: Company) -> Vec<DivisionMetric> {
    company_rows(&payload.grc.division_wise_donut, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> DashboardPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_all_merges_by_division_in_first_seen_order() {
        let p = payload(json!({"stock": {"division_wise_donut": {
            "CGCEL": [{"division": "FANS", "count": 3}],
            "CGPISL": [{"division": "FANS", "count": 5}, {"division": "PUMP", "count": 2}]
        }}}));
        assert_eq!(
            stock_donut(&p, Company::All),
            vec![DivisionMetric::new("FANS", 8), DivisionMetric::new("PUMP", 2)]
        );
    }

    #[test]
    fn test_missing_company_key_is_empty() {
        let p = payload(json!({"grc": {"division_wise_donut": {
            "CGCEL": [{"division": "X", "count": 1}]
        }}}));
        assert_eq!(grc_bars(&p, Company::All), vec![DivisionMetric::new("X", 1)]);
        assert!(grc_bars(&p, Company::Cgpisl).is_empty());
    }

    #[test]
    fn test_single_company_is_verbatim() {
        let p = payload(json!({"stock": {"division_wise_donut": {
            "CGCEL": [
                {"division": "FANS", "count": 1},
                {"division": "FANS", "count": 2},
                {"division": "PUMP"}
            ],
            "CGPISL": [{"division": "FANS", "count": 9}]
        }}}));
        assert_eq!(
            stock_donut(&p, Company::Cgcel),
            vec![
                DivisionMetric::new("FANS", 1),
                DivisionMetric::new("FANS", 2),
                DivisionMetric::new("PUMP", 0),
            ]
        );
    }

    #[test]
    fn test_status_rows_sum_y_and_n_independently() {
        let p = payload(json!({"complaint": {"division_wise_status": {
            "CGCEL": [{"division": "FANS", "Y": 10, "N": 5}, {"division": "MOTOR", "Y": 7}],
            "CGPISL": [{"division": "FANS", "N": 4}, {"division": "LIGHT", "Y": 6, "N": 1}]
        }}}));
        assert_eq!(
            complaint_status(&p, Company::All),
            vec![
                ComplaintStatusRow::new("FANS", 10, 9),
                ComplaintStatusRow::new("MOTOR", 7, 0),
                ComplaintStatusRow::new("LIGHT", 6, 1),
            ]
        );
    }

    #[test]
    fn test_merge_status_rows_collapses_duplicates() {
        let rows = vec![
            ComplaintStatusRow::new("FANS", 1, 1),
            ComplaintStatusRow::new("PUMP", 2, 0),
            ComplaintStatusRow::new("FANS", 3, 2),
        ];
        assert_eq!(
            merge_status_rows(rows),
            vec![
                ComplaintStatusRow::new("FANS", 4, 3),
                ComplaintStatusRow::new("PUMP", 2, 0),
            ]
        );
    }

    #[test]
    fn test_complaint_types_merge_by_type() {
        let p = payload(json!({"complaint": {"complaint_type": {
            "CGCEL": [{"type": "SERVICE", "count": 12}, {"type": "SALE", "count": 4}],
            "CGPISL": [{"type": "SERVICE", "count": 9}, {"type": "INSTALL", "count": 5}]
        }}}));
        assert_eq!(
            complaint_types(&p, Company::All),
            vec![
                ComplaintTypeSlice::new("SERVICE", 21),
                ComplaintTypeSlice::new("SALE", 4),
                ComplaintTypeSlice::new("INSTALL", 5),
            ]
        );
    }

    #[test]
    fn test_scalar_totals() {
        let p = payload(json!({"stock": {
            "number_of_items_in_stock": {"CGCEL": 10},
            "number_of_items_in_godown": {"CGCEL": 3, "CGPISL": 4},
            "number_of_items_issued_in_advance": {"CGPISL": "2"}
        }}));
        assert_eq!(
            stock_meta(&p, Company::All),
            StockMeta {
                total_stock: 10,
                total_godown: 7,
                total_issued_in_advance: 2,
                total_under_process: 0,
            }
        );
        assert_eq!(stock_meta(&p, Company::Cgpisl).total_stock, 0);
        assert_eq!(stock_meta(&p, Company::Cgcel).total_godown, 3);
    }

    #[test]
    fn test_complaint_counters() {
        let p = payload(json!({"complaint": {
            "crm_open_complaints": {"CGCEL": 5, "CGPISL": 3},
            "md_escalation_complaints": {"CGCEL": 1, "CGPISL": 2},
            "high_priority_complaints": {"CGCEL": 3, "CGPISL": 1}
        }}));
        let all = complaint_counters(&p, Company::All);
        assert_eq!(all.crm_open, 8);
        assert_eq!(all.md_escalation, 3);
        assert_eq!(all.crm_escalation, 0);
        assert_eq!(complaint_counters(&p, Company::Cgcel).high_priority, 3);
    }

    #[test]
    fn test_empty_payload_yields_empty_series() {
        let p = DashboardPayload::default();
        for filter in [Company::All, Company::Cgcel, Company::Cgpisl] {
            assert!(stock_donut(&p, filter).is_empty());
            assert!(complaint_status(&p, filter).is_empty());
            assert!(grc_bars(&p, filter).is_empty());
            assert_eq!(stock_meta(&p, filter), StockMeta::default());
        }
    }

    #[test]
    fn test_renormalizing_is_deterministic() {
        let p = payload(json!({"stock": {"division_wise_donut": {
            "CGCEL": [{"division": "B", "count": 1}, {"division": "A", "count": 2}],
            "CGPISL": [{"division": "C", "count": 3}, {"division": "A", "count": 4}]
        }}}));
        let first = stock_donut(&p, Company::All);
        let second = stock_donut(&p, Company::All);
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|r| r.division.as_str()).collect::<Vec<_>>(),
            vec!["B", "A", "C"]
        );
    }
}
