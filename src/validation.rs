//! Local checks run before write-path submissions. A failure blocks the
//! submission without any network call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{lenient_number, lenient_string};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{spare_code}: Quantity Mismatch")]
    QuantityMismatch { spare_code: String },

    #[error("{}", .messages.join("\n"))]
    MissingFields {
        messages: Vec<String>,
        fields: Vec<&'static str>,
    },
}

/// One spare line of a GRC return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnRow {
    #[serde(deserialize_with = "lenient_string")]
    pub spare_code: String,
    #[serde(deserialize_with = "lenient_number")]
    pub good_qty: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub defective_qty: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub actual_pending_qty: f64,
}

/// Returned goods plus defectives may not exceed what is pending.
/// Reports the first offending row.
pub fn validate_return_quantities(rows: &[ReturnRow]) -> Result<(), ValidationError> {
    match rows
        .iter()
        .find(|r| r.good_qty + r.defective_qty > r.actual_pending_qty)
    {
        Some(row) => Err(ValidationError::QuantityMismatch {
            spare_code: row.spare_code.clone(),
        }),
        None => Ok(()),
    }
}

/// RFR generation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateRfrForm {
    pub product_division: Option<String>,
    pub rfr_type: Option<String>,
    pub product_type: Option<String>,
    pub rfr_number: Option<String>,
}

pub fn validate_generate_rfr(form: &GenerateRfrForm) -> Result<(), ValidationError> {
    let required: [(&'static str, &Option<String>, &str); 4] = [
        ("product_division", &form.product_division, "Division is required"),
        ("rfr_type", &form.rfr_type, "RFR Type is required"),
        ("product_type", &form.product_type, "Product Type is required"),
        ("rfr_number", &form.rfr_number, "RFR Number is required"),
    ];

    let mut messages = Vec::new();
    let mut fields = Vec::new();
    for (field, value, message) in required {
        let present = value.as_deref().is_some_and(|v| !v.trim().is_empty());
        if !present {
            messages.push(message.to_string());
            fields.push(field);
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { messages, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<ReturnRow> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_quantities_within_pending() {
        let rows = rows(json!([
            {"spare_code": "SP-1", "good_qty": 2, "defective_qty": 1, "actual_pending_qty": 3},
            {"spare_code": "SP-2", "good_qty": "", "defective_qty": null, "actual_pending_qty": 0}
        ]));
        assert_eq!(validate_return_quantities(&rows), Ok(()));
    }

    #[test]
    fn test_first_mismatch_is_reported() {
        let rows = rows(json!([
            {"spare_code": "SP-1", "good_qty": 1, "actual_pending_qty": 5},
            {"spare_code": "SP-2", "good_qty": "4", "defective_qty": 2, "actual_pending_qty": "5"},
            {"spare_code": "SP-3", "good_qty": 9, "actual_pending_qty": 1}
        ]));
        let err = validate_return_quantities(&rows).unwrap_err();
        assert_eq!(err.to_string(), "SP-2: Quantity Mismatch");
    }

    #[test]
    fn test_non_numeric_quantities_count_as_zero() {
        let rows = rows(json!([
            {"spare_code": "SP-9", "good_qty": "many", "defective_qty": "1", "actual_pending_qty": "abc"}
        ]));
        assert_eq!(
            validate_return_quantities(&rows),
            Err(ValidationError::QuantityMismatch {
                spare_code: "SP-9".to_string()
            })
        );
    }

    #[test]
    fn test_rfr_form_complete() {
        let form = GenerateRfrForm {
            product_division: Some("FANS".into()),
            rfr_type: Some("REPLACEMENT".into()),
            product_type: Some("CEILING".into()),
            rfr_number: Some("RFR-001".into()),
        };
        assert_eq!(validate_generate_rfr(&form), Ok(()));
    }

    #[test]
    fn test_rfr_form_missing_fields_in_order() {
        let form = GenerateRfrForm {
            product_division: Some("FANS".into()),
            rfr_type: Some("  ".into()),
            ..GenerateRfrForm::default()
        };
        match validate_generate_rfr(&form).unwrap_err() {
            ValidationError::MissingFields { messages, fields } => {
                assert_eq!(
                    messages,
                    vec![
                        "RFR Type is required",
                        "Product Type is required",
                        "RFR Number is required"
                    ]
                );
                assert_eq!(fields, vec!["rfr_type", "product_type", "rfr_number"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
