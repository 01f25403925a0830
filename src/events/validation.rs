//! Cross-field consistency rules for event submissions
//!
//! Field-level constraints (presence, non-negative prices) are enforced by
//! the `validator` derive on [`EventInput`]; the rules here check the
//! relationships between fields that single-field annotations cannot
//! express.

use serde::Serialize;
use validator::Validate;

use super::EventInput;

pub const OBJECT_NAME: &str = "eventInput";

/// One rejected aspect of a submission
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub object_name: String,
    pub field: String,
    pub code: String,
    pub default_message: String,
}

impl ValidationIssue {
    fn new(field: &str, code: &str, default_message: impl Into<String>) -> Self {
        Self {
            object_name: OBJECT_NAME.to_string(),
            field: field.to_string(),
            code: code.to_string(),
            default_message: default_message.into(),
        }
    }
}

/// Validate a submission, returning every issue found
///
/// Field-level failures from the derive run first, then the domain rules:
///
/// - `wrongPrices` when a non-zero maxPrice is below basePrice
///   (maxPrice == 0 means uncapped and always passes)
/// - `wrongDateTime` when the event ends before it begins, before
///   enrollment closes, or before enrollment opens
/// - `wrongDateTime` when the enrollment window closes before it opens
///
/// Issues are sorted by field so identical inputs always report in the
/// same order.
pub fn validate_input(input: &EventInput) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Err(errors) = input.validate() {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| field.to_string());
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = error
                    .message
                    .as_deref()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{field} is invalid"));
                issues.push(ValidationIssue::new(&field, &error.code, message));
            }
        }
    }

    if input.max_price != 0 && input.base_price > input.max_price {
        issues.push(ValidationIssue::new(
            "basePrice",
            "wrongPrices",
            format!(
                "basePrice {} must not exceed maxPrice {}",
                input.base_price, input.max_price
            ),
        ));
    }

    let end = input.end_event_date_time;
    if end < input.begin_event_date_time
        || end < input.close_enrollment_date_time
        || end < input.begin_enrollment_date_time
    {
        issues.push(ValidationIssue::new(
            "endEventDateTime",
            "wrongDateTime",
            format!("endEventDateTime {end} is earlier than a preceding date"),
        ));
    }

    if input.close_enrollment_date_time < input.begin_enrollment_date_time {
        issues.push(ValidationIssue::new(
            "closeEnrollmentDateTime",
            "wrongDateTime",
            format!(
                "closeEnrollmentDateTime {} is before beginEnrollmentDateTime {}",
                input.close_enrollment_date_time, input.begin_enrollment_date_time
            ),
        ));
    }

    issues
}
