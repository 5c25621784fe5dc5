//! Customization Engine
//!
//! Validates a customer's option selections against the groups attached to a
//! menu item, then prices the configured item.
//!
//! Both steps are pure: callers load the groups (with link overrides applied)
//! through `db::repository::customization::find_groups_for_item`.

mod calculator;
mod validator;

pub use calculator::*;
pub use validator::*;

use serde::Serialize;
use shared::error::{AppError, ErrorCode};

/// Upper bound on the quantity of a single PER_UNIT option
pub const MAX_OPTION_QUANTITY: i32 = 10;

/// One rule broken by a selection set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_id: Option<i64>,
    pub message: String,
}

impl Violation {
    fn option(option_id: i64, message: impl Into<String>) -> Self {
        Self {
            group_id: None,
            group_name: None,
            option_id: Some(option_id),
            message: message.into(),
        }
    }

    fn group(group_id: i64, group_name: &str, message: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id),
            group_name: Some(group_name.to_string()),
            option_id: None,
            message: message.into(),
        }
    }
}

/// Every violation found in one selection set
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", .violations.iter().map(|v| v.message.as_str()).collect::<Vec<_>>().join("; "))]
pub struct CustomizationError {
    pub violations: Vec<Violation>,
}

impl From<CustomizationError> for AppError {
    fn from(err: CustomizationError) -> Self {
        let message = err.to_string();
        let details = serde_json::to_value(&err.violations).unwrap_or_default();
        AppError::with_message(ErrorCode::CustomizationInvalid, message)
            .with_detail("violations", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_joins_messages_and_carries_details() {
        let err = CustomizationError {
            violations: vec![
                Violation::group(1, "Size", "Size requires at least 1 selection"),
                Violation::option(9, "Option 9 is not offered for this item"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Size requires at least 1 selection; Option 9 is not offered for this item"
        );

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::CustomizationInvalid);
        assert_eq!(app.http_status(), http::StatusCode::UNPROCESSABLE_ENTITY);
        let details = app.details.unwrap();
        assert_eq!(details["violations"][0]["group_name"], "Size");
        assert_eq!(details["violations"][1]["option_id"], 9);
    }
}
