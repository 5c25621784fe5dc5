//! Unified error codes for the ordering platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order / checkout errors
//! - 6xxx: Menu errors (items, categories, customizations)
//! - 7xxx: Settings errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so the storefront and admin front-ends can
/// switch on the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has no items
    OrderEmpty = 4007,
    /// Status change not allowed from the current status
    OrderInvalidTransition = 4008,
    /// Only completed or cancelled orders can be deleted
    OrderNotDeletable = 4009,
    /// The store is not accepting orders
    StoreClosed = 4010,
    /// Delivery subtotal below the configured minimum
    OrderBelowMinimum = 4011,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has invalid price
    MenuItemInvalidPrice = 6002,
    /// Menu item is inactive or unavailable
    MenuItemUnavailable = 6003,
    /// Menu item slug already exists
    MenuItemSlugExists = 6004,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category still has menu items
    CategoryHasItems = 6102,
    /// Category name already exists
    CategoryNameExists = 6103,
    /// Customization group not found
    CustomizationGroupNotFound = 6301,
    /// Customization option not found
    CustomizationOptionNotFound = 6302,
    /// Customization group is attached to menu items
    CustomizationGroupInUse = 6303,
    /// Option selections violate the item's customization rules
    CustomizationInvalid = 6304,

    // ==================== 7xxx: Settings ====================
    /// Setting key not found
    SettingNotFound = 7001,
    /// Setting value has the wrong type for its key
    SettingInvalidValue = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::OrderInvalidTransition => "Order status change is not allowed",
            ErrorCode::OrderNotDeletable => "Only completed or cancelled orders can be deleted",
            ErrorCode::StoreClosed => "The store is not accepting orders right now",
            ErrorCode::OrderBelowMinimum => "Order is below the delivery minimum",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",
            ErrorCode::MenuItemSlugExists => "Menu item slug already exists",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasItems => "Category has associated menu items",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::CustomizationGroupNotFound => "Customization group not found",
            ErrorCode::CustomizationOptionNotFound => "Customization option not found",
            ErrorCode::CustomizationGroupInUse => "Customization group is attached to menu items",
            ErrorCode::CustomizationInvalid => "Invalid customization selections",

            // Settings
            ErrorCode::SettingNotFound => "Setting not found",
            ErrorCode::SettingInvalidValue => "Setting value has the wrong type",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,

            2001 => ErrorCode::PermissionDenied,

            4001 => ErrorCode::OrderNotFound,
            4003 => ErrorCode::OrderAlreadyCompleted,
            4007 => ErrorCode::OrderEmpty,
            4008 => ErrorCode::OrderInvalidTransition,
            4009 => ErrorCode::OrderNotDeletable,
            4010 => ErrorCode::StoreClosed,
            4011 => ErrorCode::OrderBelowMinimum,

            6001 => ErrorCode::MenuItemNotFound,
            6002 => ErrorCode::MenuItemInvalidPrice,
            6003 => ErrorCode::MenuItemUnavailable,
            6004 => ErrorCode::MenuItemSlugExists,
            6101 => ErrorCode::CategoryNotFound,
            6102 => ErrorCode::CategoryHasItems,
            6103 => ErrorCode::CategoryNameExists,
            6301 => ErrorCode::CustomizationGroupNotFound,
            6302 => ErrorCode::CustomizationOptionNotFound,
            6303 => ErrorCode::CustomizationGroupInUse,
            6304 => ErrorCode::CustomizationInvalid,

            7001 => ErrorCode::SettingNotFound,
            7002 => ErrorCode::SettingInvalidValue,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9004 => ErrorCode::TimeoutError,
            9005 => ErrorCode::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::CategoryHasItems.code(), 6102);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_round_trip() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::TokenExpired,
            ErrorCode::OrderInvalidTransition,
            ErrorCode::CustomizationInvalid,
            ErrorCode::SettingInvalidValue,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::CategoryNotFound).unwrap();
        assert_eq!(json, "6101");
        let code: ErrorCode = serde_json::from_str("6304").unwrap();
        assert_eq!(code, ErrorCode::CustomizationInvalid);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}
