//! Settings Model
//!
//! Settings are a key/value store with JSON values. The keys that pricing and
//! checkout read are listed in [`SettingKey`] and surfaced through the typed
//! [`StoreSettings`] view.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Setting row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SettingRow {
    pub key: String,
    /// JSON text
    pub value: String,
    pub description: Option<String>,
    pub updated_at: i64,
}

/// Setting as returned by the API (value decoded)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: Value,
    pub description: Option<String>,
    pub updated_at: i64,
}

/// `PUT /api/settings/{key}` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingUpsert {
    pub value: Value,
    pub description: Option<String>,
}

/// Upper bound for fee, threshold and minimum amounts
pub const MAX_SETTING_AMOUNT: f64 = 100_000.0;

/// Keys with a known type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    TaxRatePercent,
    DeliveryFee,
    FreeDeliveryThreshold,
    MinimumDeliveryOrder,
    AcceptingOrders,
    RestaurantName,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        Self::TaxRatePercent,
        Self::DeliveryFee,
        Self::FreeDeliveryThreshold,
        Self::MinimumDeliveryOrder,
        Self::AcceptingOrders,
        Self::RestaurantName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaxRatePercent => "tax_rate_percent",
            Self::DeliveryFee => "delivery_fee",
            Self::FreeDeliveryThreshold => "free_delivery_threshold",
            Self::MinimumDeliveryOrder => "minimum_delivery_order",
            Self::AcceptingOrders => "accepting_orders",
            Self::RestaurantName => "restaurant_name",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Check a JSON value against the key's type.
    ///
    /// Money and percentages must be finite and non-negative numbers;
    /// `free_delivery_threshold` additionally accepts `null` (no threshold).
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::TaxRatePercent
            | Self::DeliveryFee
            | Self::MinimumDeliveryOrder
            | Self::FreeDeliveryThreshold => {
                if value.is_null() && *self == Self::FreeDeliveryThreshold {
                    return Ok(());
                }
                let max = if *self == Self::TaxRatePercent {
                    100.0
                } else {
                    MAX_SETTING_AMOUNT
                };
                match value.as_f64() {
                    Some(n) if n.is_finite() && (0.0..=max).contains(&n) => Ok(()),
                    Some(n) if n.is_finite() && n >= 0.0 => {
                        Err(format!("{} must be between 0 and {max}", self.as_str()))
                    }
                    _ => Err(format!("{} must be a non-negative number", self.as_str())),
                }
            }
            Self::AcceptingOrders => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(format!("{} must be a boolean", self.as_str()))
                }
            }
            Self::RestaurantName => match value.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(()),
                _ => Err(format!("{} must be a non-empty string", self.as_str())),
            },
        }
    }
}

/// Typed view over the settings used by pricing and checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub tax_rate_percent: f64,
    pub delivery_fee: f64,
    pub free_delivery_threshold: Option<f64>,
    pub minimum_delivery_order: f64,
    pub accepting_orders: bool,
    pub restaurant_name: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            tax_rate_percent: 0.0,
            delivery_fee: 0.0,
            free_delivery_threshold: None,
            minimum_delivery_order: 0.0,
            accepting_orders: true,
            restaurant_name: "Slice".to_string(),
        }
    }
}

impl StoreSettings {
    /// Build from stored settings; absent or mistyped keys keep their default
    pub fn from_settings<'a>(settings: impl IntoIterator<Item = &'a Setting>) -> Self {
        let mut out = Self::default();
        for s in settings {
            let Some(key) = SettingKey::parse(&s.key) else {
                continue;
            };
            if key.check(&s.value).is_err() {
                tracing::warn!(key = %s.key, "Ignoring mistyped setting value");
                continue;
            }
            match key {
                SettingKey::TaxRatePercent => {
                    out.tax_rate_percent = s.value.as_f64().unwrap_or(out.tax_rate_percent)
                }
                SettingKey::DeliveryFee => {
                    out.delivery_fee = s.value.as_f64().unwrap_or(out.delivery_fee)
                }
                SettingKey::FreeDeliveryThreshold => out.free_delivery_threshold = s.value.as_f64(),
                SettingKey::MinimumDeliveryOrder => {
                    out.minimum_delivery_order =
                        s.value.as_f64().unwrap_or(out.minimum_delivery_order)
                }
                SettingKey::AcceptingOrders => {
                    out.accepting_orders = s.value.as_bool().unwrap_or(out.accepting_orders)
                }
                SettingKey::RestaurantName => {
                    if let Some(name) = s.value.as_str() {
                        out.restaurant_name = name.to_string();
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setting(key: &str, value: Value) -> Setting {
        Setting {
            key: key.into(),
            value,
            description: None,
            updated_at: 0,
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let s = StoreSettings::from_settings(&[]);
        assert_eq!(s, StoreSettings::default());
        assert!(s.accepting_orders);
        assert_eq!(s.restaurant_name, "Slice");
    }

    #[test]
    fn test_typed_values_applied() {
        let rows = vec![
            setting("tax_rate_percent", json!(8.25)),
            setting("delivery_fee", json!(3)),
            setting("free_delivery_threshold", json!(40.0)),
            setting("accepting_orders", json!(false)),
            setting("something_else", json!({"a": 1})),
        ];
        let s = StoreSettings::from_settings(&rows);
        assert_eq!(s.tax_rate_percent, 8.25);
        assert_eq!(s.delivery_fee, 3.0);
        assert_eq!(s.free_delivery_threshold, Some(40.0));
        assert!(!s.accepting_orders);
    }

    #[test]
    fn test_mistyped_value_falls_back() {
        let rows = vec![setting("delivery_fee", json!("free"))];
        assert_eq!(StoreSettings::from_settings(&rows).delivery_fee, 0.0);
    }

    #[test]
    fn test_key_check() {
        assert!(SettingKey::TaxRatePercent.check(&json!(7.5)).is_ok());
        assert!(SettingKey::TaxRatePercent.check(&json!(150)).is_err());
        assert!(SettingKey::DeliveryFee.check(&json!(-1)).is_err());
        assert!(SettingKey::FreeDeliveryThreshold.check(&Value::Null).is_ok());
        assert!(SettingKey::DeliveryFee.check(&Value::Null).is_err());
        assert!(SettingKey::DeliveryFee.check(&json!(1e29)).is_err());
        assert!(SettingKey::MinimumDeliveryOrder.check(&json!(MAX_SETTING_AMOUNT)).is_ok());
        assert!(SettingKey::FreeDeliveryThreshold.check(&json!(1e20)).is_err());
        assert!(SettingKey::AcceptingOrders.check(&json!("yes")).is_err());
        assert!(SettingKey::RestaurantName.check(&json!("  ")).is_err());
        assert_eq!(SettingKey::parse("accepting_orders"), Some(SettingKey::AcceptingOrders));
        assert_eq!(SettingKey::parse("nope"), None);
    }
}
