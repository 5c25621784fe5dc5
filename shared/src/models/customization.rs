//! Customization Group / Option Models
//!
//! Groups ("Size", "Bread Type", "Toppings") are attached to menu items via
//! `menu_item_customization` links; each option carries a price rule.

use serde::{Deserialize, Serialize};

use crate::serde_helpers::double_option;

/// How many options of a group may be picked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SelectionType {
    /// At most one option (radio)
    #[default]
    Single,
    /// Any number of options up to `max_selections` (checkbox)
    Multiple,
}

/// Price rule of an option
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PriceType {
    /// `price_modifier` added once
    #[default]
    Flat,
    /// `price_modifier` percent of the item's base price
    Percentage,
    /// `price_modifier` times the selected quantity (e.g. extra cheese x2)
    PerUnit,
}

/// Customization group entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomizationGroup {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub selection_type: SelectionType,
    pub is_required: bool,
    pub min_selections: i32,
    /// None = unlimited (SINGLE groups are always capped at 1)
    pub max_selections: Option<i32>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CustomizationGroup {
    /// Minimum number of selections, counting the required flag as 1
    pub fn effective_min(&self) -> i32 {
        if self.is_required {
            self.min_selections.max(1)
        } else {
            self.min_selections
        }
    }

    /// Maximum number of selections, if bounded
    pub fn effective_max(&self) -> Option<i32> {
        match self.selection_type {
            SelectionType::Single => Some(self.max_selections.map_or(1, |m| m.min(1))),
            SelectionType::Multiple => self.max_selections,
        }
    }
}

/// Customization option entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomizationOption {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    /// Currency amount for FLAT / PER_UNIT, percent for PERCENTAGE
    pub price_modifier: f64,
    pub price_type: PriceType,
    /// Preselected by the builder UI; never applied implicitly
    pub is_default: bool,
    /// Temporarily out (e.g. no gluten-free dough today)
    pub is_available: bool,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CustomizationOption {
    pub fn is_selectable(&self) -> bool {
        self.is_active && self.is_available
    }
}

/// Group with its options, as attached to an item or listed by admin
///
/// When loaded for a menu item, `group.is_required` already reflects the
/// link's `is_required_override`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationGroupWithOptions {
    #[serde(flatten)]
    pub group: CustomizationGroup,
    pub options: Vec<CustomizationOption>,
}

/// Create option payload (standalone or embedded in a group create)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizationOptionCreate {
    pub name: String,
    #[serde(default)]
    pub price_modifier: f64,
    pub price_type: Option<PriceType>,
    pub is_default: Option<bool>,
    pub is_available: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update option payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizationOptionUpdate {
    pub name: Option<String>,
    pub price_modifier: Option<f64>,
    pub price_type: Option<PriceType>,
    pub is_default: Option<bool>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Create group payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizationGroupCreate {
    pub name: String,
    pub description: Option<String>,
    pub selection_type: Option<SelectionType>,
    pub is_required: Option<bool>,
    pub min_selections: Option<i32>,
    pub max_selections: Option<i32>,
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub options: Vec<CustomizationOptionCreate>,
}

/// Update group payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizationGroupUpdate {
    pub name: Option<String>,
    /// `null` clears the description
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    pub selection_type: Option<SelectionType>,
    pub is_required: Option<bool>,
    pub min_selections: Option<i32>,
    /// `null` makes the group unlimited again
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_selections: Option<Option<i32>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Item-to-group link record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItemCustomization {
    pub menu_item_id: i64,
    pub group_id: i64,
    pub sort_order: i32,
    pub is_required_override: Option<bool>,
}

/// One link in a "replace customizations" request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationLinkInput {
    pub group_id: i64,
    pub sort_order: Option<i32>,
    pub is_required_override: Option<bool>,
}

/// A customer's pick of one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSelection {
    pub option_id: i64,
    #[serde(default = "default_selection_quantity")]
    pub quantity: i32,
}

fn default_selection_quantity() -> i32 {
    1
}

impl OptionSelection {
    pub fn new(option_id: i64) -> Self {
        Self {
            option_id,
            quantity: 1,
        }
    }
}
