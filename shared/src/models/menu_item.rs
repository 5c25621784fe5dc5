//! Menu Item Model

use serde::{Deserialize, Serialize};

use super::customization::CustomizationGroupWithOptions;

/// Kind of menu item; pizzas and calzones open the builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MenuItemType {
    #[default]
    Standard,
    Pizza,
    Calzone,
}

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Price in currency unit (e.g., 8.99)
    pub base_price: f64,
    pub image_url: Option<String>,
    pub item_type: MenuItemType,
    pub sort_order: i32,
    /// Temporarily sold out (still listed)
    pub is_available: bool,
    /// Hidden from the storefront entirely
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MenuItem {
    /// Can be put in a cart right now
    pub fn is_orderable(&self) -> bool {
        self.is_active && self.is_available
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub category_id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub base_price: f64,
    pub image_url: Option<String>,
    pub item_type: Option<MenuItemType>,
    pub sort_order: Option<i32>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub image_url: Option<String>,
    pub item_type: Option<MenuItemType>,
    pub sort_order: Option<i32>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
}

/// Availability toggle payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub is_available: bool,
}

/// Menu item with its attached customization groups (builder view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemDetail {
    #[serde(flatten)]
    pub item: MenuItem,
    pub customization_groups: Vec<CustomizationGroupWithOptions>,
}

/// Storefront menu section: a category with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSection {
    #[serde(flatten)]
    pub category: super::Category,
    pub items: Vec<MenuItem>,
}
