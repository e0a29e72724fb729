//! Core data models for the diary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Kind of a logged item, persisted as 1, 2 or 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ItemType {
    /// Bought or consumed by the user
    MyPurchase,
    /// A person paid for this on the user's behalf
    FromPersonPurchase,
    /// The user paid for this on a person's behalf
    ToPersonPurchase,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [
        ItemType::MyPurchase,
        ItemType::FromPersonPurchase,
        ItemType::ToPersonPurchase,
    ];

    pub fn as_u8(self) -> u8 {
        match self {
            ItemType::MyPurchase => 1,
            ItemType::FromPersonPurchase => 2,
            ItemType::ToPersonPurchase => 3,
        }
    }

    /// Whether an item of this type must reference a person
    pub fn requires_person(self) -> bool {
        !matches!(self, ItemType::MyPurchase)
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemType::MyPurchase => "My purchase",
            ItemType::FromPersonPurchase => "From person",
            ItemType::ToPersonPurchase => "To person",
        }
    }
}

impl TryFrom<u8> for ItemType {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ItemType::MyPurchase),
            2 => Ok(ItemType::FromPersonPurchase),
            3 => Ok(ItemType::ToPersonPurchase),
            other => Err(CoreError::DataIntegrity {
                message: format!("unknown item type {}", other),
            }),
        }
    }
}

impl From<ItemType> for u8 {
    fn from(item_type: ItemType) -> Self {
        item_type.as_u8()
    }
}

/// Stored item row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: u64,
    pub user_id: u64,
    pub product_id: u64,
    pub item_date: NaiveDate,
    pub item_cost: f64,
    pub item_amount: f64,
    /// Raw persisted tag, decoded with `ItemType::try_from`
    pub item_type: u8,
    /// Zero means no person
    #[serde(default)]
    pub person_id: u64,
}

/// Item joined with its product's nutrition facts and the person's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub item_id: u64,
    pub user_id: u64,
    pub product_id: u64,
    pub item_date: NaiveDate,
    pub item_cost: f64,
    pub item_amount: f64,
    pub item_type: u8,
    pub person_id: u64,
    /// Empty when `person_id` is zero
    pub person_name: String,
    pub product_title: String,
    pub product_calories: f64,
    pub product_fats: f64,
    pub product_carbs: f64,
    pub product_proteins: f64,
}

impl LedgerEntry {
    /// Cost contribution of this entry
    pub fn total_cost(&self) -> f64 {
        self.item_cost * self.item_amount
    }
}

/// Catalog product with nutrition facts per unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: u64,
    /// Owner, the only user allowed to delete it
    pub user_id: u64,
    pub product_title: String,
    pub product_calories: f64,
    pub product_fats: f64,
    pub product_carbs: f64,
    pub product_proteins: f64,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Named person items can be attributed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: u64,
    pub user_id: u64,
    pub person_name: String,
    #[serde(default)]
    pub is_hidden: bool,
}

/// Running debt of one person within an `Analytics` result
///
/// Positive: the user owes the person. Negative: the person owes the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonAnalytics {
    pub person_id: u64,
    pub user_id: u64,
    pub person_name: String,
    pub total_debt: f64,
}

/// Spending, nutrition and debt totals over a set of items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_spent: f64,
    pub total_calories: f64,
    pub total_fats: f64,
    pub total_carbs: f64,
    pub total_proteins: f64,
    /// In order of first appearance
    pub persons: Vec<PersonAnalytics>,
}

// ==================== Inputs ====================

/// Item to be added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub user_id: u64,
    pub product_id: u64,
    pub item_date: NaiveDate,
    #[serde(default)]
    pub item_cost: f64,
    /// Zero is replaced by 1
    #[serde(default)]
    pub item_amount: f64,
    /// Zero is replaced by `MyPurchase`
    #[serde(default)]
    pub item_type: u8,
    #[serde(default)]
    pub person_id: u64,
}

/// Partial update of an item; `None` fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemChange {
    pub item_id: u64,
    pub user_id: u64,
    pub product_id: Option<u64>,
    pub item_date: Option<NaiveDate>,
    pub item_cost: Option<f64>,
    pub item_amount: Option<f64>,
    pub item_type: Option<u8>,
    pub person_id: Option<u64>,
}

impl ItemChange {
    pub fn is_empty(&self) -> bool {
        self.product_id.is_none()
            && self.item_date.is_none()
            && self.item_cost.is_none()
            && self.item_amount.is_none()
            && self.item_type.is_none()
            && self.person_id.is_none()
    }
}

/// Items of one day, optionally filtered by a search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsQuery {
    pub user_id: u64,
    pub item_date: NaiveDate,
    #[serde(default)]
    pub search_query: String,
}

/// Items within an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsRangeQuery {
    pub user_id: u64,
    pub item_date_from: NaiveDate,
    pub item_date_to: NaiveDate,
}

/// Product to be added to the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_title: String,
    #[serde(default)]
    pub product_calories: f64,
    #[serde(default)]
    pub product_fats: f64,
    #[serde(default)]
    pub product_carbs: f64,
    #[serde(default)]
    pub product_proteins: f64,
}

impl From<&Product> for NewProduct {
    fn from(product: &Product) -> Self {
        Self {
            product_title: product.product_title.clone(),
            product_calories: product.product_calories,
            product_fats: product.product_fats,
            product_carbs: product.product_carbs,
            product_proteins: product.product_proteins,
        }
    }
}
