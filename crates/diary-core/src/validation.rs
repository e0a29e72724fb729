//! Field validation rules

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::{ItemType, NewProduct};

pub const PRODUCT_TITLE_MIN: usize = 4;
pub const PRODUCT_TITLE_MAX: usize = 128;
pub const CALORIES_MAX: f64 = 1000.0;
pub const NUTRIENT_MAX: f64 = 100.0;
pub const PERSON_NAME_MIN: usize = 2;
pub const PERSON_NAME_MAX: usize = 12;

/// Validation failure of a single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<FieldError> for CoreError {
    fn from(error: FieldError) -> Self {
        CoreError::Validation {
            field: error.field,
            message: error.message,
        }
    }
}

pub fn validate_id(field: &str, id: u64) -> CoreResult<()> {
    if id < 1 {
        return Err(CoreError::validation(field, "must be a positive identifier"));
    }
    Ok(())
}

fn check_range(field: &str, value: f64, max: f64) -> Option<FieldError> {
    if !value.is_finite() {
        Some(FieldError::new(field, "must be a number"))
    } else if value < 0.0 || value > max {
        Some(FieldError::new(field, format!("must be between 0 and {}", max)))
    } else {
        None
    }
}

/// All field errors of a product, in form order
pub fn product_errors(product: &NewProduct) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let title_len = product.product_title.trim().chars().count();
    if !(PRODUCT_TITLE_MIN..=PRODUCT_TITLE_MAX).contains(&title_len) {
        errors.push(FieldError::new(
            "product_title",
            format!(
                "must be between {} and {} characters",
                PRODUCT_TITLE_MIN, PRODUCT_TITLE_MAX
            ),
        ));
    }

    errors.extend(check_range("product_calories", product.product_calories, CALORIES_MAX));
    errors.extend(check_range("product_fats", product.product_fats, NUTRIENT_MAX));
    errors.extend(check_range("product_carbs", product.product_carbs, NUTRIENT_MAX));
    errors.extend(check_range("product_proteins", product.product_proteins, NUTRIENT_MAX));

    errors
}

/// First product field error as a `CoreError`
pub fn validate_product(product: &NewProduct) -> CoreResult<()> {
    match product_errors(product).into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

pub fn validate_person_name(name: &str) -> CoreResult<()> {
    let len = name.trim().chars().count();
    if !(PERSON_NAME_MIN..=PERSON_NAME_MAX).contains(&len) {
        return Err(CoreError::validation(
            "person_name",
            format!(
                "must be between {} and {} characters",
                PERSON_NAME_MIN, PERSON_NAME_MAX
            ),
        ));
    }
    Ok(())
}

pub fn validate_cost(cost: f64) -> CoreResult<()> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(CoreError::validation("item_cost", "must be a non-negative number"));
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> CoreResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::validation("item_amount", "must be greater than 0"));
    }
    Ok(())
}

/// Decode a submitted item type, rejecting unknown tags as bad input
pub fn parse_item_type(raw: u8) -> CoreResult<ItemType> {
    ItemType::try_from(raw).map_err(|_| CoreError::validation("item_type", "must be 1, 2 or 3"))
}

/// Lowercase and strip whitespace for search matching
pub fn normalize_search(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str) -> NewProduct {
        NewProduct {
            product_title: title.to_string(),
            product_calories: 120.0,
            product_fats: 2.0,
            product_carbs: 20.0,
            product_proteins: 4.0,
        }
    }

    #[test]
    fn test_valid_product() {
        assert!(product_errors(&product("Rye bread")).is_empty());
        assert!(validate_product(&product("Rye bread")).is_ok());
    }

    #[test]
    fn test_product_errors_collects_every_field() {
        let mut p = product("Tea");
        p.product_calories = 1500.0;
        p.product_fats = -1.0;
        p.product_proteins = f64::NAN;

        let fields: Vec<String> = product_errors(&p).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["product_title", "product_calories", "product_fats", "product_proteins"]);

        let err = validate_product(&p).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "product_title"));
    }

    #[test]
    fn test_boundaries() {
        let mut p = product("Milk");
        p.product_calories = 1000.0;
        p.product_carbs = 100.0;
        assert!(product_errors(&p).is_empty());

        assert!(validate_person_name("Al").is_ok());
        assert!(validate_person_name("A").is_err());
        assert!(validate_person_name("Bartholomewss").is_err());
    }

    #[test]
    fn test_cost_and_amount() {
        assert!(validate_cost(0.0).is_ok());
        assert!(validate_cost(-0.5).is_err());
        assert!(validate_cost(f64::INFINITY).is_err());
        assert!(validate_amount(0.25).is_ok());
        assert!(validate_amount(0.0).is_err());
    }

    #[test]
    fn test_parse_item_type() {
        assert_eq!(parse_item_type(2).unwrap(), ItemType::FromPersonPurchase);
        assert!(matches!(parse_item_type(9), Err(CoreError::Validation { .. })));
        assert!(validate_id("product_id", 0).is_err());
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search("  Green Tea "), "greentea");
        assert_eq!(normalize_search(""), "");
    }
}
