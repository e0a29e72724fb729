//! Typed access to urlencoded form bodies and query strings

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use diary_core::time::parse_date;
use diary_utils::parse_form_body;

use crate::ApiError;

/// Decoded form fields
#[derive(Debug, Default, Clone)]
pub struct FormParams(HashMap<String, String>);

impl FormParams {
    pub fn from_body(body: &str) -> Self {
        Self(parse_form_body(body))
    }

    pub fn from_query(params: HashMap<String, String>) -> Self {
        Self(params)
    }

    /// Trimmed value, empty when absent
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).map(|v| v.trim()).unwrap_or("")
    }

    /// Parsed number, zero when absent or empty
    pub fn number<T: FromStr + Default>(&self, key: &str) -> Result<T, ApiError> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(T::default());
        }
        raw.parse()
            .map_err(|_| ApiError::invalid_input(format!("{} must be a number", key)))
    }

    /// Parsed number, `None` when absent, empty or zero
    pub fn nonzero<T: FromStr + Default + PartialEq>(&self, key: &str) -> Result<Option<T>, ApiError> {
        let value: T = self.number(key)?;
        Ok(if value == T::default() { None } else { Some(value) })
    }

    /// Required `YYYY-MM-DD` date
    pub fn date(&self, key: &str) -> Result<NaiveDate, ApiError> {
        parse_date(self.text(key))
            .ok_or_else(|| ApiError::invalid_input(format!("{} must be a date (YYYY-MM-DD)", key)))
    }

    pub fn optional_date(&self, key: &str) -> Result<Option<NaiveDate>, ApiError> {
        if self.text(key).is_empty() {
            return Ok(None);
        }
        self.date(key).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        let form = FormParams::from_body("item_cost=2.5&item_type=&product_id=abc&person_id=0");
        assert_eq!(form.number::<f64>("item_cost").unwrap(), 2.5);
        assert_eq!(form.number::<u8>("item_type").unwrap(), 0);
        assert_eq!(form.number::<u64>("missing").unwrap(), 0);
        assert!(form.number::<u64>("product_id").is_err());
        assert_eq!(form.nonzero::<u64>("person_id").unwrap(), None);
        assert_eq!(form.nonzero::<f64>("item_cost").unwrap(), Some(2.5));
    }

    #[test]
    fn test_dates() {
        let form = FormParams::from_body("item_date=2024-02-03&bad=03.02.2024");
        assert_eq!(form.date("item_date").unwrap(), NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
        assert!(form.date("bad").is_err());
        assert!(form.date("missing").is_err());
        assert_eq!(form.optional_date("missing").unwrap(), None);
    }
}
