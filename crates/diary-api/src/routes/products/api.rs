//! Product HTMX endpoints
//!
//! Endpoints:
//! - htmx_products_list: Product rows matching a search query
//! - htmx_product_add: Add a product; on failure the add row comes back with errors (422)
//! - htmx_product_copy: Add row prefilled from an existing product
//! - htmx_product_delete: Soft delete an owned product

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use diary_core::validation::{product_errors, FieldError};
use diary_core::{NewProduct, Product};
use diary_utils::escape_html;

use crate::form::FormParams;
use crate::views::nutrient;
use crate::{ApiError, AppState};

const PRODUCT_FIELDS: [(&str, &str); 5] = [
    ("product_title", "Title"),
    ("product_calories", "Calories"),
    ("product_fats", "Fats"),
    ("product_carbs", "Carbs"),
    ("product_proteins", "Proteins"),
];

/// Raw values of the add row, echoed back when validation fails
#[derive(Debug, Default, Clone)]
pub struct ProductForm {
    values: HashMap<String, String>,
}

impl ProductForm {
    pub fn from_params(form: &FormParams) -> Self {
        let values = PRODUCT_FIELDS
            .iter()
            .map(|(field, _)| (field.to_string(), form.text(field).to_string()))
            .collect();
        Self { values }
    }

    pub fn from_product(product: &Product) -> Self {
        let mut values = HashMap::new();
        values.insert("product_title".to_string(), product.product_title.clone());
        values.insert("product_calories".to_string(), product.product_calories.to_string());
        values.insert("product_fats".to_string(), product.product_fats.to_string());
        values.insert("product_carbs".to_string(), product.product_carbs.to_string());
        values.insert("product_proteins".to_string(), product.product_proteins.to_string());
        Self { values }
    }

    fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Parse into a product, collecting every field error in form order
    pub fn parse(&self) -> Result<NewProduct, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut number = |field: &str| -> f64 {
            let raw = self.value(field);
            if raw.is_empty() {
                return 0.0;
            }
            raw.parse().unwrap_or_else(|_| {
                errors.push(FieldError {
                    field: field.to_string(),
                    message: "must be a number".to_string(),
                });
                0.0
            })
        };

        let product = NewProduct {
            product_title: self.value("product_title").to_string(),
            product_calories: number("product_calories"),
            product_fats: number("product_fats"),
            product_carbs: number("product_carbs"),
            product_proteins: number("product_proteins"),
        };

        for error in product_errors(&product) {
            if !errors.iter().any(|e| e.field == error.field) {
                errors.push(error);
            }
        }
        errors.sort_by_key(|e| PRODUCT_FIELDS.iter().position(|(field, _)| *field == e.field));
        if errors.is_empty() {
            Ok(product)
        } else {
            Err(errors)
        }
    }
}

/// The add-product row with optional per-field errors
pub fn product_add_row(form: &ProductForm, errors: &[FieldError]) -> String {
    let cells: String = PRODUCT_FIELDS
        .iter()
        .map(|(field, label)| {
            let input_attrs = if *field == "product_title" {
                "type='text'"
            } else {
                "type='number' step='0.1' min='0'"
            };
            let error = errors
                .iter()
                .find(|e| e.field == *field)
                .map(|e| {
                    format!(
                        "<p id='{}-error' class='text-xs text-red-600'>{}</p>",
                        field,
                        escape_html(&e.message)
                    )
                })
                .unwrap_or_default();
            format!(
                "<td class='py-2'><input {} name='{}' placeholder='{}' value='{}' class='w-full px-2 py-1 border rounded'>{}</td>",
                input_attrs,
                field,
                label,
                escape_html(form.value(field)),
                error
            )
        })
        .collect();

    format!(
        r#"<tr id='product-add' class='border-b bg-gray-50' hx-post='/products' hx-trigger='submit-product' hx-include='this' hx-target='this' hx-swap='outerHTML'>
    {}
    <td class='py-2 text-right'><button onclick="htmx.trigger('#product-add', 'submit-product')" class='px-3 py-1 bg-emerald-600 text-white rounded'>Add</button></td>
</tr>"#,
        cells
    )
}

/// Catalog row; only the owner gets a delete button
pub fn product_row(product: &Product, user_id: u64) -> String {
    let delete = if product.user_id == user_id {
        format!(
            "<button hx-delete='/products?product_id={}' hx-target='closest tr' hx-swap='outerHTML' hx-confirm='Delete this product?' class='text-red-600 hover:underline'>Delete</button>",
            product.product_id
        )
    } else {
        String::new()
    };

    format!(
        r#"<tr id='product-{id}' class='border-b'>
    <td class='py-2'>{title}</td>
    <td class='py-2'>{calories}</td>
    <td class='py-2'>{fats}</td>
    <td class='py-2'>{carbs}</td>
    <td class='py-2'>{proteins}</td>
    <td class='py-2 text-right space-x-2'>
        <button hx-get='/products/copy?product_id={id}' hx-target='#product-add' hx-swap='outerHTML' class='text-emerald-600 hover:underline'>Copy</button>
        {delete}
    </td>
</tr>"#,
        id = product.product_id,
        title = escape_html(&product.product_title),
        calories = nutrient(product.product_calories),
        fats = nutrient(product.product_fats),
        carbs = nutrient(product.product_carbs),
        proteins = nutrient(product.product_proteins),
        delete = delete,
    )
}

/// HTMX: Product rows
pub async fn htmx_products_list(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let form = FormParams::from_query(params.0);
    let products = state.products.list_products(form.text("search_query")).await?;

    let user_id = state.user_id();
    let html: String = products.iter().map(|p| product_row(p, user_id)).collect();
    Ok(Html(html))
}

/// HTMX: Add a product
pub async fn htmx_product_add(
    state: axum::extract::State<AppState>,
    body: String,
) -> Result<Response, ApiError> {
    let form = ProductForm::from_params(&FormParams::from_body(&body));

    let product = match form.parse() {
        Ok(product) => product,
        Err(errors) => {
            let html = product_add_row(&form, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
        }
    };

    let product = state
        .products
        .add_product(state.user_id(), product)
        .await
        .map_err(|e| ApiError::from_core(e, state.context("add_product")))?;

    let html = format!(
        "{}{}",
        product_add_row(&ProductForm::default(), &[]),
        product_row(&product, state.user_id())
    );
    Ok(Html(html).into_response())
}

/// HTMX: Prefill the add row from an existing product
pub async fn htmx_product_copy(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let form = FormParams::from_query(params.0);
    let product = state.products.get_product(form.number("product_id")?).await?;

    Ok(Html(product_add_row(&ProductForm::from_product(&product), &[])))
}

/// HTMX: Soft delete a product
pub async fn htmx_product_delete(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let form = FormParams::from_query(params.0);
    let product_id = form.number("product_id")?;

    state
        .products
        .delete_product(product_id, state.user_id())
        .await
        .map_err(|e| ApiError::from_core(e, state.context("delete_product")))?;

    Ok(Html(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_form_collects_parse_and_range_errors() {
        let form = ProductForm::from_params(&FormParams::from_body(
            "product_title=Oat&product_calories=abc&product_fats=150",
        ));
        let errors = form.parse().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["product_title", "product_calories", "product_fats"]);
        assert_eq!(errors[1].message, "must be a number");

        let html = product_add_row(&form, &errors);
        assert!(html.contains("product_calories-error"));
        assert!(html.contains("value='abc'"));
    }

    #[test]
    fn test_product_row_delete_only_for_owner() {
        let product = Product {
            product_id: 4,
            user_id: 2,
            product_title: "Kefir".to_string(),
            product_calories: 40.0,
            product_fats: 1.0,
            product_carbs: 4.0,
            product_proteins: 3.0,
            is_deleted: false,
        };
        assert!(product_row(&product, 2).contains("hx-delete"));
        assert!(!product_row(&product, 1).contains("hx-delete"));
        assert!(product_row(&product, 1).contains("/products/copy?product_id=4"));
    }
}
