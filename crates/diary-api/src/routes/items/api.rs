//! Item HTMX endpoints
//!
//! Endpoints:
//! - htmx_items_list: Rows of one day plus out-of-band analytics
//! - htmx_item_add: Add an item, returns its row
//! - htmx_item_change: Change an item, returns its row and `HX-Trigger`
//! - htmx_item_delete: Delete an item, empty body

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::HeaderValue;
use axum::response::{Html, IntoResponse, Response};
use diary_config::CurrencyConfig;
use diary_core::{ItemChange, ItemsQuery, LedgerEntry, NewItem, Person};
use diary_utils::escape_html;

use crate::form::FormParams;
use crate::views::{analytics_panel, item_type_options, money, nutrient, person_options};
use crate::{ApiError, AppState};

/// Editable table row of one item
pub fn item_row(entry: &LedgerEntry, persons: &[Person], currency: &CurrencyConfig) -> String {
    format!(
        r#"<tr id='item-{id}' class='border-b' hx-put='/items' hx-trigger='change' hx-include='this' hx-target='this' hx-swap='outerHTML'>
    <td class='py-2'><input type='hidden' name='item_id' value='{id}'>{title}<div class='text-xs text-gray-500'>{calories} kcal</div></td>
    <td class='py-2'><input type='number' step='0.01' min='0' name='item_cost' value='{cost}' class='w-24 px-2 py-1 border rounded'></td>
    <td class='py-2'><input type='number' step='0.01' min='0' name='item_amount' value='{amount}' class='w-20 px-2 py-1 border rounded'></td>
    <td class='py-2'><select name='item_type' class='px-2 py-1 border rounded'>{types}</select></td>
    <td class='py-2'><select name='person_id' class='px-2 py-1 border rounded'>{persons}</select></td>
    <td class='py-2 text-right font-medium'>{total}</td>
    <td class='py-2 text-right'><button hx-delete='/items?item_id={id}' hx-target='closest tr' hx-swap='outerHTML' hx-confirm='Delete this item?' class='text-red-600 hover:underline'>Delete</button></td>
</tr>"#,
        id = entry.item_id,
        title = escape_html(&entry.product_title),
        calories = nutrient(entry.product_calories * entry.item_amount),
        cost = entry.item_cost,
        amount = entry.item_amount,
        types = item_type_options(entry.item_type),
        persons = person_options(persons, entry.person_id),
        total = money(currency, entry.total_cost()),
    )
}

/// HTMX: Item rows of a day, followed by the day's analytics as an OOB swap
pub async fn htmx_items_list(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let form = FormParams::from_query(params.0);
    let query = ItemsQuery {
        user_id: state.user_id(),
        item_date: form.date("item_date")?,
        search_query: form.text("search_query").to_string(),
    };

    let (entries, analytics) = state
        .items
        .items_with_analytics(&query)
        .await
        .map_err(|e| ApiError::from_core(e, state.context("list_items")))?;
    let persons = state.persons.list_persons(state.user_id()).await?;

    let currency = &state.config.currency;
    let mut html: String = entries
        .iter()
        .map(|entry| item_row(entry, &persons, currency))
        .collect();
    if entries.is_empty() {
        html.push_str("<tr><td colspan='7' class='py-4 text-center text-gray-500'>Nothing logged on this day</td></tr>");
    }
    html.push_str(&analytics_panel(&analytics, currency, true));

    Ok(Html(html))
}

/// HTMX: Add an item from the diary form
pub async fn htmx_item_add(
    state: axum::extract::State<AppState>,
    body: String,
) -> Result<Html<String>, ApiError> {
    let form = FormParams::from_body(&body);
    let item = NewItem {
        user_id: state.user_id(),
        product_id: form.number("product_id")?,
        item_date: form.date("item_date")?,
        item_cost: form.number("item_cost")?,
        item_amount: form.number("item_amount")?,
        item_type: form.number("item_type")?,
        person_id: form.number("person_id")?,
    };

    let entry = state
        .items
        .add_item(item)
        .await
        .map_err(|e| ApiError::from_core(e, state.context("add_item")))?;
    let persons = state.persons.list_persons(state.user_id()).await?;

    Ok(Html(item_row(&entry, &persons, &state.config.currency)))
}

/// HTMX: Inline change of an item row
///
/// Only non-empty, non-zero fields are applied, so `person_id=0` never clears
/// a stored person; a MyPurchase item ignores its person. The stored values
/// are sent back in a `setTempValues` trigger so the client can keep its form
/// state.
pub async fn htmx_item_change(
    state: axum::extract::State<AppState>,
    body: String,
) -> Result<Response, ApiError> {
    let form = FormParams::from_body(&body);
    let change = ItemChange {
        item_id: form.number("item_id")?,
        user_id: state.user_id(),
        product_id: form.nonzero("product_id")?,
        item_date: form.optional_date("item_date")?,
        item_cost: form.nonzero("item_cost")?,
        item_amount: form.nonzero("item_amount")?,
        item_type: form.nonzero("item_type")?,
        person_id: form.nonzero("person_id")?,
    };

    let entry = state
        .items
        .change_item(change)
        .await
        .map_err(|e| ApiError::from_core(e, state.context("change_item")))?;
    let persons = state.persons.list_persons(state.user_id()).await?;

    let trigger = serde_json::json!({
        "setTempValues": {
            "product_id": entry.product_id,
            "item_cost": entry.item_cost,
            "item_type": entry.item_type,
            "person_id": entry.person_id,
        }
    });
    let mut response = Html(item_row(&entry, &persons, &state.config.currency)).into_response();
    if let Ok(value) = HeaderValue::from_str(&trigger.to_string()) {
        response.headers_mut().insert("HX-Trigger", value);
    }
    Ok(response)
}

/// HTMX: Delete an item
pub async fn htmx_item_delete(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let form = FormParams::from_query(params.0);
    let item_id = form.number("item_id")?;

    state
        .items
        .delete_item(item_id, state.user_id())
        .await
        .map_err(|e| ApiError::from_core(e, state.context("delete_item")))?;

    Ok(Html(String::new()))
}
