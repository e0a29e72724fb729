//! Diary page rendering

use std::collections::HashMap;

use axum::extract::Query;
use diary_utils::escape_html;

use crate::form::FormParams;
use crate::views::{item_type_options, person_options};
use crate::{ApiError, AppState};

/// Diary page - date picker, add form, item rows and day analytics
pub async fn page_diary(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    params: Query<HashMap<String, String>>,
) -> Result<axum::response::Html<String>, ApiError> {
    let form = FormParams::from_query(params.0);
    let date = form
        .optional_date("item_date")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let date = date.format("%Y-%m-%d").to_string();

    let products = state.products.list_products("").await?;
    let persons = state.persons.list_persons(state.user_id()).await?;

    let product_options: String = products
        .iter()
        .map(|p| format!("<option value='{}'>{}</option>", p.product_id, escape_html(&p.product_title)))
        .collect();

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-6'>
            <h2 class='text-2xl font-bold'>Diary</h2>
            <div class='flex gap-2' id='diary-filter'>
                <input type='date' id='item-date' name='item_date' value='{date}' class='px-3 py-2 border rounded-lg'
                    hx-get='/items' hx-target='#item-list' hx-include='#diary-filter' hx-trigger='change'>
                <input type='search' name='search_query' placeholder='Search' class='px-3 py-2 border rounded-lg'
                    hx-get='/items' hx-target='#item-list' hx-include='#diary-filter' hx-trigger='keyup changed delay:300ms'>
            </div>
        </div>
        <form class='bg-white rounded-xl shadow-sm p-4 mb-6 flex flex-wrap gap-2 items-end'
            hx-post='/items' hx-target='#item-list' hx-swap='beforeend' hx-include='#item-date'>
            <label class='text-sm'>Product<select name='product_id' class='block px-2 py-1 border rounded'>{products}</select></label>
            <label class='text-sm'>Cost<input type='number' step='0.01' min='0' name='item_cost' class='block w-24 px-2 py-1 border rounded'></label>
            <label class='text-sm'>Amount<input type='number' step='0.01' min='0' name='item_amount' value='1' class='block w-20 px-2 py-1 border rounded'></label>
            <label class='text-sm'>Type<select name='item_type' class='block px-2 py-1 border rounded'>{types}</select></label>
            <label class='text-sm'>Person<select name='person_id' class='block px-2 py-1 border rounded'>{persons}</select></label>
            <button type='submit' class='px-4 py-2 bg-emerald-600 text-white rounded-lg hover:bg-emerald-700'>Add</button>
        </form>
        <div class='bg-white rounded-xl shadow-sm p-4 mb-6'>
            <table class='w-full text-sm'>
                <thead><tr class='text-left text-gray-500'><th>Product</th><th>Cost</th><th>Amount</th><th>Type</th><th>Person</th><th class='text-right'>Total</th><th></th></tr></thead>
                <tbody id='item-list' hx-get='/items?item_date={date}' hx-trigger='load'></tbody>
            </table>
        </div>
        <div id='analytics'></div>"#,
        date = date,
        products = product_options,
        types = item_type_options(1),
        persons = person_options(&persons, 0),
    );

    Ok(axum::response::Html(crate::page_response(&headers, "Diary", "/", &inner_content)))
}
