//! Products page rendering

use super::api::{product_add_row, ProductForm};
use crate::AppState;

/// Products page - search box, add row and catalog rows
pub async fn page_products(
    _state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-6'>
            <h2 class='text-2xl font-bold'>Products</h2>
            <input type='search' name='search_query' placeholder='Search products' class='px-3 py-2 border rounded-lg w-64'
                hx-get='/products/list' hx-target='#product-list' hx-trigger='keyup changed delay:300ms'>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-4'>
            <table class='w-full text-sm'>
                <thead><tr class='text-left text-gray-500'><th>Title</th><th>Calories</th><th>Fats</th><th>Carbs</th><th>Proteins</th><th></th></tr></thead>
                <tbody id='product-new'>{}</tbody>
                <tbody id='product-list' hx-get='/products/list' hx-trigger='load'></tbody>
            </table>
        </div>"#,
        product_add_row(&ProductForm::default(), &[])
    );

    axum::response::Html(crate::page_response(&headers, "Products", "/products", &inner_content))
}
