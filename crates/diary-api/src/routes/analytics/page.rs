//! Analytics page rendering

use diary_core::DateRange;

use crate::AppState;

/// Analytics page - range form prefilled from the configured default range
pub async fn page_analytics(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let preset = state.config.analytics.default_range;
    let range = DateRange::for_preset(preset, chrono::Local::now().date_naive());

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Analytics</h2><p class='text-sm text-gray-500'>Default range: current {preset}</p></div>
        <form id='analytics-range' class='bg-white rounded-xl shadow-sm p-4 mb-6 flex gap-2 items-end'
            hx-get='/analytics/range' hx-target='#analytics-result' hx-trigger='load, change'>
            <label class='text-sm'>From<input type='date' name='item_date_from' value='{from}' class='block px-3 py-2 border rounded-lg'></label>
            <label class='text-sm'>To<input type='date' name='item_date_to' value='{to}' class='block px-3 py-2 border rounded-lg'></label>
        </form>
        <div id='analytics-result'></div>"#,
        preset = preset,
        from = range.from.format("%Y-%m-%d"),
        to = range.to.format("%Y-%m-%d"),
    );

    axum::response::Html(crate::page_response(&headers, "Analytics", "/analytics", &inner_content))
}
