//! Settings page rendering - Full page endpoints

use diary_utils::escape_html;

use crate::AppState;

pub async fn page_settings(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Data</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Snapshot</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Persistence</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Display</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>User</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Default analytics range</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Currency</p><p class='font-medium'>{} ({} decimals)</p></div>
                <div><p class='text-sm text-gray-500'>Log level</p><p class='font-medium'>{}</p></div>
            </div>
        </div>"#,
        escape_html(&config.server.host),
        config.server.port,
        escape_html(&config.snapshot_path().display().to_string()),
        if config.data.persist { "Enabled" } else { "Disabled" },
        config.user.default_user_id,
        config.analytics.default_range,
        escape_html(&config.currency.symbol),
        config.currency.decimal_places,
        escape_html(&config.logging.level),
    );

    axum::response::Html(crate::page_response(&headers, "Settings", "/settings", &inner_content))
}
