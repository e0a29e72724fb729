//! Persons page rendering

use crate::AppState;

pub async fn page_persons(
    _state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let inner_content = r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Persons</h2></div>
        <form class='bg-white rounded-xl shadow-sm p-4 mb-6 flex gap-2'
            hx-post='/persons' hx-target='#person-list' hx-swap='beforeend' hx-on::after-request='this.reset()'>
            <input type='text' name='person_name' placeholder='Name' minlength='2' maxlength='12' class='px-3 py-2 border rounded-lg'>
            <button type='submit' class='px-4 py-2 bg-emerald-600 text-white rounded-lg hover:bg-emerald-700'>Add</button>
        </form>
        <div class='bg-white rounded-xl shadow-sm p-4'>
            <table class='w-full text-sm'>
                <tbody id='person-list' hx-get='/persons/list' hx-trigger='load'></tbody>
            </table>
        </div>"#;

    axum::response::Html(crate::page_response(&headers, "Persons", "/persons", inner_content))
}
