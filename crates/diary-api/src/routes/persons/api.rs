//! Person HTMX endpoints

use axum::response::Html;
use diary_core::Person;
use diary_utils::escape_html;

use crate::form::FormParams;
use crate::{ApiError, AppState};

pub fn person_row(person: &Person) -> String {
    let name = escape_html(&person.person_name);
    let (status, action) = if person.is_hidden {
        ("<span class='text-xs text-gray-400'>hidden</span>", "Show")
    } else {
        ("", "Hide")
    };
    format!(
        r#"<tr id='person-{id}' class='border-b'>
    <td class='py-2'><input type='hidden' name='person_name' value='{name}'>{name} {status}</td>
    <td class='py-2 text-right'><button hx-post='/persons/toggle' hx-include='closest tr' hx-target='closest tr' hx-swap='outerHTML' class='text-emerald-600 hover:underline'>{action}</button></td>
</tr>"#,
        id = person.person_id,
        name = name,
        status = status,
        action = action,
    )
}

/// HTMX: Persons of the acting user
pub async fn htmx_persons_list(state: axum::extract::State<AppState>) -> Result<Html<String>, ApiError> {
    let persons = state.persons.list_persons(state.user_id()).await?;
    if persons.is_empty() {
        return Ok(Html("<tr><td colspan='2' class='py-4 text-center text-gray-500'>No persons yet</td></tr>".to_string()));
    }
    Ok(Html(persons.iter().map(person_row).collect()))
}

/// HTMX: Add a person
pub async fn htmx_person_add(
    state: axum::extract::State<AppState>,
    body: String,
) -> Result<Html<String>, ApiError> {
    let form = FormParams::from_body(&body);
    let person = state
        .persons
        .add_person(state.user_id(), form.text("person_name"))
        .await
        .map_err(|e| ApiError::from_core(e, state.context("add_person")))?;

    Ok(Html(person_row(&person)))
}

/// HTMX: Toggle whether a person is offered in item forms
pub async fn htmx_person_toggle(
    state: axum::extract::State<AppState>,
    body: String,
) -> Result<Html<String>, ApiError> {
    let form = FormParams::from_body(&body);
    let person = state
        .persons
        .toggle_hidden(state.user_id(), form.text("person_name"))
        .await
        .map_err(|e| ApiError::from_core(e, state.context("toggle_person")))?;

    Ok(Html(person_row(&person)))
}
