//! Analytics endpoints - HTMX fragment and JSON API

use std::collections::HashMap;

use axum::extract::Query;
use axum::response::Html;
use axum::Json;
use diary_core::{Analytics, DateRange, ItemsRangeQuery};

use crate::form::FormParams;
use crate::views::analytics_panel;
use crate::{ApiError, AppState};

async fn range_analytics(state: &AppState, params: HashMap<String, String>) -> Result<(DateRange, Analytics), ApiError> {
    let form = FormParams::from_query(params);
    let range = DateRange::new(form.date("item_date_from")?, form.date("item_date_to")?);
    let query = ItemsRangeQuery {
        user_id: state.user_id(),
        item_date_from: range.from,
        item_date_to: range.to,
    };

    let analytics = state.items.analytics_range(&query).await.map_err(|e| {
        ApiError::from_core(
            e,
            state
                .context("analytics_range")
                .with_data("range", serde_json::json!(range.description())),
        )
    })?;
    Ok((range, analytics))
}

/// HTMX: Analytics panel over an inclusive date range
pub async fn htmx_analytics_range(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let (range, analytics) = range_analytics(&state, params.0).await?;
    Ok(Html(format!(
        "<p class='text-sm text-gray-500 mb-2'>{}</p>{}",
        range.description(),
        analytics_panel(&analytics, &state.config.currency, false)
    )))
}

/// Analytics over an inclusive date range (JSON API)
pub async fn api_analytics(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Json<Analytics>, ApiError> {
    let (_, analytics) = range_analytics(&state, params.0).await?;
    Ok(Json(analytics))
}
