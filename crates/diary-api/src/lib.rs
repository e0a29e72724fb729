//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::items: Diary page and item fragments
//! - routes::products: Product catalog
//! - routes::persons: Persons items can be attributed to
//! - routes::analytics: Range analytics page, fragment and JSON
//! - routes::settings: Configuration display

pub mod error;
pub mod form;
pub mod routes;
pub mod views;

use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use diary_config::Config;
use diary_core::{ErrorContext, ItemService, MemoryStore, PersonService, ProductService};
use tokio::net::TcpListener;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub items: ItemService,
    pub products: ProductService,
    pub persons: PersonService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<MemoryStore>) -> Self {
        Self {
            config: Arc::new(config),
            items: ItemService::new(store.clone(), store.clone()),
            products: ProductService::new(store.clone()),
            persons: PersonService::new(store),
        }
    }

    /// Acting user; sign-in is not part of this server
    pub fn user_id(&self) -> u64 {
        self.config.user.default_user_id
    }

    pub fn context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new(operation).with_user_id(self.user_id())
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::analytics::{api_analytics, htmx_analytics_range, page_analytics};
    use routes::items::{htmx_item_add, htmx_item_change, htmx_item_delete, htmx_items_list, page_diary};
    use routes::persons::{htmx_person_add, htmx_person_toggle, htmx_persons_list, page_persons};
    use routes::products::{htmx_product_add, htmx_product_copy, htmx_product_delete, htmx_products_list, page_products};
    use routes::settings::{api_settings, page_settings};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/analytics", get(api_analytics))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(page_diary))
        .route("/products", get(page_products).post(htmx_product_add).delete(htmx_product_delete))
        .route("/analytics", get(page_analytics))
        .route("/persons", get(page_persons).post(htmx_person_add))
        .route("/settings", get(page_settings))
        // HTMX partial routes
        .route(
            "/items",
            get(htmx_items_list)
                .post(htmx_item_add)
                .put(htmx_item_change)
                .delete(htmx_item_delete),
        )
        .route("/products/list", get(htmx_products_list))
        .route("/products/copy", get(htmx_product_copy))
        .route("/persons/list", get(htmx_persons_list))
        .route("/persons/toggle", post(htmx_person_toggle))
        .route("/analytics/range", get(htmx_analytics_range))
        .fallback(not_found)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound {
        resource: uri.path().to_string(),
    }
}

/// Log `|status| METHOD path` for every request
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    log::info!("|{}| {} {}", response.status().as_u16(), method, path);
    response
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Product Diary</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        diary_utils::escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Diary"),
        ("/products", "Products"),
        ("/analytics", "Analytics"),
        ("/persons", "Persons"),
        ("/settings", "Settings"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-emerald-600'>Product Diary</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active { "bg-emerald-50 text-emerald-600" } else { "text-gray-600 hover:bg-gray-50" };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='block px-3 py-2 rounded-lg {}'>{}</a></li>"#,
            path, active_class, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Check if request is from HTMX (partial page update)
fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!("<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>", inner_content)
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

/// Start the HTTP server
///
/// Binds to `server.host:server.port` and serves until the process receives
/// Ctrl-C.
pub async fn start_server(config: Config, store: Arc<MemoryStore>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting diary server on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, StatusCode};
    use chrono::NaiveDate;
    use diary_core::{ItemStore, NewItem, NewProduct, ProductStore};
    use tower::ServiceExt;

    fn state() -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (AppState::new(Config::default(), store.clone()), store)
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let request = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn seed_product(store: &MemoryStore) -> u64 {
        let product = NewProduct {
            product_title: "Buckwheat".to_string(),
            product_calories: 300.0,
            product_fats: 3.0,
            product_carbs: 60.0,
            product_proteins: 12.0,
        };
        store.add_product(1, product).await.unwrap().product_id
    }

    #[tokio::test]
    async fn test_health_check() {
        let (state, _) = state();
        let (status, _, body) = send(&state, Method::GET, "/api/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_pages_render_full_and_partial() {
        let (state, _) = state();
        for path in ["/", "/products", "/analytics", "/persons", "/settings"] {
            let (status, _, body) = send(&state, Method::GET, path, "").await;
            assert_eq!(status, StatusCode::OK, "{}", path);
            assert!(body.contains("<!DOCTYPE html>"), "{}", path);
        }

        let request = axum::http::Request::builder()
            .uri("/settings")
            .header("hx-request", "true")
            .body(Body::empty())
            .unwrap();
        let response = create_router(state).oneshot(request).await.unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!String::from_utf8_lossy(&bytes).contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_add_item_then_list_with_oob_analytics() {
        let (state, store) = state();
        let product_id = seed_product(&store).await;

        let form = format!("product_id={}&item_date=2024-06-01&item_cost=4.5&item_amount=2", product_id);
        let (status, _, body) = send(&state, Method::POST, "/items", &form).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Buckwheat"));

        let (status, _, body) = send(&state, Method::GET, "/items?item_date=2024-06-01", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Buckwheat"));
        assert!(body.contains("hx-swap-oob"));
        assert!(body.contains("$9.00"));
        assert!(body.contains("600.0"));
    }

    #[tokio::test]
    async fn test_change_item_sets_trigger_header() {
        let (state, store) = state();
        let product_id = seed_product(&store).await;
        let form = format!("product_id={}&item_date=2024-06-01&item_cost=1", product_id);
        send(&state, Method::POST, "/items", &form).await;

        let (status, headers, _) = send(&state, Method::PUT, "/items", "item_id=1&item_cost=3.25").await;
        assert_eq!(status, StatusCode::OK);
        let trigger = headers.get("hx-trigger").unwrap().to_str().unwrap();
        let value: serde_json::Value = serde_json::from_str(trigger).unwrap();
        assert_eq!(value["setTempValues"]["item_cost"], 3.25);
        assert_eq!(value["setTempValues"]["product_id"], product_id);
    }

    #[tokio::test]
    async fn test_change_to_my_purchase_keeps_person() {
        let (state, store) = state();
        let product_id = seed_product(&store).await;
        send(&state, Method::POST, "/persons", "person_name=Anna").await;
        let form = format!("product_id={}&item_date=2024-06-01&item_cost=2&item_type=2&person_id=1", product_id);
        let (status, _, _) = send(&state, Method::POST, "/items", &form).await;
        assert_eq!(status, StatusCode::OK);

        let (status, headers, _) = send(&state, Method::PUT, "/items", "item_id=1&item_type=1&person_id=0").await;
        assert_eq!(status, StatusCode::OK);
        let trigger = headers.get("hx-trigger").unwrap().to_str().unwrap();
        let value: serde_json::Value = serde_json::from_str(trigger).unwrap();
        assert_eq!(value["setTempValues"]["item_type"], 1);
        assert_eq!(value["setTempValues"]["person_id"], 1);
    }

    #[tokio::test]
    async fn test_missing_item_is_unprocessable() {
        let (state, _) = state();
        let (status, _, _) = send(&state, Method::DELETE, "/items?item_id=99", "").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _, _) = send(&state, Method::POST, "/items", "product_id=1&item_date=2024-06-01").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _, _) = send(&state, Method::GET, "/items?item_date=yesterday", "").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_product_form_errors() {
        let (state, _) = state();
        let (status, _, body) = send(&state, Method::POST, "/products", "product_title=Tea&product_calories=2000").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("product_title-error"));
        assert!(body.contains("product_calories-error"));

        let (status, _, body) = send(&state, Method::POST, "/products", "product_title=Green+tea&product_calories=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Green tea"));

        let (_, _, body) = send(&state, Method::GET, "/products/list?search_query=GREEN", "").await;
        assert!(body.contains("Green tea"));
    }

    #[tokio::test]
    async fn test_analytics_json_and_data_integrity() {
        let (state, store) = state();
        let product_id = seed_product(&store).await;
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let item = NewItem {
            user_id: 1,
            product_id,
            item_date: date,
            item_cost: 2.0,
            item_amount: 1.0,
            item_type: 1,
            person_id: 0,
        };
        store.add_item(item.clone()).await.unwrap();

        let (status, _, body) = send(&state, Method::GET, "/api/analytics?item_date_from=2024-06-01&item_date_to=2024-06-30", "").await;
        assert_eq!(status, StatusCode::OK);
        let analytics: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(analytics["total_spent"], 2.0);

        // Stored rows bypass validation, so an unknown tag can exist
        store.add_item(NewItem { item_type: 9, ..item }).await.unwrap();
        let (status, _, body) = send(&state, Method::GET, "/analytics/range?item_date_from=2024-06-01&item_date_to=2024-06-30", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("item type"));
    }

    #[tokio::test]
    async fn test_persons_add_and_toggle() {
        let (state, _) = state();
        let (status, _, body) = send(&state, Method::POST, "/persons", "person_name=Anna").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Anna"));

        let (status, _, _) = send(&state, Method::POST, "/persons", "person_name=Anna").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _, body) = send(&state, Method::POST, "/persons/toggle", "person_name=Anna").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("hidden"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (state, _) = state();
        let (status, _, _) = send(&state, Method::GET, "/nope", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
