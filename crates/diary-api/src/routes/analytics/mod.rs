//! Analytics routes - Range summary as a page, HTMX fragment and JSON

pub mod api;
pub mod page;

pub use api::{api_analytics, htmx_analytics_range};
pub use page::page_analytics;
