//! Item routes - Diary page and item fragments
//!
//! Features:
//! - Item rows of one day with search
//! - Day analytics swapped out-of-band into `#analytics`
//! - Add, inline change and delete of items
//!
//! Structure:
//! - api.rs: HTMX endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{htmx_item_add, htmx_item_change, htmx_item_delete, htmx_items_list, item_row};
pub use page::page_diary;
