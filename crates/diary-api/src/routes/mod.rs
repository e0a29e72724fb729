//! Route modules for the diary server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: HTMX fragments and JSON endpoints
//! - page.rs: Full page rendering

pub mod analytics;
pub mod items;
pub mod persons;
pub mod products;
pub mod settings;
