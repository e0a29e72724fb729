//! Product routes - Catalog list, add form with field errors, copy, soft delete

pub mod api;
pub mod page;

pub use api::{htmx_product_add, htmx_product_copy, htmx_product_delete, htmx_products_list};
pub use page::page_products;
