//! Person routes - List, add and hide persons

pub mod api;
pub mod page;

pub use api::{htmx_person_add, htmx_person_toggle, htmx_persons_list};
pub use page::page_persons;
