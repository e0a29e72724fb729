//! Diary domain: models, validation, analytics, storage and services

pub mod analytics;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time;
pub mod validation;

pub use analytics::aggregate;
pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};
pub use models::{
    Analytics, Item, ItemChange, ItemType, ItemsQuery, ItemsRangeQuery, LedgerEntry, NewItem,
    NewProduct, Person, PersonAnalytics, Product,
};
pub use services::{ItemService, PersonService, ProductService};
pub use store::{ItemStore, MemoryStore, PersonStore, ProductStore};
pub use time::DateRange;
