//! Services sitting between HTTP handlers and the stores
//!
//! They validate input, apply defaults, check cross-entity rules and map
//! store outcomes onto `CoreError`.

use std::sync::Arc;

use crate::analytics::aggregate;
use crate::error::{CoreError, CoreResult};
use crate::models::{
    Analytics, ItemChange, ItemType, ItemsQuery, ItemsRangeQuery, LedgerEntry, NewItem,
    NewProduct, Person, Product,
};
use crate::store::{ItemStore, PersonStore, ProductStore};
use crate::validation::{
    parse_item_type, validate_amount, validate_cost, validate_id, validate_person_name,
    validate_product,
};

/// Item operations and analytics
#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemStore>,
    persons: Arc<dyn PersonStore>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemStore>, persons: Arc<dyn PersonStore>) -> Self {
        Self { items, persons }
    }

    /// Person types need a person of the same user
    async fn check_person_for_type(&self, item_type: ItemType, person_id: u64, user_id: u64) -> CoreResult<()> {
        if person_id == 0 {
            if item_type.requires_person() {
                return Err(CoreError::validation(
                    "person_id",
                    format!("a person is required for '{}'", item_type.label()),
                ));
            }
            return Ok(());
        }
        match self.persons.get_person(person_id, user_id).await {
            Ok(_) => Ok(()),
            Err(CoreError::NotFound { .. }) => Err(CoreError::unprocessable(format!(
                "person {} does not exist",
                person_id
            ))),
            Err(e) => Err(e),
        }
    }

    /// Re-read an item right after writing it
    async fn fetch_written(&self, item_id: u64, user_id: u64) -> CoreResult<LedgerEntry> {
        self.items
            .get_item(item_id, user_id)
            .await
            .map_err(|e| CoreError::Internal {
                message: format!("item {} unreadable after write: {}", item_id, e),
            })
    }

    pub async fn add_item(&self, mut item: NewItem) -> CoreResult<LedgerEntry> {
        validate_id("user_id", item.user_id)?;
        validate_id("product_id", item.product_id)?;
        validate_cost(item.item_cost)?;

        if item.item_amount == 0.0 {
            item.item_amount = 1.0;
        }
        validate_amount(item.item_amount)?;

        if item.item_type == 0 {
            item.item_type = ItemType::MyPurchase.as_u8();
        }
        let item_type = parse_item_type(item.item_type)?;
        self.check_person_for_type(item_type, item.person_id, item.user_id).await?;

        let stored = self.items.add_item(item).await?;
        log::debug!("Added item {} for user {}", stored.item_id, stored.user_id);
        self.fetch_written(stored.item_id, stored.user_id).await
    }

    pub async fn change_item(&self, change: ItemChange) -> CoreResult<LedgerEntry> {
        validate_id("item_id", change.item_id)?;
        validate_id("user_id", change.user_id)?;
        if change.is_empty() {
            return Err(CoreError::unprocessable("no fields to change"));
        }
        if let Some(product_id) = change.product_id {
            validate_id("product_id", product_id)?;
        }
        if let Some(cost) = change.item_cost {
            validate_cost(cost)?;
        }
        if let Some(amount) = change.item_amount {
            validate_amount(amount)?;
        }

        let current = match self.items.get_item(change.item_id, change.user_id).await {
            Ok(entry) => entry,
            Err(CoreError::NotFound { .. }) => {
                return Err(CoreError::unprocessable(format!("item {} does not exist", change.item_id)))
            }
            Err(e) => return Err(e),
        };

        let item_type = parse_item_type(change.item_type.unwrap_or(current.item_type))?;
        let person_id = change.person_id.unwrap_or(current.person_id);
        self.check_person_for_type(item_type, person_id, change.user_id).await?;

        if !self.items.change_item(&change).await? {
            return Err(CoreError::unprocessable(format!("item {} does not exist", change.item_id)));
        }
        self.fetch_written(change.item_id, change.user_id).await
    }

    pub async fn delete_item(&self, item_id: u64, user_id: u64) -> CoreResult<()> {
        validate_id("item_id", item_id)?;
        if !self.items.delete_item(item_id, user_id).await? {
            return Err(CoreError::unprocessable(format!("item {} does not exist", item_id)));
        }
        Ok(())
    }

    pub async fn get_items(&self, query: &ItemsQuery) -> CoreResult<Vec<LedgerEntry>> {
        validate_id("user_id", query.user_id)?;
        self.items.items_on_date(query).await
    }

    /// Summarize entries that were already fetched
    pub fn analytics(&self, entries: &[LedgerEntry]) -> CoreResult<Analytics> {
        aggregate(entries)
    }

    /// Fetch the inclusive range and summarize it
    pub async fn analytics_range(&self, query: &ItemsRangeQuery) -> CoreResult<Analytics> {
        validate_id("user_id", query.user_id)?;
        let entries = self.items.items_in_range(query).await?;
        aggregate(&entries)
    }

    /// Items of a day together with their analytics
    pub async fn items_with_analytics(&self, query: &ItemsQuery) -> CoreResult<(Vec<LedgerEntry>, Analytics)> {
        let entries = self.get_items(query).await?;
        let analytics = self.analytics(&entries)?;
        Ok((entries, analytics))
    }
}

/// Product catalog operations
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    pub async fn add_product(&self, user_id: u64, product: NewProduct) -> CoreResult<Product> {
        validate_id("user_id", user_id)?;
        validate_product(&product)?;
        let product = self.products.add_product(user_id, product).await?;
        log::debug!("Added product {} '{}'", product.product_id, product.product_title);
        Ok(product)
    }

    pub async fn get_product(&self, product_id: u64) -> CoreResult<Product> {
        validate_id("product_id", product_id)?;
        self.products.get_product(product_id).await
    }

    pub async fn list_products(&self, search_query: &str) -> CoreResult<Vec<Product>> {
        self.products.list_products(search_query).await
    }

    pub async fn delete_product(&self, product_id: u64, user_id: u64) -> CoreResult<()> {
        validate_id("product_id", product_id)?;
        if !self.products.delete_product(product_id, user_id).await? {
            return Err(CoreError::unprocessable(format!("product {} does not exist", product_id)));
        }
        Ok(())
    }
}

/// Person operations
#[derive(Clone)]
pub struct PersonService {
    persons: Arc<dyn PersonStore>,
}

impl PersonService {
    pub fn new(persons: Arc<dyn PersonStore>) -> Self {
        Self { persons }
    }

    pub async fn add_person(&self, user_id: u64, person_name: &str) -> CoreResult<Person> {
        validate_id("user_id", user_id)?;
        validate_person_name(person_name)?;
        self.persons.add_person(user_id, person_name).await
    }

    pub async fn list_persons(&self, user_id: u64) -> CoreResult<Vec<Person>> {
        self.persons.list_persons(user_id).await
    }

    pub async fn toggle_hidden(&self, user_id: u64, person_name: &str) -> CoreResult<Person> {
        validate_person_name(person_name)?;
        self.persons.toggle_person_hidden(user_id, person_name).await
    }
}
