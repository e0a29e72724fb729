//! Storage traits and the in-memory store with JSON snapshot persistence

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use diary_config::DataConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{
    Item, ItemChange, ItemsQuery, ItemsRangeQuery, LedgerEntry, NewItem, NewProduct, Person,
    Product,
};
use crate::validation::normalize_search;

/// Item persistence
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert an item; referenced product and person must exist
    async fn add_item(&self, item: NewItem) -> CoreResult<Item>;

    /// Joined item owned by `user_id`
    async fn get_item(&self, item_id: u64, user_id: u64) -> CoreResult<LedgerEntry>;

    async fn items_on_date(&self, query: &ItemsQuery) -> CoreResult<Vec<LedgerEntry>>;

    async fn items_in_range(&self, query: &ItemsRangeQuery) -> CoreResult<Vec<LedgerEntry>>;

    /// Apply the given fields; `Ok(false)` if no such item
    async fn change_item(&self, change: &ItemChange) -> CoreResult<bool>;

    /// `Ok(false)` if no such item
    async fn delete_item(&self, item_id: u64, user_id: u64) -> CoreResult<bool>;
}

/// Product catalog persistence
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn add_product(&self, user_id: u64, product: NewProduct) -> CoreResult<Product>;

    /// Non-deleted product by id, any owner
    async fn get_product(&self, product_id: u64) -> CoreResult<Product>;

    /// Non-deleted products matching the search query
    async fn list_products(&self, search_query: &str) -> CoreResult<Vec<Product>>;

    /// Soft delete; `Ok(false)` if the user owns no such product
    async fn delete_product(&self, product_id: u64, user_id: u64) -> CoreResult<bool>;
}

/// Person persistence
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn add_person(&self, user_id: u64, person_name: &str) -> CoreResult<Person>;

    async fn get_person(&self, person_id: u64, user_id: u64) -> CoreResult<Person>;

    async fn list_persons(&self, user_id: u64) -> CoreResult<Vec<Person>>;

    /// Flip the hidden flag of the person with that name
    async fn toggle_person_hidden(&self, user_id: u64, person_name: &str) -> CoreResult<Person>;
}

/// All tables, also the on-disk snapshot layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct Tables {
    #[serde(default)]
    items: BTreeMap<u64, Item>,
    #[serde(default)]
    products: BTreeMap<u64, Product>,
    #[serde(default)]
    persons: BTreeMap<u64, Person>,
    #[serde(default)]
    next_item_id: u64,
    #[serde(default)]
    next_product_id: u64,
    #[serde(default)]
    next_person_id: u64,
}

impl Tables {
    /// Make id counters ahead of every stored key
    fn repair_counters(&mut self) {
        fn next<T>(map: &BTreeMap<u64, T>, current: u64) -> u64 {
            let after_max = map.keys().next_back().map_or(1, |max| max + 1);
            current.max(after_max).max(1)
        }
        self.next_item_id = next(&self.items, self.next_item_id);
        self.next_product_id = next(&self.products, self.next_product_id);
        self.next_person_id = next(&self.persons, self.next_person_id);
    }

    fn join(&self, item: &Item) -> Option<LedgerEntry> {
        let product = self.products.get(&item.product_id)?;
        let person_name = if item.person_id == 0 {
            String::new()
        } else {
            self.persons
                .get(&item.person_id)
                .map(|p| p.person_name.clone())
                .unwrap_or_default()
        };

        Some(LedgerEntry {
            item_id: item.item_id,
            user_id: item.user_id,
            product_id: item.product_id,
            item_date: item.item_date,
            item_cost: item.item_cost,
            item_amount: item.item_amount,
            item_type: item.item_type,
            person_id: item.person_id,
            person_name,
            product_title: product.product_title.clone(),
            product_calories: product.product_calories,
            product_fats: product.product_fats,
            product_carbs: product.product_carbs,
            product_proteins: product.product_proteins,
        })
    }

    fn joined<'a>(&'a self, filter: impl Fn(&Item) -> bool + 'a) -> Vec<LedgerEntry> {
        self.items
            .values()
            .filter(|item| filter(item))
            .filter_map(|item| {
                let entry = self.join(item);
                if entry.is_none() {
                    log::warn!("Item {} references missing product {}", item.item_id, item.product_id);
                }
                entry
            })
            .collect()
    }

    fn check_product(&self, product_id: u64) -> CoreResult<()> {
        match self.products.get(&product_id) {
            Some(p) if !p.is_deleted => Ok(()),
            _ => Err(CoreError::unprocessable(format!("product {} does not exist", product_id))),
        }
    }

    fn check_person(&self, person_id: u64, user_id: u64) -> CoreResult<()> {
        if person_id == 0 {
            return Ok(());
        }
        match self.persons.get(&person_id) {
            Some(p) if p.user_id == user_id => Ok(()),
            _ => Err(CoreError::unprocessable(format!("person {} does not exist", person_id))),
        }
    }
}

/// Product search haystack: title followed by its nutrient values
fn product_matches(product: &Product, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystack = format!(
        "{}{}{}{}{}",
        product.product_title,
        product.product_calories,
        product.product_fats,
        product.product_carbs,
        product.product_proteins
    );
    normalize_search(&haystack).contains(needle)
}

/// In-memory store shared by all three store traits
///
/// When opened with persistence enabled every mutation rewrites the JSON
/// snapshot. The table lock is never held across an await.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    snapshot_path: Option<PathBuf>,
    /// Serializes snapshot writes so the newest tables land last
    snapshot_lock: tokio::sync::Mutex<()>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store without persistence
    pub fn new() -> Self {
        let mut tables = Tables::default();
        tables.repair_counters();
        Self {
            tables: RwLock::new(tables),
            snapshot_path: None,
            snapshot_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Open the store described by the data configuration
    pub async fn open(config: &DataConfig) -> CoreResult<Self> {
        if !config.persist {
            log::info!("Persistence disabled, starting with an empty in-memory store");
            return Ok(Self::new());
        }
        Self::open_snapshot(config.path.join(&config.snapshot_file)).await
    }

    /// Load the snapshot at `path`, or start empty if it does not exist yet
    pub async fn open_snapshot(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let mut tables = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            let tables: Tables = serde_json::from_str(&content)?;
            log::info!(
                "Loaded snapshot {}: {} items, {} products, {} persons",
                path.display(),
                tables.items.len(),
                tables.products.len(),
                tables.persons.len()
            );
            tables
        } else {
            log::warn!("Snapshot {} not found, starting empty", path.display());
            Tables::default()
        };
        tables.repair_counters();

        Ok(Self {
            tables: RwLock::new(tables),
            snapshot_path: Some(path),
            snapshot_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    fn read(&self) -> CoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| CoreError::Internal {
            message: "store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> CoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| CoreError::Internal {
            message: "store lock poisoned".to_string(),
        })
    }

    /// Write the snapshot if persistence is enabled
    ///
    /// Runs after the table change is applied, so a failed write is logged
    /// rather than returned. The next successful write catches the file up.
    async fn persist(&self, operation: &str) {
        let Some(path) = self.snapshot_path.as_deref() else {
            return;
        };
        let _guard = self.snapshot_lock.lock().await;
        if let Err(e) = self.write_snapshot(path).await {
            let context = ErrorContext::new(operation)
                .with_data("snapshot", serde_json::json!(path.display().to_string()));
            DefaultErrorLogger.log_error(&e, &context);
        }
    }

    async fn write_snapshot(&self, path: &Path) -> CoreResult<()> {
        let content = {
            let tables = self.read()?;
            serde_json::to_string_pretty(&*tables)?
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path).await?;
        log::debug!("Snapshot written to {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn add_item(&self, new: NewItem) -> CoreResult<Item> {
        let item = {
            let mut tables = self.write()?;
            tables.check_product(new.product_id)?;
            tables.check_person(new.person_id, new.user_id)?;

            let item = Item {
                item_id: tables.next_item_id,
                user_id: new.user_id,
                product_id: new.product_id,
                item_date: new.item_date,
                item_cost: new.item_cost,
                item_amount: new.item_amount,
                item_type: new.item_type,
                person_id: new.person_id,
            };
            tables.next_item_id += 1;
            tables.items.insert(item.item_id, item.clone());
            item
        };
        self.persist("add_item").await;
        Ok(item)
    }

    async fn get_item(&self, item_id: u64, user_id: u64) -> CoreResult<LedgerEntry> {
        let tables = self.read()?;
        tables
            .items
            .get(&item_id)
            .filter(|item| item.user_id == user_id)
            .and_then(|item| tables.join(item))
            .ok_or_else(|| CoreError::not_found("item", item_id))
    }

    async fn items_on_date(&self, query: &ItemsQuery) -> CoreResult<Vec<LedgerEntry>> {
        let needle = normalize_search(&query.search_query);
        let tables = self.read()?;
        let entries = tables
            .joined(|item| item.user_id == query.user_id && item.item_date == query.item_date)
            .into_iter()
            .filter(|entry| {
                needle.is_empty()
                    || tables
                        .products
                        .get(&entry.product_id)
                        .map_or(false, |p| product_matches(p, &needle))
            })
            .collect();
        Ok(entries)
    }

    async fn items_in_range(&self, query: &ItemsRangeQuery) -> CoreResult<Vec<LedgerEntry>> {
        let tables = self.read()?;
        Ok(tables.joined(|item| {
            item.user_id == query.user_id
                && item.item_date >= query.item_date_from
                && item.item_date <= query.item_date_to
        }))
    }

    async fn change_item(&self, change: &ItemChange) -> CoreResult<bool> {
        {
            let mut tables = self.write()?;
            let Some(current) = tables
                .items
                .get(&change.item_id)
                .filter(|item| item.user_id == change.user_id)
                .cloned()
            else {
                return Ok(false);
            };

            let mut updated = current;
            if let Some(product_id) = change.product_id {
                tables.check_product(product_id)?;
                updated.product_id = product_id;
            }
            if let Some(person_id) = change.person_id {
                tables.check_person(person_id, change.user_id)?;
                updated.person_id = person_id;
            }
            if let Some(item_date) = change.item_date {
                updated.item_date = item_date;
            }
            if let Some(item_cost) = change.item_cost {
                updated.item_cost = item_cost;
            }
            if let Some(item_amount) = change.item_amount {
                updated.item_amount = item_amount;
            }
            if let Some(item_type) = change.item_type {
                updated.item_type = item_type;
            }
            tables.items.insert(updated.item_id, updated);
        }
        self.persist("change_item").await;
        Ok(true)
    }

    async fn delete_item(&self, item_id: u64, user_id: u64) -> CoreResult<bool> {
        let removed = {
            let mut tables = self.write()?;
            let owned = tables
                .items
                .get(&item_id)
                .map_or(false, |item| item.user_id == user_id);
            owned && tables.items.remove(&item_id).is_some()
        };
        if removed {
            self.persist("delete_item").await;
        }
        Ok(removed)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn add_product(&self, user_id: u64, new: NewProduct) -> CoreResult<Product> {
        let product = {
            let mut tables = self.write()?;
            let product = Product {
                product_id: tables.next_product_id,
                user_id,
                product_title: new.product_title.trim().to_string(),
                product_calories: new.product_calories,
                product_fats: new.product_fats,
                product_carbs: new.product_carbs,
                product_proteins: new.product_proteins,
                is_deleted: false,
            };
            tables.next_product_id += 1;
            tables.products.insert(product.product_id, product.clone());
            product
        };
        self.persist("add_product").await;
        Ok(product)
    }

    async fn get_product(&self, product_id: u64) -> CoreResult<Product> {
        let tables = self.read()?;
        tables
            .products
            .get(&product_id)
            .filter(|p| !p.is_deleted)
            .cloned()
            .ok_or_else(|| CoreError::not_found("product", product_id))
    }

    async fn list_products(&self, search_query: &str) -> CoreResult<Vec<Product>> {
        let needle = normalize_search(search_query);
        let tables = self.read()?;
        Ok(tables
            .products
            .values()
            .filter(|p| !p.is_deleted && product_matches(p, &needle))
            .cloned()
            .collect())
    }

    async fn delete_product(&self, product_id: u64, user_id: u64) -> CoreResult<bool> {
        let deleted = {
            let mut tables = self.write()?;
            match tables.products.get_mut(&product_id) {
                Some(p) if p.user_id == user_id && !p.is_deleted => {
                    p.is_deleted = true;
                    true
                }
                _ => false,
            }
        };
        if deleted {
            self.persist("delete_product").await;
        }
        Ok(deleted)
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn add_person(&self, user_id: u64, person_name: &str) -> CoreResult<Person> {
        let name = person_name.trim();
        let person = {
            let mut tables = self.write()?;
            let exists = tables
                .persons
                .values()
                .any(|p| p.user_id == user_id && p.person_name == name);
            if exists {
                return Err(CoreError::validation("person_name", "a person with this name already exists"));
            }

            let person = Person {
                person_id: tables.next_person_id,
                user_id,
                person_name: name.to_string(),
                is_hidden: false,
            };
            tables.next_person_id += 1;
            tables.persons.insert(person.person_id, person.clone());
            person
        };
        self.persist("add_person").await;
        Ok(person)
    }

    async fn get_person(&self, person_id: u64, user_id: u64) -> CoreResult<Person> {
        let tables = self.read()?;
        tables
            .persons
            .get(&person_id)
            .filter(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("person", person_id))
    }

    async fn list_persons(&self, user_id: u64) -> CoreResult<Vec<Person>> {
        let tables = self.read()?;
        Ok(tables
            .persons
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn toggle_person_hidden(&self, user_id: u64, person_name: &str) -> CoreResult<Person> {
        let name = person_name.trim();
        let person = {
            let mut tables = self.write()?;
            let person = tables
                .persons
                .values_mut()
                .find(|p| p.user_id == user_id && p.person_name == name)
                .ok_or_else(|| CoreError::unprocessable(format!("no person named {}", name)))?;
            person.is_hidden = !person.is_hidden;
            person.clone()
        };
        self.persist("toggle_person_hidden").await;
        Ok(person)
    }
}
