//! Fixtures shared by the unit and router tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use helpdesk_intent::IntentClassifier;
use tempfile::TempDir;

use crate::config::Config;
use crate::conversation::ConversationManager;
use crate::entities::AnyStore;
use crate::state::AppState;

/// A migrated SQLite store in a fresh temp directory.  Keep the `TempDir`
/// alive for as long as the store is used.
pub async fn temp_store() -> (TempDir, AnyStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("helpdesk.db").display());
    let store = AnyStore::connect(&url).await.expect("open sqlite store");
    (dir, store)
}

/// Config with every default except a throwaway database URL.
pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "HELPDESK_DATABASE_URL" => Some("sqlite::memory:".to_owned()),
        _ => None,
    })
}

/// Application state over `store` with keyword-only classification.
pub fn test_state(store: AnyStore, config: Config) -> Arc<AppState> {
    test_state_with(store, config, IntentClassifier::keyword_only())
}

pub fn test_state_with(store: AnyStore, config: Config, classifier: IntentClassifier) -> Arc<AppState> {
    let store = Arc::new(store);
    Arc::new(AppState {
        config: Arc::new(config),
        conversations: ConversationManager::new(Arc::clone(&store)),
        store,
        classifier: Arc::new(classifier),
    })
}

/// Writes catalog rows the way the bulk loader would.
pub struct Seed<'a> {
    store: &'a AnyStore,
    next_inventory_id: AtomicI64,
}

impl<'a> Seed<'a> {
    pub fn new(store: &'a AnyStore) -> Self {
        Self {
            store,
            next_inventory_id: AtomicI64::new(1),
        }
    }

    pub async fn product(&self, id: i64, name: &str, brand: &str, category: &str, price: f64) {
        sqlx::query(
            "INSERT INTO products (id, cost, category, name, brand, retail_price, department, sku) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(price / 2.0)
        .bind(category)
        .bind(name)
        .bind(brand)
        .bind(price)
        .bind("Unisex")
        .bind(format!("SKU-{id}"))
        .execute(self.store.pool())
        .await
        .expect("insert product");
    }

    /// Add `sold` sold and `unsold` in-stock inventory items for a product.
    pub async fn inventory(&self, product_id: i64, sold: usize, unsold: usize) {
        let sold_at = std::iter::repeat_n(Some("2023-02-01 12:00:00"), sold);
        let unsold_at = std::iter::repeat_n(None, unsold);
        for sold_at in sold_at.chain(unsold_at) {
            let id = self.next_inventory_id.fetch_add(1, Ordering::Relaxed);
            sqlx::query(
                "INSERT INTO inventory_items (id, product_id, created_at, sold_at) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(id)
            .bind(product_id)
            .bind("2023-01-01 00:00:00")
            .bind(sold_at)
            .execute(self.store.pool())
            .await
            .expect("insert inventory item");
        }
    }

    pub async fn order(
        &self,
        order_id: i64,
        status: &str,
        created_at: Option<&str>,
        shipped_at: Option<&str>,
        delivered_at: Option<&str>,
        num_of_item: i64,
    ) {
        sqlx::query(
            "INSERT INTO orders (order_id, status, created_at, shipped_at, delivered_at, num_of_item) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(status)
        .bind(created_at)
        .bind(shipped_at)
        .bind(delivered_at)
        .bind(num_of_item)
        .execute(self.store.pool())
        .await
        .expect("insert order");
    }

    pub async fn order_item(&self, id: i64, order_id: i64, product_id: i64, status: &str) {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, status) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(order_id)
        .bind(product_id)
        .bind(status)
        .execute(self.store.pool())
        .await
        .expect("insert order item");
    }
}
