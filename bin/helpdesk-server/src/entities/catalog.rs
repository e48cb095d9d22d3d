//! Read-only queries over the store catalog (products, inventory, orders).

use std::future::Future;

use crate::entities::dao::{OrderItemLine, OrderRecord, ProductRecord, TopProductRow};
use crate::entities::{AnyStore, parse_timestamp};

pub trait CatalogStore: Send + Sync + 'static {
    /// Products ranked by sold inventory items, ties broken by product id.
    fn top_selling_products(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<TopProductRow>, sqlx::Error>> + Send;

    fn find_order(
        &self,
        order_id: i64,
    ) -> impl Future<Output = Result<Option<OrderRecord>, sqlx::Error>> + Send;

    /// Items of an order with their product names, by item id.
    fn order_item_lines(
        &self,
        order_id: i64,
    ) -> impl Future<Output = Result<Vec<OrderItemLine>, sqlx::Error>> + Send;

    /// Products whose name contains `fragment`, case-insensitively, by id.
    ///
    /// SQLite's `LOWER` folds ASCII letters only, so there a non-ASCII letter
    /// matches only when its case agrees with the stored name.
    fn search_products_by_name(
        &self,
        fragment: &str,
    ) -> impl Future<Output = Result<Vec<ProductRecord>, sqlx::Error>> + Send;

    /// Inventory items of `product_id` that have not sold.
    fn available_stock(&self, product_id: i64) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;

    fn product_count(&self) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;

    /// Non-empty categories, alphabetical.
    fn distinct_categories(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<String>, sqlx::Error>> + Send;

    /// Non-empty brands, alphabetical.
    fn distinct_brands(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<String>, sqlx::Error>> + Send;
}

const PRODUCT_COLUMNS: &str = "p.id, p.cost, p.category, p.name, p.brand, p.retail_price, \
                               p.department, p.sku, p.distribution_center_id";

type ProductRow = (
    i64,
    Option<f64>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<String>,
    Option<String>,
    Option<i64>,
);

fn product_from_row(row: ProductRow) -> ProductRecord {
    let (id, cost, category, name, brand, retail_price, department, sku, distribution_center_id) =
        row;
    ProductRecord {
        id,
        cost,
        category,
        name,
        brand,
        retail_price,
        department,
        sku,
        distribution_center_id,
    }
}

/// Escape LIKE metacharacters with `!` (paired with `ESCAPE '!'`).
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.to_lowercase().chars() {
        if matches!(c, '!' | '%' | '_') {
            pattern.push('!');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn opt_timestamp(raw: Option<String>) -> Option<chrono::DateTime<chrono::Utc>> {
    raw.as_deref().and_then(parse_timestamp)
}

impl CatalogStore for AnyStore {
    async fn top_selling_products(&self, limit: i64) -> Result<Vec<TopProductRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}, COUNT(ii.id) AS units_sold \
             FROM products p JOIN inventory_items ii ON ii.product_id = p.id \
             WHERE ii.sold_at IS NOT NULL \
             GROUP BY {PRODUCT_COLUMNS} \
             ORDER BY units_sold DESC, p.id ASC \
             LIMIT ?"
        );
        let rows: Vec<(
            i64,
            Option<f64>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<f64>,
            Option<String>,
            Option<String>,
            Option<i64>,
            i64,
        )> = sqlx::query_as(&sql).bind(limit).fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(id, cost, category, name, brand, price, department, sku, dc, units_sold)| {
                TopProductRow {
                    product: product_from_row((
                        id, cost, category, name, brand, price, department, sku, dc,
                    )),
                    units_sold,
                }
            })
            .collect())
    }

    async fn find_order(&self, order_id: i64) -> Result<Option<OrderRecord>, sqlx::Error> {
        let row: Option<(
            i64,
            Option<i64>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<i64>,
        )> = sqlx::query_as(
            "SELECT order_id, user_id, status, created_at, shipped_at, delivered_at, \
                    returned_at, num_of_item \
             FROM orders WHERE order_id = ?",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(order_id, user_id, status, created_at, shipped_at, delivered_at, returned_at, num_of_item)| {
                OrderRecord {
                    order_id,
                    user_id,
                    status,
                    created_at: opt_timestamp(created_at),
                    shipped_at: opt_timestamp(shipped_at),
                    delivered_at: opt_timestamp(delivered_at),
                    returned_at: opt_timestamp(returned_at),
                    num_of_item,
                }
            },
        ))
    }

    async fn order_item_lines(&self, order_id: i64) -> Result<Vec<OrderItemLine>, sqlx::Error> {
        let rows: Vec<(i64, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT oi.id, p.name, oi.status \
             FROM order_items oi LEFT JOIN products p ON p.id = oi.product_id \
             WHERE oi.order_id = ? ORDER BY oi.id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(item_id, product_name, status)| OrderItemLine {
                item_id,
                product_name,
                status,
            })
            .collect())
    }

    async fn search_products_by_name(&self, fragment: &str) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             WHERE LOWER(p.name) LIKE ? ESCAPE '!' ORDER BY p.id ASC"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(like_pattern(fragment))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(product_from_row).collect())
    }

    async fn available_stock(&self, product_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM inventory_items WHERE product_id = ? AND sold_at IS NULL",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn product_count(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn distinct_categories(&self, limit: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM products \
             WHERE category IS NOT NULL AND category <> '' \
             ORDER BY category ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    async fn distinct_brands(&self, limit: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT brand FROM products \
             WHERE brand IS NOT NULL AND brand <> '' \
             ORDER BY brand ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(b,)| b).collect())
    }
}
