use chrono::{DateTime, Utc};

/// A row in the `products` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: i64,
    pub cost: Option<f64>,
    pub category: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub retail_price: Option<f64>,
    pub department: Option<String>,
    pub sku: Option<String>,
    pub distribution_center_id: Option<i64>,
}

/// A product together with how many of its inventory items have sold.
#[derive(Debug, Clone, PartialEq)]
pub struct TopProductRow {
    pub product: ProductRecord,
    pub units_sold: i64,
}

/// A row in the `orders` table.  Unparseable timestamps read as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: i64,
    pub user_id: Option<i64>,
    /// `Processing`, `Shipped`, `Complete`, `Returned`, `Cancelled`, ...
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
    pub num_of_item: Option<i64>,
}

/// One `order_items` row joined with its product's name.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemLine {
    pub item_id: i64,
    pub product_name: Option<String>,
    pub status: Option<String>,
}
