use std::fmt::Write;

use crate::entities::CatalogStore;
use crate::handlers::{or_unknown, price};

pub const FAILURE: &str = "I encountered an issue retrieving the top products. Please try again.";
pub const NO_SALES: &str = "I couldn't find any sales data at the moment. Please try again later.";

const TOP_N: i64 = 5;

/// The five best-selling products by sold inventory items.
pub async fn answer<S: CatalogStore>(store: &S) -> Result<String, sqlx::Error> {
    let top = store.top_selling_products(TOP_N).await?;
    if top.is_empty() {
        return Ok(NO_SALES.to_owned());
    }

    let mut reply = String::from("Here are the top 5 most sold products:\n\n");
    for (rank, row) in top.iter().enumerate() {
        let p = &row.product;
        let _ = write!(
            reply,
            "{}. **{}** by {}\n   - Category: {}\n   - Price: {}\n   - Units Sold: {}\n\n",
            rank + 1,
            or_unknown(p.name.as_deref()),
            or_unknown(p.brand.as_deref()),
            or_unknown(p.category.as_deref()),
            price(p.retail_price),
            row.units_sold,
        );
    }
    Ok(reply)
}
