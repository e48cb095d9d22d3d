use std::fmt::Write;

use crate::entities::CatalogStore;

pub const FAILURE: &str = "I encountered an issue loading our store overview. You can still ask me about order status, product availability, or our top-selling items.";

const FETCHED: i64 = 10;
const SHOWN: usize = 5;

/// Store overview: product count, a few categories and brands, capabilities.
pub async fn answer<S: CatalogStore>(store: &S) -> Result<String, sqlx::Error> {
    let total = store.product_count().await?;
    let categories = store.distinct_categories(FETCHED).await?;
    let brands = store.distinct_brands(FETCHED).await?;

    let mut reply = String::from("**Welcome to our Customer Support!**\n\n");
    let _ = write!(reply, "We have {total} products available in our store.\n\n");

    reply.push_str("**Popular Categories:**\n");
    for category in categories.iter().take(SHOWN) {
        let _ = writeln!(reply, "- {category}");
    }
    reply.push_str("\n**Popular Brands:**\n");
    for brand in brands.iter().take(SHOWN) {
        let _ = writeln!(reply, "- {brand}");
    }

    reply.push_str(
        "\n**What can I help you with today?**\n\
         - Check order status (provide order ID)\n\
         - View top-selling products\n\
         - Check product availability\n\
         - Browse products by category or brand\n",
    );
    Ok(reply)
}
