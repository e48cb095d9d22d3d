use std::fmt::Write;

use helpdesk_intent::Entities;

use crate::entities::CatalogStore;
use crate::handlers::{or_unknown, price};

pub const FAILURE: &str = "I encountered an issue checking stock availability. Please try again.";
pub const MISSING_NAME: &str = "To check stock availability, please specify the product name. For example: 'How many Classic T-Shirts are left in stock?'";

/// Most matches listed before asking the user to narrow the name down.
const MAX_LISTED: usize = 5;

/// Available stock of the products whose names contain `entities.product_name`.
pub async fn answer<S: CatalogStore>(store: &S, entities: &Entities) -> Result<String, sqlx::Error> {
    let Some(name) = entities.product_name.as_deref() else {
        return Ok(MISSING_NAME.to_owned());
    };

    let products = store.search_products_by_name(name).await?;
    if products.is_empty() {
        return Ok(format!(
            "I couldn't find any products matching '{name}'. Could you please check the spelling or try a different product name?"
        ));
    }
    if products.len() > MAX_LISTED {
        return Ok(format!(
            "I found {} products matching '{name}'. Please be more specific with the product name.",
            products.len()
        ));
    }

    let mut reply = format!("**Stock information for products matching '{name}':**\n\n");
    for product in &products {
        let available = store.available_stock(product.id).await?;
        let _ = write!(
            reply,
            "**{}** by {}\n- Available Stock: {available} units\n- Price: {}\n- Category: {}\n\n",
            or_unknown(product.name.as_deref()),
            or_unknown(product.brand.as_deref()),
            price(product.retail_price),
            or_unknown(product.category.as_deref()),
        );
    }
    Ok(reply)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::{Seed, temp_store};

    fn looking_for(name: &str) -> Entities {
        Entities {
            product_name: Some(name.to_owned()),
            ..Entities::default()
        }
    }

    #[tokio::test]
    async fn missing_name_prompts() {
        let (_dir, store) = temp_store().await;
        assert_eq!(answer(&store, &Entities::default()).await.unwrap(), MISSING_NAME);
    }

    #[tokio::test]
    async fn no_match() {
        let (_dir, store) = temp_store().await;
        let reply = answer(&store, &looking_for("kayak")).await.unwrap();
        assert!(reply.starts_with("I couldn't find any products matching 'kayak'."));
    }

    #[tokio::test]
    async fn more_than_five_matches_asks_to_narrow_down() {
        let (_dir, store) = temp_store().await;
        let seed = Seed::new(&store);
        for id in 1..=6 {
            seed.product(id, &format!("Classic Tee {id}"), "Basics", "Tops", 19.99).await;
        }
        let reply = answer(&store, &looking_for("classic tee")).await.unwrap();
        assert_eq!(
            reply,
            "I found 6 products matching 'classic tee'. Please be more specific with the product name."
        );
        assert!(!reply.contains("Available Stock"));
    }

    #[tokio::test]
    async fn lists_stock_for_each_match() {
        let (_dir, store) = temp_store().await;
        let seed = Seed::new(&store);
        seed.product(1, "Classic T-Shirt", "Basics", "Tops", 19.99).await;
        seed.product(2, "Classic T-Shirt Long Sleeve", "Basics", "Tops", 24.0).await;
        seed.product(3, "Hoodie", "Acme", "Outerwear", 45.0).await;
        seed.inventory(1, 2, 3).await;

        let reply = answer(&store, &looking_for("Classic T-Shirt")).await.unwrap();
        assert_eq!(
            reply,
            "**Stock information for products matching 'Classic T-Shirt':**\n\n\
             **Classic T-Shirt** by Basics\n- Available Stock: 3 units\n- Price: $19.99\n- Category: Tops\n\n\
             **Classic T-Shirt Long Sleeve** by Basics\n- Available Stock: 0 units\n- Price: $24.00\n- Category: Tops\n\n"
        );
    }
}
