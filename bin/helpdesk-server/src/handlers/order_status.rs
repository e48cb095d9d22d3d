use std::fmt::Write;

use helpdesk_intent::Entities;

use crate::entities::CatalogStore;
use crate::handlers::{long_date, or_unknown};

pub const FAILURE: &str = "I encountered an issue checking the order status. Please try again.";
pub const MISSING_ID: &str = "To check your order status, please provide your order ID. For example: 'What's the status of order 12345?'";

/// Status of the order named in `entities.order_id`.
///
/// A non-numeric id is answered without querying the store.
pub async fn answer<S: CatalogStore>(store: &S, entities: &Entities) -> Result<String, sqlx::Error> {
    let Some(raw_id) = entities.order_id.as_deref() else {
        return Ok(MISSING_ID.to_owned());
    };
    let trimmed = raw_id.trim();
    let Ok(order_id) = trimmed.parse::<i64>() else {
        // All digits but out of range: no such order can exist.
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(not_found(trimmed));
        }
        return Ok(format!(
            "The order ID '{raw_id}' doesn't appear to be valid. Please provide a numeric order ID."
        ));
    };

    let Some(order) = store.find_order(order_id).await? else {
        return Ok(not_found(&order_id.to_string()));
    };
    let lines = store.order_item_lines(order_id).await?;

    let mut reply = format!("**Order #{order_id} Status:**\n\n");
    let _ = writeln!(reply, "Status: {}", or_unknown(order.status.as_deref()));
    let _ = writeln!(
        reply,
        "Order Date: {}",
        order.created_at.as_ref().map_or_else(|| "N/A".to_owned(), long_date)
    );
    if let Some(shipped) = &order.shipped_at {
        let _ = writeln!(reply, "Shipped Date: {}", long_date(shipped));
    }
    if let Some(delivered) = &order.delivered_at {
        let _ = writeln!(reply, "Delivered Date: {}", long_date(delivered));
    }
    let _ = writeln!(
        reply,
        "Number of Items: {}\n",
        order.num_of_item.map_or_else(|| "N/A".to_owned(), |n| n.to_string())
    );

    if !lines.is_empty() {
        reply.push_str("**Items in this order:**\n");
        for line in &lines {
            let _ = writeln!(
                reply,
                "- {} (Status: {})",
                or_unknown(line.product_name.as_deref()),
                or_unknown(line.status.as_deref()),
            );
        }
    }
    Ok(reply)
}

fn not_found(order_id: &str) -> String {
    format!("I couldn't find an order with ID {order_id}. Please double-check the order ID and try again.")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::{Seed, temp_store};

    fn asking_for(id: &str) -> Entities {
        Entities {
            order_id: Some(id.to_owned()),
            ..Entities::default()
        }
    }

    #[tokio::test]
    async fn missing_id_prompts() {
        let (_dir, store) = temp_store().await;
        assert_eq!(answer(&store, &Entities::default()).await.unwrap(), MISSING_ID);
    }

    #[tokio::test]
    async fn non_numeric_id_is_invalid() {
        let (_dir, store) = temp_store().await;
        let reply = answer(&store, &asking_for("ABC-12")).await.unwrap();
        assert_eq!(
            reply,
            "The order ID 'ABC-12' doesn't appear to be valid. Please provide a numeric order ID."
        );
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let (_dir, store) = temp_store().await;
        let reply = answer(&store, &asking_for("99")).await.unwrap();
        assert_eq!(
            reply,
            "I couldn't find an order with ID 99. Please double-check the order ID and try again."
        );
    }

    #[tokio::test]
    async fn out_of_range_digits_are_not_found() {
        let (_dir, store) = temp_store().await;
        let reply = answer(&store, &asking_for("99999999999999999999")).await.unwrap();
        assert_eq!(
            reply,
            "I couldn't find an order with ID 99999999999999999999. Please double-check the order ID and try again."
        );
    }

    #[tokio::test]
    async fn renders_dates_and_items() {
        let (_dir, store) = temp_store().await;
        let seed = Seed::new(&store);
        seed.product(7, "Classic T-Shirt", "Basics", "Tops", 19.99).await;
        seed.product(8, "Cap", "Hatco", "Accessories", 9.5).await;
        seed.order(
            12345,
            "Complete",
            Some("2023-01-15 10:30:00 UTC"),
            Some("2023-01-17T08:00:00Z"),
            Some("2023-01-20 14:00:00"),
            2,
        )
        .await;
        seed.order_item(1, 12345, 7, "Complete").await;
        seed.order_item(2, 12345, 8, "Returned").await;

        let reply = answer(&store, &asking_for(" 12345 ")).await.unwrap();
        assert_eq!(
            reply,
            "**Order #12345 Status:**\n\n\
             Status: Complete\n\
             Order Date: January 15, 2023\n\
             Shipped Date: January 17, 2023\n\
             Delivered Date: January 20, 2023\n\
             Number of Items: 2\n\n\
             **Items in this order:**\n\
             - Classic T-Shirt (Status: Complete)\n\
             - Cap (Status: Returned)\n"
        );
    }

    #[tokio::test]
    async fn absent_dates_are_omitted() {
        let (_dir, store) = temp_store().await;
        let seed = Seed::new(&store);
        seed.order(5, "Processing", None, None, None, 1).await;

        let reply = answer(&store, &asking_for("5")).await.unwrap();
        assert!(reply.contains("Order Date: N/A\n"));
        assert!(!reply.contains("Shipped Date"));
        assert!(!reply.contains("Delivered Date"));
        assert!(!reply.contains("Items in this order"));
    }
}
