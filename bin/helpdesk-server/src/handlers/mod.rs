//! Query handlers: one per intent, each turning catalog reads into reply text.
//!
//! Handlers return `Result<String, sqlx::Error>`; [`respond`] swaps any error
//! for that handler's apology so a store hiccup never fails the chat request.

pub mod general;
pub mod order_status;
pub mod stock;
pub mod top_products;

use chrono::{DateTime, Utc};
use helpdesk_intent::{Intent, IntentAnalysis};
use tracing::warn;

use crate::entities::CatalogStore;

pub const CLARIFICATION: &str = "I'd be happy to help! Could you please clarify what you're looking for? \n\
\n\
I can assist you with:\n\
- **Order Status**: \"What's the status of order 12345?\"\n\
- **Top Products**: \"What are the most popular products?\"\n\
- **Stock Availability**: \"How many Classic T-Shirts are in stock?\"\n\
- **General Information**: Ask about our products, categories, or brands\n\
\n\
Please let me know how I can help you today!";

/// Compose the reply for an analysed message.
pub async fn respond<S: CatalogStore>(store: &S, analysis: &IntentAnalysis) -> String {
    let entities = &analysis.entities;
    let (outcome, apology) = match analysis.intent {
        Intent::TopProducts => (top_products::answer(store).await, top_products::FAILURE),
        Intent::OrderStatus => (order_status::answer(store, entities).await, order_status::FAILURE),
        Intent::StockInquiry => (stock::answer(store, entities).await, stock::FAILURE),
        Intent::GeneralInquiry => (general::answer(store).await, general::FAILURE),
        Intent::Unclear => return CLARIFICATION.to_owned(),
    };
    outcome.unwrap_or_else(|e| {
        warn!(intent = %analysis.intent, error = %e, "query handler failed; replying with apology");
        apology.to_owned()
    })
}

// ── shared rendering ─────────────────────────────────────────────────────────

pub(crate) fn or_unknown(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("Unknown")
}

pub(crate) fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |p| format!("${p:.2}"))
}

/// `January 15, 2023`
pub(crate) fn long_date(ts: &DateTime<Utc>) -> String {
    ts.format("%B %d, %Y").to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::{OrderItemLine, OrderRecord, ProductRecord, TopProductRow};
    use chrono::TimeZone;
    use helpdesk_intent::Entities;
    use tracing_test::traced_test;

    /// A catalog whose every query fails.
    struct BrokenCatalog;

    impl CatalogStore for BrokenCatalog {
        async fn top_selling_products(&self, _: i64) -> Result<Vec<TopProductRow>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
        async fn find_order(&self, _: i64) -> Result<Option<OrderRecord>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
        async fn order_item_lines(&self, _: i64) -> Result<Vec<OrderItemLine>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
        async fn search_products_by_name(&self, _: &str) -> Result<Vec<ProductRecord>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
        async fn available_stock(&self, _: i64) -> Result<i64, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
        async fn product_count(&self) -> Result<i64, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
        async fn distinct_categories(&self, _: i64) -> Result<Vec<String>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
        async fn distinct_brands(&self, _: i64) -> Result<Vec<String>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
    }

    fn analysis(intent: Intent, entities: Entities) -> IntentAnalysis {
        IntentAnalysis::new(intent, 0.9).with_entities(entities)
    }

    #[tokio::test]
    #[traced_test]
    async fn store_failures_become_apologies() {
        let cases = [
            (Intent::TopProducts, Entities::default(), top_products::FAILURE),
            (
                Intent::OrderStatus,
                Entities { order_id: Some("7".into()), ..Entities::default() },
                order_status::FAILURE,
            ),
            (
                Intent::StockInquiry,
                Entities { product_name: Some("tee".into()), ..Entities::default() },
                stock::FAILURE,
            ),
            (Intent::GeneralInquiry, Entities::default(), general::FAILURE),
        ];
        for (intent, entities, apology) in cases {
            let reply = respond(&BrokenCatalog, &analysis(intent, entities)).await;
            assert_eq!(reply, apology);
            assert!(reply.starts_with("I encountered an issue"));
        }
        assert!(logs_contain("query handler failed"));
    }

    #[tokio::test]
    async fn unclear_gets_clarification_without_touching_the_store() {
        let reply = respond(&BrokenCatalog, &analysis(Intent::Unclear, Entities::default())).await;
        assert_eq!(reply, CLARIFICATION);
        assert!(reply.contains("**Order Status**"));
        assert!(reply.contains("**Stock Availability**"));
    }

    #[tokio::test]
    async fn prompts_do_not_need_the_store() {
        let reply = respond(&BrokenCatalog, &analysis(Intent::OrderStatus, Entities::default())).await;
        assert_eq!(reply, order_status::MISSING_ID);
        let reply = respond(&BrokenCatalog, &analysis(Intent::StockInquiry, Entities::default())).await;
        assert_eq!(reply, stock::MISSING_NAME);

        for id in ["ABC-12", "12.5", "-"] {
            let entities = Entities { order_id: Some(id.into()), ..Entities::default() };
            let reply = respond(&BrokenCatalog, &analysis(Intent::OrderStatus, entities)).await;
            assert_eq!(
                reply,
                format!("The order ID '{id}' doesn't appear to be valid. Please provide a numeric order ID.")
            );
        }

        let entities = Entities { order_id: Some("99999999999999999999".into()), ..Entities::default() };
        let reply = respond(&BrokenCatalog, &analysis(Intent::OrderStatus, entities)).await;
        assert!(reply.starts_with("I couldn't find an order with ID 99999999999999999999."));
    }

    #[test]
    fn rendering_helpers() {
        assert_eq!(price(Some(19.5)), "$19.50");
        assert_eq!(price(None), "N/A");
        assert_eq!(or_unknown(Some("")), "Unknown");
        assert_eq!(or_unknown(Some("Acme")), "Acme");
        let ts = Utc.with_ymd_and_hms(2023, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(long_date(&ts), "January 05, 2023");
    }
}
