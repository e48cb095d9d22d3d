//! Deterministic keyword classification, used whenever the model path fails.

use crate::types::{Entities, Intent, IntentAnalysis};

pub const TOP_PRODUCT_KEYWORDS: &[&str] = &["top", "best", "most sold", "popular", "bestseller"];
pub const ORDER_KEYWORDS: &[&str] = &["order", "status", "tracking", "shipped", "delivered"];
pub const STOCK_KEYWORDS: &[&str] = &["stock", "available", "inventory", "left", "in stock"];

/// Confidence reported when a keyword list matched.
pub const KEYWORD_CONFIDENCE: f32 = 0.7;
/// Confidence reported when nothing matched.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Classify `message` by substring matching over its lowercased form.
///
/// Lists are checked in order: top products, orders, stock.  The only entity
/// ever filled is `order_id`, for order messages that contain digits.
pub fn classify_by_keywords(message: &str) -> IntentAnalysis {
    let lowered = message.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if mentions(TOP_PRODUCT_KEYWORDS) {
        IntentAnalysis::new(Intent::TopProducts, KEYWORD_CONFIDENCE)
    } else if mentions(ORDER_KEYWORDS) {
        let entities = Entities {
            order_id: extract_digits(message),
            ..Entities::default()
        };
        IntentAnalysis::new(Intent::OrderStatus, KEYWORD_CONFIDENCE).with_entities(entities)
    } else if mentions(STOCK_KEYWORDS) {
        IntentAnalysis::new(Intent::StockInquiry, KEYWORD_CONFIDENCE)
    } else {
        IntentAnalysis::new(Intent::GeneralInquiry, DEFAULT_CONFIDENCE)
    }
}

/// All ASCII digits of `message`, concatenated in order; `None` if there are none.
pub fn extract_digits(message: &str) -> Option<String> {
    let digits: String = message.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}
