//! The classification prompt and the parser for the model's reply.

use crate::error::ClassifierError;
use crate::types::IntentAnalysis;

/// Build the fixed classification prompt for `message`.
pub fn build_prompt(message: &str) -> String {
    let quoted = message.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"Analyze the following customer support message and determine the intent and extract relevant entities.

Message: "{quoted}"

Classify the intent as one of:
- top_products: User asking about best-selling or most popular products
- order_status: User asking about order status, tracking, or order details
- stock_inquiry: User asking about product availability or inventory
- general_inquiry: General questions about products, categories, etc.
- unclear: Message is unclear or ambiguous

Extract entities like:
- order_id: Any order ID mentioned
- product_name: Product name mentioned
- quantity: Number of items requested
- category: Product category
- brand: Product brand

Respond with only a JSON object in this format:
{{
    "intent": "intent_name",
    "entities": {{
        "order_id": "extracted_order_id_or_null",
        "product_name": "extracted_product_name_or_null",
        "quantity": "extracted_quantity_or_null",
        "category": "extracted_category_or_null",
        "brand": "extracted_brand_or_null"
    }},
    "confidence": 0.95
}}"#
    )
}

/// Parse a model reply into an [`IntentAnalysis`].
///
/// Surrounding whitespace and a single Markdown code fence are tolerated;
/// anything else that is not the requested JSON object is an error.
pub fn parse_reply(raw: &str) -> Result<IntentAnalysis, ClassifierError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ClassifierError::EmptyReply);
    }
    Ok(serde_json::from_str(body)?)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
