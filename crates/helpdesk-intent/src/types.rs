//! Classification records shared by the classifier and its callers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

/// The purpose of a user message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    TopProducts,
    OrderStatus,
    StockInquiry,
    GeneralInquiry,
    /// Also what any intent name we do not recognise deserializes to.
    #[serde(other)]
    Unclear,
}

/// Structured values pulled out of a message.  Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// `{intent, entities, confidence}` as produced by either classification path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub intent: Intent,
    #[serde(default, deserialize_with = "nullable_entities")]
    pub entities: Entities,
    /// Always within `0.0..=1.0`.
    #[serde(default, deserialize_with = "clamped_confidence")]
    pub confidence: f32,
}

impl IntentAnalysis {
    pub fn new(intent: Intent, confidence: f32) -> Self {
        Self {
            intent,
            entities: Entities::default(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn with_entities(mut self, entities: Entities) -> Self {
        self.entities = entities;
        self
    }
}

/// Which path produced an [`IntentAnalysis`].
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The language model answered with a usable record.
    Classified(IntentAnalysis),
    /// The model was unavailable or unusable; keyword matching decided.
    Fallback(IntentAnalysis),
}

impl Classification {
    pub fn analysis(&self) -> &IntentAnalysis {
        match self {
            Classification::Classified(a) | Classification::Fallback(a) => a,
        }
    }

    pub fn into_analysis(self) -> IntentAnalysis {
        match self {
            Classification::Classified(a) | Classification::Fallback(a) => a,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Classification::Fallback(_))
    }
}

// ── lenient field decoding ───────────────────────────────────────────────────
//
// Models fill the entity slots with `null`, `"null"`, `""`, or bare numbers
// depending on the day.  All null-ish spellings collapse to `None`.

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty()
                || trimmed.eq_ignore_ascii_case("null")
                || trimmed.eq_ignore_ascii_case("none")
            {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn nullable_entities<'de, D>(deserializer: D) -> Result<Entities, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Entities>::deserialize(deserializer)?.unwrap_or_default())
}

fn clamped_confidence<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok((raw as f32).clamp(0.0, 1.0))
}
