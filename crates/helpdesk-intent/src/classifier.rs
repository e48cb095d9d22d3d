use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ClassifierError;
use crate::keywords::classify_by_keywords;
use crate::model::LanguageModel;
use crate::prompt::{build_prompt, parse_reply};
use crate::types::{Classification, IntentAnalysis};

/// Turns free text into an [`IntentAnalysis`], model first, keywords second.
///
/// Cheap to clone; the model handle is shared.
#[derive(Clone)]
pub struct IntentClassifier {
    model: Option<Arc<dyn LanguageModel>>,
}

impl fmt::Debug for IntentClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentClassifier")
            .field("model", &self.model.as_ref().map(|_| "configured"))
            .finish()
    }
}

impl IntentClassifier {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    /// A classifier with no model; every call takes the keyword path.
    pub fn keyword_only() -> Self {
        Self { model: None }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Classify `message`.  Never fails: model errors degrade to
    /// [`Classification::Fallback`].
    pub async fn classify(&self, message: &str) -> Classification {
        match self.ask_model(message).await {
            Ok(analysis) => {
                debug!(intent = %analysis.intent, confidence = analysis.confidence, "model classified message");
                Classification::Classified(analysis)
            }
            Err(ClassifierError::NotConfigured) => {
                Classification::Fallback(classify_by_keywords(message))
            }
            Err(e) => {
                warn!(error = %e, "intent model failed; falling back to keyword matching");
                Classification::Fallback(classify_by_keywords(message))
            }
        }
    }

    async fn ask_model(&self, message: &str) -> Result<IntentAnalysis, ClassifierError> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotConfigured)?;
        let reply = model.complete(&build_prompt(message)).await?;
        parse_reply(&reply)
    }
}
