use thiserror::Error;

/// Errors on the language-model classification path.
///
/// None of these reach the caller of [`crate::IntentClassifier::classify`];
/// they are logged and replaced by the keyword fallback.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// No language model is configured (e.g. no API key).
    #[error("no language model configured")]
    NotConfigured,

    /// The model client could not be built from its settings.
    #[error("invalid model configuration: {0}")]
    Config(String),

    /// Transport failure, timeout, or an unreadable response body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The endpoint answered 2xx but without any completion text.
    #[error("model returned no completion")]
    EmptyReply,

    /// The completion text is not the JSON record we asked for.
    #[error("model reply is not valid classification JSON: {0}")]
    InvalidReply(#[from] serde_json::Error),
}
