//! Intent classification for helpdesk chat messages.
//!
//! A message is first sent to an external language model with a fixed prompt
//! asking for a strict JSON verdict.  Any failure on that path (transport,
//! status, malformed reply) degrades to a deterministic keyword matcher, so
//! [`IntentClassifier::classify`] never fails.
//!
//! ```rust,ignore
//! let classifier = IntentClassifier::new(Some(Arc::new(model)));
//! match classifier.classify("where is order 12345?").await {
//!     Classification::Classified(a) => { /* model verdict */ }
//!     Classification::Fallback(a)   => { /* keyword verdict */ }
//! }
//! ```

pub mod classifier;
pub mod error;
pub mod keywords;
pub mod model;
pub mod prompt;
pub mod types;

pub use classifier::IntentClassifier;
pub use error::ClassifierError;
pub use keywords::classify_by_keywords;
pub use model::{ChatCompletionsModel, LanguageModel};
pub use prompt::{build_prompt, parse_reply};
pub use types::{Classification, Entities, Intent, IntentAnalysis};
