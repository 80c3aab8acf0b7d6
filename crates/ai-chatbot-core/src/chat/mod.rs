//! Chat layer: history, sessions and the language model

/// Signed-in user source
pub mod identity;

/// Per-user conversation history
pub mod history;

/// Language-model client
pub mod llm;

/// Chat-screen session
pub mod session;

pub use history::ChatHistory;
pub use identity::{IdentityProvider, StaticIdentity};
pub use llm::{parse_generate_response, GeminiClient, LanguageModel, ModelInfo};
pub use session::UserSession;
