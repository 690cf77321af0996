//! # Chat
//!
//! The streaming chat orchestrator: combines a user message,
//! conversation history, and retrieved catalog candidates into a
//! grounded generation request, and relays the model's token stream to
//! the caller as a lazy sequence of [`ChatEvent`]s terminated by an
//! explicit end-of-stream marker.
//!
//! The generative model is constrained to answer only from the supplied
//! candidates; an empty retrieval degrades the grounding context to an
//! honest "no matching products" statement, never fabricated content.

pub mod context;
pub mod conversation;
pub mod error;
pub mod orchestrator;
pub mod provider;

pub use context::{compose_user_message, format_grounding, SYSTEM_PROMPT};
pub use conversation::{ConversationTurn, Role};
pub use error::{ChatError, GenerationError, Result};
pub use orchestrator::{ChatConfig, ChatEvent, ChatOrchestrator, ChatStream};
pub use provider::{GeminiChatProvider, GenerativeProvider, TokenStream};
