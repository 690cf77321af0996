//! Chat request orchestration.
//!
//! A chat request moves through a single-pass pipeline — validate,
//! retrieve, compose, stream — with no retries at this layer; retries
//! belong to the underlying providers. Concurrent requests are
//! independent and share no mutable state.

use std::sync::Arc;

use async_stream::stream;
use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::{debug, info, warn};

use advisor_retrieval::{HybridRetriever, RetrievalOutcome, SearchOptions};

use crate::context::{compose_user_message, format_grounding, SYSTEM_PROMPT};
use crate::conversation::ConversationTurn;
use crate::error::{ChatError, Result};
use crate::provider::GenerativeProvider;

/// A discrete event in the caller-facing chat stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// One text fragment of the assistant's answer, in arrival order.
    Fragment(String),

    /// End-of-stream marker; appears exactly once, after the last
    /// fragment.
    Done,
}

/// The caller-facing stream: lazy, finite, non-restartable. Dropping it
/// cancels the request and releases the underlying provider stream.
pub type ChatStream = BoxStream<'static, Result<ChatEvent>>;

/// Tuning knobs for the chat pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ChatConfig {
    /// Similarity threshold for the semantic retrieval tier.
    pub threshold: f32,

    /// Maximum number of candidates injected into the grounding block.
    pub result_cap: usize,

    /// Most-recent conversation turns passed through to the model;
    /// older turns are dropped from the oldest end.
    pub history_cap: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            result_cap: 5,
            history_cap: 10,
        }
    }
}

/// Orchestrates grounded, streaming chat over retrieved catalog items.
pub struct ChatOrchestrator {
    retriever: Arc<HybridRetriever>,
    provider: Arc<dyn GenerativeProvider>,
    config: ChatConfig,
}

impl ChatOrchestrator {
    /// Create an orchestrator over the given retriever and provider.
    pub fn new(retriever: Arc<HybridRetriever>, provider: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            retriever,
            provider,
            config: ChatConfig::default(),
        }
    }

    /// Override the pipeline configuration.
    pub fn with_config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    /// Process one chat request and stream the grounded answer.
    ///
    /// Fails with [`ChatError::InvalidRequest`] before any external
    /// call when the message is empty. A retrieval failure is fatal
    /// only when both tiers fail; an empty retrieval degrades the
    /// grounding block to an honest "no matching products" statement.
    pub async fn chat(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<ChatStream> {
        if message.trim().is_empty() {
            return Err(ChatError::InvalidRequest);
        }

        let outcome = self
            .retriever
            .retrieve(
                message,
                &SearchOptions::new(self.config.threshold, self.config.result_cap),
            )
            .await?;

        match &outcome {
            RetrievalOutcome::Ranked(candidates) => {
                debug!("Grounding on {} ranked candidates", candidates.len());
            }
            RetrievalOutcome::Unranked(items) => {
                debug!("Grounding on {} fallback candidates", items.len());
            }
        }
        if outcome.is_empty() {
            info!("No products matched; answering with an empty grounding block");
        }

        let grounding = format_grounding(&outcome.items());
        let augmented = compose_user_message(&grounding, message);

        let recent = &history[history.len().saturating_sub(self.config.history_cap)..];

        let tokens = self
            .provider
            .stream_chat(SYSTEM_PROMPT, recent, &augmented)
            .await?;

        Ok(Box::pin(stream! {
            let mut tokens = tokens;
            while let Some(fragment) = tokens.next().await {
                match fragment {
                    Ok(text) => yield Ok(ChatEvent::Fragment(text)),
                    Err(err) => {
                        // A broken stream surfaces as a terminal error,
                        // never as a silent truncation.
                        warn!("Generation stream interrupted: {err}");
                        yield Err(ChatError::StreamInterrupted(err.to_string()));
                        return;
                    }
                }
            }
            yield Ok(ChatEvent::Done);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures::stream;
    use pretty_assertions::assert_eq;

    use advisor_catalog::{CatalogItem, MemoryCatalog};
    use advisor_embeddings::{Embedding, EmbeddingError, EmbeddingProvider};

    use crate::error::GenerationError;
    use crate::provider::TokenStream;

    /// Embedding provider that counts calls and returns a fixed vector.
    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed(&self, _text: &str) -> std::result::Result<Embedding, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.0, 0.0])
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    /// Generative provider that replays scripted fragments.
    struct ScriptedProvider {
        fragments: Vec<std::result::Result<String, String>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(fragments: &[&str]) -> Self {
            Self {
                fragments: fragments.iter().map(|f| Ok((*f).to_string())).collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_mid_stream_failure(fragments: &[&str], message: &str) -> Self {
            let mut scripted: Vec<std::result::Result<String, String>> =
                fragments.iter().map(|f| Ok((*f).to_string())).collect();
            scripted.push(Err(message.to_string()));
            Self {
                fragments: scripted,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerativeProvider for ScriptedProvider {
        async fn stream_chat(
            &self,
            _system_instruction: &str,
            _history: &[ConversationTurn],
            _message: &str,
        ) -> std::result::Result<TokenStream, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let items: Vec<std::result::Result<String, GenerationError>> = self
                .fragments
                .clone()
                .into_iter()
                .map(|f| f.map_err(GenerationError::Stream))
                .collect();
            Ok(Box::pin(stream::iter(items)))
        }
    }

    fn orchestrator(
        generative: Arc<ScriptedProvider>,
        embedder: Arc<CountingEmbedder>,
    ) -> ChatOrchestrator {
        let store = Arc::new(MemoryCatalog::with_items(vec![
            CatalogItem::new("a", "Steel Toe Boot")
                .with_brand("Acme")
                .with_embedding(vec![1.0, 0.0, 0.0]),
        ]));
        let retriever = Arc::new(HybridRetriever::new(store, embedder));
        ChatOrchestrator::new(retriever, generative)
    }

    #[tokio::test]
    async fn empty_message_fails_before_any_provider_call() {
        let generative = Arc::new(ScriptedProvider::new(&["unused"]));
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = orchestrator(generative.clone(), embedder.clone());

        let Err(err) = orchestrator.chat("   ", &[]).await else {
            panic!("expected InvalidRequest");
        };
        assert!(matches!(err, ChatError::InvalidRequest));

        // Neither provider was touched.
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generative.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn completed_stream_reconstructs_message_with_single_terminal_marker() {
        let generative = Arc::new(ScriptedProvider::new(&["The ", "Steel Toe ", "Boot."]));
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = orchestrator(generative, embedder);

        let mut stream = orchestrator.chat("steel toe boot", &[]).await.unwrap();

        let mut fragments = Vec::new();
        let mut done_markers = 0;
        while let Some(event) = stream.next().await {
            match event.unwrap() {
                ChatEvent::Fragment(text) => {
                    assert_eq!(done_markers, 0, "no fragment may follow Done");
                    fragments.push(text);
                }
                ChatEvent::Done => done_markers += 1,
            }
        }

        assert_eq!(fragments.concat(), "The Steel Toe Boot.");
        assert_eq!(done_markers, 1);
    }

    #[tokio::test]
    async fn mid_stream_failure_surfaces_terminal_error_not_done() {
        let generative = Arc::new(ScriptedProvider::with_mid_stream_failure(
            &["partial "],
            "connection reset",
        ));
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = orchestrator(generative, embedder);

        let mut stream = orchestrator.chat("steel toe boot", &[]).await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, ChatEvent::Fragment("partial ".to_string()));

        let second = stream.next().await.unwrap();
        match second {
            Err(ChatError::StreamInterrupted(msg)) => {
                assert!(msg.contains("connection reset"));
            }
            other => panic!("expected StreamInterrupted, got {other:?}"),
        }

        // Terminal: nothing follows the error, in particular no Done.
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn history_is_capped_to_most_recent_turns() {
        /// Provider that records the history length it was given.
        struct RecordingProvider {
            seen: AtomicUsize,
            first_content: std::sync::Mutex<Option<String>>,
        }

        #[async_trait]
        impl GenerativeProvider for RecordingProvider {
            async fn stream_chat(
                &self,
                _system_instruction: &str,
                history: &[ConversationTurn],
                _message: &str,
            ) -> std::result::Result<TokenStream, GenerationError> {
                self.seen.store(history.len(), Ordering::SeqCst);
                *self.first_content.lock().unwrap() =
                    history.first().map(|turn| turn.content.clone());
                Ok(Box::pin(stream::iter(vec![Ok("ok".to_string())])))
            }
        }

        let recording = Arc::new(RecordingProvider {
            seen: AtomicUsize::new(0),
            first_content: std::sync::Mutex::new(None),
        });
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(MemoryCatalog::with_items(vec![
            CatalogItem::new("a", "Steel Toe Boot").with_embedding(vec![1.0, 0.0, 0.0]),
        ]));
        let retriever = Arc::new(HybridRetriever::new(store, embedder));
        let orchestrator = ChatOrchestrator::new(retriever, recording.clone());

        let history: Vec<ConversationTurn> =
            (0..14).map(|n| ConversationTurn::user(format!("turn {n}"))).collect();

        let mut stream = orchestrator.chat("steel toe boot", &history).await.unwrap();
        while stream.next().await.is_some() {}

        // Capped to the default 10, dropped from the oldest end.
        assert_eq!(recording.seen.load(Ordering::SeqCst), 10);
        assert_eq!(
            recording.first_content.lock().unwrap().as_deref(),
            Some("turn 4")
        );
    }
}
