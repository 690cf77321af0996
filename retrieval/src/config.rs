//! Configuration for retrieval operations.

use serde::{Deserialize, Serialize};

/// Options for a similarity search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Minimum similarity score (0.0 to 1.0) a candidate must reach.
    pub threshold: f32,

    /// Maximum number of results to return.
    pub limit: usize,
}

impl SearchOptions {
    /// Create options with an explicit threshold and limit.
    pub fn new(threshold: f32, limit: usize) -> Self {
        Self { threshold, limit }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            limit: 10,
        }
    }
}
