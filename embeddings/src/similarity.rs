//! Similarity computation for embeddings.

use ordered_float::OrderedFloat;

use crate::error::{EmbeddingError, Result};
use crate::Embedding;

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where 1.0 means identical
/// direction and 0.0 means orthogonal vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// Cosine similarity normalized to the [0, 1] range the store boundary
/// promises: negative cosine clamps to 0, 1 means identical.
pub fn unit_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    Ok(cosine_similarity(a, b)?.clamp(0.0, 1.0))
}

/// A scored hit from a similarity scan.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityHit {
    /// Position of the matched candidate in the input slice.
    pub index: usize,

    /// Similarity score in [0, 1].
    pub score: f32,
}

/// Find the top-k most similar candidates whose score meets `min_score`.
///
/// Results are ordered by descending score; ties keep the candidates'
/// original order (the store's native secondary order).
pub fn find_top_k(
    query: &[f32],
    candidates: &[Embedding],
    k: usize,
    min_score: f32,
) -> Result<Vec<SimilarityHit>> {
    let mut hits: Vec<SimilarityHit> = Vec::with_capacity(candidates.len());

    for (index, embedding) in candidates.iter().enumerate() {
        let score = unit_similarity(query, embedding)?;
        if score >= min_score {
            hits.push(SimilarityHit { index, score });
        }
    }

    // Stable sort preserves input order among equal scores.
    hits.sort_by_key(|hit| std::cmp::Reverse(OrderedFloat(hit.score)));
    hits.truncate(k);

    Ok(hits)
}
