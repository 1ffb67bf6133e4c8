// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// The typed failure kinds of the training/inference core.
// Everything else propagates as anyhow::Error with context.
//
// Reference: Rust Book §9 (Error Handling)

use thiserror::Error;

/// Failure kinds surfaced by the core pipeline.
///
/// `InvalidInput` and `ModelNotLoaded` are caller errors the
/// presentation layer reports back verbatim; the remaining kinds
/// are fatal to the enclosing operation.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Empty text, or text with zero valid characters after normalization.
    #[error("input is empty or contains no valid Khmer characters after cleaning")]
    InvalidInput,

    /// Inference requested before a checkpoint was loaded.
    #[error("no model loaded — load a checkpoint before requesting inference")]
    ModelNotLoaded,

    /// Training corpus empty or unreadable.
    #[error("corpus error: {0}")]
    CorpusError(String),

    /// A checkpoint whose embedded vocabulary disagrees with itself
    /// or with the recorded weight shapes.
    #[error("checkpoint mismatch: vocabulary size {expected} does not match {actual}")]
    CheckpointMismatch { expected: usize, actual: usize },

    /// Loss became non-finite during training.
    #[error("numeric divergence: non-finite loss at epoch {epoch}")]
    NumericDivergence { epoch: usize },
}
