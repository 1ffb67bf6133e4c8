// ============================================================
// Layer 2 — Convert Use Case
// ============================================================
// The normal → royal register flow:
//
//   user input → validate → normalize → one-shot transform → output
//
// Validation happens before the model is touched: empty input, or
// input that normalizes to nothing, is an InvalidInput the caller
// reports back — never an internal error.

use anyhow::Result;

use crate::data::normalizer::Normalizer;
use crate::domain::error::ModelError;
use crate::domain::traits::PredictionSink;
use crate::ml::handle::ModelHandle;

/// The three texts a conversion reports back.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub original_text: String,
    pub cleaned_text: String,
    pub royal_text: String,
}

/// Reject input that is empty or has no valid characters left after
/// normalization. Returns the cleaned text on success.
pub fn validate_input(text: &str) -> Result<String, ModelError> {
    if text.trim().is_empty() {
        return Err(ModelError::InvalidInput);
    }
    let cleaned = Normalizer::new().normalize(text);
    if cleaned.is_empty() {
        return Err(ModelError::InvalidInput);
    }
    Ok(cleaned)
}

pub struct ConvertUseCase<'a> {
    handle: &'a ModelHandle,
    sink: Option<&'a dyn PredictionSink>,
}

impl<'a> ConvertUseCase<'a> {
    pub fn new(handle: &'a ModelHandle, sink: Option<&'a dyn PredictionSink>) -> Self {
        Self { handle, sink }
    }

    pub fn convert(&self, text: &str) -> Result<Conversion> {
        let cleaned = validate_input(text)?;
        let loaded = self.handle.get()?;
        let royal = loaded.convert(text)?;

        if let Some(sink) = self.sink {
            if let Err(e) = sink.record(text, &royal) {
                tracing::warn!("Prediction sink failed (response unaffected): {e:#}");
            }
        }

        Ok(Conversion {
            original_text: text.to_string(),
            cleaned_text: cleaned,
            royal_text: royal,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_invalid() {
        assert!(matches!(validate_input(""), Err(ModelError::InvalidInput)));
        assert!(matches!(validate_input("   "), Err(ModelError::InvalidInput)));
    }

    #[test]
    fn test_non_khmer_input_is_invalid_after_cleaning() {
        assert!(matches!(validate_input("a1!"), Err(ModelError::InvalidInput)));
    }

    #[test]
    fn test_khmer_input_passes_validation() {
        assert_eq!(validate_input("Hello សួស្តី").unwrap(), "សួស្តី");
    }

    #[test]
    fn test_unloaded_model_fails_after_validation() {
        let handle = ModelHandle::empty();
        let use_case = ConvertUseCase::new(&handle, None);
        let err = use_case.convert("សួស្តី").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::ModelNotLoaded)
        ));
    }
}
