// ============================================================
// Layer 2 — Generate Use Case
// ============================================================
// Free-form continuation: resolve the loaded model from the
// handle, run the generator, then hand the (input, output) pair
// to the prediction sink.
//
// The sink is fire-and-forget: a failing sink is logged at warn
// and the response is returned anyway — persistence problems must
// never fail a generation request.

use anyhow::Result;

use crate::domain::traits::PredictionSink;
use crate::ml::handle::ModelHandle;

pub struct GenerateUseCase<'a> {
    handle: &'a ModelHandle,
    sink: Option<&'a dyn PredictionSink>,
}

impl<'a> GenerateUseCase<'a> {
    pub fn new(handle: &'a ModelHandle, sink: Option<&'a dyn PredictionSink>) -> Self {
        Self { handle, sink }
    }

    pub fn generate(&self, seed_text: &str, length: usize, seq_len: usize) -> Result<String> {
        let loaded = self.handle.get()?;
        let output = loaded.generate(seed_text, length, seq_len);

        if let Some(sink) = self.sink {
            if let Err(e) = sink.record(seed_text, &output) {
                tracing::warn!("Prediction sink failed (response unaffected): {e:#}");
            }
        }

        Ok(output)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ModelError;

    #[test]
    fn test_empty_handle_fails_with_model_not_loaded() {
        let handle = ModelHandle::empty();
        let use_case = GenerateUseCase::new(&handle, None);
        let err = use_case.generate("ក", 5, 10).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::ModelNotLoaded)
        ));
    }
}
