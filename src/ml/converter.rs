// ============================================================
// Layer 5 — Royal Register Converter (one-shot transform)
// ============================================================
// Rewrites a whole input string into the royal register in a
// single forward pass — no autoregression.
//
//   normalize → encode (map-to-unknown policy, alignment kept)
//   → frame with <sos>/<eos> → one full-sequence forward
//   → per-position argmax → decode, reserved symbols filtered
//
// Unknown characters map to <unk> rather than being dropped so the
// output positions stay aligned with the input. Output length is
// structurally tied to input length plus framing, which is what
// distinguishes this path from the Generator's open-ended decoding.
//
// Reference: Burn Book §3 (Tensor operations)

use burn::prelude::*;

use crate::data::normalizer::Normalizer;
use crate::domain::error::ModelError;
use crate::domain::vocabulary::{Vocabulary, EOS_ID, SOS_ID};
use crate::ml::model::CharLstmModel;

pub fn convert<B: Backend>(
    model: &CharLstmModel<B>,
    vocab: &Vocabulary,
    text: &str,
    device: &B::Device,
) -> Result<String, ModelError> {
    let normalizer = Normalizer::new();
    let cleaned = normalizer.normalize(text);
    if cleaned.is_empty() {
        return Err(ModelError::InvalidInput);
    }

    // Sentinel-framed id sequence: <sos> chars <eos>
    let mut ids: Vec<i32> = vec![SOS_ID as i32];
    ids.extend(
        vocab
            .encode_with_unknown(&cleaned)
            .into_iter()
            .map(|id| id as i32),
    );
    ids.push(EOS_ID as i32);
    let len = ids.len();

    let input = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), device).reshape([1, len]);
    let logits = model.forward(input);

    // Argmax at every position in one pass. Int element width differs
    // per backend, so convert before reading out.
    let predicted: Vec<usize> = logits
        .argmax(2)
        .reshape([len])
        .into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .unwrap_or_default()
        .into_iter()
        .map(|id| id as usize)
        .collect();

    // decode() filters the four reserved symbols from the output
    Ok(vocab.decode(&predicted))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::{PAD_ID, UNK_ID};
    use crate::ml::model::CharLstmConfig;

    type TestBackend = burn::backend::NdArray;

    fn setup() -> (CharLstmModel<TestBackend>, Vocabulary) {
        let device = Default::default();
        let vocab = Vocabulary::build(&["កខគឃង".to_string()]).unwrap();
        let model = CharLstmConfig::new(vocab.size(), 8, 16, 1).init(&device);
        (model, vocab)
    }

    #[test]
    fn test_output_never_contains_reserved_symbols() {
        let (model, vocab) = setup();
        let device = Default::default();
        let out = convert(&model, &vocab, "កខគ", &device).unwrap();
        // Reserved ids decode to nothing, so every output character
        // must be a real vocabulary character
        assert!(out.chars().all(|ch| {
            let id = vocab.id_of(ch);
            id.is_some() && id != Some(PAD_ID) && id != Some(UNK_ID)
        }));
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let (model, vocab) = setup();
        let device = Default::default();
        let err = convert(&model, &vocab, "", &device).unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput));
    }

    #[test]
    fn test_non_khmer_input_is_invalid_after_cleaning() {
        let (model, vocab) = setup();
        let device = Default::default();
        let err = convert(&model, &vocab, "a1!", &device).unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput));
    }

    #[test]
    fn test_unknown_characters_keep_alignment() {
        let (model, vocab) = setup();
        let device = Default::default();
        // ញ is outside the vocabulary — mapped to <unk>, not dropped,
        // so the forward pass still sees one position per character
        let out = convert(&model, &vocab, "កញខ", &device);
        assert!(out.is_ok());
    }
}
