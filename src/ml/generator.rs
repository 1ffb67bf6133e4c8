// ============================================================
// Layer 5 — Generator (autoregressive continuation)
// ============================================================
// Free-form continuation from a seed string.
//
// The seed is normalized and encoded with the drop-on-unknown
// policy, then `max_length` decoding steps run: the last `seq_len`
// generated ids (or fewer) feed one step-mode forward pass, and
// the argmax token of the final position is appended. Decoding is
// deterministic — always argmax, no sampling temperature.
//
// The argmax is taken over character ids only; reserved symbols
// are excluded from the slice, so every step appends exactly one
// real character and the output always gains `max_length`
// characters beyond the recognized seed. When the seed encodes to
// nothing, the start sentinel primes the first step as model input
// only — it is never part of the output.
//
// Reference: Burn Book §3 (Tensor operations)

use burn::prelude::*;

use crate::data::normalizer::Normalizer;
use crate::domain::vocabulary::{Vocabulary, RESERVED_SYMBOLS, SOS_ID};
use crate::ml::model::CharLstmModel;

pub fn generate<B: Backend>(
    model: &CharLstmModel<B>,
    vocab: &Vocabulary,
    seed_text: &str,
    max_length: usize,
    seq_len: usize,
    device: &B::Device,
) -> String {
    let normalizer = Normalizer::new();
    let seed = normalizer.normalize(seed_text);
    let mut generated = vocab.encode_dropping(&seed);

    for _ in 0..max_length {
        // Model input: the last seq_len ids, or the start sentinel
        // when nothing has been generated yet
        let context: Vec<i32> = if generated.is_empty() {
            vec![SOS_ID as i32]
        } else {
            let start = generated.len().saturating_sub(seq_len);
            generated[start..].iter().map(|&id| id as i32).collect()
        };
        let context_len = context.len();

        let input = Tensor::<B, 1, Int>::from_ints(context.as_slice(), device)
            .reshape([1, context_len]);
        let logits = model.forward(input);

        // Final position only, reserved ids masked out of the argmax
        let next = logits
            .slice([0..1, context_len - 1..context_len, RESERVED_SYMBOLS..vocab.size()])
            .argmax(2)
            .into_scalar()
            .elem::<i64>() as usize
            + RESERVED_SYMBOLS;

        generated.push(next);
    }

    vocab.decode(&generated)
}
