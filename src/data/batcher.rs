// ============================================================
// Layer 4 — Window Batcher
// ============================================================
// Implements Burn's Batcher trait to stack WindowSamples into
// [batch, seq_len] Int tensors for the model forward pass.
//
// All windows in a dataset share one fixed seq_len, so batching
// is a flatten-then-reshape with no dynamic padding:
//
//   [s1_t1 .. s1_tS, s2_t1 .. sN_tS] → [N, S]
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::WindowSample;

// ─── WindowBatch ──────────────────────────────────────────────────────────────
/// A batch of windows ready for the model.
/// Both tensors have shape [batch_size, seq_len].
#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    pub inputs: Tensor<B, 2, Int>,
    pub targets: Tensor<B, 2, Int>,
}

// ─── WindowBatcher ────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created where the model lives.
#[derive(Clone, Debug)]
pub struct WindowBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<WindowSample, WindowBatch<B>> for WindowBatcher<B> {
    fn batch(&self, items: Vec<WindowSample>) -> WindowBatch<B> {
        let batch_size = items.len();
        // Every sample in a dataset shares the same window length
        let seq_len = items[0].input.len();

        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input.iter().map(|&id| id as i32))
            .collect();

        let target_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.target.iter().map(|&id| id as i32))
            .collect();

        let inputs = Tensor::<B, 1, Int>::from_ints(input_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);
        let targets = Tensor::<B, 1, Int>::from_ints(target_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        WindowBatch { inputs, targets }
    }
}
