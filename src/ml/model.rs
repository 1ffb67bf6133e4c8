// ============================================================
// Layer 5 — Character LSTM Model
// ============================================================
// Embedding → stacked LSTM layers → per-position projection to
// the vocabulary. One module serves both call modes:
//
//   Step mode:          caller feeds up to seq_len ids and reads
//                       only the final position's distribution
//                       (autoregressive continuation)
//   Full-sequence mode: caller feeds a sentinel-framed sequence
//                       and reads every position's distribution
//                       in a single pass (one-shot transform)
//
// The distinction is purely in how the caller uses the output.
// Recurrent state is never carried across calls: each forward
// starts from a zero state, so concurrent requests cannot
// contaminate each other.
//
// Reference: Burn Book §3 (Building Blocks)
//            Hochreiter & Schmidhuber (1997) LSTM

use burn::{
    nn::{
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

#[derive(Config, Debug)]
pub struct CharLstmConfig {
    pub vocab_size: usize,
    pub embedding_dim: usize,
    pub hidden_dim: usize,
    pub num_layers: usize,
}

impl CharLstmConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CharLstmModel<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        // First layer reads embeddings; the rest read the previous
        // layer's hidden states
        let layers: Vec<Lstm<B>> = (0..self.num_layers)
            .map(|i| {
                let d_input = if i == 0 { self.embedding_dim } else { self.hidden_dim };
                LstmConfig::new(d_input, self.hidden_dim, true).init(device)
            })
            .collect();
        let projection = LinearConfig::new(self.hidden_dim, self.vocab_size).init(device);

        CharLstmModel { embedding, layers, projection }
    }
}

#[derive(Module, Debug)]
pub struct CharLstmModel<B: Backend> {
    pub embedding: Embedding<B>,
    pub layers: Vec<Lstm<B>>,
    pub projection: Linear<B>,
}

impl<B: Backend> CharLstmModel<B> {
    /// ids: [batch, seq_len] → logits: [batch, seq_len, vocab_size]
    pub fn forward(&self, ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let mut x = self.embedding.forward(ids);
        for lstm in &self.layers {
            // None = fresh zero state for every call
            let (hidden, _state) = lstm.forward(x, None);
            x = hidden;
        }
        self.projection.forward(x)
    }

    /// Teacher-forced cross-entropy between per-position predictions
    /// and the shifted targets, averaged over every position.
    pub fn forward_loss(
        &self,
        inputs: Tensor<B, 2, Int>,
        targets: Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 3>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(inputs);
        let [batch_size, seq_len, vocab_size] = logits.dims();

        let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&logits.device());
        // Fold batch and sequence dims together: the loss is over
        // every position of every sample
        let loss = ce.forward(
            logits.clone().reshape([batch_size * seq_len, vocab_size]),
            targets.reshape([batch_size * seq_len]),
        );

        (loss, logits)
    }
}
