// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Held-out fit metrics over the test split, with updates disabled:
//
//   avg_loss   — mean cross-entropy per batch
//   perplexity — exp(avg_loss)
//   accuracy   — exact-match rate of the argmax prediction against
//                the target, over every position of every sample
//                (token-level, not sequence-level)
//
// Reference: Burn Book §5 (Metrics)

use anyhow::Result;
use burn::{data::dataloader::DataLoaderBuilder, prelude::*};

use crate::data::{batcher::WindowBatcher, dataset::WindowDataset};
use crate::ml::model::CharLstmModel;

/// Metrics of one evaluation pass.
#[derive(Debug, Clone, Copy)]
pub struct EvalReport {
    pub avg_loss: f64,
    pub perplexity: f64,
    pub accuracy: f64,
}

pub fn evaluate<B: Backend>(
    model: &CharLstmModel<B>,
    test_dataset: WindowDataset,
    batch_size: usize,
    device: B::Device,
) -> Result<EvalReport> {
    let batcher = WindowBatcher::<B>::new(device);
    let loader = DataLoaderBuilder::new(batcher)
        .batch_size(batch_size)
        .num_workers(1)
        .build(test_dataset);

    let mut loss_sum = 0.0f64;
    let mut batches = 0usize;
    let mut correct = 0usize;
    let mut total_tokens = 0usize;

    for batch in loader.iter() {
        let logits = model.forward(batch.inputs);
        let [batch_dim, seq_len, vocab_size] = logits.dims();

        let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(
            logits.clone().reshape([batch_dim * seq_len, vocab_size]),
            batch.targets.clone().reshape([batch_dim * seq_len]),
        );
        loss_sum += loss.into_scalar().elem::<f64>();
        batches += 1;

        // argmax over the vocabulary dim keeps that dim as size 1 —
        // reshape both sides flat before comparing
        let predictions = logits.argmax(2).reshape([batch_dim * seq_len]);
        let targets = batch.targets.reshape([batch_dim * seq_len]);

        let batch_correct: i64 = predictions
            .equal(targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        correct += batch_correct as usize;
        total_tokens += batch_dim * seq_len;
    }

    let avg_loss = loss_sum / batches.max(1) as f64;
    let report = EvalReport {
        avg_loss,
        perplexity: avg_loss.exp(),
        accuracy: correct as f64 / total_tokens.max(1) as f64,
    };

    tracing::info!(
        "Evaluation: loss={:.4} ppl={:.2} accuracy={:.2}%",
        report.avg_loss,
        report.perplexity,
        report.accuracy * 100.0,
    );
    Ok(report)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::Vocabulary;
    use crate::ml::model::CharLstmConfig;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_metrics_are_well_formed() {
        let device = Default::default();
        let text = "កខគឃងចឆជឈញ".to_string();
        let vocab = Vocabulary::build(std::slice::from_ref(&text)).unwrap();
        let dataset = WindowDataset::build(&[text], 4, &vocab);
        assert!(dataset.sample_count() > 0);

        let model = CharLstmConfig::new(vocab.size(), 8, 16, 1).init::<TestBackend>(&device);
        let report = evaluate(&model, dataset, 2, device).unwrap();

        assert!(report.avg_loss.is_finite());
        assert!(report.perplexity >= 1.0);
        assert!((0.0..=1.0).contains(&report.accuracy));
        assert!((report.perplexity - report.avg_loss.exp()).abs() < 1e-9);
    }
}
