// ============================================================
// Layer 4 — Windowed Sequence Dataset
// ============================================================
// Turns token-id sequences into fixed-length next-character
// training pairs.
//
// For a text encoded to L ids and window length s, every start
// offset i in [0, L - s) yields one sample:
//
//   input:  ids[i .. i+s]
//   target: ids[i+1 .. i+s+1]     (input shifted by one)
//
// so a text contributes max(0, L - s) samples. Texts shorter than
// s + 1 contribute none — allowed, not an error. Characters absent
// from the vocabulary are dropped during encoding (the
// window-construction policy), never substituted.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::vocabulary::Vocabulary;

/// One teacher-forcing sample: a fixed-length input window and the
/// same window shifted one position ahead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSample {
    pub input: Vec<u32>,
    pub target: Vec<u32>,
}

/// All windows produced from one split of the corpus.
pub struct WindowDataset {
    samples: Vec<WindowSample>,
}

impl WindowDataset {
    /// Build every window of length `seq_len` from the given texts.
    pub fn build(texts: &[String], seq_len: usize, vocab: &Vocabulary) -> Self {
        let mut samples = Vec::new();

        for text in texts {
            let ids: Vec<u32> = vocab
                .encode_dropping(text)
                .into_iter()
                .map(|id| id as u32)
                .collect();

            if ids.len() <= seq_len {
                continue;
            }
            for i in 0..ids.len() - seq_len {
                samples.push(WindowSample {
                    input: ids[i..i + seq_len].to_vec(),
                    target: ids[i + 1..i + seq_len + 1].to_vec(),
                });
            }
        }

        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<WindowSample> for WindowDataset {
    fn get(&self, index: usize) -> Option<WindowSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn vocab_for(text: &str) -> Vocabulary {
        Vocabulary::build(&[text.to_string()]).unwrap()
    }

    #[test]
    fn test_window_count_is_len_minus_seq_len() {
        let text = "កខគឃងចឆជ".to_string(); // 8 characters
        let vocab = vocab_for(&text);
        let ds = WindowDataset::build(&[text], 3, &vocab);
        assert_eq!(ds.sample_count(), 5); // 8 - 3
    }

    #[test]
    fn test_target_is_input_shifted_by_one() {
        let text = "កខគឃង".to_string();
        let vocab = vocab_for(&text);
        let ds = WindowDataset::build(&[text], 2, &vocab);
        let sample = ds.get(0).unwrap();
        assert_eq!(sample.input.len(), 2);
        assert_eq!(sample.input[1], sample.target[0]);
    }

    #[test]
    fn test_short_texts_contribute_nothing() {
        let text = "កខគ".to_string();
        let vocab = vocab_for(&text);
        // len == seq_len → no room for a shifted target
        let ds = WindowDataset::build(&[text.clone()], 3, &vocab);
        assert_eq!(ds.sample_count(), 0);
        let ds = WindowDataset::build(&[text], 10, &vocab);
        assert_eq!(ds.sample_count(), 0);
    }

    #[test]
    fn test_unknown_characters_dropped_before_windowing() {
        let vocab = vocab_for("កខគឃ");
        // ង is out of vocabulary → effective length 4, not 5
        let ds = WindowDataset::build(&["កខងគឃ".to_string()], 3, &vocab);
        assert_eq!(ds.sample_count(), 1);
    }

    #[test]
    fn test_windows_never_cross_texts() {
        let vocab = vocab_for("កខគឃ");
        let texts = vec!["កខគឃ".to_string(), "ឃគខក".to_string()];
        let ds = WindowDataset::build(&texts, 3, &vocab);
        // each 4-char text yields 1 window; none spans the boundary
        assert_eq!(ds.sample_count(), 2);
    }
}
