// ============================================================
// Layer 4 — Sentence Segmenter / Chunker
// ============================================================
// Splits normalized text into sentence units and bounds their
// length before windowing.
//
// Khmer marks sentence ends with ។ (khan) and ៕ (bariyoosan)
// rather than the Latin full stop, so segmentation splits on
// those two marks. Chunking then cuts each sentence into
// contiguous pieces of at most `max_len` characters — no overlap,
// no loss: concatenating the chunks reproduces the sentence.
//
// Both functions are used only at training-data preparation time.
//
// Reference: Rust Book §8 (Slices)

use crate::data::normalizer::SENTENCE_MARKS;

/// Split text on the two sentence-final marks, trimming each piece
/// and discarding empty results.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(SENTENCE_MARKS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cut a sentence into contiguous chunks of at most `max_len`
/// characters, preserving order.
///
/// # Panics
/// Panics if `max_len` is zero — a zero-width chunk can never
/// consume input.
pub fn chunk(sentence: &str, max_len: usize) -> Vec<String> {
    assert!(max_len > 0, "chunk length must be at least 1");

    let chars: Vec<char> = sentence.chars().collect();
    chars
        .chunks(max_len)
        .map(|piece| piece.iter().collect())
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_both_marks() {
        let sentences = split_sentences("ក ខ។គ ឃ៕ង");
        assert_eq!(sentences, vec!["ក ខ", "គ ឃ", "ង"]);
    }

    #[test]
    fn test_empty_pieces_discarded() {
        let sentences = split_sentences("។។ក។ ។");
        assert_eq!(sentences, vec!["ក"]);
    }

    #[test]
    fn test_no_marks_gives_one_sentence() {
        let sentences = split_sentences("កខគ");
        assert_eq!(sentences, vec!["កខគ"]);
    }

    #[test]
    fn test_chunk_bounds_length() {
        let chunks = chunk("កខគឃង", 2);
        assert_eq!(chunks, vec!["កខ", "គឃ", "ង"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 2));
    }

    #[test]
    fn test_chunks_reconstruct_sentence() {
        let sentence = "ខ្ញុំទៅផ្សារជាមួយម្តាយ";
        for k in 1..=8 {
            let joined: String = chunk(sentence, k).concat();
            assert_eq!(joined, sentence, "lossy at max_len={k}");
        }
    }

    #[test]
    fn test_short_sentence_single_chunk() {
        assert_eq!(chunk("កខ", 120), vec!["កខ"]);
    }

    #[test]
    fn test_empty_sentence_no_chunks() {
        assert!(chunk("", 10).is_empty());
    }
}
