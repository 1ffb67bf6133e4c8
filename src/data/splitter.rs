// ============================================================
// Layer 4 — Train/Validation/Test Splitter
// ============================================================
// Partitions the corpus texts 80/10/10 at the document level,
// BEFORE windowing. Windows are built independently per split,
// so no character sequence ever straddles a split boundary —
// the held-out scores measure genuinely unseen text.
//
// The split slices the ordered text list at floor(n*0.8) and
// floor(n*0.8) + floor(n*0.1). No shuffling: the partition must
// be deterministic so a rerun on the same corpus reproduces the
// same held-out sets.
//
// Reference: Rust Book §8 (Vectors)

/// Fraction of texts used for training.
const TRAIN_RATIO: f64 = 0.8;
/// Fraction of texts used for validation.
const VAL_RATIO: f64 = 0.1;

/// Split the ordered corpus into (train, validation, test) slices.
/// Order is preserved within each slice and every text lands in
/// exactly one of the three.
pub fn split_corpus(mut texts: Vec<String>) -> (Vec<String>, Vec<String>, Vec<String>) {
    let total = texts.len();
    let train_end = (total as f64 * TRAIN_RATIO) as usize;
    let val_end = train_end + (total as f64 * VAL_RATIO) as usize;

    let test = texts.split_off(val_end.min(total));
    let val = texts.split_off(train_end.min(texts.len()));
    let train = texts;

    tracing::debug!(
        "Corpus split: {} train, {} validation, {} test",
        train.len(),
        val.len(),
        test.len(),
    );

    (train, val, test)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("text{i}")).collect()
    }

    #[test]
    fn test_split_preserves_total() {
        for n in [0, 1, 9, 10, 37, 100] {
            let (train, val, test) = split_corpus(numbered(n));
            assert_eq!(train.len() + val.len() + test.len(), n);
        }
    }

    #[test]
    fn test_split_sizes_at_100() {
        let (train, val, test) = split_corpus(numbered(100));
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(), 10);
        assert_eq!(test.len(), 10);
    }

    #[test]
    fn test_order_preserved_across_slices() {
        let (train, val, test) = split_corpus(numbered(37));
        let rejoined: Vec<String> = train
            .into_iter()
            .chain(val)
            .chain(test)
            .collect();
        assert_eq!(rejoined, numbered(37));
    }

    #[test]
    fn test_boundaries_use_floor() {
        // 37 texts: floor(37*0.8)=29 train, floor(37*0.1)=3 val, rest test
        let (train, val, test) = split_corpus(numbered(37));
        assert_eq!(train.len(), 29);
        assert_eq!(val.len(), 3);
        assert_eq!(test.len(), 5);
    }

    #[test]
    fn test_tiny_corpus() {
        let (train, val, test) = split_corpus(numbered(1));
        assert!(train.is_empty());
        assert!(val.is_empty());
        assert_eq!(test.len(), 1);
    }
}
