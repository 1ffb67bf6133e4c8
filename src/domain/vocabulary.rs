// ============================================================
// Layer 3 — Character Vocabulary
// ============================================================
// The character↔id bijection for a training corpus.
//
// Id layout:
//   0 = <pad>   1 = <sos>   2 = <eos>   3 = <unk>
//   4.. = every character observed in the corpus, sorted
//
// Sorting the observed character set before assigning ids makes
// the mapping deterministic for a given corpus: the same corpus
// always produces the same vocabulary.
//
// Two encoding policies exist and are deliberately separate API:
//   encode_dropping()     — unknown characters vanish
//                           (window construction for training)
//   encode_with_unknown() — unknown characters map to <unk>
//                           (one-shot transform, alignment preserved)
//
// Reference: Rust Book §8 (Collections)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::ModelError;

/// Id of the padding symbol.
pub const PAD_ID: usize = 0;
/// Id of the start-of-sequence sentinel.
pub const SOS_ID: usize = 1;
/// Id of the end-of-sequence sentinel.
pub const EOS_ID: usize = 2;
/// Id of the unknown-character symbol.
pub const UNK_ID: usize = 3;
/// Number of reserved symbol ids before the first character id.
pub const RESERVED_SYMBOLS: usize = 4;

/// Deterministic character↔id mapping built from a training corpus.
///
/// Both directions are stored so the mapping can be embedded in a
/// checkpoint and reloaded without the original corpus. Immutable
/// after construction — inference must reuse the vocabulary from the
/// checkpoint it loads, never rebuild one from new text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    stoi: BTreeMap<char, usize>,
    itos: BTreeMap<usize, char>,
}

impl Vocabulary {
    /// Build a vocabulary from corpus texts.
    ///
    /// Flattens every string into characters, dedups via a set,
    /// sorts, then assigns increasing ids starting after the
    /// reserved symbols. Fails on a corpus with no characters.
    pub fn build(corpus: &[String]) -> Result<Self, ModelError> {
        // BTreeSet gives dedup + sorted iteration in one structure
        let chars: std::collections::BTreeSet<char> = corpus
            .iter()
            .flat_map(|text| text.chars())
            .collect();

        if chars.is_empty() {
            return Err(ModelError::CorpusError(
                "no characters observed in corpus".to_string(),
            ));
        }

        let mut stoi = BTreeMap::new();
        let mut itos = BTreeMap::new();
        for (offset, ch) in chars.into_iter().enumerate() {
            let id = RESERVED_SYMBOLS + offset;
            stoi.insert(ch, id);
            itos.insert(id, ch);
        }

        Ok(Self { stoi, itos })
    }

    /// Reconstruct a vocabulary from its two serialized mapping halves,
    /// e.g. when loading a checkpoint. Fails if the halves are not a
    /// bijection over the same id range.
    pub fn from_mappings(
        stoi: BTreeMap<char, usize>,
        itos: BTreeMap<usize, char>,
    ) -> Result<Self, ModelError> {
        let consistent = stoi.len() == itos.len()
            && stoi.iter().all(|(ch, id)| itos.get(id) == Some(ch));
        if !consistent {
            return Err(ModelError::CheckpointMismatch {
                expected: stoi.len(),
                actual: itos.len(),
            });
        }
        Ok(Self { stoi, itos })
    }

    /// Total vocabulary size: reserved symbols + observed characters.
    pub fn size(&self) -> usize {
        RESERVED_SYMBOLS + self.stoi.len()
    }

    /// The sorted character list (ids in order, reserved symbols excluded).
    pub fn chars(&self) -> Vec<char> {
        self.itos.values().copied().collect()
    }

    /// Id for a character, if it was in the training corpus.
    pub fn id_of(&self, ch: char) -> Option<usize> {
        self.stoi.get(&ch).copied()
    }

    /// Character for an id. `None` for reserved symbols and out-of-range ids.
    pub fn char_of(&self, id: usize) -> Option<char> {
        self.itos.get(&id).copied()
    }

    /// True for the four reserved symbol ids.
    pub fn is_reserved(id: usize) -> bool {
        id < RESERVED_SYMBOLS
    }

    /// Encode text, silently dropping characters outside the vocabulary.
    /// This is the window-construction policy: training windows must only
    /// contain real character ids.
    pub fn encode_dropping(&self, text: &str) -> Vec<usize> {
        text.chars().filter_map(|ch| self.id_of(ch)).collect()
    }

    /// Encode text, mapping characters outside the vocabulary to `<unk>`.
    /// This is the transform policy: output alignment requires the encoded
    /// length to equal the input character count.
    pub fn encode_with_unknown(&self, text: &str) -> Vec<usize> {
        text.chars()
            .map(|ch| self.id_of(ch).unwrap_or(UNK_ID))
            .collect()
    }

    /// Decode ids back to text, skipping the four reserved symbols and
    /// any id with no character mapping.
    pub fn decode(&self, ids: &[usize]) -> String {
        ids.iter().filter_map(|&id| self.char_of(id)).collect()
    }

    /// Borrow the character→id half (for checkpoint serialization).
    pub fn stoi(&self) -> &BTreeMap<char, usize> {
        &self.stoi
    }

    /// Borrow the id→character half (for checkpoint serialization).
    pub fn itos(&self) -> &BTreeMap<usize, char> {
        &self.itos
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_ids_are_dense_and_bijective() {
        let v = Vocabulary::build(&corpus(&["កខគ", "ខគឃ"])).unwrap();
        // 4 distinct characters after dedup
        assert_eq!(v.size(), RESERVED_SYMBOLS + 4);
        for id in RESERVED_SYMBOLS..v.size() {
            let ch = v.char_of(id).unwrap();
            assert_eq!(v.id_of(ch), Some(id));
        }
        assert_eq!(v.stoi().len(), v.itos().len());
    }

    #[test]
    fn test_construction_is_deterministic() {
        // Same character set in different orders → identical mapping
        let a = Vocabulary::build(&corpus(&["កខគ"])).unwrap();
        let b = Vocabulary::build(&corpus(&["គខក"])).unwrap();
        assert_eq!(a.stoi(), b.stoi());
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let err = Vocabulary::build(&corpus(&["", ""])).unwrap_err();
        assert!(matches!(err, ModelError::CorpusError(_)));
    }

    #[test]
    fn test_encode_dropping_skips_unknowns() {
        let v = Vocabulary::build(&corpus(&["កខ"])).unwrap();
        let ids = v.encode_dropping("កគខ"); // គ not in corpus
        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(|&id| !Vocabulary::is_reserved(id)));
    }

    #[test]
    fn test_encode_with_unknown_preserves_length() {
        let v = Vocabulary::build(&corpus(&["កខ"])).unwrap();
        let ids = v.encode_with_unknown("កគខ");
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[1], UNK_ID);
    }

    #[test]
    fn test_decode_filters_reserved_symbols() {
        let v = Vocabulary::build(&corpus(&["កខ"])).unwrap();
        let mut ids = vec![SOS_ID];
        ids.extend(v.encode_dropping("កខ"));
        ids.push(EOS_ID);
        ids.push(PAD_ID);
        assert_eq!(v.decode(&ids), "កខ");
    }

    #[test]
    fn test_mapping_halves_must_agree() {
        let v = Vocabulary::build(&corpus(&["កខ"])).unwrap();
        let mut broken = v.itos().clone();
        broken.insert(999, 'ក');
        let err = Vocabulary::from_mappings(v.stoi().clone(), broken).unwrap_err();
        assert!(matches!(err, ModelError::CheckpointMismatch { .. }));
    }
}
