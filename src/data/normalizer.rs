// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Reduces arbitrary input text to the canonical Khmer character
// subset every other component assumes.
//
// Raw Khmer text in the wild carries:
//   - Zero-width joiners/spaces (U+200B..U+200D) from keyboards
//   - Byte order marks (U+FEFF) from file encodings
//   - Legacy sign glyphs (៙ ៚ ៖ ៗ ៛ ៝ ៸ ៓) with no modern use
//   - Deprecated consonants ឝ and ឞ, replaced by គ and ម in
//     modern orthography
//   - Mixed-in ASCII words, digits and punctuation
//
// Cleaning steps (applied in order, idempotent in combination):
//   1. Strip the fixed blacklist of format controls and legacy glyphs
//   2. Remove ASCII letters and digits
//   3. Remove ASCII punctuation
//   4. Substitute deprecated consonants with modern equivalents
//   5. Drop every remaining character outside the Khmer block
//      (U+1780–U+17FF, which contains the Khmer digits and the
//      sentence-terminal marks ។ ៕ ៘) or whitespace
//   6. Collapse whitespace runs to a single space and trim
//
// Reference: Rust Book §8 (Strings in Rust)
//            Unicode 15.0 §16.4 (Khmer)

/// Characters stripped outright: zero-width/format controls plus the
/// legacy Khmer sign glyphs that never appear in the target register.
const BLACKLIST: [char; 12] = [
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}',
    '៙', '៚', '៖', 'ៗ', '៛', '៝', '៸', '៓',
];

/// Deprecated glyph → modern equivalent.
const SUBSTITUTIONS: [(char, char); 2] = [('ឝ', 'គ'), ('ឞ', 'ម')];

/// The sentence-terminal marks the normalizer preserves and the
/// segmenter later splits on.
pub const SENTENCE_MARKS: [char; 2] = ['។', '៕'];

pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Clean raw text down to the canonical Khmer subset.
    /// Pure and total: never fails, and `normalize(normalize(s))`
    /// equals `normalize(s)` for every input.
    pub fn normalize(&self, text: &str) -> String {
        let kept = text.chars().filter_map(|c| {
            if BLACKLIST.contains(&c) {
                return None;
            }
            if c.is_ascii_alphanumeric() || c.is_ascii_punctuation() {
                return None;
            }
            let c = SUBSTITUTIONS
                .iter()
                .find(|(old, _)| *old == c)
                .map(|(_, new)| *new)
                .unwrap_or(c);
            if ('\u{1780}'..='\u{17FF}').contains(&c) || c.is_whitespace() {
                Some(c)
            } else {
                None
            }
        });

        // Collapse whitespace runs to a single plain space
        let mut out = String::with_capacity(text.len());
        let mut last_space = false;
        for c in kept {
            if c.is_whitespace() {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim().to_string()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_ascii_and_keeps_khmer() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("Hello123 សួស្តី!!"), "សួស្តី");
    }

    #[test]
    fn test_idempotent() {
        let n = Normalizer::new();
        let inputs = [
            "Hello123 សួស្តី!!",
            "ខ្ញុំ\u{200B}ទៅ  ផ្សារ។",
            "abc !@# \t\n",
            "ឝា ឞី",
            "ព្រះរាជា ៙៚ បាន៖ទៅ",
        ];
        for s in inputs {
            let once = n.normalize(s);
            assert_eq!(n.normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_blacklist_and_zero_width_removed() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("ក\u{200B}ខ\u{FEFF}គៗ"), "កខគ");
    }

    #[test]
    fn test_deprecated_glyphs_substituted() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("ឝ ឞ"), "គ ម");
    }

    #[test]
    fn test_sentence_marks_survive() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("ខ្ញុំទៅផ្សារ។"), "ខ្ញុំទៅផ្សារ។");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("  ក \t ខ\n\nគ  "), "ក ខ គ");
    }

    #[test]
    fn test_khmer_digits_kept() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("ឆ្នាំ១៩៩៣"), "ឆ្នាំ១៩៩៣");
    }

    #[test]
    fn test_empty_and_foreign_input() {
        let n = Normalizer::new();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("a1!"), "");
        assert_eq!(n.normalize("日本語 русский"), "");
    }
}
