// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Persists the final vocabulary artifact produced by a training
// run: `{vocab, stoi, itos}` as JSON, path-stamped with the run
// timestamp so repeated runs never overwrite each other.
//
// The artifact exists for download/inspection alongside the final
// weights; inference itself always uses the vocabulary embedded in
// the checkpoint it loads.
//
// Reference: Rust Book §9 (Error Handling)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::vocabulary::Vocabulary;

/// On-disk shape of the vocabulary artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabArtifact {
    /// The sorted character list, id order
    pub vocab: Vec<char>,
    pub stoi: BTreeMap<char, usize>,
    pub itos: BTreeMap<usize, char>,
}

pub struct VocabStore {
    dir: PathBuf,
}

impl VocabStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create vocab directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write the timestamped vocabulary artifact, returning its path.
    pub fn save(&self, vocab: &Vocabulary, timestamp: &str) -> Result<PathBuf> {
        let artifact = VocabArtifact {
            vocab: vocab.chars(),
            stoi: vocab.stoi().clone(),
            itos: vocab.itos().clone(),
        };

        let path = self.dir.join(format!("vocab_{timestamp}.json"));
        fs::write(&path, serde_json::to_string_pretty(&artifact)?)
            .with_context(|| format!("cannot write vocabulary artifact '{}'", path.display()))?;

        tracing::info!("Saved vocabulary artifact to '{}'", path.display());
        Ok(path)
    }

    /// Read an artifact back (used by tests and external tooling).
    pub fn load(path: &Path) -> Result<VocabArtifact> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("cannot read vocabulary artifact '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("corrupt vocabulary artifact '{}'", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = VocabStore::new(dir.path()).unwrap();
        let vocab = Vocabulary::build(&["កខគ".to_string()]).unwrap();

        let path = store.save(&vocab, "20260101_120000").unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().contains("20260101_120000"));

        let artifact = VocabStore::load(&path).unwrap();
        assert_eq!(artifact.vocab.len(), 3);
        assert_eq!(artifact.stoi, *vocab.stoi());
        assert_eq!(artifact.itos, *vocab.itos());
    }
}
