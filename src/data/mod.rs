// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw dataset file to tensor batches:
//
//   dataset file (.csv / .txt)
//       │
//       ▼
//   CsvCorpusLoader   → raw text rows
//       │
//       ▼
//   Normalizer        → canonical Khmer-only text
//       │
//       ▼
//   Segmenter/Chunker → bounded sentence pieces
//       │
//       ▼
//   Splitter          → ordered 80/10/10 document-level split
//       │
//       ▼
//   WindowDataset     → (input, shifted-target) windows per split
//       │
//       ▼
//   WindowBatcher     → [batch, seq_len] Int tensor batches
//
// The split happens BEFORE windowing so no window ever straddles
// a train/validation/test boundary.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads corpus rows from a CSV or plain-text dataset file
pub mod loader;

/// Cleans raw text to the canonical Khmer character subset
pub mod normalizer;

/// Splits text into sentences and bounds their length
pub mod segmenter;

/// Ordered document-level train/validation/test split
pub mod splitter;

/// Fixed-length next-character training windows
pub mod dataset;

/// Stacks windows into tensor batches
pub mod batcher;
