// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns:
//
//   checkpoint.rs     — atomic save/load of weight + metadata
//                       checkpoint pairs (temporary recovery
//                       points and final stamped artifacts)
//   vocab_store.rs    — the standalone vocabulary artifact
//   metrics.rs        — per-epoch CSV metrics log
//   prediction_log.rs — JSON-lines prediction sink
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Final vocabulary artifact persistence
pub mod vocab_store;

/// Training metrics CSV logger
pub mod metrics;

/// File-backed prediction sink
pub mod prediction_log;
