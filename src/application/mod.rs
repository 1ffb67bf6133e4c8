// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
// training a model, continuing a seed text, or converting text to
// the royal register.
//
// Rules for this layer:
//   - No tensor math or model code here
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The text-continuation workflow
pub mod generate_use_case;

// The royal-register conversion workflow
pub mod convert_use_case;
