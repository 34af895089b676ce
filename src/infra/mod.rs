// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Persistence that more than one use case depends on.
//
//   model_store.rs - Saves the trained model (pipeline statistics,
//                    label table, classifier parameters and input
//                    schema) to a single gzip'd bincode artifact,
//                    and loads it back with a schema check.
//
// Training writes the artifact; the ask workflow only reads it.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model artifact saving and loading
pub mod model_store;
