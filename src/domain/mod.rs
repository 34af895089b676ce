// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define what the
// system works with: records, schemas, predictions and errors.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only data types, traits and validation
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Training records, datasets and prediction results
pub mod record;

/// Column schemas and the compatibility check used on model load
pub mod schema;

/// The crate-wide error enum
pub mod error;

/// Core abstractions (traits) that other layers implement
pub mod traits;
