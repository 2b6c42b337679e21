// In: src/cache/mod.rs

//! The transform-and-cache layer.
//!
//! `traits` defines the single capability a transformation stage must expose;
//! `orchestrator` composes an ordered chain of stages over one shared
//! `MappingStore` and publishes the result into a key-addressed artifact
//! cache on disk.

pub mod orchestrator;
pub mod traits;


pub use orchestrator::ArtifactCache;
pub use traits::{chain_identity, fingerprint_params, MappingStage};
