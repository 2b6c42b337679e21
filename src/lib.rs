//! This file is the root of the `symmap_cache` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`tree`, `format`,
//!     `cache`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types that make up the public surface of
//!     the crate: the mapping store, the stage trait, and the orchestrator.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod cache;
pub mod config;
pub mod format;
pub mod ns_switch;
pub mod tree;

mod error;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use cache::{chain_identity, ArtifactCache, MappingStage};
pub use config::PipelineConfig;
pub use error::SymmapError;
pub use tree::MappingStore;
