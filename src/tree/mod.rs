//! This module defines the core, strongly-typed in-memory representation of a
//! multi-namespace mapping table.
//!
//! It currently includes the canonical `MappingStore` together with its class
//! and member entry types. The store is the single mutable value a chain of
//! transformation stages operates on.

pub mod store;

// Re-export the main types for easier access.
pub use store::{ClassEntry, MappingStore, MemberEntry, MemberKind};
