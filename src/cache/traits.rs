// In: src/cache/traits.rs

//! Defines the behavioral trait for transformation stages.
//!
//! A stage is an opaque unit of logic with exactly one capability: given a
//! mutable `MappingStore`, optionally mutate it and report whether any change
//! occurred. Stages are composed by ordered iteration, never by inheritance,
//! and the orchestrator treats each one as a black box. The only other thing
//! a stage must do is describe itself: a `name` for failure context and a
//! `fingerprint` covering its effective parameters, which feeds the cache key.

use sha2::{Digest, Sha256};

use crate::error::SymmapError;
use crate::tree::MappingStore;

/// One pluggable transformation stage over a mapping table.
pub trait MappingStage {
    /// Short human-readable name, used in failure reports.
    fn name(&self) -> &str;

    /// Stable identity of this stage's configuration. Two stages with the
    /// same effective parameters must report the same fingerprint across
    /// runs, and any parameter change must change it. The orchestrator only
    /// consumes this value; it never inspects stage internals.
    fn fingerprint(&self) -> String;

    /// Applies the stage to the shared store. Returns whether anything
    /// changed. An error aborts the remaining chain and the resolve call.
    fn process(&self, store: &mut MappingStore) -> Result<bool, SymmapError>;
}

/// Collapses an ordered chain into its cache key: a hex SHA-256 over the
/// stage fingerprints. The digest keeps the key filename-safe and collision
/// resistant over the space of realistic chain configurations; a separator
/// byte between fingerprints keeps adjacent stages from blending together.
pub fn chain_identity(chain: &[Box<dyn MappingStage>]) -> String {
    let mut hasher = Sha256::new();
    for stage in chain {
        hasher.update(stage.fingerprint().as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// Builds a stage fingerprint from a name and its serializable parameters.
/// Convenience for implementors: any field change in `params` changes the
/// reported identity without hand-rolled formatting.
pub fn fingerprint_params<T: serde::Serialize>(
    name: &str,
    params: &T,
) -> Result<String, SymmapError> {
    Ok(format!("{}:{}", name, serde_json::to_string(params)?))
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStage(&'static str);

    impl MappingStage for FixedStage {
        fn name(&self) -> &str {
            "fixed"
        }
        fn fingerprint(&self) -> String {
            self.0.to_string()
        }
        fn process(&self, _store: &mut MappingStore) -> Result<bool, SymmapError> {
            Ok(false)
        }
    }

    fn chain(fingerprints: &[&'static str]) -> Vec<Box<dyn MappingStage>> {
        fingerprints
            .iter()
            .map(|f| Box::new(FixedStage(f)) as Box<dyn MappingStage>)
            .collect()
    }

    #[test]
    fn test_chain_identity_is_stable_across_runs() {
        let a = chain_identity(&chain(&["rename:v1", "inject:v2"]));
        let b = chain_identity(&chain(&["rename:v1", "inject:v2"]));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_chain_identity_depends_on_order_and_parameters() {
        let base = chain_identity(&chain(&["rename:v1", "inject:v2"]));
        assert_ne!(base, chain_identity(&chain(&["inject:v2", "rename:v1"])));
        assert_ne!(base, chain_identity(&chain(&["rename:v2", "inject:v2"])));
    }

    #[test]
    fn test_adjacent_fingerprints_do_not_blend() {
        let a = chain_identity(&chain(&["ab", "c"]));
        let b = chain_identity(&chain(&["a", "bc"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_params_tracks_parameter_changes() {
        #[derive(serde::Serialize)]
        struct Params {
            suffix: String,
        }

        let a = fingerprint_params(
            "rename",
            &Params {
                suffix: "_patched".to_string(),
            },
        )
        .unwrap();
        let b = fingerprint_params(
            "rename",
            &Params {
                suffix: "_fixed".to_string(),
            },
        )
        .unwrap();

        assert_ne!(a, b);
        assert!(a.starts_with("rename:"));
    }
}
