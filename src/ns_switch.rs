// In: src/ns_switch.rs

//! The namespace switch adapter.
//!
//! A thin, stateless operation that re-roots which namespace a `MappingStore`
//! treats as its logical source, for every downstream consumer (iteration and
//! serialization). It never copies or reorders identifier strings; the only
//! state it touches is the store's source index, which is why switching
//! A -> B and then B -> A is exactly the identity transform.
//!
//! The adapter is applied twice per pipeline run: once when the base table is
//! loaded (re-rooting to the working namespace the stages expect) and once
//! when the transformed table is persisted (re-rooting to the artifact's
//! declared source namespace).

use crate::error::SymmapError;
use crate::tree::MappingStore;

/// Re-roots `store` so that `namespace` is its logical source.
///
/// Fails with `NamespaceNotFound` if the table does not declare the requested
/// namespace; the store is left untouched in that case.
pub fn switch_source(store: &mut MappingStore, namespace: &str) -> Result<(), SymmapError> {
    let idx = store.namespace_index(namespace)?;
    store.set_source_index(idx);
    Ok(())
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ClassEntry, MappingStore};

    fn sample_store() -> MappingStore {
        let mut store =
            MappingStore::new(vec!["intermediary".to_string(), "named".to_string()]).unwrap();
        store.push_class(ClassEntry::new(vec![
            Some("class_1".to_string()),
            Some("ClassOne".to_string()),
        ]));
        store
    }

    #[test]
    fn test_switch_changes_only_the_logical_source() {
        let mut store = sample_store();
        assert_eq!(store.source_namespace(), "intermediary");

        switch_source(&mut store, "named").unwrap();
        assert_eq!(store.source_namespace(), "named");

        // The identifier data is untouched; only the orientation moved.
        let class = &store.classes()[0];
        assert_eq!(class.names[0].as_deref(), Some("class_1"));
        assert_eq!(class.names[1].as_deref(), Some("ClassOne"));
    }

    #[test]
    fn test_switch_is_an_involution() {
        let original = sample_store();
        let mut store = original.clone();

        switch_source(&mut store, "named").unwrap();
        switch_source(&mut store, "intermediary").unwrap();

        assert_eq!(store, original);
    }

    #[test]
    fn test_switch_to_unknown_namespace_fails_and_leaves_store_intact() {
        let mut store = sample_store();
        let err = switch_source(&mut store, "official").unwrap_err();

        assert!(matches!(err, SymmapError::NamespaceNotFound { .. }));
        assert_eq!(store.source_namespace(), "intermediary");
    }
}
