// In: src/tree/store.rs

//! The in-memory multi-namespace mapping graph.
//!
//! A `MappingStore` holds one identifier per known namespace for every symbol
//! entry (classes and their members). The namespace set is fixed when the
//! store is created; identifiers in namespaces not yet populated are absent
//! (`None`), never the empty string, and consumers must tolerate that.
//!
//! Entry order is load order and is preserved verbatim, because the on-disk
//! format is record-ordered and re-serialization must be deterministic.

use crate::error::SymmapError;

//==================================================================================
// 1. Entry Types
//==================================================================================

/// The two member record kinds the tiny grammar distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
}

/// One field or method entry under a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub kind: MemberKind,
    /// Type descriptor in the table's descriptor namespace.
    pub descriptor: String,
    /// Per-namespace identifiers, indexed by the store's namespace order.
    pub names: Vec<Option<String>>,
    pub comment: Option<String>,
}

/// One class entry with its member entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Per-namespace identifiers, indexed by the store's namespace order.
    pub names: Vec<Option<String>>,
    pub comment: Option<String>,
    pub members: Vec<MemberEntry>,
}

impl ClassEntry {
    pub fn new(names: Vec<Option<String>>) -> Self {
        Self {
            names,
            comment: None,
            members: Vec::new(),
        }
    }
}

impl MemberEntry {
    pub fn new(kind: MemberKind, descriptor: String, names: Vec<Option<String>>) -> Self {
        Self {
            kind,
            descriptor,
            names,
            comment: None,
        }
    }
}

/// Reads the identifier for one namespace index, treating a short `names`
/// vector the same as an explicit `None`.
pub(crate) fn name_at(names: &[Option<String>], idx: usize) -> Option<&str> {
    names.get(idx).and_then(|n| n.as_deref())
}

/// Writes the identifier for one namespace index, growing the vector with
/// absent slots as needed.
pub(crate) fn set_name_at(names: &mut Vec<Option<String>>, idx: usize, value: Option<String>) {
    if names.len() <= idx {
        names.resize(idx + 1, None);
    }
    names[idx] = value;
}

//==================================================================================
// 2. The Mapping Store
//==================================================================================

/// An in-memory, multi-namespace renaming table.
///
/// `source` is the index of the namespace currently treated as the logical
/// source. It is the only piece of state the namespace switch adapter
/// touches; the identifier data itself is never copied or reordered by a
/// switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingStore {
    namespaces: Vec<String>,
    source: usize,
    classes: Vec<ClassEntry>,
}

impl MappingStore {
    /// Creates an empty store over a fixed namespace set. At least two
    /// namespaces are required (an intermediate and a human-readable one),
    /// and names must be unique.
    pub fn new(namespaces: Vec<String>) -> Result<Self, SymmapError> {
        if namespaces.len() < 2 {
            return Err(SymmapError::Format(format!(
                "A mapping table needs at least 2 namespaces, got {}",
                namespaces.len()
            )));
        }

        for (i, ns) in namespaces.iter().enumerate() {
            if ns.is_empty() {
                return Err(SymmapError::Format(format!(
                    "Namespace {} has an empty name",
                    i
                )));
            }
            if namespaces[..i].contains(ns) {
                return Err(SymmapError::Format(format!(
                    "Duplicate namespace '{}' in table header",
                    ns
                )));
            }
        }

        Ok(Self {
            namespaces,
            source: 0,
            classes: Vec::new(),
        })
    }

    /// All namespace names, in the order the table declared them.
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// The namespace currently treated as the logical source.
    pub fn source_namespace(&self) -> &str {
        &self.namespaces[self.source]
    }

    pub(crate) fn source_index(&self) -> usize {
        self.source
    }

    pub(crate) fn set_source_index(&mut self, idx: usize) {
        debug_assert!(idx < self.namespaces.len());
        self.source = idx;
    }

    /// Resolves a namespace name to its column index.
    pub fn namespace_index(&self, namespace: &str) -> Result<usize, SymmapError> {
        self.namespaces
            .iter()
            .position(|ns| ns == namespace)
            .ok_or_else(|| SymmapError::NamespaceNotFound {
                namespace: namespace.to_string(),
                available: self.namespaces.join(", "),
            })
    }

    /// Appends a class entry, preserving load order.
    pub fn push_class(&mut self, class: ClassEntry) {
        self.classes.push(class);
    }

    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }

    /// Mutable access for transformation stages. Stages may add members,
    /// rename identifiers in non-source namespaces, or attach comments.
    pub fn classes_mut(&mut self) -> &mut [ClassEntry] {
        &mut self.classes
    }

    /// Looks up a class by its identifier in the given namespace. Linear scan;
    /// the tables this core handles are small enough that an index is not
    /// worth keeping coherent across namespace switches.
    pub fn class_by_name(&self, namespace_idx: usize, name: &str) -> Option<&ClassEntry> {
        self.classes
            .iter()
            .find(|c| name_at(&c.names, namespace_idx) == Some(name))
    }

    /// Identifier of an entry in the current source namespace, if present.
    pub fn source_name<'a>(&self, names: &'a [Option<String>]) -> Option<&'a str> {
        name_at(names, self.source)
    }
}
