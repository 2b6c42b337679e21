// In: src/format/reader.rs

//! Parses a serialized tiny mapping table into a `MappingStore`.
//!
//! The reader is strict about the grammar (every violation is a `Format`
//! error naming the offending line) but lenient about unknown header
//! properties, which are skipped. Entry order in the file is preserved
//! verbatim so a later re-serialization is deterministic.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SymmapError;
use crate::format::{unescape, FORMAT_MAJOR, HEADER_MAGIC, PROP_ESCAPED_NAMES};
use crate::ns_switch;
use crate::tree::{ClassEntry, MappingStore, MemberEntry, MemberKind};

//==================================================================================
// 1. Public API
//==================================================================================

/// Parses a table, keeping the file's own declared source namespace as the
/// logical source.
pub fn read<R: BufRead>(reader: R) -> Result<MappingStore, SymmapError> {
    Parser::new().run(reader)
}

/// Parses a table and re-roots it so `source_namespace` is the logical
/// source. Every entry must carry a non-empty identifier in that namespace;
/// this is the load-time invariant all downstream consumers rely on.
pub fn read_with_source<R: BufRead>(
    reader: R,
    source_namespace: &str,
) -> Result<MappingStore, SymmapError> {
    let mut store = read(reader)?;
    ns_switch::switch_source(&mut store, source_namespace)?;

    let idx = store.source_index();
    let mut seen = HashSet::new();
    for class in store.classes() {
        match store.source_name(&class.names) {
            None => {
                return Err(SymmapError::Format(format!(
                    "Class entry is missing an identifier in load source namespace '{}'",
                    store.namespaces()[idx]
                )));
            }
            Some(name) if !seen.insert(name.to_string()) => {
                return Err(SymmapError::Format(format!(
                    "Duplicate class entry '{}' under load source namespace '{}'",
                    name,
                    store.namespaces()[idx]
                )));
            }
            Some(_) => {}
        }
        for member in &class.members {
            if store.source_name(&member.names).is_none() {
                return Err(SymmapError::Format(format!(
                    "Member entry is missing an identifier in load source namespace '{}'",
                    store.namespaces()[idx]
                )));
            }
        }
    }
    Ok(store)
}

/// Convenience wrapper opening `path` and attaching it to any I/O failure.
pub fn read_path(path: &Path, source_namespace: &str) -> Result<MappingStore, SymmapError> {
    let file = File::open(path).map_err(|e| SymmapError::IoAt {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_with_source(BufReader::new(file), source_namespace)
        .map_err(|e| e.at_path(path))
}

//==================================================================================
// 2. Parser
//==================================================================================

struct Parser {
    escaped_names: bool,
    seen_class: bool,
    seen_source_names: HashSet<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            escaped_names: false,
            seen_class: false,
            seen_source_names: HashSet::new(),
        }
    }

    fn run<R: BufRead>(mut self, reader: R) -> Result<MappingStore, SymmapError> {
        let mut lines = reader.lines().enumerate();

        let header = match lines.next() {
            Some((_, line)) => line?,
            None => return Err(SymmapError::Format("Missing header line".to_string())),
        };
        let mut store = parse_header(&header)?;
        let ns_count = store.namespaces().len();

        for (idx, line) in lines {
            let line_no = idx + 1;
            let line = line?;
            let indent = line.bytes().take_while(|&b| b == b'\t').count();
            let fields: Vec<&str> = line[indent..].split('\t').collect();

            if fields[0].is_empty() {
                return Err(SymmapError::Format(format!(
                    "Line {}: empty record",
                    line_no
                )));
            }

            match (indent, fields[0]) {
                (0, "c") => {
                    let names = self.parse_names(&fields[1..], ns_count, line_no)?;
                    let source = names[0].as_deref().ok_or_else(|| {
                        SymmapError::Format(format!(
                            "Line {}: class entry without a source namespace identifier",
                            line_no
                        ))
                    })?;
                    if !self.seen_source_names.insert(source.to_string()) {
                        return Err(SymmapError::Format(format!(
                            "Line {}: duplicate class entry '{}' under the source namespace",
                            line_no, source
                        )));
                    }
                    store.push_class(ClassEntry::new(names));
                    self.seen_class = true;
                }
                (1, key) if !self.seen_class => {
                    // Property section between the header and the first class.
                    if key == PROP_ESCAPED_NAMES {
                        self.escaped_names = true;
                    } else {
                        log::debug!("Skipping unknown header property '{}'", key);
                    }
                }
                (1, kind @ ("f" | "m")) => {
                    let class = last_class_mut(&mut store, line_no)?;
                    if fields.len() < 3 {
                        return Err(SymmapError::Format(format!(
                            "Line {}: member record needs a descriptor and a source identifier",
                            line_no
                        )));
                    }
                    let descriptor = self.token(fields[1], line_no)?;
                    let names = self.parse_names(&fields[2..], ns_count, line_no)?;
                    if names[0].is_none() {
                        return Err(SymmapError::Format(format!(
                            "Line {}: member entry without a source namespace identifier",
                            line_no
                        )));
                    }
                    let kind = if kind == "f" {
                        MemberKind::Field
                    } else {
                        MemberKind::Method
                    };
                    class.members.push(MemberEntry::new(kind, descriptor, names));
                }
                (1, "c") => {
                    let comment = self.comment(&fields, line_no)?;
                    last_class_mut(&mut store, line_no)?.comment = Some(comment);
                }
                (2, "c") => {
                    let comment = self.comment(&fields, line_no)?;
                    let class = last_class_mut(&mut store, line_no)?;
                    let member = class.members.last_mut().ok_or_else(|| {
                        SymmapError::Format(format!(
                            "Line {}: comment record with no owning member",
                            line_no
                        ))
                    })?;
                    member.comment = Some(comment);
                }
                (_, kind) => {
                    return Err(SymmapError::Format(format!(
                        "Line {}: unknown record kind '{}' at indent {}",
                        line_no, kind, indent
                    )));
                }
            }
        }

        Ok(store)
    }

    /// Decodes one identifier column list. Empty columns are absent, never
    /// the empty string; a row may not carry more columns than the header
    /// declared namespaces.
    fn parse_names(
        &self,
        fields: &[&str],
        ns_count: usize,
        line_no: usize,
    ) -> Result<Vec<Option<String>>, SymmapError> {
        if fields.is_empty() {
            return Err(SymmapError::Format(format!(
                "Line {}: record without identifier columns",
                line_no
            )));
        }
        if fields.len() > ns_count {
            return Err(SymmapError::Format(format!(
                "Line {}: {} identifier columns but only {} namespaces declared",
                line_no,
                fields.len(),
                ns_count
            )));
        }

        let mut names = Vec::with_capacity(ns_count);
        for field in fields {
            if field.is_empty() {
                names.push(None);
            } else {
                names.push(Some(self.token(field, line_no)?));
            }
        }
        names.resize(ns_count, None);
        Ok(names)
    }

    fn token(&self, raw: &str, line_no: usize) -> Result<String, SymmapError> {
        if self.escaped_names {
            unescape(raw).map_err(|e| SymmapError::Format(format!("Line {}: {}", line_no, e)))
        } else {
            Ok(raw.to_string())
        }
    }

    /// Comment payloads are always escaped, independent of `escaped-names`.
    fn comment(&self, fields: &[&str], line_no: usize) -> Result<String, SymmapError> {
        if fields.len() != 2 {
            return Err(SymmapError::Format(format!(
                "Line {}: comment record must carry exactly one payload column",
                line_no
            )));
        }
        unescape(fields[1]).map_err(|e| SymmapError::Format(format!("Line {}: {}", line_no, e)))
    }
}

fn parse_header(line: &str) -> Result<MappingStore, SymmapError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 5 || fields[0] != HEADER_MAGIC {
        return Err(SymmapError::Format(
            "Header must be 'tiny\\t<major>\\t<minor>\\t<ns...>' with at least 2 namespaces"
                .to_string(),
        ));
    }

    let major: u32 = fields[1]
        .parse()
        .map_err(|_| SymmapError::Format(format!("Bad major version '{}'", fields[1])))?;
    let _minor: u32 = fields[2]
        .parse()
        .map_err(|_| SymmapError::Format(format!("Bad minor version '{}'", fields[2])))?;
    if major != FORMAT_MAJOR {
        return Err(SymmapError::Format(format!(
            "Unsupported format major version: expected {}, got {}",
            FORMAT_MAJOR, major
        )));
    }

    MappingStore::new(fields[3..].iter().map(|s| s.to_string()).collect())
}

fn last_class_mut(store: &mut MappingStore, line_no: usize) -> Result<&mut ClassEntry, SymmapError> {
    store.classes_mut().last_mut().ok_or_else(|| {
        SymmapError::Format(format!(
            "Line {}: member record with no owning class",
            line_no
        ))
    })
}
