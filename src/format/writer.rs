// In: src/format/writer.rs

//! Serializes a `MappingStore` back into the tiny text format.
//!
//! The writer is the authoritative producer of the canonical normalized form:
//! tab-separated columns, the `escaped-names` property always set, trailing
//! absent columns trimmed, and entry order preserved exactly as loaded. The
//! round-trip guarantee is that writing a freshly loaded table yields output
//! that is stable under repeated load/write cycles.
//!
//! Missing-destination policy: an entry with no identifier in the requested
//! destination namespace is skipped, together with its children. This is the
//! fixed policy of this core (complete-destination output); it is never
//! decided per call site.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SymmapError;
use crate::format::{escape, FORMAT_MAJOR, FORMAT_MINOR, HEADER_MAGIC, PROP_ESCAPED_NAMES};
use crate::tree::store::name_at;
use crate::tree::{ClassEntry, MappingStore, MemberEntry, MemberKind};

//==================================================================================
// 1. Public API
//==================================================================================

/// Writes the table choosing `dest_namespace` as the file's declared source
/// namespace. The remaining namespaces keep their declared relative order.
pub fn write<W: Write>(
    store: &MappingStore,
    dest_namespace: &str,
    writer: &mut W,
) -> Result<(), SymmapError> {
    let dest = store.namespace_index(dest_namespace)?;

    // Column order of the emitted file: destination first, the rest as declared.
    let mut columns = vec![dest];
    columns.extend((0..store.namespaces().len()).filter(|&i| i != dest));

    writeln!(
        writer,
        "{}\t{}\t{}\t{}",
        HEADER_MAGIC,
        FORMAT_MAJOR,
        FORMAT_MINOR,
        columns
            .iter()
            .map(|&i| store.namespaces()[i].as_str())
            .collect::<Vec<_>>()
            .join("\t")
    )?;
    writeln!(writer, "\t{}", PROP_ESCAPED_NAMES)?;

    let mut skipped = 0usize;
    for class in store.classes() {
        skipped += write_class(class, dest, &columns, writer)?;
    }
    if skipped > 0 {
        log::warn!(
            "Skipped {} entries with no identifier in destination namespace '{}'",
            skipped,
            dest_namespace
        );
    }

    writer.flush()?;
    Ok(())
}

/// Convenience wrapper writing to `path`, attaching the path to I/O failures.
pub fn write_path(
    store: &MappingStore,
    dest_namespace: &str,
    path: &Path,
) -> Result<(), SymmapError> {
    let file = File::create(path).map_err(|e| SymmapError::IoAt {
        path: path.to_path_buf(),
        source: e,
    })?;
    write(store, dest_namespace, &mut BufWriter::new(file)).map_err(|e| e.at_path(path))
}

//==================================================================================
// 2. Record Emission
//==================================================================================

/// Emits one class and its children. Returns how many entries were skipped
/// for lacking a destination identifier.
fn write_class<W: Write>(
    class: &ClassEntry,
    dest: usize,
    columns: &[usize],
    writer: &mut W,
) -> Result<usize, SymmapError> {
    if name_at(&class.names, dest).is_none() {
        // Children are skipped with their owner.
        return Ok(1 + class.members.len());
    }

    writeln!(writer, "c\t{}", render_names(&class.names, columns))?;
    if let Some(comment) = &class.comment {
        writeln!(writer, "\tc\t{}", escape(comment))?;
    }

    let mut skipped = 0usize;
    for member in &class.members {
        skipped += write_member(member, dest, columns, writer)?;
    }
    Ok(skipped)
}

fn write_member<W: Write>(
    member: &MemberEntry,
    dest: usize,
    columns: &[usize],
    writer: &mut W,
) -> Result<usize, SymmapError> {
    if name_at(&member.names, dest).is_none() {
        return Ok(1);
    }

    let kind = match member.kind {
        MemberKind::Field => "f",
        MemberKind::Method => "m",
    };
    writeln!(
        writer,
        "\t{}\t{}\t{}",
        kind,
        escape(&member.descriptor),
        render_names(&member.names, columns)
    )?;
    if let Some(comment) = &member.comment {
        writeln!(writer, "\t\tc\t{}", escape(comment))?;
    }
    Ok(0)
}

/// Renders identifier columns in the emitted column order. Interior absent
/// identifiers become empty columns; trailing absent columns are trimmed,
/// which is part of the canonical form.
fn render_names(names: &[Option<String>], columns: &[usize]) -> String {
    let mut rendered: Vec<String> = columns
        .iter()
        .map(|&i| name_at(names, i).map(escape).unwrap_or_default())
        .collect();
    while rendered.len() > 1 && rendered.last().is_some_and(|s| s.is_empty()) {
        rendered.pop();
    }
    rendered.join("\t")
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::reader::read;
    use std::io::Cursor;

    const SAMPLE: &str = "tiny\t2\t0\tintermediary\tnamed\n\
        \tescaped-names\n\
        c\tclass_1\tnet/example/ClassOne\n\
        \tc\ttop level\n\
        \tf\tI\tfield_1\tcounter\n\
        \tm\t()V\tmethod_1\trun\n\
        c\tclass_2\n";

    fn write_to_string(store: &MappingStore, dest: &str) -> String {
        let mut buf = Vec::new();
        write(store, dest, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_roundtrip_is_idempotent_after_first_normalization() {
        let store = read(Cursor::new(SAMPLE)).unwrap();
        let first = write_to_string(&store, "intermediary");

        let reloaded = read(Cursor::new(first.as_str())).unwrap();
        let second = write_to_string(&reloaded, "intermediary");

        assert_eq!(first, second);
    }

    #[test]
    fn test_destination_namespace_becomes_first_column() {
        let store = read(Cursor::new(SAMPLE)).unwrap();
        let out = write_to_string(&store, "named");

        let header = out.lines().next().unwrap();
        assert_eq!(header, "tiny\t2\t0\tnamed\tintermediary");
        assert!(out.contains("c\tnet/example/ClassOne\tclass_1\n"));
    }

    #[test]
    fn test_entries_missing_destination_identifier_are_skipped() {
        let store = read(Cursor::new(SAMPLE)).unwrap();
        let out = write_to_string(&store, "named");

        // class_2 has no named identifier and must not be emitted.
        assert!(!out.contains("class_2"));
        // It is still present when the complete namespace is the destination.
        assert!(write_to_string(&store, "intermediary").contains("class_2"));
    }

    #[test]
    fn test_identifiers_are_escaped_on_output() {
        let mut store = read(Cursor::new(SAMPLE)).unwrap();
        store.classes_mut()[0].comment = Some("line one\nline two\ttabbed".to_string());

        let out = write_to_string(&store, "intermediary");
        assert!(out.contains("\tc\tline one\\nline two\\ttabbed\n"));

        // And the escaped form survives a reload.
        let reloaded = read(Cursor::new(out.as_str())).unwrap();
        assert_eq!(
            reloaded.classes()[0].comment.as_deref(),
            Some("line one\nline two\ttabbed")
        );
    }

    #[test]
    fn test_write_rejects_unknown_destination_namespace() {
        let store = read(Cursor::new(SAMPLE)).unwrap();
        let mut buf = Vec::new();
        assert!(matches!(
            write(&store, "official", &mut buf),
            Err(SymmapError::NamespaceNotFound { .. })
        ));
    }
}
