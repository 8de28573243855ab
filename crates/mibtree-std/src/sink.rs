//! JSON output.
//!
//! Two documents are written next to the input directory: the flat table as
//! `<dir>.json` and the tree as `<dir>-tree.json`. Both are pretty-printed
//! arrays; tree nodes carry a `children` array when they have children.

use mibtree_core::{Extraction, Symbol, SymbolNode};
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Errors from writing output.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The output file could not be created or written.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// The output file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// Encoding failed.
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append a suffix to the last path component (`mibs` → `mibs.json`).
fn with_suffix(dir: &Path, suffix: &str) -> PathBuf {
    // `components` drops a trailing separator
    let mut name = OsString::from(dir.components().as_path());
    name.push(suffix);
    PathBuf::from(name)
}

/// Path of the flat table: `<dir>.json`.
#[must_use]
pub fn flat_output_path<P: AsRef<Path>>(dir: P) -> PathBuf {
    with_suffix(dir.as_ref(), ".json")
}

/// Path of the tree: `<dir>-tree.json`.
#[must_use]
pub fn tree_output_path<P: AsRef<Path>>(dir: P) -> PathBuf {
    with_suffix(dir.as_ref(), "-tree.json")
}

/// Encode the flat table.
///
/// # Errors
///
/// Returns [`SinkError::Json`] if encoding fails.
pub fn flat_json(symbols: &[Symbol]) -> Result<String, SinkError> {
    Ok(serde_json::to_string_pretty(symbols)?)
}

/// Encode the tree.
///
/// # Errors
///
/// Returns [`SinkError::Json`] if encoding fails.
pub fn tree_json(nodes: &[SymbolNode]) -> Result<String, SinkError> {
    Ok(serde_json::to_string_pretty(nodes)?)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SinkError> {
    let io_error = |source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(io_error)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Write the flat table to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_flat<P: AsRef<Path>>(path: P, symbols: &[Symbol]) -> Result<(), SinkError> {
    write_json(path.as_ref(), symbols)
}

/// Write the tree to `path`.
///
/// An orphan group node, when `nodes` holds one, is written with an empty
/// `oid` and has no counterpart in the flat file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_tree<P: AsRef<Path>>(path: P, nodes: &[SymbolNode]) -> Result<(), SinkError> {
    write_json(path.as_ref(), nodes)
}

/// Write both documents for an input directory. Returns the flat and tree
/// paths.
///
/// # Errors
///
/// Returns an error if either file cannot be written.
pub fn write_outputs<P: AsRef<Path>>(
    dir: P,
    extraction: &Extraction,
    orphan_root_name: &str,
) -> Result<(PathBuf, PathBuf), SinkError> {
    let flat = flat_output_path(&dir);
    let tree = tree_output_path(&dir);
    write_flat(&flat, extraction.symbols())?;
    write_tree(&tree, &extraction.tree_nodes(orphan_root_name))?;
    Ok((flat, tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mibtree_core::{resolve, Options, OrphanPolicy};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn extraction(options: &Options) -> Extraction {
        let lines = [
            "a OBJECT IDENTIFIER ::= { iso 1 }",
            "b OBJECT-TYPE",
            "    DESCRIPTION \"Bee.\"",
            "    ::= { a 2 }",
            "x OBJECT IDENTIFIER ::= { nowhere 5 }",
        ];
        resolve(&lines, options).unwrap()
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(flat_output_path("data/mibs"), PathBuf::from("data/mibs.json"));
        assert_eq!(tree_output_path("data/mibs"), PathBuf::from("data/mibs-tree.json"));
        assert_eq!(flat_output_path("data/mibs/"), PathBuf::from("data/mibs.json"));
    }

    #[test]
    fn test_flat_json_shape() {
        let extraction = extraction(&Options::default());
        let value: Value = serde_json::from_str(&flat_json(extraction.symbols()).unwrap()).unwrap();
        assert_eq!(
            value[1],
            json!({"name": "b", "oid": "1.1.2", "id": "2", "parent": "a", "description": "Bee."})
        );
        assert_eq!(value.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_flat_json_field_order() {
        let extraction = extraction(&Options::default());
        let text = flat_json(&extraction.symbols()[..1]).unwrap();
        let positions: Vec<usize> = ["\"name\"", "\"oid\"", "\"id\"", "\"parent\"", "\"description\""]
            .iter()
            .map(|key| text.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_tree_json_children() {
        let extraction = extraction(&Options::default());
        let value: Value = serde_json::from_str(&tree_json(&extraction.tree_nodes("orphans")).unwrap()).unwrap();
        let roots = value.as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["name"], "a");
        assert_eq!(roots[0]["children"][0]["name"], "b");
        // leaves carry no children key
        assert!(roots[0]["children"][0].get("children").is_none());
    }

    #[test]
    fn test_tree_json_orphan_group() {
        let options = Options::default().with_orphans(OrphanPolicy::Attach);
        let extraction = extraction(&options);
        let value: Value = serde_json::from_str(&tree_json(&extraction.tree_nodes("orphans")).unwrap()).unwrap();
        assert_eq!(value[1]["name"], "orphans");
        assert_eq!(value[1]["oid"], "");
        assert_eq!(value[1]["children"][0]["name"], "x");
        assert_ne!(value[1]["children"][0]["oid"], "");
    }

    #[test]
    fn test_write_outputs() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("mibs");
        let (flat, tree) = write_outputs(&input, &extraction(&Options::default()), "orphans").unwrap();

        assert_eq!(flat, dir.path().join("mibs.json"));
        assert_eq!(tree, dir.path().join("mibs-tree.json"));
        let flat: Vec<Symbol> = serde_json::from_str(&std::fs::read_to_string(flat).unwrap()).unwrap();
        assert_eq!(flat.len(), 3);
        assert!(std::fs::read_to_string(tree).unwrap().contains("\"children\""));
    }

    #[test]
    fn test_write_to_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = write_flat(dir.path().join("absent/out.json"), &[]).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }
}
