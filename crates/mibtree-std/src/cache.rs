//! Snapshot caching with fingerprint support.
//!
//! Persists a resolved flat table so that later runs can skip scanning.
//! The tree is never persisted; it is rebuilt from the cached table.
//!
//! # File Format
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Header (9 or 41 bytes)                 │
//! │   magic: [u8; 4]        "MTRE"         │
//! │   version: u32          Schema version │
//! │   has_fingerprint: u8   0 or 1         │
//! │   fingerprint: [u8; 32] (if present)   │
//! ├────────────────────────────────────────┤
//! │ Payload (postcard-encoded symbols)     │
//! └────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! let fingerprint = fingerprint_sources(&sources, &options)?;
//! if is_cache_valid(&path, &fingerprint) {
//!     let table = load_cache_verified(&path, &fingerprint)?;
//! } else {
//!     let extraction = resolve_sources(&sources, &options)?;
//!     save_cache(&extraction.table, &path, Some(fingerprint))?;
//! }
//! ```

use mibtree_core::config::{DuplicatePolicy, Options};
use mibtree_core::model::{Symbol, SymbolTable};
use mibtree_core::resolver::phases::assemble_tree;
use mibtree_core::{Extraction, ResolveError, SourceFile};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

/// Current schema version. Bump on any breaking change to serialized format.
pub const SCHEMA_VERSION: u32 = 1;

/// Magic bytes identifying a mibtree cache file.
const MAGIC: [u8; 4] = *b"MTRE";

/// Header size without a fingerprint: magic, version, flag.
const HEADER_LEN: usize = 9;

/// Fingerprint length.
const FINGERPRINT_LEN: usize = 32;

/// Cache error.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// File does not start with expected magic bytes.
    #[error("invalid magic bytes (expected MTRE)")]
    InvalidMagic,
    /// Schema version mismatch.
    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version.
        expected: u32,
        /// Found version.
        found: u32,
    },
    /// Fingerprint does not match expected value.
    #[error("fingerprint mismatch")]
    FingerprintMismatch,
    /// Header is truncated.
    #[error("truncated header")]
    TruncatedHeader,
    /// Postcard serialization failed.
    #[error("postcard serialization failed: {0}")]
    SerializationFailed(#[source] postcard::Error),
    /// Postcard deserialization failed.
    #[error("postcard deserialization failed: {0}")]
    DeserializationFailed(#[source] postcard::Error),
    /// The cached symbols could not be turned back into a table or tree.
    #[error("cached table cannot be rebuilt: {0}")]
    Rebuild(#[from] ResolveError),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Compute a fingerprint from source file contents.
///
/// The fingerprint includes the schema version to ensure cache invalidation
/// when the format changes. Files are sorted by name for determinism.
#[must_use]
pub fn compute_fingerprint<S: AsRef<str>>(files: &[(S, &[u8])]) -> [u8; 32] {
    let mut sorted: Vec<_> = files.iter().collect();
    sorted.sort_by_key(|(name, _)| name.as_ref());

    let mut hasher = Sha256::new();
    hasher.update(SCHEMA_VERSION.to_le_bytes());
    for (name, content) in sorted {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(content);
    }

    hasher.finalize().into()
}

/// Compute a fingerprint from loaded source files and the options they are
/// resolved with.
///
/// # Errors
///
/// Returns [`CacheError::SerializationFailed`] if the options cannot be
/// encoded.
pub fn fingerprint_sources(sources: &[SourceFile], options: &Options) -> Result<[u8; 32], CacheError> {
    let settings = postcard::to_allocvec(options).map_err(CacheError::SerializationFailed)?;
    let joined: Vec<(&str, String)> = sources
        .iter()
        .map(|s| (s.name.as_str(), s.lines.join("\n")))
        .collect();
    let mut files: Vec<(&str, &[u8])> = joined
        .iter()
        .map(|(name, text)| (*name, text.as_bytes()))
        .collect();
    // not a valid file name, so it cannot collide with a source
    files.push(("\0options", settings.as_slice()));
    Ok(compute_fingerprint(&files))
}

/// Serialize a table to cache bytes.
///
/// # Errors
///
/// Returns [`CacheError::SerializationFailed`] if postcard cannot encode the
/// symbols.
pub fn serialize_table(table: &SymbolTable, fingerprint: Option<[u8; 32]>) -> Result<Vec<u8>, CacheError> {
    let payload = postcard::to_allocvec(table.symbols()).map_err(CacheError::SerializationFailed)?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + FINGERPRINT_LEN + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
    if let Some(fp) = fingerprint {
        bytes.push(1);
        bytes.extend_from_slice(&fp);
    } else {
        bytes.push(0);
    }
    bytes.extend_from_slice(&payload);

    Ok(bytes)
}

/// Validate the header. Returns the stored fingerprint and the payload offset.
fn read_header(bytes: &[u8]) -> Result<(Option<[u8; 32]>, usize), CacheError> {
    if bytes.len() < HEADER_LEN {
        return Err(CacheError::TruncatedHeader);
    }
    if bytes[0..4] != MAGIC {
        return Err(CacheError::InvalidMagic);
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != SCHEMA_VERSION {
        return Err(CacheError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found: version,
        });
    }

    if bytes[8] == 0 {
        return Ok((None, HEADER_LEN));
    }
    let end = HEADER_LEN + FINGERPRINT_LEN;
    let stored: [u8; 32] = bytes
        .get(HEADER_LEN..end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(CacheError::TruncatedHeader)?;
    Ok((Some(stored), end))
}

/// Deserialize a table from cache bytes.
///
/// If `expected_fingerprint` is `Some`, the stored fingerprint must match;
/// a cache without one is rejected. The name index is rebuilt letting later
/// entries win, which reproduces tables built with duplicates allowed.
///
/// # Errors
///
/// Returns an error if the header is invalid, the fingerprint does not match,
/// or the payload cannot be decoded.
pub fn deserialize_table(
    bytes: &[u8],
    expected_fingerprint: Option<&[u8; 32]>,
) -> Result<SymbolTable, CacheError> {
    let (stored, payload_start) = read_header(bytes)?;

    if let Some(expected) = expected_fingerprint {
        if stored.as_ref() != Some(expected) {
            return Err(CacheError::FingerprintMismatch);
        }
    }

    let symbols: Vec<Symbol> =
        postcard::from_bytes(&bytes[payload_start..]).map_err(CacheError::DeserializationFailed)?;

    Ok(SymbolTable::from_symbols(symbols, DuplicatePolicy::Replace)?)
}

/// Get the fingerprint from cache bytes without decoding the payload.
///
/// Returns `None` if the cache has no embedded fingerprint.
///
/// # Errors
///
/// Returns an error if the header is invalid.
pub fn get_fingerprint(bytes: &[u8]) -> Result<Option<[u8; 32]>, CacheError> {
    read_header(bytes).map(|(fp, _)| fp)
}

/// Rebuild the full extraction (tree included) from a cached table.
///
/// # Errors
///
/// Returns [`CacheError::Rebuild`] when the orphan policy is
/// [`OrphanPolicy::Error`](mibtree_core::OrphanPolicy::Error) and a symbol
/// has an unknown parent.
pub fn restore_extraction(table: SymbolTable, options: &Options) -> Result<Extraction, CacheError> {
    let forest = assemble_tree(&table, &options.roots, options.orphans)?;
    Ok(Extraction {
        table,
        forest,
        diagnostics: Vec::new(),
    })
}

// === File-based convenience API ===

/// Save a table to a cache file.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written.
pub fn save_cache<P: AsRef<Path>>(
    table: &SymbolTable,
    path: P,
    fingerprint: Option<[u8; 32]>,
) -> Result<(), CacheError> {
    let bytes = serialize_table(table, fingerprint)?;
    fs::write(path.as_ref(), bytes)?;
    log::debug!("wrote cache {} ({} symbols)", path.as_ref().display(), table.len());
    Ok(())
}

/// Load a table from a cache file without fingerprint verification.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the cache is invalid.
pub fn load_cache<P: AsRef<Path>>(path: P) -> Result<SymbolTable, CacheError> {
    let bytes = fs::read(path)?;
    deserialize_table(&bytes, None)
}

/// Load a table from a cache file with fingerprint verification.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the cache is invalid,
/// or the fingerprint doesn't match.
pub fn load_cache_verified<P: AsRef<Path>>(
    path: P,
    expected_fingerprint: &[u8; 32],
) -> Result<SymbolTable, CacheError> {
    let bytes = fs::read(path)?;
    deserialize_table(&bytes, Some(expected_fingerprint))
}

/// Check if a cache file exists and has a matching fingerprint.
#[must_use]
pub fn is_cache_valid<P: AsRef<Path>>(path: P, expected_fingerprint: &[u8; 32]) -> bool {
    let Ok(bytes) = fs::read(path) else {
        return false;
    };

    match get_fingerprint(&bytes) {
        Ok(Some(fp)) => fp == *expected_fingerprint,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mibtree_core::resolve;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn sample_table() -> SymbolTable {
        let lines = [
            "a OBJECT IDENTIFIER ::= { iso 1 }",
            "b OBJECT-TYPE",
            "    DESCRIPTION \"Bee.\"",
            "    ::= { a 2 }",
        ];
        resolve(&lines, &Options::default()).unwrap().table
    }

    #[test]
    fn test_compute_fingerprint_order_independent() {
        let files1: &[(&str, &[u8])] = &[("a.mib", b"content a"), ("b.mib", b"content b")];
        let files2: &[(&str, &[u8])] = &[("b.mib", b"content b"), ("a.mib", b"content a")];
        assert_eq!(compute_fingerprint(files1), compute_fingerprint(files2));
    }

    #[test]
    fn test_compute_fingerprint_content_sensitive() {
        let files1: &[(&str, &[u8])] = &[("a.mib", b"content a")];
        let files2: &[(&str, &[u8])] = &[("a.mib", b"content b")];
        assert_ne!(compute_fingerprint(files1), compute_fingerprint(files2));
    }

    #[test]
    fn test_fingerprint_sources() {
        let options = Options::default();
        let one = [SourceFile::new("A.mib", "x\ny\n")];
        let other = [SourceFile::new("A.mib", "x\nz\n")];
        let fp = |sources: &[SourceFile], options: &Options| fingerprint_sources(sources, options).unwrap();
        assert_eq!(fp(&one, &options), fp(&one, &options));
        assert_ne!(fp(&one, &options), fp(&other, &options));
        assert_ne!(fp(&one, &options), fp(&one, &Options::default().strict()));
    }

    #[test]
    fn test_round_trip_no_fingerprint() {
        let table = sample_table();
        let bytes = serialize_table(&table, None).unwrap();
        let restored = deserialize_table(&bytes, None).unwrap();
        assert_eq!(restored.symbols().len(), 2);
        let b = restored.get_by_name("b").unwrap();
        assert_eq!(b.key(), ("b", "2", "a", "1.1.2", "Bee."));
    }

    #[test]
    fn test_round_trip_with_fingerprint() {
        let table = sample_table();
        let fp = [42u8; 32];
        let bytes = serialize_table(&table, Some(fp)).unwrap();
        assert_eq!(get_fingerprint(&bytes).unwrap(), Some(fp));
        let restored = deserialize_table(&bytes, Some(&fp)).unwrap();
        assert_eq!(restored.len(), table.len());
    }

    #[test]
    fn test_fingerprint_mismatch() {
        let table = sample_table();
        let bytes = serialize_table(&table, Some([42u8; 32])).unwrap();
        let result = deserialize_table(&bytes, Some(&[0u8; 32]));
        assert!(matches!(result, Err(CacheError::FingerprintMismatch)));

        let unsigned = serialize_table(&table, None).unwrap();
        let result = deserialize_table(&unsigned, Some(&[0u8; 32]));
        assert!(matches!(result, Err(CacheError::FingerprintMismatch)));
    }

    #[test]
    fn test_invalid_header() {
        assert!(matches!(deserialize_table(b"MTRE", None), Err(CacheError::TruncatedHeader)));
        assert!(matches!(
            deserialize_table(b"WMIB\x01\x00\x00\x00\x00", None),
            Err(CacheError::InvalidMagic)
        ));
        assert!(matches!(
            deserialize_table(b"MTRE\x09\x00\x00\x00\x00", None),
            Err(CacheError::VersionMismatch { expected: 1, found: 9 })
        ));
        assert!(matches!(
            deserialize_table(b"MTRE\x01\x00\x00\x00\x01abc", None),
            Err(CacheError::TruncatedHeader)
        ));
    }

    #[test]
    fn test_restore_extraction() {
        let table = sample_table();
        let extraction = restore_extraction(table, &Options::default()).unwrap();
        assert_eq!(extraction.forest.roots.len(), 1);
        assert_eq!(extraction.forest.roots[0].children[0].name(), "b");
    }

    #[test]
    fn test_file_round_trip() {
        let table = sample_table();
        let fp = [7u8; 32];

        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_owned();

        save_cache(&table, &path, Some(fp)).unwrap();
        assert!(is_cache_valid(&path, &fp));
        assert!(!is_cache_valid(&path, &[0u8; 32]));
        assert!(!is_cache_valid("/nonexistent/path.mtre", &fp));

        let restored = load_cache_verified(&path, &fp).unwrap();
        let keys = |t: &SymbolTable| t.iter().map(|s| s.key()).map(|k| format!("{k:?}")).collect::<Vec<_>>();
        assert_eq!(keys(&restored), keys(&table));
        assert_eq!(load_cache(&path).unwrap().len(), 2);
    }
}
