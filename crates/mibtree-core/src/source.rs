//! In-memory source files.

use alloc::string::String;
use alloc::vec::Vec;

/// One MIB source file, already split into lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceFile {
    /// Display name (usually the file name).
    pub name: String,
    /// Lines without their terminators.
    pub lines: Vec<String>,
}

impl SourceFile {
    /// Split source text into lines (`\n` or `\r\n`).
    #[must_use]
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: text.lines().map(String::from).collect(),
        }
    }

    /// Create from already split lines.
    #[must_use]
    pub fn from_lines(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }
}

/// Concatenate the lines of several files, preserving order.
#[must_use]
pub fn merge_lines(files: &[SourceFile]) -> Vec<&str> {
    files
        .iter()
        .flat_map(|f| f.lines.iter().map(String::as_str))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_splits_crlf() {
        let file = SourceFile::new("A-MIB", "a\r\nb\nc");
        assert_eq!(file.lines, ["a", "b", "c"]);
    }

    #[test]
    fn test_merge_lines_preserves_order() {
        let files = [SourceFile::new("A", "1\n2"), SourceFile::new("B", "3")];
        assert_eq!(merge_lines(&files), ["1", "2", "3"]);
    }
}
