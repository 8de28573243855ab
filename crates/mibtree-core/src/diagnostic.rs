//! Source locations and non-fatal diagnostics.

use alloc::string::String;
use core::fmt;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Input was lost: part of the source could not be used.
    Error,
    /// Informational; scanning continues unaffected.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// A position in the input: optional source file name plus a 1-based line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Source file name, when the input was scanned per file.
    pub source: Option<String>,
    /// 1-based line number (0 when unknown).
    pub line: usize,
}

impl Location {
    /// Create a location without a source name.
    #[must_use]
    pub fn line(line: usize) -> Self {
        Self { source: None, line }
    }

    /// Create a location inside a named source.
    #[must_use]
    pub fn in_source(source: impl Into<String>, line: usize) -> Self {
        Self {
            source: Some(source.into()),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{source}:{}", self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}

/// A diagnostic message collected while scanning.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Where the problem was found.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Create a warning.
    #[must_use]
    pub fn warning(location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location,
            message: message.into(),
        }
    }

    /// Create an error.
    #[must_use]
    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message)
    }
}

/// Check whether any diagnostic in the slice is an error.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_location_display() {
        assert_eq!(Location::line(7).to_string(), "line 7");
        assert_eq!(Location::in_source("IF-MIB", 12).to_string(), "IF-MIB:12");
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::warning(Location::line(3), "discarded name");
        assert_eq!(d.to_string(), "line 3: warning: discarded name");
    }

    #[test]
    fn test_has_errors() {
        let warn = Diagnostic::warning(Location::line(1), "w");
        let err = Diagnostic::error(Location::line(2), "e");
        assert!(!has_errors(&[warn.clone()]));
        assert!(has_errors(&vec![warn, err]));
    }
}
