//! Symbol records.

use crate::diagnostic::Location;
use alloc::string::String;

/// How a symbol entered the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SymbolOrigin {
    /// Defined by its own assignment or clause.
    #[default]
    Defined,
    /// Introduced by a named number inside another symbol's OID value,
    /// e.g. `org` in `{ iso org(3) dod(6) 1 }`.
    Implicit,
}

/// One named OID definition.
///
/// Serializes as `{ name, oid, id, parent, description }`. The location and
/// origin are scan metadata and are not serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    /// Unique name.
    pub name: String,
    /// Dotted-decimal OID; empty until the resolver runs.
    #[cfg_attr(feature = "serde", serde(default))]
    pub oid: String,
    /// Local arc relative to the parent, as decimal text.
    pub id: String,
    /// Name of the parent symbol or root token.
    pub parent: String,
    /// Description text; empty when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Where the definition was scanned.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
    /// Whether the symbol was defined or implied.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub origin: SymbolOrigin,
}

impl Symbol {
    /// Create a defined symbol with no description.
    #[must_use]
    pub fn new(name: impl Into<String>, parent: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            oid: String::new(),
            id: id.into(),
            parent: parent.into(),
            description: String::new(),
            location: Location::default(),
            origin: SymbolOrigin::Defined,
        }
    }

    /// Create an implicit symbol.
    #[must_use]
    pub fn implicit(name: impl Into<String>, parent: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            origin: SymbolOrigin::Implicit,
            ..Self::new(name, parent, id)
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the scan location.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Check if the resolver has assigned an OID.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.oid.is_empty()
    }

    /// Check if the symbol was implied by another definition.
    #[must_use]
    pub fn is_implicit(&self) -> bool {
        self.origin == SymbolOrigin::Implicit
    }

    /// The serialized fields as a tuple, for comparisons that ignore scan
    /// metadata.
    #[must_use]
    pub fn key(&self) -> (&str, &str, &str, &str, &str) {
        (
            &self.name,
            &self.id,
            &self.parent,
            &self.oid,
            &self.description,
        )
    }
}
