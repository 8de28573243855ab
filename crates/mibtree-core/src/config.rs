//! Pipeline configuration.
//!
//! [`Options`] covers every knob of the pipeline. The defaults reproduce the
//! classic extraction behavior except where that behavior loses data silently:
//! duplicate names are rejected unless [`DuplicatePolicy::Replace`] is chosen.

use crate::model::RootSet;
use alloc::string::String;
use alloc::vec::Vec;

/// Suffix appended to module names before comparing imports with definitions.
pub const DEFAULT_MODULE_SUFFIX: &str = ".mib";

/// Label of the synthetic node that groups orphans under [`OrphanPolicy::Attach`].
pub const DEFAULT_ORPHAN_ROOT: &str = "orphans";

/// Macros whose clauses define a symbol by default.
pub const DEFAULT_CLAUSE_MACROS: &[&str] = &["OBJECT-TYPE", "OBJECT-IDENTITY"];

/// How the scanner treats clauses it cannot complete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strictness {
    /// Record a warning diagnostic and skip the definition.
    #[default]
    Lenient,
    /// Fail the scan.
    Strict,
}

/// What to do when a second definition reuses a name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DuplicatePolicy {
    /// Fail with [`ResolveError::DuplicateName`](crate::error::ResolveError::DuplicateName).
    #[default]
    Reject,
    /// Keep both in the flat table; the later one owns the name for lookups.
    Replace,
}

/// What to do with a symbol whose parent is neither a root nor a known symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OrphanPolicy {
    /// Keep it in the flat table with an orphan OID; leave it out of the tree.
    #[default]
    Drop,
    /// Fail with [`ResolveError::UnresolvedParent`](crate::error::ResolveError::UnresolvedParent).
    Error,
    /// Keep it in the tree under a synthetic orphan group.
    Attach,
}

/// Scanner configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanOptions {
    /// Macro keywords that open a multi-line defining clause.
    pub clause_macros: Vec<String>,
    /// Handling of unterminated clauses and malformed OID values.
    pub strictness: Strictness,
}

impl ScanOptions {
    /// Check whether a keyword opens a defining clause.
    #[must_use]
    pub fn is_clause_macro(&self, keyword: &str) -> bool {
        self.clause_macros.iter().any(|m| m == keyword)
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            clause_macros: DEFAULT_CLAUSE_MACROS.iter().map(|&m| m.into()).collect(),
            strictness: Strictness::Lenient,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Scanner settings.
    pub scan: ScanOptions,
    /// Suffix appended to module names for dependency checks.
    pub module_suffix: String,
    /// Modules treated as present without a source file.
    pub builtin_modules: Vec<String>,
    /// Recognized root anchors.
    pub roots: RootSet,
    /// Duplicate name handling.
    pub duplicates: DuplicatePolicy,
    /// Unresolved parent handling.
    pub orphans: OrphanPolicy,
    /// Name of the synthetic orphan group node.
    pub orphan_root_name: String,
}

impl Options {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on malformed clauses instead of warning.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.scan.strictness = Strictness::Strict;
        self
    }

    /// Let later definitions replace earlier ones with the same name.
    #[must_use]
    pub fn allow_duplicates(mut self) -> Self {
        self.duplicates = DuplicatePolicy::Replace;
        self
    }

    /// Set the orphan policy.
    #[must_use]
    pub fn with_orphans(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }

    /// Replace the root set.
    #[must_use]
    pub fn with_roots(mut self, roots: RootSet) -> Self {
        self.roots = roots;
        self
    }

    /// Set the module name suffix.
    #[must_use]
    pub fn with_module_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.module_suffix = suffix.into();
        self
    }

    /// Treat a module as available without a source file.
    #[must_use]
    pub fn with_builtin_module(mut self, module: impl Into<String>) -> Self {
        self.builtin_modules.push(module.into());
        self
    }

    /// Add a macro keyword that opens a defining clause.
    #[must_use]
    pub fn with_clause_macro(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        if !self.scan.is_clause_macro(&keyword) {
            self.scan.clause_macros.push(keyword);
        }
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            module_suffix: DEFAULT_MODULE_SUFFIX.into(),
            builtin_modules: Vec::new(),
            roots: RootSet::default(),
            duplicates: DuplicatePolicy::default(),
            orphans: OrphanPolicy::default(),
            orphan_root_name: DEFAULT_ORPHAN_ROOT.into(),
        }
    }
}
