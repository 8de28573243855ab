//! Error types returned by the extraction pipeline.
//!
//! Every failure is returned to the caller as a value. Nothing in this crate
//! terminates the process.

use crate::diagnostic::Location;
use alloc::string::String;
use alloc::vec::Vec;

/// Result type for pipeline operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level pipeline error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Scanning failed (strict mode only).
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// Imported modules are missing from the input.
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    /// The symbol table is inconsistent.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Scanner failure raised under [`Strictness::Strict`](crate::config::Strictness::Strict).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// A clause never reached its `::= { parent id }` assignment.
    #[error("{location}: clause `{name}` has no terminating `::= {{ parent id }}` assignment")]
    MalformedClause {
        /// Name of the clause's symbol.
        name: String,
        /// Line that opened the clause.
        location: Location,
    },
    /// The braces of an assignment do not describe a parent and an arc.
    #[error("{location}: malformed OID value for `{name}`: {reason}")]
    MalformedOidValue {
        /// Name of the symbol being defined.
        name: String,
        /// Line holding the assignment.
        location: Location,
        /// What was wrong with the value.
        reason: String,
    },
}

/// Imported modules that no source defines.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unresolved module dependencies, required files: {}", .missing.join(", "))]
pub struct DependencyError {
    /// Missing module names (with suffix), in first-seen order.
    pub missing: Vec<String>,
}

/// Integrity failures in the symbol table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A symbol is its own ancestor.
    #[error("parent cycle detected while resolving `{name}`: {}", .path.join(" -> "))]
    Cycle {
        /// Symbol whose resolution detected the cycle.
        name: String,
        /// Names walked, ending with the repeated one.
        path: Vec<String>,
    },
    /// A parent name is neither a known symbol nor a root.
    #[error("`{name}` has unresolved parent `{parent}`")]
    UnresolvedParent {
        /// The symbol whose parent is missing.
        name: String,
        /// The missing parent name.
        parent: String,
    },
    /// Two definitions share a name.
    #[error("duplicate symbol `{name}` at {second} (first defined at {first})")]
    DuplicateName {
        /// The duplicated name.
        name: String,
        /// Location of the first definition.
        first: Location,
        /// Location of the conflicting definition.
        second: Location,
    },
    /// A local arc is not a non-negative decimal number.
    #[error("`{name}` has invalid arc `{id}`")]
    InvalidArc {
        /// The symbol with the bad arc.
        name: String,
        /// The offending arc text.
        id: String,
    },
    /// The arena ran out of `u32` ids.
    #[error("symbol table is full")]
    TableFull,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_dependency_error_lists_modules() {
        let err = DependencyError {
            missing: vec!["SNMPv2-SMI.mib".into(), "IF-MIB.mib".into()],
        };
        assert_eq!(
            err.to_string(),
            "unresolved module dependencies, required files: SNMPv2-SMI.mib, IF-MIB.mib"
        );
    }

    #[test]
    fn test_cycle_message() {
        let err = ResolveError::Cycle {
            name: "p".into(),
            path: vec!["p".into(), "q".into(), "p".into()],
        };
        assert_eq!(
            err.to_string(),
            "parent cycle detected while resolving `p`: p -> q -> p"
        );
    }

    #[test]
    fn test_transparent_conversion() {
        let err: Error = ResolveError::InvalidArc {
            name: "x".into(),
            id: "a".into(),
        }
        .into();
        assert_eq!(err.to_string(), "`x` has invalid arc `a`");
    }
}
