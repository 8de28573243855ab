//! Phase 2: Dependency validation.
//!
//! Every module named after `FROM` must be defined by one of the sources (or
//! be a builtin). Names are compared as file names, with the module suffix
//! appended.

use crate::error::DependencyError;
use crate::resolver::tracing::{NoopTracer, TraceEvent, TraceLevel, Tracer};
use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Check that every required module is defined.
///
/// # Errors
///
/// Returns [`DependencyError`] listing each missing file once, in first-seen
/// order.
pub fn validate_dependencies(
    required: &[String],
    defined: &[String],
    suffix: &str,
) -> Result<(), DependencyError> {
    validate_dependencies_traced(required, defined, suffix, &mut NoopTracer)
}

/// Check that every required module is defined, with tracing.
///
/// # Errors
///
/// Returns [`DependencyError`] listing each missing file once, in first-seen
/// order.
pub fn validate_dependencies_traced<T: Tracer>(
    required: &[String],
    defined: &[String],
    suffix: &str,
    tracer: &mut T,
) -> Result<(), DependencyError> {
    let missing = missing_dependencies(required, defined, suffix);

    for file in &missing {
        crate::trace_event!(
            tracer,
            TraceLevel::Warn,
            TraceEvent::DependencyMissing { file }
        );
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DependencyError { missing })
    }
}

/// Required files not covered by a defined module, de-duplicated.
#[must_use]
pub fn missing_dependencies(required: &[String], defined: &[String], suffix: &str) -> Vec<String> {
    let defined: BTreeSet<String> = defined.iter().map(|m| format!("{m}{suffix}")).collect();
    let mut seen = BTreeSet::new();
    let mut missing = Vec::new();

    for module in required {
        let file = format!("{module}{suffix}");
        if !defined.contains(&file) && seen.insert(file.clone()) {
            missing.push(file);
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|&s| String::from(s)).collect()
    }

    #[test]
    fn test_all_defined() {
        let required = names(&["A", "B"]);
        let defined = names(&["B", "A", "C"]);
        assert_eq!(validate_dependencies(&required, &defined, ".mib"), Ok(()));
    }

    #[test]
    fn test_no_requirements() {
        assert_eq!(validate_dependencies(&[], &names(&["A"]), ".mib"), Ok(()));
        assert_eq!(validate_dependencies(&[], &[], ".mib"), Ok(()));
    }

    #[test]
    fn test_missing_deduplicated_in_order() {
        let required = names(&["X", "A", "Y", "X"]);
        let defined = names(&["A"]);
        let err = validate_dependencies(&required, &defined, ".mib").unwrap_err();
        assert_eq!(err.missing, vec!["X.mib", "Y.mib"]);
        assert_eq!(
            err.to_string(),
            "unresolved module dependencies, required files: X.mib, Y.mib"
        );
    }

    #[test]
    fn test_custom_suffix() {
        let err = validate_dependencies(&names(&["B"]), &names(&["A"]), ".txt").unwrap_err();
        assert_eq!(err.missing, vec!["B.txt"]);
    }
}
