//! End-to-end extraction: lines in, resolved table and tree out.
//!
//! # Pipeline
//!
//! ```text
//! lines → module markers → dependency check → symbols → table → OIDs → tree
//! ```
//!
//! The dependency check runs before the symbol pass, so no symbols are
//! extracted when a required module is missing.
//!
//! # Usage
//!
//! ```
//! use mibtree_core::config::Options;
//! use mibtree_core::resolver::resolve;
//!
//! let lines = [
//!     "TEST-MIB DEFINITIONS ::= BEGIN",
//!     "a OBJECT IDENTIFIER ::= { iso 1 }",
//!     "b OBJECT IDENTIFIER ::= { a 2 }",
//!     "END",
//! ];
//! let extraction = resolve(&lines, &Options::default()).unwrap();
//! assert_eq!(extraction.table.get_by_name("b").unwrap().oid, "1.1.2");
//! assert_eq!(extraction.forest.roots[0].children[0].name(), "b");
//! ```

pub mod phases;
pub mod tracing;

pub use tracing::{NoopTracer, Phase, TraceEvent, TraceLevel, Tracer};

use crate::config::Options;
use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::model::{Forest, Symbol, SymbolNode, SymbolTable};
use crate::scanner::{ModuleScan, Scanner};
use crate::source::SourceFile;
use crate::trace_event;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Output of a successful extraction.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    /// Flat table in first-occurrence order, OIDs filled in.
    pub table: SymbolTable,
    /// Tree view of the table.
    pub forest: Forest,
    /// Non-fatal scanner findings.
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    /// The flat view.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        self.table.symbols()
    }

    /// Top-level tree nodes: the roots, then the orphan group if any.
    ///
    /// The orphan group node (see [`Forest::orphan_group`]) carries an empty
    /// `oid`; every other node has the dotted OID of its flat entry.
    #[must_use]
    pub fn tree_nodes(&self, orphan_root_name: &str) -> Vec<SymbolNode> {
        let mut nodes = self.forest.roots.clone();
        nodes.extend(self.forest.orphan_group(orphan_root_name));
        nodes
    }
}

/// Extract from one merged sequence of lines.
///
/// # Errors
///
/// Returns the first scan (strict mode), dependency, or resolution error.
pub fn resolve<S: AsRef<str>>(lines: &[S], options: &Options) -> Result<Extraction> {
    resolve_traced(lines, options, &mut NoopTracer)
}

/// Extract from one merged sequence of lines, with tracing.
///
/// # Errors
///
/// Returns the first scan (strict mode), dependency, or resolution error.
pub fn resolve_traced<S: AsRef<str>, T: Tracer>(
    lines: &[S],
    options: &Options,
    tracer: &mut T,
) -> Result<Extraction> {
    run(alloc::vec![Scanner::new(lines)], options, tracer)
}

/// Extract from separate source files, scanned one by one and merged in the
/// given order. Diagnostics carry the file name.
///
/// # Errors
///
/// Returns the first scan (strict mode), dependency, or resolution error.
pub fn resolve_sources(sources: &[SourceFile], options: &Options) -> Result<Extraction> {
    resolve_sources_traced(sources, options, &mut NoopTracer)
}

/// Extract from separate source files, with tracing.
///
/// # Errors
///
/// Returns the first scan (strict mode), dependency, or resolution error.
pub fn resolve_sources_traced<T: Tracer>(
    sources: &[SourceFile],
    options: &Options,
    tracer: &mut T,
) -> Result<Extraction> {
    let scanners = sources
        .iter()
        .map(|source| Scanner::with_source(source.name.as_str(), &source.lines))
        .collect();
    run(scanners, options, tracer)
}

fn run<T: Tracer>(mut scanners: Vec<Scanner<'_>>, options: &Options, tracer: &mut T) -> Result<Extraction> {
    // Imports: markers of every source, then the check
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseStart { phase: Phase::Imports });
    let mut modules = ModuleScan::default();
    for scanner in &scanners {
        modules.merge(scanner.modules());
    }
    for module in &modules.defined {
        trace_event!(tracer, TraceLevel::Debug, TraceEvent::ModuleDefined { module });
    }
    let mut defined = modules.defined.clone();
    defined.extend(options.builtin_modules.iter().cloned());
    phases::validate_dependencies_traced(&modules.required, &defined, &options.module_suffix, tracer)?;
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseEnd { phase: Phase::Imports });

    // Scan
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseStart { phase: Phase::Scan });
    let mut symbols: Vec<Symbol> = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for scanner in &mut scanners {
        symbols.extend(scanner.symbols(&options.scan)?);
    }
    for scanner in scanners {
        diagnostics.extend(scanner.into_diagnostics());
    }
    if TraceLevel::Warn <= tracer.level() {
        for diagnostic in &diagnostics {
            let message: String = diagnostic.to_string();
            tracer.trace(
                TraceLevel::Warn,
                TraceEvent::DiagnosticEmitted {
                    severity: diagnostic.severity,
                    message: &message,
                },
            );
        }
    }
    log::debug!(
        "scanned {} symbol candidates from {} module(s), {} diagnostic(s)",
        symbols.len(),
        modules.defined.len(),
        diagnostics.len()
    );
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseEnd { phase: Phase::Scan });

    // Registration
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseStart { phase: Phase::Registration });
    let mut table = phases::register_symbols_traced(symbols, options.duplicates, tracer)?;
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseEnd { phase: Phase::Registration });

    // OIDs
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseStart { phase: Phase::Oids });
    phases::resolve_oids_traced(&mut table, &options.roots, options.orphans, tracer)?;
    log::debug!("resolved {} OIDs", table.len());
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseEnd { phase: Phase::Oids });

    // Tree
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseStart { phase: Phase::Tree });
    let forest = phases::assemble_tree_traced(&table, &options.roots, options.orphans, tracer)?;
    log::debug!(
        "assembled tree: {} root(s), {} orphan(s), {} dropped",
        forest.roots.len(),
        forest.orphan_count(),
        forest.dropped.len()
    );
    trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseEnd { phase: Phase::Tree });

    Ok(Extraction {
        table,
        forest,
        diagnostics,
    })
}
