//! Resolver tracing support.
//!
//! Provides structured trace events for debugging extraction issues. The
//! non-traced entry points run with [`NoopTracer`], whose level filters out
//! every event before it is built.

use crate::diagnostic::Severity;

/// Trace verbosity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TraceLevel {
    /// Critical errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages (phase boundaries, summary stats).
    Info,
    /// Detailed debugging (individual decisions).
    Debug,
    /// Verbose tracing (every symbol).
    Trace,
}

/// Pipeline phase identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Module markers and symbol candidates.
    Scan,
    /// Dependency validation.
    Imports,
    /// Symbol table construction.
    Registration,
    /// OID computation.
    Oids,
    /// Tree assembly.
    Tree,
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Phase::Scan => write!(f, "scan"),
            Phase::Imports => write!(f, "imports"),
            Phase::Registration => write!(f, "registration"),
            Phase::Oids => write!(f, "oids"),
            Phase::Tree => write!(f, "tree"),
        }
    }
}

/// Structured trace events emitted during extraction.
#[derive(Clone, Debug)]
pub enum TraceEvent<'a> {
    /// A phase is starting.
    PhaseStart { phase: Phase },
    /// A phase has ended.
    PhaseEnd { phase: Phase },

    // === Scan events ===
    /// A source defines a module.
    ModuleDefined {
        /// The module name (without suffix).
        module: &'a str,
    },
    /// The scanner reported a diagnostic.
    DiagnosticEmitted {
        /// Severity of the finding.
        severity: Severity,
        /// Rendered message, location included.
        message: &'a str,
    },

    // === Import events ===
    /// A required module is not defined by any source.
    DependencyMissing {
        /// The missing file name (with suffix).
        file: &'a str,
    },

    // === Registration events ===
    /// A symbol entered the table.
    SymbolRegistered {
        /// The symbol name.
        name: &'a str,
        /// Its parent name.
        parent: &'a str,
    },
    /// A defined symbol took over the slot of an implicit one.
    ImplicitUpgraded {
        /// The symbol name.
        name: &'a str,
    },
    /// A later definition replaced an earlier one.
    DuplicateReplaced {
        /// The duplicated name.
        name: &'a str,
    },

    // === OID events ===
    /// An OID was computed.
    OidResolved {
        /// The symbol name.
        name: &'a str,
        /// The OID as a dotted string.
        oid: &'a str,
    },
    /// A parent chain ended at a name that is neither a symbol nor a root.
    OrphanPath {
        /// The symbol whose chain was walked.
        name: &'a str,
        /// The unknown name the chain ended at.
        missing: &'a str,
    },

    // === Tree events ===
    /// A symbol with an unknown parent was left out of the tree.
    OrphanDropped {
        /// The symbol name.
        name: &'a str,
        /// The unknown parent.
        parent: &'a str,
    },
    /// A symbol with an unknown parent was placed in the orphan group.
    OrphanAttached {
        /// The symbol name.
        name: &'a str,
        /// The unknown parent.
        parent: &'a str,
    },
}

/// Trait for receiving trace events during extraction.
///
/// Implement this trait to capture diagnostics. The tracer can filter events
/// by returning a minimum trace level from `level()`.
pub trait Tracer {
    /// Returns the minimum trace level to emit.
    ///
    /// Events below this level will not be passed to `trace()`.
    /// Default: `TraceLevel::Info`.
    fn level(&self) -> TraceLevel {
        TraceLevel::Info
    }

    /// Called for each trace event at or above the configured level.
    fn trace(&mut self, level: TraceLevel, event: TraceEvent<'_>);
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn level(&self) -> TraceLevel {
        (**self).level()
    }

    fn trace(&mut self, level: TraceLevel, event: TraceEvent<'_>) {
        (**self).trace(level, event);
    }
}

/// A no-op tracer that discards all events.
///
/// Used as the default when tracing is not needed.
#[derive(Default, Clone, Copy, Debug)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn level(&self) -> TraceLevel {
        // lowest verbosity; the macro still checks before building events
        TraceLevel::Error
    }

    fn trace(&mut self, _level: TraceLevel, _event: TraceEvent<'_>) {}
}

/// Emit a trace event if the tracer level permits.
///
/// This macro checks the tracer's level before constructing the event.
/// Events are only emitted if their level is at or below the tracer's level.
#[macro_export]
macro_rules! trace_event {
    ($tracer:expr, $level:expr, $event:expr) => {
        if $level <= $tracer.level() {
            $tracer.trace($level, $event);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    struct TestTracer {
        events: Vec<(TraceLevel, String)>,
        min_level: TraceLevel,
    }

    impl TestTracer {
        fn new(level: TraceLevel) -> Self {
            Self {
                events: Vec::new(),
                min_level: level,
            }
        }
    }

    impl Tracer for TestTracer {
        fn level(&self) -> TraceLevel {
            self.min_level
        }

        fn trace(&mut self, level: TraceLevel, event: TraceEvent<'_>) {
            self.events.push((level, format!("{event:?}")));
        }
    }

    #[test]
    fn test_trace_level_ordering() {
        assert!(TraceLevel::Error < TraceLevel::Warn);
        assert!(TraceLevel::Warn < TraceLevel::Info);
        assert!(TraceLevel::Info < TraceLevel::Debug);
        assert!(TraceLevel::Debug < TraceLevel::Trace);
    }

    #[test]
    fn test_trace_event_macro() {
        let mut tracer = TestTracer::new(TraceLevel::Info);

        trace_event!(tracer, TraceLevel::Info, TraceEvent::PhaseStart { phase: Phase::Oids });
        assert_eq!(tracer.events.len(), 1);

        // below level
        trace_event!(tracer, TraceLevel::Debug, TraceEvent::PhaseEnd { phase: Phase::Oids });
        assert_eq!(tracer.events.len(), 1);
    }

    fn emit_resolved<T: Tracer>(mut tracer: T) {
        trace_event!(
            tracer,
            TraceLevel::Trace,
            TraceEvent::OidResolved { name: "x", oid: "1.1" }
        );
    }

    #[test]
    fn test_tracer_through_mut_ref() {
        let mut inner = TestTracer::new(TraceLevel::Trace);
        emit_resolved(&mut inner);
        emit_resolved(&mut inner);
        assert_eq!(inner.events.len(), 2);
        assert!(inner.events[0].1.contains("1.1"));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(format!("{}", Phase::Registration), "registration");
        assert_eq!(format!("{}", Phase::Tree), "tree");
    }
}
