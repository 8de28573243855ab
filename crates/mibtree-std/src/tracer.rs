//! Forward trace events to the `log` facade.

use mibtree_core::resolver::{TraceEvent, TraceLevel, Tracer};

/// A [`Tracer`] that logs every event through `log`.
///
/// The trace level follows the logger's maximum level, so events are only
/// built when they would be printed.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTracer;

impl LogTracer {
    /// Create a tracer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn to_log_level(level: TraceLevel) -> log::Level {
    match level {
        TraceLevel::Error => log::Level::Error,
        TraceLevel::Warn => log::Level::Warn,
        TraceLevel::Info => log::Level::Info,
        TraceLevel::Debug => log::Level::Debug,
        TraceLevel::Trace => log::Level::Trace,
    }
}

fn from_log_filter(filter: log::LevelFilter) -> TraceLevel {
    match filter {
        log::LevelFilter::Off | log::LevelFilter::Error => TraceLevel::Error,
        log::LevelFilter::Warn => TraceLevel::Warn,
        log::LevelFilter::Info => TraceLevel::Info,
        log::LevelFilter::Debug => TraceLevel::Debug,
        log::LevelFilter::Trace => TraceLevel::Trace,
    }
}

impl Tracer for LogTracer {
    fn level(&self) -> TraceLevel {
        from_log_filter(log::max_level())
    }

    fn trace(&mut self, level: TraceLevel, event: TraceEvent<'_>) {
        let level = to_log_level(level);
        match event {
            TraceEvent::PhaseStart { phase } => log::log!(level, "{phase}: start"),
            TraceEvent::PhaseEnd { phase } => log::log!(level, "{phase}: done"),
            TraceEvent::ModuleDefined { module } => log::log!(level, "module {module} defined"),
            TraceEvent::DiagnosticEmitted { message, .. } => log::log!(level, "{message}"),
            TraceEvent::DependencyMissing { file } => {
                log::log!(level, "required module file {file} is not among the sources");
            }
            TraceEvent::SymbolRegistered { name, parent } => {
                log::log!(level, "registered {name} under {parent}");
            }
            TraceEvent::ImplicitUpgraded { name } => {
                log::log!(level, "{name} defined after being implied by another value");
            }
            TraceEvent::DuplicateReplaced { name } => {
                log::log!(level, "duplicate definition of {name}; the later one wins");
            }
            TraceEvent::OidResolved { name, oid } => log::log!(level, "{name} = {oid}"),
            TraceEvent::OrphanPath { name, missing } => {
                log::log!(level, "{name}: parent chain ends at unknown {missing}");
            }
            TraceEvent::OrphanDropped { name, parent } => {
                log::log!(level, "{name} left out of the tree: unknown parent {parent}");
            }
            TraceEvent::OrphanAttached { name, parent } => {
                log::log!(level, "{name} attached to the orphan group: unknown parent {parent}");
            }
        }
    }
}
