//! Phase 3: Symbol registration.
//!
//! Index scanned symbols by name for subsequent lookup.

use crate::config::DuplicatePolicy;
use crate::error::ResolveError;
use crate::model::{Insertion, Symbol, SymbolTable};
use crate::resolver::tracing::{NoopTracer, TraceEvent, TraceLevel, Tracer};

/// Register scanned symbols in scan order.
///
/// # Errors
///
/// Returns [`ResolveError::DuplicateName`] under [`DuplicatePolicy::Reject`]
/// when two definitions share a name.
pub fn register_symbols<I>(symbols: I, policy: DuplicatePolicy) -> Result<SymbolTable, ResolveError>
where
    I: IntoIterator<Item = Symbol>,
{
    register_symbols_traced(symbols, policy, &mut NoopTracer)
}

/// Register scanned symbols in scan order, with tracing.
///
/// # Errors
///
/// Returns [`ResolveError::DuplicateName`] under [`DuplicatePolicy::Reject`]
/// when two definitions share a name.
pub fn register_symbols_traced<I, T>(
    symbols: I,
    policy: DuplicatePolicy,
    tracer: &mut T,
) -> Result<SymbolTable, ResolveError>
where
    I: IntoIterator<Item = Symbol>,
    T: Tracer,
{
    let mut table = SymbolTable::new();

    for symbol in symbols {
        let insertion = table.insert(symbol, policy)?;
        let Some(sym) = table.get(insertion.id()) else {
            continue;
        };
        match insertion {
            Insertion::New(_) => crate::trace_event!(
                tracer,
                TraceLevel::Trace,
                TraceEvent::SymbolRegistered {
                    name: &sym.name,
                    parent: &sym.parent,
                }
            ),
            Insertion::Upgraded(_) => crate::trace_event!(
                tracer,
                TraceLevel::Debug,
                TraceEvent::ImplicitUpgraded { name: &sym.name }
            ),
            Insertion::Replaced { .. } => crate::trace_event!(
                tracer,
                TraceLevel::Warn,
                TraceEvent::DuplicateReplaced { name: &sym.name }
            ),
            Insertion::Skipped(_) => {}
        }
    }

    Ok(table)
}
