//! Phase 4: OID resolution.
//!
//! Each symbol's OID is its parent chain walked up to a root, with the root's
//! arcs in front. A chain that ends at an unknown name is an orphan path and
//! gets the global prefix instead. Chains are cached per symbol, so each
//! symbol is walked at most once per run.

use crate::config::OrphanPolicy;
use crate::error::ResolveError;
use crate::model::{parse_arc, Oid, RootSet, SymbolId, SymbolTable};
use crate::resolver::tracing::{NoopTracer, TraceEvent, TraceLevel, Tracer};
use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Compute and store the OID of every symbol in the table.
///
/// # Errors
///
/// - [`ResolveError::Cycle`] when a parent chain loops.
/// - [`ResolveError::InvalidArc`] when an `id` is not a decimal arc.
/// - [`ResolveError::UnresolvedParent`] under [`OrphanPolicy::Error`] when a
///   chain ends at an unknown name.
///
/// On error the table is left unchanged.
pub fn resolve_oids(
    table: &mut SymbolTable,
    roots: &RootSet,
    orphans: OrphanPolicy,
) -> Result<(), ResolveError> {
    resolve_oids_traced(table, roots, orphans, &mut NoopTracer)
}

/// Compute and store the OID of every symbol in the table, with tracing.
///
/// # Errors
///
/// See [`resolve_oids`].
pub fn resolve_oids_traced<T: Tracer>(
    table: &mut SymbolTable,
    roots: &RootSet,
    orphans: OrphanPolicy,
    tracer: &mut T,
) -> Result<(), ResolveError> {
    let ids: Vec<SymbolId> = table.iter_ids().map(|(id, _)| id).collect();
    let oids = {
        let mut resolver = OidResolver {
            table: &*table,
            roots,
            orphans,
            cache: vec![None; ids.len()],
            tracer,
        };
        for &id in &ids {
            resolver.resolve(id)?;
        }
        resolver.cache
    };

    for (id, oid) in ids.into_iter().zip(oids) {
        if let (Some(sym), Some(oid)) = (table.get_mut(id), oid) {
            sym.oid = oid.to_dotted();
        }
    }

    Ok(())
}

struct OidResolver<'a, T: Tracer> {
    table: &'a SymbolTable,
    roots: &'a RootSet,
    orphans: OrphanPolicy,
    cache: Vec<Option<Oid>>,
    tracer: &'a mut T,
}

impl<T: Tracer> OidResolver<'_, T> {
    fn resolve(&mut self, start: SymbolId) -> Result<(), ResolveError> {
        if self.cached(start).is_some() {
            return Ok(());
        }
        let table = self.table;

        // symbols walked from `start` upwards whose OIDs are still unknown
        let mut chain: Vec<SymbolId> = Vec::new();
        let mut visited: BTreeSet<SymbolId> = BTreeSet::new();
        let mut current = start;

        let base = loop {
            if let Some(oid) = self.cached(current) {
                break oid.clone();
            }
            if !visited.insert(current) {
                return Err(self.cycle(start, &chain, current));
            }
            chain.push(current);

            let Some(sym) = table.get(current) else {
                break Oid::default();
            };
            if let Some(prefix) = self.roots.prefix(&sym.parent) {
                break Oid::new(prefix.to_vec());
            }
            if let Some(parent) = table.id_of(&sym.parent) {
                current = parent;
                continue;
            }

            if self.orphans == OrphanPolicy::Error {
                return Err(ResolveError::UnresolvedParent {
                    name: sym.name.clone(),
                    parent: sym.parent.clone(),
                });
            }
            let start_name = table.get(start).map_or("", |s| s.name.as_str());
            crate::trace_event!(
                self.tracer,
                TraceLevel::Debug,
                TraceEvent::OrphanPath {
                    name: start_name,
                    missing: &sym.parent,
                }
            );
            break Oid::new(self.roots.global_prefix().to_vec());
        };

        let mut oid = base;
        for &id in chain.iter().rev() {
            let Some(sym) = table.get(id) else {
                continue;
            };
            let arc = parse_arc(&sym.id).ok_or_else(|| ResolveError::InvalidArc {
                name: sym.name.clone(),
                id: sym.id.clone(),
            })?;
            oid = oid.child(arc);

            if TraceLevel::Trace <= self.tracer.level() {
                let dotted = oid.to_dotted();
                self.tracer.trace(
                    TraceLevel::Trace,
                    TraceEvent::OidResolved {
                        name: &sym.name,
                        oid: &dotted,
                    },
                );
            }
            self.cache[id.to_index()] = Some(oid.clone());
        }

        Ok(())
    }

    fn cached(&self, id: SymbolId) -> Option<&Oid> {
        self.cache.get(id.to_index()).and_then(Option::as_ref)
    }

    fn cycle(&self, start: SymbolId, chain: &[SymbolId], repeated: SymbolId) -> ResolveError {
        let name_of = |id: SymbolId| {
            self.table
                .get(id)
                .map_or_else(String::new, |s| s.name.clone())
        };
        let mut path: Vec<String> = chain.iter().map(|&id| name_of(id)).collect();
        path.push(name_of(repeated));
        ResolveError::Cycle {
            name: name_of(start),
            path,
        }
    }
}
