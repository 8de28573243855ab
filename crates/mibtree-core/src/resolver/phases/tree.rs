//! Phase 5: Tree assembly.
//!
//! Link every symbol below the symbol its parent name resolves to. The links
//! are collected as indices first and then materialized into owned nodes.

use crate::config::OrphanPolicy;
use crate::error::ResolveError;
use crate::model::{Forest, RootSet, SymbolId, SymbolNode, SymbolTable};
use crate::resolver::tracing::{NoopTracer, TraceEvent, TraceLevel, Tracer};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Build the forest for a table.
///
/// # Errors
///
/// Returns [`ResolveError::UnresolvedParent`] under [`OrphanPolicy::Error`]
/// for the first symbol whose parent is neither a symbol nor a root.
pub fn assemble_tree(
    table: &SymbolTable,
    roots: &RootSet,
    orphans: OrphanPolicy,
) -> Result<Forest, ResolveError> {
    assemble_tree_traced(table, roots, orphans, &mut NoopTracer)
}

/// Build the forest for a table, with tracing.
///
/// # Errors
///
/// See [`assemble_tree`].
pub fn assemble_tree_traced<T: Tracer>(
    table: &SymbolTable,
    roots: &RootSet,
    orphans: OrphanPolicy,
    tracer: &mut T,
) -> Result<Forest, ResolveError> {
    let mut children: Vec<Vec<SymbolId>> = vec![Vec::new(); table.len()];
    let mut top: Vec<SymbolId> = Vec::new();
    let mut orphan_ids: Vec<SymbolId> = Vec::new();
    let mut dropped_heads: Vec<SymbolId> = Vec::new();

    for (id, sym) in table.iter_ids() {
        if roots.is_root(&sym.parent) {
            top.push(id);
            continue;
        }
        if let Some(parent) = table.id_of(&sym.parent) {
            children[parent.to_index()].push(id);
            continue;
        }

        match orphans {
            OrphanPolicy::Error => {
                return Err(ResolveError::UnresolvedParent {
                    name: sym.name.clone(),
                    parent: sym.parent.clone(),
                });
            }
            OrphanPolicy::Drop => dropped_heads.push(id),
            OrphanPolicy::Attach => {
                crate::trace_event!(
                    tracer,
                    TraceLevel::Debug,
                    TraceEvent::OrphanAttached {
                        name: &sym.name,
                        parent: &sym.parent,
                    }
                );
                orphan_ids.push(id);
            }
        }
    }

    // a dropped head takes its whole subtree with it
    let symbols = table.symbols();
    let mut dropped: Vec<String> = Vec::new();
    for id in subtree_ids(&children, &dropped_heads) {
        let sym = &symbols[id.to_index()];
        crate::trace_event!(
            tracer,
            TraceLevel::Warn,
            TraceEvent::OrphanDropped {
                name: &sym.name,
                parent: &sym.parent,
            }
        );
        dropped.push(sym.name.clone());
    }

    Ok(Forest {
        roots: top.into_iter().map(|id| materialize(table, &children, id)).collect(),
        orphans: orphan_ids
            .into_iter()
            .map(|id| materialize(table, &children, id))
            .collect(),
        dropped,
    })
}

/// Every id below (and including) each head, in depth-first pre-order.
fn subtree_ids(children: &[Vec<SymbolId>], heads: &[SymbolId]) -> Vec<SymbolId> {
    let mut out = Vec::new();
    for &head in heads {
        let mut stack = vec![head];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(children[id.to_index()].iter().rev());
        }
    }
    out
}

enum Step {
    Enter(SymbolId),
    Exit(SymbolId),
}

/// Build the owned subtree below `top` without recursion.
fn materialize(table: &SymbolTable, children: &[Vec<SymbolId>], top: SymbolId) -> SymbolNode {
    let symbols = table.symbols();
    let mut stack = vec![Step::Enter(top)];
    let mut built: Vec<SymbolNode> = Vec::new();

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(id) => {
                stack.push(Step::Exit(id));
                stack.extend(children[id.to_index()].iter().rev().map(|&c| Step::Enter(c)));
            }
            Step::Exit(id) => {
                let count = children[id.to_index()].len();
                let kids = built.split_off(built.len() - count);
                let mut node = SymbolNode::new(symbols[id.to_index()].clone());
                node.children = kids;
                built.push(node);
            }
        }
    }

    // exactly one node is left: the one for `top`
    built.pop().unwrap_or_else(|| SymbolNode::new(symbols[top.to_index()].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::model::Symbol;
    use pretty_assertions::assert_eq;

    fn table(symbols: &[(&str, &str, &str)], policy: DuplicatePolicy) -> SymbolTable {
        SymbolTable::from_symbols(
            symbols
                .iter()
                .map(|&(name, parent, id)| Symbol::new(name, parent, id)),
            policy,
        )
        .unwrap()
    }

    fn shape(node: &SymbolNode) -> Vec<(String, usize)> {
        let mut out: Vec<(String, usize)> = Vec::new();
        node.walk(&mut |n, depth| {
            out.push((String::from(n.name()), depth));
            true
        });
        out
    }

    #[test]
    fn test_children_in_scan_order() {
        let t = table(
            &[("a", "iso", "1"), ("c", "a", "3"), ("b", "a", "2"), ("d", "b", "1")],
            DuplicatePolicy::Reject,
        );
        let forest = assemble_tree(&t, &RootSet::iso(), OrphanPolicy::Drop).unwrap();
        assert_eq!(forest.roots.len(), 1);
        assert_eq!(
            shape(&forest.roots[0]),
            vec![
                (String::from("a"), 0),
                (String::from("c"), 1),
                (String::from("b"), 1),
                (String::from("d"), 2),
            ]
        );
    }

    #[test]
    fn test_child_defined_before_parent() {
        let t = table(&[("b", "a", "2"), ("a", "iso", "1")], DuplicatePolicy::Reject);
        let forest = assemble_tree(&t, &RootSet::iso(), OrphanPolicy::Drop).unwrap();
        assert_eq!(forest.roots[0].name(), "a");
        assert_eq!(forest.roots[0].children[0].name(), "b");
    }

    #[test]
    fn test_orphans_dropped_by_default() {
        let t = table(&[("a", "iso", "1"), ("x", "nowhere", "1"), ("y", "x", "2")], DuplicatePolicy::Reject);
        let forest = assemble_tree(&t, &RootSet::iso(), OrphanPolicy::Drop).unwrap();
        assert_eq!(forest.roots.len(), 1);
        assert!(forest.orphans.is_empty());
        assert_eq!(forest.dropped, vec![String::from("x"), String::from("y")]);
        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn test_dropped_subtree_is_recorded() {
        let t = table(
            &[
                ("a", "iso", "1"),
                ("x", "nowhere", "1"),
                ("y", "x", "2"),
                ("z", "y", "3"),
                ("w", "x", "4"),
            ],
            DuplicatePolicy::Reject,
        );
        let forest = assemble_tree(&t, &RootSet::iso(), OrphanPolicy::Drop).unwrap();
        assert_eq!(forest.dropped, ["x", "y", "z", "w"]);

        let mut seen: Vec<String> = forest.flatten().into_iter().map(|s| s.name).collect();
        seen.extend(forest.dropped.iter().cloned());
        seen.sort();
        let mut flat: Vec<String> = t.symbols().iter().map(|s| s.name.clone()).collect();
        flat.sort();
        assert_eq!(seen, flat);
    }

    #[test]
    fn test_dropped_subtree_traced() {
        #[derive(Default)]
        struct Dropped(Vec<String>);
        impl Tracer for Dropped {
            fn trace(&mut self, _level: TraceLevel, event: TraceEvent<'_>) {
                if let TraceEvent::OrphanDropped { name, .. } = event {
                    self.0.push(String::from(name));
                }
            }
        }

        let t = table(&[("x", "nowhere", "1"), ("y", "x", "2")], DuplicatePolicy::Reject);
        let mut tracer = Dropped::default();
        assemble_tree_traced(&t, &RootSet::iso(), OrphanPolicy::Drop, &mut tracer).unwrap();
        assert_eq!(tracer.0, ["x", "y"]);
    }

    #[test]
    fn test_orphans_attached() {
        let t = table(&[("x", "nowhere", "1"), ("y", "x", "2")], DuplicatePolicy::Reject);
        let forest = assemble_tree(&t, &RootSet::iso(), OrphanPolicy::Attach).unwrap();
        assert!(forest.roots.is_empty());
        assert_eq!(forest.orphans.len(), 1);
        assert_eq!(forest.orphans[0].children[0].name(), "y");

        let group = forest.orphan_group("orphans").unwrap();
        assert_eq!(group.name(), "orphans");
        assert_eq!(group.children.len(), 1);
    }

    #[test]
    fn test_orphans_error() {
        let t = table(&[("x", "nowhere", "1")], DuplicatePolicy::Reject);
        let err = assemble_tree(&t, &RootSet::iso(), OrphanPolicy::Error).unwrap_err();
        assert!(matches!(err, ResolveError::UnresolvedParent { ref parent, .. } if parent == "nowhere"));
    }

    #[test]
    fn test_replaced_duplicate_keeps_children_on_latest() {
        let t = table(
            &[("a", "iso", "1"), ("a", "iso", "2"), ("b", "a", "1")],
            DuplicatePolicy::Replace,
        );
        let forest = assemble_tree(&t, &RootSet::iso(), OrphanPolicy::Drop).unwrap();
        assert_eq!(forest.roots.len(), 2);
        assert!(forest.roots[0].is_leaf());
        assert_eq!(forest.roots[1].symbol.id, "2");
        assert_eq!(forest.roots[1].children[0].name(), "b");
    }

    #[test]
    fn test_cycle_never_materializes() {
        let t = table(&[("a", "iso", "1"), ("p", "q", "1"), ("q", "p", "2")], DuplicatePolicy::Reject);
        let forest = assemble_tree(&t, &RootSet::iso(), OrphanPolicy::Attach).unwrap();
        assert_eq!(forest.len(), 1);
        assert!(forest.orphans.is_empty());
    }

    #[test]
    fn test_deep_chain() {
        let names: Vec<String> = (0..2_000).map(|i| alloc::format!("n{i}")).collect();
        let mut symbols = vec![Symbol::new("n0", "iso", "1")];
        for pair in names.windows(2) {
            symbols.push(Symbol::new(pair[1].as_str(), pair[0].as_str(), "1"));
        }
        let t = SymbolTable::from_symbols(symbols, DuplicatePolicy::Reject).unwrap();
        let forest = assemble_tree(&t, &RootSet::iso(), OrphanPolicy::Drop).unwrap();
        assert_eq!(forest.len(), 2_000);
        assert_eq!(forest.flatten().len(), 2_000);
    }
}
