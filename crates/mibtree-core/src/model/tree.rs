//! Tree view over a resolved symbol table.

use super::symbol::Symbol;
use alloc::string::String;
use alloc::vec::Vec;

/// A symbol together with the symbols attached below it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolNode {
    /// The symbol at this node.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub symbol: Symbol,
    /// Children in scan order.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<SymbolNode>,
}

impl SymbolNode {
    /// Create a leaf node.
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            children: Vec::new(),
        }
    }

    /// Symbol name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.symbol.name
    }

    /// Check if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Find a node by name in this subtree (depth-first).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&SymbolNode> {
        let mut stack = alloc::vec![self];
        while let Some(node) = stack.pop() {
            if node.name() == name {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Visit every node of this subtree in depth-first pre-order.
    ///
    /// The callback receives the node and its depth (0 for `self`). Returning
    /// `false` skips the node's children.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&SymbolNode, usize) -> bool,
    {
        let mut stack = alloc::vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            if f(node, depth) {
                stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
            }
        }
    }
}

/// Rooted forest produced by the tree assembler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Forest {
    /// Nodes whose parent is a root token.
    pub roots: Vec<SymbolNode>,
    /// Nodes whose parent could not be resolved (attach policy only).
    pub orphans: Vec<SymbolNode>,
    /// Names left out of the tree (drop policy only). They remain in the
    /// flat table.
    pub dropped: Vec<String>,
}

impl Forest {
    /// Depth-first pre-order flattening: roots first, then orphans.
    ///
    /// The result carries every field of the flat table except `children`.
    #[must_use]
    pub fn flatten(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        for node in self.roots.iter().chain(&self.orphans) {
            node.walk(&mut |n, _| {
                out.push(n.symbol.clone());
                true
            });
        }
        out
    }

    /// Number of nodes in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        for node in self.roots.iter().chain(&self.orphans) {
            node.walk(&mut |_, _| {
                count += 1;
                true
            });
        }
        count
    }

    /// Number of nodes under the orphan heads, heads included.
    #[must_use]
    pub fn orphan_count(&self) -> usize {
        let mut count = 0;
        for node in &self.orphans {
            node.walk(&mut |_, _| {
                count += 1;
                true
            });
        }
        count
    }

    /// Check if the forest has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.orphans.is_empty()
    }

    /// Find a node by name anywhere in the forest.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&SymbolNode> {
        self.roots
            .iter()
            .chain(&self.orphans)
            .find_map(|node| node.find(name))
    }

    /// Wrap the orphans in a synthetic group node named `label`.
    ///
    /// The group node has empty `id`, `parent` and `oid`, and no entry in the
    /// flat table. It is the only node of a tree view whose `oid` is not a
    /// dotted path. Returns `None` when there are no orphans.
    #[must_use]
    pub fn orphan_group(&self, label: &str) -> Option<SymbolNode> {
        if self.orphans.is_empty() {
            return None;
        }
        Some(SymbolNode {
            symbol: Symbol::new(label, "", "")
                .with_description("Symbols whose parent could not be resolved"),
            children: self.orphans.clone(),
        })
    }
}
