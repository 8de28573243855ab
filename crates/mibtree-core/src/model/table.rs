//! Symbol arena with a separate name index.

use super::ids::SymbolId;
use super::symbol::{Symbol, SymbolOrigin};
use crate::config::DuplicatePolicy;
use crate::error::ResolveError;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Outcome of [`SymbolTable::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    /// The name was new.
    New(SymbolId),
    /// An implicit symbol was dropped because the name already exists.
    Skipped(SymbolId),
    /// A definition took over the slot of an implicit symbol.
    Upgraded(SymbolId),
    /// A later definition took over the name (compatibility mode).
    Replaced {
        /// Slot of the earlier definition, which stays in the flat view.
        previous: SymbolId,
        /// Slot of the new definition.
        current: SymbolId,
    },
}

impl Insertion {
    /// The slot that owns the name after the insertion.
    #[must_use]
    pub fn id(self) -> SymbolId {
        match self {
            Self::New(id) | Self::Skipped(id) | Self::Upgraded(id) => id,
            Self::Replaced { current, .. } => current,
        }
    }
}

/// Flat symbol table.
///
/// Symbols are stored in scan order; that order is the flat view. Name
/// resolution goes through a separate index so that duplicates are detected
/// instead of silently overwritten.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: BTreeMap<String, SymbolId>,
}

impl SymbolTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from symbols in order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::DuplicateName`] under [`DuplicatePolicy::Reject`]
    /// when two definitions share a name.
    pub fn from_symbols<I>(symbols: I, policy: DuplicatePolicy) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut table = Self::new();
        for symbol in symbols {
            table.insert(symbol, policy)?;
        }
        Ok(table)
    }

    /// Insert a symbol.
    ///
    /// Implicit symbols never conflict: they are skipped when the name exists,
    /// and a later definition takes over their slot so the name keeps its
    /// first-occurrence position.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::DuplicateName`] when two definitions share a
    /// name and `policy` is [`DuplicatePolicy::Reject`].
    pub fn insert(
        &mut self,
        symbol: Symbol,
        policy: DuplicatePolicy,
    ) -> Result<Insertion, ResolveError> {
        let Some(&existing) = self.index.get(&symbol.name) else {
            let id = self.push(symbol)?;
            return Ok(Insertion::New(id));
        };

        if symbol.origin == SymbolOrigin::Implicit {
            return Ok(Insertion::Skipped(existing));
        }

        let slot = &mut self.symbols[existing.to_index()];
        if slot.origin == SymbolOrigin::Implicit {
            *slot = symbol;
            return Ok(Insertion::Upgraded(existing));
        }

        match policy {
            DuplicatePolicy::Reject => Err(ResolveError::DuplicateName {
                name: symbol.name,
                first: slot.location.clone(),
                second: symbol.location,
            }),
            DuplicatePolicy::Replace => {
                let current = self.push(symbol)?;
                Ok(Insertion::Replaced {
                    previous: existing,
                    current,
                })
            }
        }
    }

    fn push(&mut self, symbol: Symbol) -> Result<SymbolId, ResolveError> {
        let id = SymbolId::from_index(self.symbols.len()).ok_or(ResolveError::TableFull)?;
        self.index.insert(symbol.name.clone(), id);
        self.symbols.push(symbol);
        Ok(id)
    }

    /// Get a symbol by id.
    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.to_index())
    }

    /// Get a mutable symbol by id.
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.to_index())
    }

    /// Resolve a name to the slot that owns it.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<SymbolId> {
        self.index.get(name).copied()
    }

    /// Get a symbol by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Symbol> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Check whether a name is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate over symbols in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Iterate over `(id, symbol)` pairs in scan order.
    pub fn iter_ids(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .filter_map(|(idx, sym)| SymbolId::from_index(idx).map(|id| (id, sym)))
    }

    /// The flat view.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Consume the table and return the flat view.
    #[must_use]
    pub fn into_symbols(self) -> Vec<Symbol> {
        self.symbols
    }

    /// Number of symbols in the flat view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
