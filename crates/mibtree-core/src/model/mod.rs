//! Symbol model.
//!
//! The model sits between the scanner and the serialization sinks:
//!
//! ```text
//! Lines → Scanner → [SymbolTable] → OID resolver → Tree assembler → [Forest]
//! ```
//!
//! The [`SymbolTable`] is the flat view and the only form that should be
//! persisted. The [`Forest`] is derived from it and can always be rebuilt.

mod ids;
mod oid;
mod roots;
mod symbol;
mod table;
mod tree;

pub use ids::SymbolId;
pub use oid::{parse_arc, Oid};
pub use roots::{RootSet, ISO, ISO_ARCS};
pub use symbol::{Symbol, SymbolOrigin};
pub use table::{Insertion, SymbolTable};
pub use tree::{Forest, SymbolNode};
