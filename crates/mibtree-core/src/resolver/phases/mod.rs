//! Resolution phases.
//!
//! Extraction proceeds in ordered phases:
//!
//! 1. **Scan**: Collect module markers and symbol candidates (see
//!    [`crate::scanner`])
//! 2. **Imports**: Check that every required module is defined
//! 3. **Registration**: Index symbols by name
//! 4. **OIDs**: Compute each symbol's OID from its parent chain
//! 5. **Tree**: Link symbols below their parents

pub mod imports;
pub mod oids;
pub mod registration;
pub mod tree;

pub use imports::{missing_dependencies, validate_dependencies, validate_dependencies_traced};
pub use oids::{resolve_oids, resolve_oids_traced};
pub use registration::{register_symbols, register_symbols_traced};
pub use tree::{assemble_tree, assemble_tree_traced};
