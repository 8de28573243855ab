//! mibtree-core: MIB symbol extraction library
//!
//! This crate scans SNMP MIB text for OID-bearing symbols, resolves each
//! symbol's numeric OID from its parent chain, and assembles the symbols into
//! a tree. It is `no_std` compatible and IO-free; reading files and writing
//! JSON live in `mibtree-std`.
//!
//! # Example
//!
//! ```
//! use mibtree_core::{resolve, Options};
//!
//! let lines = [
//!     "sysDescr OBJECT-TYPE",
//!     "    SYNTAX DisplayString",
//!     "    DESCRIPTION \"A textual description of the entity.\"",
//!     "    ::= { system 1 }",
//!     "system OBJECT IDENTIFIER ::= { iso 1 }",
//! ];
//! let extraction = resolve(&lines, &Options::default()).unwrap();
//! let descr = extraction.table.get_by_name("sysDescr").unwrap();
//! assert_eq!(descr.oid, "1.1.1");
//! assert_eq!(descr.description, "A textual description of the entity.");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod model;
pub mod resolver;
pub mod scanner;
pub mod source;

pub use config::{DuplicatePolicy, Options, OrphanPolicy, ScanOptions, Strictness};
pub use diagnostic::{Diagnostic, Location, Severity};
pub use error::{DependencyError, Error, ResolveError, Result, ScanError};
pub use model::{Forest, Oid, RootSet, Symbol, SymbolNode, SymbolTable};
pub use resolver::{
    resolve, resolve_sources, resolve_sources_traced, resolve_traced, Extraction, NoopTracer,
    TraceEvent, TraceLevel, Tracer,
};
pub use source::SourceFile;
