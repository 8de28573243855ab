//! mibtree-std: Filesystem loader, JSON sinks and snapshot cache
//!
//! This crate wraps the IO-free `mibtree-core` pipeline for native use:
//! reading a directory of MIB files, writing the flat and tree JSON
//! documents, caching resolved tables, and forwarding trace events to `log`.
//! The `mibtree` binary ties these together.

pub mod cache;
pub mod loader;
pub mod sink;
pub mod tracer;

pub use loader::{read_source_dir, read_source_file, LoadError};
pub use mibtree_core;
pub use sink::{flat_output_path, tree_output_path, write_outputs, SinkError};
pub use tracer::LogTracer;
