//! File handling for trace normalisation.
//!
//! Resolves path specifications into trace files, parses them, and writes the
//! scaled output either over the inputs or into an output folder.

pub mod discovery;
pub mod processor;
pub mod reader;
pub mod writer;

pub use trace_core as core;
