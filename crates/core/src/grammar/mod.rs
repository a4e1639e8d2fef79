/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for parsed entities.
pub mod dump;
/// The OPL line parser: sub-grammars, entity parsers, and the dispatcher.
pub mod parser;
/// Cursor and scalar scanners over one OPL line.
pub mod scan;
