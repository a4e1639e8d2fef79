//! Re-exports of the diagnostics types used throughout the grammar.

pub use opl_toolchain_diagnostics::{ErrorKind, LineIndex, OplError, Span};
