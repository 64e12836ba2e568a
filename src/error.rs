//! Error types for grammar access and parse-table consistency.
//!
//! A failed parse is *not* an error: the driver reports rejection as a normal
//! outcome. `CanlrError` covers the fatal cases only — a caller asking for a
//! production that does not exist, and a parse table that turns out to be
//! internally inconsistent while a reduction is applied.

use smartstring::alias::String;
use thiserror::Error;

/// Fatal failures surfaced by the table builder and the parser driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanlrError {
    /// A production index outside the grammar's production list.
    #[error("production index {index} out of range: grammar has {count} productions")]
    ProductionOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of productions in the grammar.
        count: usize,
    },

    /// A reduction exposed a state with no goto entry for the produced
    /// left-hand symbol. The table is malformed; this is distinct from an
    /// ordinary rejection.
    #[error("state {state} has no goto entry for `{symbol}`")]
    MissingGoto {
        /// The state left on top of the stack after popping the handle.
        state: usize,
        /// The left-hand symbol that was produced.
        symbol: String,
    },

    /// A reduction asked to pop more entries than the stack holds. Like
    /// [`CanlrError::MissingGoto`], this indicates a malformed table.
    #[error("parse stack underflow while reducing production {production} in state {state}")]
    StackUnderflow {
        /// The state in which the reduce action was looked up.
        state: usize,
        /// The production being reduced.
        production: usize,
    },
}
