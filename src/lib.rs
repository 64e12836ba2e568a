//! Canonical LR(1) table construction and a shift/reduce recognizer.
//!
//! The pipeline is one-way: a [`Grammar`] is classified into terminals and
//! non-terminals, the table builder derives the canonical collection of item
//! sets and an [`ActionTable`] from it, and a [`Parser`] drives the table
//! over a token sequence, answering accept or reject. No AST is built;
//! callers needing one can layer it on the [`TraceStep`] reduce events.
//!
//! ```
//! use canlr::{ActionTable, Grammar, Parser};
//!
//! let grammar = Grammar::new(&[
//!     ("E", &["T", "+", "E"][..]),
//!     ("E", &["T"][..]),
//!     ("T", &["F", "*", "T"][..]),
//!     ("T", &["F"][..]),
//!     ("F", &["id"][..]),
//! ]);
//! let table = ActionTable::build(&grammar)?;
//! let parser = Parser::new(&grammar, &table);
//! assert!(parser.accepts(&["id", "+", "id", "*", "id"])?);
//! assert!(!parser.accepts(&["id", "+", "+"])?);
//! # Ok::<(), canlr::CanlrError>(())
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod grammar;
pub mod lr;
pub mod parser;
pub mod table;

pub use crate::error::CanlrError;
pub use crate::grammar::{Grammar, Production, END_MARKER};
pub use crate::lr::{closure, goto, FirstSets, Item, ItemSet};
pub use crate::parser::{ParseOutcome, Parser, ParserStats, TraceStep};
pub use crate::table::{Action, ActionTable, Conflict};
