//! Canonical collection and action-table construction.
//!
//! States are discovered breadth-first from the initial item set: the builder
//! walks the state vector by index while appending every goto target not
//! already present, so the loop itself is the fixed point over reachable
//! states. Value equality on item sets keeps the collection duplicate-free,
//! which bounds the construction the same way the finite item-triple space
//! bounds closure.

use crate::error::CanlrError;
use crate::grammar::{Grammar, END_MARKER};
use crate::lr::{closure, goto, FirstSets, Item, ItemSet};
use indexmap::{map::Entry, IndexMap};
use smartstring::alias::String;
use std::fmt;
use std::io::{self, Write};

/// A parse-table action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Consume the current terminal and move to the given state.
    Shift(usize),
    /// Collapse a matched production.
    Reduce(usize),
    /// Transition on a produced non-terminal.
    Goto(usize),
    /// Terminate successfully.
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "S{}", s),
            Action::Reduce(p) => write!(f, "R{}", p),
            Action::Goto(s) => write!(f, "G{}", s),
            Action::Accept => write!(f, "ACCEPT"),
        }
    }
}

/// A recorded overwrite of one action by another for the same
/// (state, symbol) key. The table keeps the replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The state in which the collision occurred.
    pub state: usize,
    /// The symbol keying both actions.
    pub symbol: String,
    /// The action that was overwritten.
    pub existing: Action,
    /// The action now stored in the table.
    pub replacement: Action,
}

/// The canonical collection and its action table.
///
/// Built once by [`ActionTable::build`], read-only afterwards. Conflicting
/// entries resolve last-write-wins (reductions are recorded after the
/// transitions of a state, so a reduce overwrites a shift on the same key);
/// every overwrite is logged at `warn` level and kept in
/// [`ActionTable::conflicts`]. This is the documented behavior for grammars
/// outside the supported unambiguous LR(1) class, not conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTable {
    pub(crate) states: Vec<ItemSet>,
    pub(crate) actions: Vec<IndexMap<String, Action>>,
    pub(crate) conflicts: Vec<Conflict>,
}

impl ActionTable {
    /// Builds the canonical collection and action table for `grammar`.
    ///
    /// The start symbol is the left-hand side of production 0. State 0 is the
    /// closure of one dot-0, end-of-input-lookahead item per start-symbol
    /// production — seeding only production 0 would silently drop sentences
    /// derivable through the start symbol's later productions. Fails if the
    /// grammar has no productions.
    pub fn build(grammar: &Grammar) -> Result<ActionTable, CanlrError> {
        let start = String::from(grammar.production(0)?.lhs());
        let first = FirstSets::compute(grammar);
        let symbols: Vec<String> = grammar.symbols().map(String::from).collect();

        let mut seed = ItemSet::new();
        for (index, prod) in grammar.productions().iter().enumerate() {
            if prod.lhs() == start.as_str() {
                seed.insert(Item::new(index, 0, END_MARKER));
            }
        }
        let mut states = vec![closure(&seed, grammar, &first)?];
        let mut actions: Vec<IndexMap<String, Action>> = vec![IndexMap::new()];
        let mut conflicts = Vec::new();

        let mut current = 0;
        while current < states.len() {
            for sym in &symbols {
                let next = goto(&states[current], sym, grammar, &first)?;
                if next.is_empty() {
                    continue;
                }
                let target = match states.iter().position(|s| *s == next) {
                    Some(ix) => ix,
                    None => {
                        states.push(next);
                        actions.push(IndexMap::new());
                        states.len() - 1
                    }
                };
                let action = if grammar.is_non_terminal(sym) {
                    Action::Goto(target)
                } else {
                    Action::Shift(target)
                };
                record(&mut actions, &mut conflicts, current, sym.clone(), action);
            }

            for item in &states[current] {
                let prod = grammar.production(item.prod)?;
                if item.dot < prod.rhs().len() {
                    continue;
                }
                if prod.lhs() == start.as_str() && item.lookahead.as_str() == END_MARKER {
                    record(
                        &mut actions,
                        &mut conflicts,
                        current,
                        String::from(END_MARKER),
                        Action::Accept,
                    );
                } else {
                    record(
                        &mut actions,
                        &mut conflicts,
                        current,
                        item.lookahead.clone(),
                        Action::Reduce(item.prod),
                    );
                }
            }

            current += 1;
        }

        Ok(ActionTable {
            states,
            actions,
            conflicts,
        })
    }

    /// The action for `(state, symbol)`, if any.
    pub fn action(&self, state: usize, symbol: &str) -> Option<Action> {
        self.actions.get(state)?.get(symbol).copied()
    }

    /// The canonical collection, in discovery order.
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    /// Every overwrite that occurred during construction.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Writes the canonical collection in a compact diagnostic form, one
    /// line per item:
    ///
    /// ```text
    /// CS,<number of states>
    ///
    /// C,<state>,<LHS> -> <symbols with . at the dot>,<lookahead>
    /// ```
    pub fn write_states<W: Write>(&self, out: &mut W, grammar: &Grammar) -> io::Result<()> {
        writeln!(out, "CS,{}\n", self.states.len())?;
        for (i, state) in self.states.iter().enumerate() {
            for item in state {
                let prod = grammar.production(item.prod).map_err(io::Error::other)?;
                write!(out, "C,{},{} ->", i, prod.lhs())?;
                for (j, sym) in prod.rhs().iter().enumerate() {
                    if j == item.dot {
                        write!(out, " .")?;
                    }
                    write!(out, " {}", sym)?;
                }
                if item.dot == prod.rhs().len() {
                    write!(out, " .")?;
                }
                writeln!(out, ",{}", item.lookahead)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Writes the action table, one line per entry:
    ///
    /// ```text
    /// AS,<number of entries>
    ///
    /// A,<state>,<symbol>,<action>
    /// ```
    pub fn write_actions<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let total: usize = self.actions.iter().map(|row| row.len()).sum();
        writeln!(out, "AS,{}\n", total)?;
        for (state, row) in self.actions.iter().enumerate() {
            for (sym, action) in row {
                writeln!(out, "A,{},{},{}", state, sym, action)?;
            }
        }
        Ok(())
    }
}

/// Stores an action, logging and recording the collision when the key is
/// already taken by a different action. Last write wins.
fn record(
    actions: &mut [IndexMap<String, Action>],
    conflicts: &mut Vec<Conflict>,
    state: usize,
    symbol: String,
    action: Action,
) {
    match actions[state].entry(symbol) {
        Entry::Occupied(mut entry) => {
            if *entry.get() != action {
                log::warn!(
                    "conflict in state {} on `{}`: {} replaced by {}",
                    state,
                    entry.key(),
                    entry.get(),
                    action
                );
                conflicts.push(Conflict {
                    state,
                    symbol: entry.key().clone(),
                    existing: *entry.get(),
                    replacement: action,
                });
                entry.insert(action);
            }
        }
        Entry::Vacant(entry) => {
            entry.insert(action);
        }
    }
}
