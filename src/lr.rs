//! LR(1) item machinery: dotted items, FIRST sets, closure and goto.
//!
//! An [`Item`] marks a position inside a production together with the
//! lookahead terminal expected once the production is fully reduced. Item
//! sets are plain `BTreeSet`s, so equality, ordering and hashing are
//! structural — two sets holding the same (production, dot, lookahead)
//! triples are the same automaton state. That property is what bounds the
//! closure fixed point: the triple space is finite, every insertion is
//! deduplicated, so the worklist drains.

use crate::error::CanlrError;
use crate::grammar::Grammar;
use indexmap::{IndexMap, IndexSet};
use smartstring::alias::String;
use std::collections::{BTreeSet, VecDeque};

/// An LR(1) item: a production index, a dot position within that
/// production's right-hand side, and a lookahead terminal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    /// The index of the production in the grammar.
    pub prod: usize,
    /// The position of the dot within the production's right-hand side,
    /// in `0..=rhs.len()`.
    pub dot: usize,
    /// The terminal expected after the production is reduced.
    pub lookahead: String,
}

impl Item {
    /// Creates a new item.
    pub fn new(prod: usize, dot: usize, lookahead: impl Into<String>) -> Self {
        Item {
            prod,
            dot,
            lookahead: lookahead.into(),
        }
    }

    /// The same item with the dot advanced one symbol; the lookahead is
    /// unchanged.
    pub fn advanced(&self) -> Item {
        Item {
            prod: self.prod,
            dot: self.dot + 1,
            lookahead: self.lookahead.clone(),
        }
    }
}

/// A deduplicated, value-compared set of items — one automaton state.
pub type ItemSet = BTreeSet<Item>;

/// FIRST sets and nullability for the non-terminals of a grammar.
///
/// Terminals need no table entry: `FIRST(t) = {t}`, handled directly in
/// [`FirstSets::first_of`].
#[derive(Debug, Clone)]
pub struct FirstSets {
    first: IndexMap<String, BTreeSet<String>>,
    nullable: IndexSet<String>,
}

impl FirstSets {
    /// Computes FIRST sets by fixed-point iteration over the productions.
    pub fn compute(grammar: &Grammar) -> FirstSets {
        let mut first: IndexMap<String, BTreeSet<String>> = grammar
            .non_terminals()
            .map(|n| (String::from(n), BTreeSet::new()))
            .collect();
        let mut nullable: IndexSet<String> = IndexSet::new();

        let mut changed = true;
        while changed {
            changed = false;
            for prod in grammar.productions() {
                let lhs = prod.lhs();
                let mut all_nullable = true;
                for sym in prod.rhs() {
                    if grammar.is_non_terminal(sym) {
                        // Clone FIRST(sym) to avoid simultaneous borrow.
                        let sym_first = first
                            .get(sym.as_str())
                            .cloned()
                            .unwrap_or_default();
                        if let Some(lhs_first) = first.get_mut(lhs) {
                            for t in sym_first {
                                if lhs_first.insert(t) {
                                    changed = true;
                                }
                            }
                        }
                        if !nullable.contains(sym.as_str()) {
                            all_nullable = false;
                            break;
                        }
                    } else {
                        if let Some(lhs_first) = first.get_mut(lhs) {
                            if lhs_first.insert(sym.clone()) {
                                changed = true;
                            }
                        }
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable && nullable.insert(String::from(lhs)) {
                    changed = true;
                }
            }
        }

        FirstSets { first, nullable }
    }

    /// The FIRST set of a non-terminal, or `None` for terminals and unknown
    /// symbols.
    pub fn first(&self, symbol: &str) -> Option<&BTreeSet<String>> {
        self.first.get(symbol)
    }

    /// Whether `symbol` can derive the empty string.
    pub fn is_nullable(&self, symbol: &str) -> bool {
        self.nullable.contains(symbol)
    }

    /// `FIRST(symbols · tail)`: the terminals that can begin `symbols`
    /// followed by the single terminal `tail`. Falls through to `tail` only
    /// when every symbol in the sequence is nullable.
    pub fn first_of(&self, symbols: &[String], tail: &str) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for sym in symbols {
            match self.first.get(sym.as_str()) {
                Some(set) => {
                    out.extend(set.iter().cloned());
                    if !self.is_nullable(sym) {
                        return out;
                    }
                }
                None => {
                    // Terminal: FIRST is the symbol itself.
                    out.insert(sym.clone());
                    return out;
                }
            }
        }
        out.insert(String::from(tail));
        out
    }
}

/// Computes the closure of an item set.
///
/// For every item `A → α • B β, a` with non-terminal `B`, adds
/// `B → • γ, b` for each production `B → γ` and each `b ∈ FIRST(β a)`,
/// repeating via a worklist until nothing new is derivable. Items with the
/// dot at the end contribute nothing here; they become reduce or accept
/// entries during table construction.
pub fn closure(
    items: &ItemSet,
    grammar: &Grammar,
    first: &FirstSets,
) -> Result<ItemSet, CanlrError> {
    let mut closed = items.clone();
    let mut pending: VecDeque<Item> = items.iter().cloned().collect();

    while let Some(item) = pending.pop_front() {
        let prod = grammar.production(item.prod)?;
        let Some(next) = prod.rhs().get(item.dot) else {
            continue;
        };
        if !grammar.is_non_terminal(next) {
            continue;
        }
        let lookaheads = first.first_of(&prod.rhs()[item.dot + 1..], &item.lookahead);
        for (index, candidate) in grammar.productions().iter().enumerate() {
            if candidate.lhs() != next.as_str() {
                continue;
            }
            for la in &lookaheads {
                let new_item = Item::new(index, 0, la.clone());
                if closed.insert(new_item.clone()) {
                    pending.push_back(new_item);
                }
            }
        }
    }
    Ok(closed)
}

/// Computes the goto set: every item of `items` whose next symbol equals
/// `symbol`, advanced one position, then closed. An empty result means the
/// state has no transition on `symbol`; that is a valid outcome, not an
/// error.
pub fn goto(
    items: &ItemSet,
    symbol: &str,
    grammar: &Grammar,
    first: &FirstSets,
) -> Result<ItemSet, CanlrError> {
    let mut moved = ItemSet::new();
    for item in items {
        let prod = grammar.production(item.prod)?;
        if prod.rhs().get(item.dot).is_some_and(|s| s.as_str() == symbol) {
            moved.insert(item.advanced());
        }
    }
    if moved.is_empty() {
        return Ok(moved);
    }
    closure(&moved, grammar, first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::END_MARKER;

    fn arithmetic() -> Grammar {
        Grammar::new(&[
            ("E", &["T", "+", "E"][..]),
            ("E", &["T"][..]),
            ("T", &["F", "*", "T"][..]),
            ("T", &["F"][..]),
            ("F", &["id"][..]),
        ])
    }

    fn initial_state(grammar: &Grammar, first: &FirstSets) -> ItemSet {
        let seed = ItemSet::from([Item::new(0, 0, END_MARKER)]);
        closure(&seed, grammar, first).unwrap()
    }

    #[test]
    fn first_sets_of_arithmetic_grammar() {
        let g = arithmetic();
        let first = FirstSets::compute(&g);
        for nt in ["E", "T", "F"] {
            let set: Vec<&str> =
                first.first(nt).unwrap().iter().map(|s| s.as_str()).collect();
            assert_eq!(set, vec!["id"], "FIRST({})", nt);
            assert!(!first.is_nullable(nt));
        }
    }

    #[test]
    fn first_of_sequence_with_nullable_prefix() {
        let g = Grammar::new(&[
            ("S", &["A", "b"][..]),
            ("A", &["a"][..]),
            ("A", &[][..]),
        ]);
        let first = FirstSets::compute(&g);
        assert!(first.is_nullable("A"));

        let seq = vec![String::from("A"), String::from("b")];
        let set = first.first_of(&seq, END_MARKER);
        let names: Vec<&str> = set.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        // Empty sequence: only the tail remains.
        let set = first.first_of(&[], END_MARKER);
        let names: Vec<&str> = set.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec![END_MARKER]);
    }

    #[test]
    fn closure_of_initial_item() {
        let g = arithmetic();
        let first = FirstSets::compute(&g);
        let state0 = initial_state(&g, &first);
        let expected = ItemSet::from([
            Item::new(0, 0, END_MARKER),
            Item::new(2, 0, "+"),
            Item::new(3, 0, "+"),
            Item::new(4, 0, "*"),
            Item::new(4, 0, "+"),
        ]);
        assert_eq!(state0, expected);
    }

    #[test]
    fn closure_is_idempotent() {
        let g = arithmetic();
        let first = FirstSets::compute(&g);
        let state0 = initial_state(&g, &first);
        assert_eq!(closure(&state0, &g, &first).unwrap(), state0);
    }

    #[test]
    fn goto_on_unmatched_symbol_is_empty() {
        let g = arithmetic();
        let first = FirstSets::compute(&g);
        let state0 = initial_state(&g, &first);
        // No item in state 0 has `+` or `*` immediately after its dot.
        assert!(goto(&state0, "+", &g, &first).unwrap().is_empty());
        assert!(goto(&state0, "*", &g, &first).unwrap().is_empty());
    }

    #[test]
    fn goto_advances_dot_and_closes() {
        let g = arithmetic();
        let first = FirstSets::compute(&g);
        let state0 = initial_state(&g, &first);
        let next = goto(&state0, "id", &g, &first).unwrap();
        let expected =
            ItemSet::from([Item::new(4, 1, "*"), Item::new(4, 1, "+")]);
        assert_eq!(next, expected);
    }

    #[test]
    fn advanced_keeps_production_and_lookahead() {
        let item = Item::new(2, 1, "+");
        let next = item.advanced();
        assert_eq!(next, Item::new(2, 2, "+"));
    }

    #[test]
    fn invalid_production_index_is_reported() {
        let g = arithmetic();
        let first = FirstSets::compute(&g);
        let bogus = ItemSet::from([Item::new(42, 0, END_MARKER)]);
        assert_eq!(
            closure(&bogus, &g, &first),
            Err(CanlrError::ProductionOutOfRange { index: 42, count: 5 })
        );
    }
}
