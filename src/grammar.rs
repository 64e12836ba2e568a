//! Context-free grammar representation.
//!
//! A [`Grammar`] is built once from an ordered list of productions and is
//! immutable afterwards. The classification of symbols is derived, not
//! declared: every left-hand symbol is a non-terminal, everything else that
//! appears on a right-hand side is a terminal, and the reserved end-of-input
//! marker [`END_MARKER`] is always a terminal.

use crate::error::CanlrError;
use indexmap::IndexSet;
use smartstring::alias::String;
use std::io::{self, Write};

/// The reserved end-of-input marker appended to every token sequence.
pub const END_MARKER: &str = "$";

/// A single production: a left-hand non-terminal and an ordered right-hand
/// symbol sequence. An empty right-hand side is an ε-production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    lhs: String,
    rhs: Vec<String>,
}

impl Production {
    /// The left-hand non-terminal.
    pub fn lhs(&self) -> &str {
        &self.lhs
    }

    /// The right-hand symbol sequence.
    pub fn rhs(&self) -> &[String] {
        &self.rhs
    }
}

/// An immutable production set with derived terminal/non-terminal sets.
///
/// Both sets keep first-appearance order, so iterating [`Grammar::symbols`]
/// is deterministic and two identical grammars number automaton states
/// identically.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    non_terminals: IndexSet<String>,
    terminals: IndexSet<String>,
}

impl Grammar {
    /// Builds a grammar from `(lhs, rhs)` pairs. Production order is
    /// significant: production 0 seeds the automaton, and reductions are
    /// reported by production index.
    pub fn new(productions: &[(&str, &[&str])]) -> Self {
        let productions: Vec<Production> = productions
            .iter()
            .map(|(lhs, rhs)| Production {
                lhs: String::from(*lhs),
                rhs: rhs.iter().map(|s| String::from(*s)).collect(),
            })
            .collect();

        let non_terminals: IndexSet<String> =
            productions.iter().map(|p| p.lhs.clone()).collect();

        let mut terminals = IndexSet::new();
        for prod in &productions {
            for sym in &prod.rhs {
                if !non_terminals.contains(sym.as_str()) {
                    terminals.insert(sym.clone());
                }
            }
        }
        terminals.insert(String::from(END_MARKER));

        Grammar {
            productions,
            non_terminals,
            terminals,
        }
    }

    /// Looks up a production by index.
    pub fn production(&self, index: usize) -> Result<&Production, CanlrError> {
        self.productions
            .get(index)
            .ok_or(CanlrError::ProductionOutOfRange {
                index,
                count: self.productions.len(),
            })
    }

    /// All productions, in declaration order.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// The left-hand symbol of production 0, or `None` for an empty grammar.
    pub fn start_symbol(&self) -> Option<&str> {
        self.productions.first().map(|p| p.lhs())
    }

    /// Whether `symbol` appears as a left-hand side.
    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    /// The non-terminal symbols, in first-appearance order.
    pub fn non_terminals(&self) -> impl Iterator<Item = &str> + '_ {
        self.non_terminals.iter().map(|s| s.as_str())
    }

    /// The terminal symbols, in first-appearance order, ending with the
    /// symbols only reachable via [`END_MARKER`] insertion.
    pub fn terminals(&self) -> impl Iterator<Item = &str> + '_ {
        self.terminals.iter().map(|s| s.as_str())
    }

    /// Every grammar symbol: non-terminals first, then terminals.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.non_terminals().chain(self.terminals())
    }

    /// Writes the production list in a compact diagnostic form:
    ///
    /// ```text
    /// PS,<number of productions>
    ///
    /// P,<index>,<LHS> -> <RHS symbols>
    /// ```
    pub fn write_productions<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "PS,{}\n", self.productions.len())?;
        for (i, prod) in self.productions.iter().enumerate() {
            write!(out, "P,{},{} ->", i, prod.lhs)?;
            for sym in &prod.rhs {
                write!(out, " {}", sym)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic() -> Grammar {
        Grammar::new(&[
            ("E", &["T", "+", "E"][..]),
            ("E", &["T"][..]),
            ("T", &["F", "*", "T"][..]),
            ("T", &["F"][..]),
            ("F", &["id"][..]),
        ])
    }

    #[test]
    fn test_symbol_classification() {
        let g = arithmetic();
        let nts: Vec<&str> = g.non_terminals().collect();
        let ts: Vec<&str> = g.terminals().collect();
        assert_eq!(nts, vec!["E", "T", "F"]);
        assert_eq!(ts, vec!["+", "*", "id", END_MARKER]);
    }

    #[test]
    fn test_end_marker_is_never_a_non_terminal() {
        let g = arithmetic();
        assert!(!g.is_non_terminal(END_MARKER));
        assert!(g.terminals().any(|t| t == END_MARKER));
    }

    #[test]
    fn test_terminals_and_non_terminals_partition_symbols() {
        let g = arithmetic();
        for sym in g.symbols() {
            let nt = g.is_non_terminal(sym);
            let t = g.terminals().any(|x| x == sym);
            assert!(nt != t, "symbol {} must be in exactly one set", sym);
        }
    }

    #[test]
    fn test_production_lookup() {
        let g = arithmetic();
        let p = g.production(4).unwrap();
        assert_eq!(p.lhs(), "F");
        assert_eq!(p.rhs(), &["id"]);
    }

    #[test]
    fn test_production_lookup_out_of_range() {
        let g = arithmetic();
        assert_eq!(
            g.production(9),
            Err(CanlrError::ProductionOutOfRange { index: 9, count: 5 })
        );
    }

    #[test]
    fn test_start_symbol() {
        assert_eq!(arithmetic().start_symbol(), Some("E"));
        assert_eq!(Grammar::new(&[]).start_symbol(), None);
    }

    #[test]
    fn test_write_productions_format() {
        let g = arithmetic();
        let mut buf = Vec::new();
        g.write_productions(&mut buf).unwrap();
        let text = std::string::String::from_utf8(buf).unwrap();
        assert!(text.starts_with("PS,5\n"));
        assert!(text.contains("P,0,E -> T + E\n"));
        assert!(text.contains("P,4,F -> id\n"));
    }
}
