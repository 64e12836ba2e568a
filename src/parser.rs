//! The shift/reduce driver.
//!
//! A [`Parser`] walks an [`ActionTable`] over a terminal sequence with the
//! end-of-input marker appended. It keeps a state stack and a symbol stack
//! whose zip is the classic alternating parse stack: reducing production `p`
//! pops `|rhs(p)|` entries from each. Rejection is a normal outcome; only a
//! malformed table (missing goto, impossible pop) is an error.

use crate::error::CanlrError;
use crate::grammar::{Grammar, END_MARKER};
use crate::table::{Action, ActionTable};
use smartstring::alias::String;

/// Counters accumulated over a single parse run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Input tokens examined, including the end-of-input marker.
    pub tokens: usize,
    /// Shift transitions taken.
    pub shifts: usize,
    /// Reductions applied.
    pub reductions: usize,
}

/// The result of a parse run: the verdict plus run counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Whether the input was accepted.
    pub accepted: bool,
    /// Transition counters for the run.
    pub stats: ParserStats,
}

/// One observed transition, handed to the trace callback before the action
/// is applied. Purely observational; dropping every step changes nothing.
#[derive(Debug)]
pub struct TraceStep<'a> {
    /// The state stack, bottom first. Always one longer than `symbols`.
    pub states: &'a [usize],
    /// The matched-symbol stack, bottom first.
    pub symbols: &'a [String],
    /// The unconsumed input, current token first, `$` last.
    pub remaining: &'a [String],
    /// The action about to be applied.
    pub action: Action,
}

impl TraceStep<'_> {
    /// Renders the two stacks interleaved, e.g. `<0> id <4> + <7>`.
    pub fn stack_display(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("<{}>", self.states[0]));
        for (sym, state) in self.symbols.iter().zip(&self.states[1..]) {
            out.push_str(&format!(" {} <{}>", sym, state));
        }
        out
    }
}

/// A stack machine over a grammar and its prebuilt action table.
pub struct Parser<'a> {
    grammar: &'a Grammar,
    table: &'a ActionTable,
}

impl<'a> Parser<'a> {
    /// Creates a driver over `grammar` and its `table`.
    pub fn new(grammar: &'a Grammar, table: &'a ActionTable) -> Self {
        Parser { grammar, table }
    }

    /// Whether `tokens` is derivable from the grammar's start production.
    pub fn accepts(&self, tokens: &[&str]) -> Result<bool, CanlrError> {
        Ok(self.parse(tokens)?.accepted)
    }

    /// Parses `tokens`, returning the verdict and run counters.
    pub fn parse(&self, tokens: &[&str]) -> Result<ParseOutcome, CanlrError> {
        self.parse_with(tokens, |_| {})
    }

    /// Parses `tokens`, invoking `trace` once per transition.
    pub fn parse_with<F>(&self, tokens: &[&str], mut trace: F) -> Result<ParseOutcome, CanlrError>
    where
        F: FnMut(&TraceStep<'_>),
    {
        let mut input: Vec<String> = tokens.iter().map(|t| String::from(*t)).collect();
        input.push(String::from(END_MARKER));

        let mut states: Vec<usize> = vec![0];
        let mut symbols: Vec<String> = Vec::new();
        let mut stats = ParserStats::default();
        let mut cursor = 0;

        loop {
            let state = states[states.len() - 1];
            let token = &input[cursor];

            let Some(action) = self.table.action(state, token) else {
                stats.tokens = cursor + 1;
                log::debug!("rejected: no action in state {} for `{}`", state, token);
                return Ok(ParseOutcome {
                    accepted: false,
                    stats,
                });
            };

            let step = TraceStep {
                states: &states,
                symbols: &symbols,
                remaining: &input[cursor..],
                action,
            };
            if log::log_enabled!(log::Level::Trace) {
                log::trace!(
                    "{}  |  {}  |  {}",
                    step.stack_display(),
                    step.remaining.join(" "),
                    step.action
                );
            }
            trace(&step);

            match action {
                Action::Shift(next) => {
                    let token = token.clone();
                    symbols.push(token);
                    states.push(next);
                    cursor += 1;
                    stats.shifts += 1;
                }

                Action::Reduce(prod) => {
                    let production = self.grammar.production(prod)?;
                    let len = production.rhs().len();
                    if symbols.len() < len {
                        return Err(CanlrError::StackUnderflow {
                            state,
                            production: prod,
                        });
                    }
                    symbols.truncate(symbols.len() - len);
                    states.truncate(states.len() - len);

                    let exposed = states[states.len() - 1];
                    let lhs = production.lhs();
                    match self.table.action(exposed, lhs) {
                        Some(Action::Goto(next)) => {
                            symbols.push(String::from(lhs));
                            states.push(next);
                        }
                        _ => {
                            return Err(CanlrError::MissingGoto {
                                state: exposed,
                                symbol: String::from(lhs),
                            });
                        }
                    }
                    stats.reductions += 1;
                }

                Action::Accept => {
                    stats.tokens = cursor + 1;
                    return Ok(ParseOutcome {
                        accepted: true,
                        stats,
                    });
                }

                // A goto keyed by an input token means the caller handed us a
                // non-terminal; not derivable, not an internal error.
                Action::Goto(_) => {
                    stats.tokens = cursor + 1;
                    log::debug!("rejected: non-terminal `{}` in input", token);
                    return Ok(ParseOutcome {
                        accepted: false,
                        stats,
                    });
                }
            }
        }
    }
}
