//! Statement enumeration.
//!
//! [`statements`] compiles a start production against a [`GrammarStore`] and
//! returns a [`Statements`] iterator: a lazy, deterministic, finite sequence
//! of rendered strings, one per distinct combination of alternative choices.
//! The first statement is the all-first-choice combination; each following
//! call advances the rightmost-varying part of the tree first, and the
//! sequence ends exactly when the counter wraps back to its initial
//! combination.

use crate::errors::EnumError;
use crate::grammar::GrammarStore;
use crate::tree::{self, Alternation};

/// Peek state of the two-call protocol. The three states are explicit so the
/// coupling between "has a next statement been computed" and "is there one"
/// cannot be misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Peek {
    /// The current combination has not been consumed yet.
    Ready,
    /// The counter must be advanced to learn whether anything remains.
    NotPeeked,
    /// The counter wrapped to its initial combination; nothing remains.
    Exhausted,
}

/// Pull-based statement sequence. Stateful single-consumer iterator; not
/// thread-safe by design.
#[derive(Debug)]
pub struct Statements {
    root: Alternation,
    state: Peek,
}

impl Statements {
    /// Whether another statement remains. Idempotent: repeated calls without
    /// an intervening [`Statements::next_statement`] advance the counter at
    /// most once.
    pub fn has_next(&mut self) -> bool {
        if self.state == Peek::NotPeeked {
            self.state = if self.root.advance() {
                Peek::Exhausted
            } else {
                Peek::Ready
            };
        }
        self.state == Peek::Ready
    }

    /// Render the current combination into a fresh buffer. Requesting a
    /// statement after the sequence is exhausted is a usage error.
    pub fn next_statement(&mut self) -> Result<String, EnumError> {
        if !self.has_next() {
            return Err(EnumError::exhausted());
        }
        let mut out = String::new();
        self.root.render(&mut out);
        self.state = Peek::NotPeeked;
        Ok(out)
    }
}

impl Iterator for Statements {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.has_next() {
            self.next_statement().ok()
        } else {
            None
        }
    }
}

/// Compile `start` against the store and return the statement sequence.
///
/// Compilation, pruning, and the post-prune invariant check all happen here;
/// any grammar defect (missing production, no finite derivation) aborts the
/// session before the first statement is produced. The store is borrowed
/// read-only, so independent sessions can share one store.
pub fn statements(store: &GrammarStore, start: &str) -> Result<Statements, EnumError> {
    let root = tree::compile(store, start)?;
    Ok(Statements {
        root,
        state: Peek::Ready,
    })
}
