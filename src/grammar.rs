//! Grammar data model for enumgram.
//!
//! A grammar is a set of named productions, each with one or more ordered
//! alternatives; an alternative is an ordered list of symbols. A symbol is
//! either a quoted literal (rendered verbatim, quotes stripped) or a bare
//! name referencing another production. The [`GrammarStore`] is the read-only
//! lookup the tree compiler expands against; it is built exactly once per
//! generation session and never mutated afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{to_source_span, EnumError, ErrorKind, ErrorReporting, Reporter, SourceContext};

/// A byte-offset span in the grammar source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// One symbol of an alternative, with the span it was read from.
///
/// Quoting is interpreted here rather than in the lexer: a symbol whose text
/// is delimited by single quotes is a literal, everything else is a
/// production reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub text: String,
    pub span: Span,
}

impl Symbol {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    /// The literal text this symbol renders to, if it is a quoted literal.
    /// Returns `None` for production references.
    pub fn literal_text(&self) -> Option<&str> {
        if self.text.len() >= 2 && self.text.starts_with('\'') && self.text.ends_with('\'') {
            Some(self.text.trim_matches('\''))
        } else {
            None
        }
    }
}

/// One expansion option for a production: an ordered symbol sequence.
/// An empty alternative is legal and renders to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Alternative {
    pub items: Vec<Symbol>,
}

impl Alternative {
    pub fn new(items: Vec<Symbol>) -> Self {
        Self { items }
    }
}

/// A named grammar rule with one or more ordered alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Production {
    pub head: Symbol,
    pub alternatives: Vec<Alternative>,
}

/// Read-only mapping from production name to its definition.
///
/// Never a process-wide global: the store is an explicitly constructed value
/// passed into compilation, so independent generation sessions (including
/// parallel tests) cannot interfere with each other. Once built it is
/// immutable and safe to share between sessions.
#[derive(Debug, Clone)]
pub struct GrammarStore {
    productions: HashMap<String, Production>,
    source: SourceContext,
}

impl GrammarStore {
    /// Build a store from an in-memory production list. Duplicate head names
    /// are a load-time error; the session cannot start.
    pub fn build(
        productions: Vec<Production>,
        source: SourceContext,
    ) -> Result<Self, EnumError> {
        let reporter = Reporter::new(source.clone(), "store");
        let mut map: HashMap<String, Production> = HashMap::with_capacity(productions.len());
        for production in productions {
            if let Some(original) = map.get(&production.head.text) {
                return Err(reporter.report(
                    ErrorKind::DuplicateProduction {
                        head: production.head.text.clone(),
                        original_location: to_source_span(original.head.span),
                    },
                    to_source_span(production.head.span),
                ));
            }
            map.insert(production.head.text.clone(), production);
        }
        Ok(Self {
            productions: map,
            source,
        })
    }

    /// Lex and parse grammar text, then build the store from it.
    pub fn from_source(name: &str, text: &str) -> Result<Self, EnumError> {
        let context = SourceContext::from_source(name, text);
        let productions = crate::parser::parse_grammar(text, context.clone())?;
        Self::build(productions, context)
    }

    pub fn get(&self, name: &str) -> Option<&Production> {
        self.productions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.productions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// The source context grammar errors are rendered against.
    pub fn source(&self) -> &SourceContext {
        &self.source
    }
}
