//! enumgram: grammar-driven exhaustive statement generation.
//!
//! Given a context-free grammar in Yacc-like notation and a start
//! production, enumgram compiles the reachable grammar into a finite tree
//! (bounding recursion depth per path) and lazily enumerates every
//! syntactically distinct statement derivable from it, in a fixed
//! deterministic order. Typical use is corpus generation for differential
//! testing: feed each statement to two implementations of a language and
//! compare what they do with it.

pub use crate::errors::{EnumError, ErrorCategory, ErrorKind, ErrorReporting, SourceContext};

pub mod cli;
pub mod errors;
pub mod generator;
pub mod grammar;
pub mod lexer;
pub mod parser;
mod tree;

pub use crate::generator::{statements, Statements};
pub use crate::grammar::{Alternative, GrammarStore, Production, Span, Symbol};
pub use crate::lexer::{tokenize, Lexer, Token, TokenKind};
pub use crate::parser::parse_grammar;
