//! Parser for Yacc-like grammar notation.
//!
//! Consumes the lexer's token stream and builds the production list the
//! [`crate::grammar::GrammarStore`] is constructed from. The notation is
//!
//! ```text
//! head: sym sym ... | sym ...
//! next_head: ...
//! ```
//!
//! A word followed by `:` opens a new production, so one token of lookahead
//! is enough to find production boundaries. All-uppercase keywords are
//! recorded as quoted literal symbols (they are emitted verbatim when
//! statements are rendered); every other word is recorded as a reference to
//! another production. Empty alternatives are legal and render to nothing.

use std::mem;

use crate::errors::{to_source_span, EnumError, ErrorKind, ErrorReporting, Reporter, SourceContext};
use crate::grammar::{Alternative, Production, Symbol};
use crate::lexer::{Lexer, Token, TokenKind, ALTERNATE, DEFINE};

/// Parse grammar text into an ordered production list.
pub fn parse_grammar(
    source: &str,
    context: SourceContext,
) -> Result<Vec<Production>, EnumError> {
    let reporter = Reporter::new(context, "parse");
    let mut tokens = TokenCursor::new(Lexer::new(source));

    if tokens.current.kind == TokenKind::EndOfInput {
        return Err(reporter.report(
            ErrorKind::EmptyGrammar,
            to_source_span(tokens.current.span),
        ));
    }

    let mut productions = Vec::new();
    while tokens.current.kind != TokenKind::EndOfInput {
        productions.push(parse_production(&mut tokens, &reporter)?);
    }
    Ok(productions)
}

/// One-token-lookahead cursor over the lexer's pull stream.
struct TokenCursor<'src> {
    lexer: Lexer<'src>,
    current: Token,
    next: Token,
}

impl<'src> TokenCursor<'src> {
    fn new(mut lexer: Lexer<'src>) -> Self {
        let current = lexer.next_token();
        let next = lexer.next_token();
        Self {
            lexer,
            current,
            next,
        }
    }

    fn bump(&mut self) -> Token {
        let upcoming = self.lexer.next_token();
        mem::replace(&mut self.current, mem::replace(&mut self.next, upcoming))
    }

    /// True when the current token begins the next production: a word
    /// immediately followed by `:`.
    fn at_production_start(&self) -> bool {
        matches!(
            (&self.current.kind, &self.next.kind),
            (
                TokenKind::Terminal(_) | TokenKind::Reference(_),
                TokenKind::Operator(DEFINE),
            )
        )
    }
}

fn parse_production(
    tokens: &mut TokenCursor,
    reporter: &Reporter,
) -> Result<Production, EnumError> {
    let head = match &tokens.current.kind {
        TokenKind::Terminal(word) | TokenKind::Reference(word) => {
            Symbol::new(word.clone(), tokens.current.span)
        }
        other => {
            return Err(reporter.unexpected_token(
                "a production name",
                &other.describe(),
                to_source_span(tokens.current.span),
            ))
        }
    };
    tokens.bump();

    match &tokens.current.kind {
        TokenKind::Operator(op) if *op == DEFINE => {
            tokens.bump();
        }
        other => {
            return Err(reporter.unexpected_token(
                "':'",
                &other.describe(),
                to_source_span(tokens.current.span),
            ))
        }
    }

    let mut alternatives = Vec::new();
    let mut items = Vec::new();
    loop {
        if tokens.at_production_start() || tokens.current.kind == TokenKind::EndOfInput {
            alternatives.push(Alternative::new(mem::take(&mut items)));
            break;
        }
        match &tokens.current.kind {
            TokenKind::Operator(op) if *op == ALTERNATE => {
                alternatives.push(Alternative::new(mem::take(&mut items)));
                tokens.bump();
            }
            TokenKind::Operator(_) => {
                return Err(reporter.unexpected_token(
                    "a symbol or '|'",
                    &tokens.current.kind.describe(),
                    to_source_span(tokens.current.span),
                ))
            }
            TokenKind::Terminal(word) => {
                // Keywords are emitted verbatim: record them as quoted
                // literals so the tree compiler renders them directly.
                items.push(Symbol::new(format!("'{}'", word), tokens.current.span));
                tokens.bump();
            }
            TokenKind::Reference(word) => {
                items.push(Symbol::new(word.clone(), tokens.current.span));
                tokens.bump();
            }
            // Handled by the break above.
            TokenKind::EndOfInput => unreachable!("end of input inside production body"),
        }
    }

    Ok(Production { head, alternatives })
}
