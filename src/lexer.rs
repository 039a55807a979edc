//! Lexer for Yacc-like grammar notation.
//!
//! Converts grammar text into typed tokens: the two structural operators
//! (`:` introduces a production body, `|` separates alternatives), bare
//! words, and end of input. Classification is purely lexical: a word made
//! only of uppercase letters is a [`TokenKind::Terminal`] (a keyword emitted
//! verbatim downstream), any other word is a [`TokenKind::Reference`].
//! Quoted spans are not a token type; quoting is interpreted later by the
//! tree compiler on raw symbol text.

use serde::{Deserialize, Serialize};

use crate::grammar::Span;

/// The two structural operator characters.
pub const DEFINE: char = ':';
pub const ALTERNATE: char = '|';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    /// End of the grammar text. Emitted forever once reached.
    EndOfInput,
    /// One of the two structural punctuation marks, `:` or `|`.
    Operator(char),
    /// An all-uppercase bare word: a lexical keyword.
    Terminal(String),
    /// Any other bare word: a production name to be expanded.
    Reference(String),
}

impl TokenKind {
    /// Short description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::EndOfInput => "end of input".to_string(),
            TokenKind::Operator(op) => format!("'{}'", op),
            TokenKind::Terminal(word) | TokenKind::Reference(word) => format!("'{}'", word),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Pull-based, non-restartable token source over an in-memory char stream.
///
/// The stream is finite and fused: after the first [`TokenKind::EndOfInput`]
/// every further call to [`Lexer::next_token`] yields `EndOfInput` again.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token {
                kind: TokenKind::EndOfInput,
                span: Span::new(start, start),
            };
        };

        if is_operator(c) {
            self.bump(c);
            return Token {
                kind: TokenKind::Operator(c),
                span: Span::new(start, self.pos),
            };
        }

        // Maximal run of characters that are neither whitespace nor operators.
        while let Some(c) = self.peek() {
            if c.is_whitespace() || is_operator(c) {
                break;
            }
            self.bump(c);
        }
        let word = &self.source[start..self.pos];
        let kind = if all_uppercase(word) {
            TokenKind::Terminal(word.to_string())
        } else {
            TokenKind::Reference(word.to_string())
        };
        Token {
            kind,
            span: Span::new(start, self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump(c);
        }
    }
}

fn is_operator(c: char) -> bool {
    c == DEFINE || c == ALTERNATE
}

fn all_uppercase(word: &str) -> bool {
    word.chars().all(|c| c.is_uppercase())
}

/// Collect every token up to and including the terminating `EndOfInput`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::EndOfInput;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn classifies_words_and_operators() {
        assert_eq!(
            kinds("stmt: SELECT name | 'X'"),
            vec![
                TokenKind::Reference("stmt".into()),
                TokenKind::Operator(':'),
                TokenKind::Terminal("SELECT".into()),
                TokenKind::Reference("name".into()),
                TokenKind::Operator('|'),
                TokenKind::Reference("'X'".into()),
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn mixed_case_is_a_reference() {
        assert_eq!(kinds("Select"), vec![
            TokenKind::Reference("Select".into()),
            TokenKind::EndOfInput,
        ]);
        // A quoted all-caps word is still a reference at this layer; the
        // quote character is not an uppercase letter.
        assert_eq!(kinds("'IF'"), vec![
            TokenKind::Reference("'IF'".into()),
            TokenKind::EndOfInput,
        ]);
    }

    #[test]
    fn operators_bind_tightly_to_words() {
        assert_eq!(
            kinds("a:b|c"),
            vec![
                TokenKind::Reference("a".into()),
                TokenKind::Operator(':'),
                TokenKind::Reference("b".into()),
                TokenKind::Operator('|'),
                TokenKind::Reference("c".into()),
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn end_of_input_is_fused() {
        let mut lexer = Lexer::new("  word  ");
        assert_eq!(lexer.next_token().kind, TokenKind::Reference("word".into()));
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
    }

    #[test]
    fn spans_cover_the_lexed_text() {
        let tokens = tokenize("ab |");
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[1].span, Span::new(3, 4));
    }
}
