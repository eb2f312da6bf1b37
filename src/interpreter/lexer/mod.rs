//! Lexer - turns source text into tokens, one at a time
//!
//! The cursor only moves forward. Once the input is exhausted every further
//! call returns an EOF token positioned at the end of the input.

use super::errors::{LexError, LexResult};
use super::token::{Token, TokenKind};


pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", self.input.len()));
        };

        if is_ident_start(ch) {
            let word = self.read_while(is_ident_continue);
            let kind = TokenKind::keyword(word).unwrap_or(TokenKind::Identifier);
            return Ok(Token::new(kind, word, start));
        }

        if ch.is_ascii_digit() {
            return self.read_number(start);
        }

        if ch == b'"' {
            return self.read_string(start);
        }

        // Two-character operators must be tried before their one-character prefixes
        let two = match self.input.get(start..start + 2) {
            Some("==") => Some(TokenKind::Eq),
            Some(">=") => Some(TokenKind::Gte),
            Some("<=") => Some(TokenKind::Lte),
            _ => None,
        };
        if let Some(kind) = two {
            self.pos += 2;
            return Ok(Token::new(kind, &self.input[start..start + 2], start));
        }

        let kind = match ch {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'=' => TokenKind::Assign,
            b'>' => TokenKind::Gt,
            b'<' => TokenKind::Lt,
            _ => {
                let character = self.input[start..].chars().next().unwrap_or('\0');
                return Err(LexError::UnexpectedCharacter {
                    character,
                    position: start,
                });
            }
        };
        self.pos += 1;
        Ok(Token::new(kind, &self.input[start..start + 1], start))
    }

    /// Current byte offset of the cursor
    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        self.read_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    }

    fn read_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn read_number(&mut self, start: usize) -> LexResult<Token> {
        let literal = self.read_while(|b| b.is_ascii_digit() || b == b'.');

        // At most one decimal point, and it must be followed by digits
        if literal.matches('.').count() > 1 || literal.ends_with('.') {
            return Err(LexError::MalformedNumber {
                literal: literal.to_string(),
                position: start,
            });
        }

        Ok(Token::new(TokenKind::Number, literal, start))
    }

    fn read_string(&mut self, start: usize) -> LexResult<Token> {
        self.pos += 1; // opening quote
        let content = self.read_while(|b| b != b'"');
        if self.peek().is_none() {
            return Err(LexError::UnterminatedString { position: start });
        }
        self.pos += 1; // closing quote
        Ok(Token::new(TokenKind::String, content, start))
    }
}

/// Lex the whole input, including the trailing EOF token
pub fn tokenize(input: &str) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// Convert a byte offset into a 1-based (line, column) pair
pub fn line_col(source: &str, position: usize) -> (usize, usize) {
    let end = position.min(source.len());
    let before = source.get(..end).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
