//! Token vocabulary shared by the lexer and parser

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Eof,

    // Delimiters
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Semicolon, // ;

    // Operators
    Assign, // =
    Eq,     // ==
    Gt,     // >
    Lt,     // <
    Gte,    // >=
    Lte,    // <=

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    Load,
    Save,
    Train,
    Predict,
    Set,
    Let,
    Loop,
    If,
}

impl TokenKind {
    /// Classify a scanned word as a keyword, if it is one
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "load" => TokenKind::Load,
            "save" => TokenKind::Save,
            "train" => TokenKind::Train,
            "predict" => TokenKind::Predict,
            "set" => TokenKind::Set,
            "let" => TokenKind::Let,
            "loop" => TokenKind::Loop,
            "if" => TokenKind::If,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Eq | TokenKind::Gt | TokenKind::Lt | TokenKind::Gte | TokenKind::Lte
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Eq => "EQ",
            TokenKind::Gt => "GT",
            TokenKind::Lt => "LT",
            TokenKind::Gte => "GTE",
            TokenKind::Lte => "LTE",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Load => "LOAD",
            TokenKind::Save => "SAVE",
            TokenKind::Train => "TRAIN",
            TokenKind::Predict => "PREDICT",
            TokenKind::Set => "SET",
            TokenKind::Let => "LET",
            TokenKind::Loop => "LOOP",
            TokenKind::If => "IF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token produced by the lexer
///
/// `literal` holds the token text as written, except for strings where the
/// surrounding quotes are stripped. `position` is the byte offset of the
/// token's first character in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            position,
        }
    }

    /// Source form of the token (strings re-quoted, EOF empty)
    pub fn lexeme(&self) -> String {
        match self.kind {
            TokenKind::String => format!("\"{}\"", self.literal),
            _ => self.literal.clone(),
        }
    }
}
