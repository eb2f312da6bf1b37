//! Recursive-descent parser
//!
//! Consumes the whole token stream with one token of lookahead and no
//! backtracking. Each statement is built only after all of its tokens have
//! been matched, so a returned AST never contains partial nodes.

use super::errors::{ParseResult, SyntaxError, UnexpectedToken};
use super::token::{Token, TokenKind};
use super::types::{CompareOp, Expr, Stmt};

#[cfg(test)]
mod tests;

/// Token kinds that can begin a statement
const STATEMENT_START: [TokenKind; 8] = [
    TokenKind::Load,
    TokenKind::Save,
    TokenKind::Train,
    TokenKind::Predict,
    TokenKind::Let,
    TokenKind::Set,
    TokenKind::Loop,
    TokenKind::If,
];

const EXPRESSION_START: [TokenKind; 3] =
    [TokenKind::Number, TokenKind::Identifier, TokenKind::String];

const COMPARISON: [TokenKind; 5] = [
    TokenKind::Eq,
    TokenKind::Gt,
    TokenKind::Lt,
    TokenKind::Gte,
    TokenKind::Lte,
];

/// Deepest `if`/`loop` block nesting a program may use
pub const MAX_NESTING: usize = 128;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    /// Returned once the tokens run out, in case the stream lacks its own EOF
    eof: Token,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map(|t| t.position + t.lexeme().len())
            .unwrap_or(0);
        Self {
            tokens,
            pos: 0,
            depth: 0,
            eof: Token::new(TokenKind::Eof, "", end),
        }
    }

    /// Parse the entire token stream into a program
    pub fn parse(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut program = Vec::new();
        while self.peek_kind() != TokenKind::Eof {
            program.push(self.parse_statement()?);
        }
        Ok(program)
    }

    /* ===================== Statements ===================== */

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek_kind() {
            TokenKind::Load => self.parse_load(),
            TokenKind::Save => self.parse_save(),
            TokenKind::Train => self.parse_train(),
            TokenKind::Predict => self.parse_predict(),
            TokenKind::Let => self.parse_let(),
            TokenKind::Set => self.parse_set(),
            TokenKind::Loop => self.parse_loop(),
            TokenKind::If => self.parse_if(),
            _ => Err(self.unexpected(&STATEMENT_START)),
        }
    }

    fn parse_load(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Load)?;
        let file = self.parse_file_argument()?;
        Ok(Stmt::Load { file })
    }

    fn parse_save(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Save)?;
        let file = self.parse_file_argument()?;
        Ok(Stmt::Save { file })
    }

    /// `( STRING )`
    fn parse_file_argument(&mut self) -> ParseResult<String> {
        self.expect(TokenKind::LParen)?;
        let file = self.expect(TokenKind::String)?.literal;
        self.expect(TokenKind::RParen)?;
        Ok(file)
    }

    fn parse_train(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Train)?;
        self.expect(TokenKind::LParen)?;
        let model = self.expect(TokenKind::Identifier)?.literal;
        self.expect(TokenKind::Comma)?;
        let features = self.expect(TokenKind::Identifier)?.literal;
        self.expect(TokenKind::Comma)?;
        let target = self.expect(TokenKind::Identifier)?.literal;
        self.expect(TokenKind::RParen)?;

        Ok(Stmt::Train {
            model,
            features,
            target,
        })
    }

    fn parse_predict(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Predict)?;
        self.expect(TokenKind::LParen)?;
        let model = self.expect(TokenKind::Identifier)?.literal;
        self.expect(TokenKind::Comma)?;
        let input = self.parse_number_array()?;
        self.expect(TokenKind::RParen)?;

        Ok(Stmt::Predict { model, input })
    }

    /// `[ NUMBER (, NUMBER)* ]`
    fn parse_number_array(&mut self) -> ParseResult<Vec<f64>> {
        self.expect(TokenKind::LBracket)?;
        let mut values = vec![self.parse_number()?];
        while self.peek_kind() == TokenKind::Comma {
            self.advance();
            values.push(self.parse_number()?);
        }
        self.expect(TokenKind::RBracket)?;
        Ok(values)
    }

    fn parse_let(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Let)?;
        let name = self.expect(TokenKind::Identifier)?.literal;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Stmt::Let { name, value })
    }

    fn parse_set(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Set)?;
        self.expect(TokenKind::LParen)?;
        let name = self.expect(TokenKind::Identifier)?.literal;
        self.expect(TokenKind::Comma)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        Ok(Stmt::Set { name, value })
    }

    fn parse_loop(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Loop)?;
        self.expect(TokenKind::LParen)?;
        let count = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(Stmt::Loop { count, body })
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let left = self.parse_expression()?;
        let op = self.parse_comparison()?;
        let right = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(Stmt::If {
            left,
            op,
            right,
            body,
        })
    }

    /// `{ statement* }`
    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let open = self.expect(TokenKind::LBrace)?;
        if self.depth == MAX_NESTING {
            return Err(SyntaxError::TooDeep {
                limit: MAX_NESTING,
                position: open.position,
            });
        }

        self.depth += 1;
        let body = self.parse_block_body();
        self.depth -= 1;
        body
    }

    fn parse_block_body(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        loop {
            let kind = self.peek_kind();
            if kind == TokenKind::RBrace {
                break;
            }
            if !STATEMENT_START.contains(&kind) {
                let mut expected = vec![TokenKind::RBrace];
                expected.extend_from_slice(&STATEMENT_START);
                return Err(self.unexpected(&expected));
            }
            body.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(body)
    }

    /* ===================== Expressions ===================== */

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        match self.peek_kind() {
            TokenKind::Number => Ok(Expr::LitNum {
                v: self.parse_number()?,
            }),
            TokenKind::String => {
                let token = self.advance();
                Ok(Expr::LitStr { v: token.literal })
            }
            TokenKind::Identifier => {
                let token = self.advance();
                Ok(Expr::Ident {
                    name: token.literal,
                })
            }
            _ => Err(self.unexpected(&EXPRESSION_START)),
        }
    }

    fn parse_number(&mut self) -> ParseResult<f64> {
        let token = self.expect(TokenKind::Number)?;
        token
            .literal
            .parse::<f64>()
            .map_err(|_| syntax_error(&token, &[TokenKind::Number]))
    }

    fn parse_comparison(&mut self) -> ParseResult<CompareOp> {
        let op = match self.peek_kind() {
            TokenKind::Eq => CompareOp::Eq,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::Gte => CompareOp::Gte,
            TokenKind::Lte => CompareOp::Lte,
            _ => return Err(self.unexpected(&COMPARISON)),
        };
        self.advance();
        Ok(op)
    }

    /* ===================== Token Helpers ===================== */

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it has the given kind, otherwise fail
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.peek_kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&[kind]))
        }
    }

    fn unexpected(&self, expected: &[TokenKind]) -> SyntaxError {
        syntax_error(self.current(), expected)
    }
}

fn syntax_error(found: &Token, expected: &[TokenKind]) -> SyntaxError {
    SyntaxError::Unexpected(UnexpectedToken {
        expected: expected.to_vec(),
        found: found.kind,
        literal: found.literal.clone(),
        position: found.position,
    })
}
