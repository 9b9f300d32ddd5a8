//! Lexer and parser for the shell's expression language.
//!
//! ```text
//! stmt    := IDENT '=' expr | expr
//! expr    := term (('+' | '-') term)*
//! term    := unary ('*' unary)*
//! unary   := '-' unary | postfix
//! postfix := primary ('.' IDENT ('(' args ')')?)*
//! primary := NUMBER | STRING | 'nil' | 'true' | 'false'
//!          | IDENT ('(' args ')')? | '(' expr ')'
//! ```
//!
//! `#` starts a comment that runs to the end of the line.

use mtx_host::{Number, Opcode};
use num_bigint::BigInt;
use num_rational::BigRational;
use thiserror::Error;

/// A parse failure, with the byte offset where it was detected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message} at column {}", .offset + 1)]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Byte offset into the input line.
    pub offset: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// An expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// `nil`.
    Nil,
    /// `true` or `false`.
    Bool(bool),
    /// A numeric literal.
    Number(Number),
    /// A string literal.
    Str(String),
    /// A global variable.
    Var(String),
    /// `f(a, b)`.
    Call(String, Vec<Expr>),
    /// `target.name`.
    Member(Box<Expr>, String),
    /// `target.name(a, b)`.
    MethodCall(Box<Expr>, String, Vec<Expr>),
    /// `lhs op rhs`.
    Binary(Opcode, Box<Expr>, Box<Expr>),
    /// `-operand`.
    Negate(Box<Expr>),
}

/// A statement: one line of input.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `name = expr`.
    Assign(String, Expr),
    /// A bare expression whose value is printed.
    Expr(Expr),
}

#[derive(Clone, Debug, PartialEq)]
enum TokenKind {
    Ident(String),
    Int(BigInt),
    Float(f64),
    Str(String),
    Plus,
    Minus,
    Star,
    Dot,
    Comma,
    Equals,
    LParen,
    RParen,
    Eof,
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

struct Lexer<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.eat_while(char::is_whitespace);
            let offset = self.pos;
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    offset,
                });
                return Ok(tokens);
            };
            let kind = match c {
                '#' => {
                    self.eat_while(|c| c != '\n');
                    continue;
                }
                '0'..='9' => self.number(offset)?,
                '"' => self.string(offset)?,
                c if c.is_alphabetic() || c == '_' => {
                    let ident = self.eat_while(|c| c.is_alphanumeric() || c == '_');
                    TokenKind::Ident(ident.to_string())
                }
                _ => {
                    self.bump();
                    match c {
                        '+' => TokenKind::Plus,
                        '-' => TokenKind::Minus,
                        '*' => TokenKind::Star,
                        '.' => TokenKind::Dot,
                        ',' => TokenKind::Comma,
                        '=' => TokenKind::Equals,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        other => {
                            return Err(ParseError::new(
                                format!("unexpected character `{other}`"),
                                offset,
                            ))
                        }
                    }
                }
            };
            tokens.push(Token { kind, offset });
        }
    }

    fn number(&mut self, offset: usize) -> Result<TokenKind, ParseError> {
        self.eat_while(|c| c.is_ascii_digit());
        let rest = &self.src[self.pos..];
        let is_decimal = rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit());
        if is_decimal {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
            let text = &self.src[offset..self.pos];
            return text
                .parse()
                .map(TokenKind::Float)
                .map_err(|_| ParseError::new(format!("invalid number `{text}`"), offset));
        }
        let text = &self.src[offset..self.pos];
        text.parse()
            .map(TokenKind::Int)
            .map_err(|_| ParseError::new(format!("invalid number `{text}`"), offset))
    }

    fn string(&mut self, offset: usize) -> Result<TokenKind, ParseError> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(TokenKind::Str(text)),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(c @ ('"' | '\\')) => text.push(c),
                    _ => return Err(ParseError::new("invalid escape in string", offset)),
                },
                Some(c) => text.push(c),
                None => return Err(ParseError::new("unterminated string", offset)),
            }
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)].kind
    }

    fn offset(&self) -> usize {
        let last = self.tokens.len() - 1;
        self.tokens[self.pos.min(last)].offset
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(ParseError::new(format!("expected {what}"), self.offset()))
        }
    }

    fn stmt(&mut self) -> Result<Stmt, ParseError> {
        let stmt = match (self.peek_at(0), self.peek_at(1)) {
            (TokenKind::Ident(name), TokenKind::Equals) => {
                let name = name.clone();
                self.pos += 2;
                Stmt::Assign(name, self.expr()?)
            }
            _ => Stmt::Expr(self.expr()?),
        };
        if *self.peek() != TokenKind::Eof {
            return Err(ParseError::new("unexpected input", self.offset()));
        }
        Ok(stmt)
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => Opcode::Add,
                TokenKind::Minus => Opcode::Subtract,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        while self.eat(&TokenKind::Star) {
            let rhs = self.unary()?;
            lhs = Expr::Binary(Opcode::Multiply, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Minus) {
            return Ok(Expr::Negate(Box::new(self.unary()?)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        while self.eat(&TokenKind::Dot) {
            let offset = self.offset();
            let TokenKind::Ident(name) = self.advance() else {
                return Err(ParseError::new("expected a member name after `.`", offset));
            };
            expr = if self.eat(&TokenKind::LParen) {
                let args = self.args()?;
                Expr::MethodCall(Box::new(expr), name, args)
            } else {
                Expr::Member(Box::new(expr), name)
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let offset = self.offset();
        match self.advance() {
            TokenKind::Int(n) => Ok(Expr::Number(Number::Rational(BigRational::from_integer(n)))),
            TokenKind::Float(x) => Ok(Expr::Number(Number::Float(x))),
            TokenKind::Str(s) => Ok(Expr::Str(s)),
            TokenKind::Ident(name) => {
                if let Some(literal) = keyword(&name) {
                    Ok(literal)
                } else if self.eat(&TokenKind::LParen) {
                    Ok(Expr::Call(name, self.args()?))
                } else {
                    Ok(Expr::Var(name))
                }
            }
            TokenKind::LParen => {
                let expr = self.expr()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(expr)
            }
            TokenKind::Eof => Err(ParseError::new("unexpected end of input", offset)),
            _ => Err(ParseError::new("expected an expression", offset)),
        }
    }

    /// Arguments after an opening parenthesis, through the closing one.
    fn args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat(&TokenKind::RParen) {
                return Ok(args);
            }
            self.expect(&TokenKind::Comma, "`,` or `)`")?;
        }
    }
}

fn keyword(name: &str) -> Option<Expr> {
    match name {
        "nil" => Some(Expr::Nil),
        "true" => Some(Expr::Bool(true)),
        "false" => Some(Expr::Bool(false)),
        _ => None,
    }
}

/// Parses one line. Returns `None` for a blank or comment-only line.
pub fn parse_line(line: &str) -> Result<Option<Stmt>, ParseError> {
    let tokens = Lexer::new(line).tokenize()?;
    if tokens.len() == 1 {
        return Ok(None);
    }
    Parser { tokens, pos: 0 }.stmt().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Stmt {
        parse_line(line).unwrap().unwrap()
    }

    fn int(n: i64) -> Expr {
        Expr::Number(Number::integer(n))
    }

    #[test]
    fn test_large_integer_stays_exact() {
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(
            parse("123456789012345678901234567890"),
            Stmt::Expr(Expr::Number(Number::Rational(BigRational::from_integer(big))))
        );
    }

    #[test]
    fn test_call_and_assignment() {
        assert_eq!(
            parse("m = mat(2, 3)"),
            Stmt::Assign("m".into(), Expr::Call("mat".into(), vec![int(2), int(3)]))
        );
    }

    #[test]
    fn test_precedence() {
        let expected = Expr::Binary(
            Opcode::Add,
            Box::new(Expr::Var("a".into())),
            Box::new(Expr::Binary(
                Opcode::Multiply,
                Box::new(Expr::Var("b".into())),
                Box::new(Expr::Var("c".into())),
            )),
        );
        assert_eq!(parse("a + b * c"), Stmt::Expr(expected));
    }

    #[test]
    fn test_left_associative() {
        let Stmt::Expr(Expr::Binary(Opcode::Subtract, lhs, rhs)) = parse("a - b - c") else {
            panic!("expected a subtraction");
        };
        assert!(matches!(*lhs, Expr::Binary(Opcode::Subtract, _, _)));
        assert_eq!(*rhs, Expr::Var("c".into()));
    }

    #[test]
    fn test_members_and_methods() {
        assert_eq!(
            parse("m.rows"),
            Stmt::Expr(Expr::Member(Box::new(Expr::Var("m".into())), "rows".into()))
        );
        assert_eq!(
            parse("ident(2).get(1, 1)"),
            Stmt::Expr(Expr::MethodCall(
                Box::new(Expr::Call("ident".into(), vec![int(2)])),
                "get".into(),
                vec![int(1), int(1)],
            ))
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("2.5"), Stmt::Expr(Expr::Number(Number::Float(2.5))));
        assert_eq!(parse("\"a\\\"b\""), Stmt::Expr(Expr::Str("a\"b".into())));
        assert_eq!(parse("nil"), Stmt::Expr(Expr::Nil));
        assert_eq!(parse("-1"), Stmt::Expr(Expr::Negate(Box::new(int(1)))));
        assert_eq!(parse("vect()"), Stmt::Expr(Expr::Call("vect".into(), Vec::new())));
    }

    #[test]
    fn test_blank_and_comments() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# nothing").unwrap(), None);
        assert_eq!(parse("x # trailing"), Stmt::Expr(Expr::Var("x".into())));
    }

    #[test]
    fn test_errors() {
        let err = parse_line("mat(1, 2").unwrap_err();
        assert_eq!(err.message, "expected `,` or `)`");
        assert_eq!(err.offset, 8);

        let err = parse_line("1 $ 2").unwrap_err();
        assert_eq!(err.to_string(), "unexpected character `$` at column 3");

        assert!(parse_line("a b").is_err());
        assert!(parse_line("\"open").is_err());
        assert!(parse_line("m.").is_err());
        assert!(parse_line("99999999999999999999").is_err());
    }
}
