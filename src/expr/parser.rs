//! Tokenizer and recursive-descent parser for [`Expr`].
//!
//! Precedence, lowest first: `+ -`, `* / %`, unary `+ -`, `^` (right associative).

use std::iter::Peekable;
use std::str::CharIndices;

use super::{Expr, Function};
use crate::error::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Ident(name) => name.clone(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Percent => "%".to_string(),
            Token::Caret => "^".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => lex_number(source, &mut chars)?,
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Ident(name)
            }
            _ => {
                chars.next();
                match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '%' => Token::Percent,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    other => {
                        return Err(ExpressionError::UnexpectedCharacter {
                            character: other,
                            position,
                        })
                    }
                }
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn lex_number(
    source: &str,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<Token, ExpressionError> {
    let start = chars.peek().map_or(source.len(), |&(i, _)| i);
    let mut end = start;

    while let Some(&(i, c)) = chars.peek() {
        if c.is_ascii_digit() || c == '.' {
            end = i + 1;
            chars.next();
        } else {
            break;
        }
    }

    // Exponent only when followed by digits, so `2e` stays a number and a name.
    if let Some(&(i, c)) = chars.peek() {
        if c == 'e' || c == 'E' {
            let rest = &source[i + 1..];
            let sign_len = usize::from(rest.starts_with('+') || rest.starts_with('-'));
            let digits = rest[sign_len..]
                .chars()
                .take_while(char::is_ascii_digit)
                .count();
            if digits > 0 {
                let consumed = 1 + sign_len + digits;
                for _ in 0..consumed {
                    chars.next();
                }
                end = i + consumed;
            }
        }
    }

    let text = &source[start..end];
    text.parse::<f64>()
        .map(Token::Number)
        .map_err(|_| ExpressionError::InvalidNumber(text.to_string()))
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), ExpressionError> {
        match self.next() {
            Some(ref token) if *token == expected => Ok(()),
            Some(token) => Err(ExpressionError::UnexpectedToken {
                token: token.describe(),
            }),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    fn expression(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.next();
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some(Token::Minus) => {
                    self.next();
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.next();
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Token::Slash) => {
                    self.next();
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Token::Percent) => {
                    self.next();
                    lhs = Expr::Rem(Box::new(lhs), Box::new(self.unary()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, ExpressionError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.next();
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.next();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.next();
            let exponent = self.unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ExpressionError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.next();
                    self.call(name)
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(token) => Err(ExpressionError::UnexpectedToken {
                token: token.describe(),
            }),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    fn call(&mut self, name: String) -> Result<Expr, ExpressionError> {
        let function =
            Function::from_name(&name).ok_or(ExpressionError::UnknownFunction(name))?;

        let mut args = Vec::new();
        if let Some(Token::RParen) = self.peek() {
            self.next();
        } else {
            loop {
                args.push(self.expression()?);
                match self.next() {
                    Some(Token::Comma) => continue,
                    Some(Token::RParen) => break,
                    Some(token) => {
                        return Err(ExpressionError::UnexpectedToken {
                            token: token.describe(),
                        })
                    }
                    None => return Err(ExpressionError::UnexpectedEnd),
                }
            }
        }

        if args.len() != function.arity() {
            return Err(ExpressionError::WrongArity {
                function: function.name().to_string(),
                expected: function.arity(),
                found: args.len(),
            });
        }
        Ok(Expr::Call { function, args })
    }
}

pub(super) fn parse(source: &str) -> Result<Expr, ExpressionError> {
    let mut parser = Parser {
        tokens: tokenize(source)?,
        position: 0,
    };
    let expr = parser.expression()?;
    match parser.next() {
        None => Ok(expr),
        Some(token) => Err(ExpressionError::UnexpectedToken {
            token: token.describe(),
        }),
    }
}
