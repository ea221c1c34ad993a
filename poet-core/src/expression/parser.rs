use super::{
    BinaryOpType, OpPrecedence, Operand, UnaryOpType,
    token::{Token, tokenize},
};
use crate::Value;
use anyhow::{Error, Result};
use std::iter::Peekable;

/// Parses the content of a template span.
pub fn parse(expression: &str) -> Result<Operand> {
    let mut parser = Parser {
        tokens: tokenize(expression)?.into_iter().peekable(),
    };
    if parser.tokens.peek().is_none() {
        return Err(Error::msg("Empty expression"));
    }
    let result = parser.expression()?;
    if let Some(token) = parser.tokens.next() {
        return Err(Error::msg(format!(
            "Unexpected {token:?} after the end of the expression"
        )));
    }
    Ok(result)
}

struct Parser {
    tokens: Peekable<std::vec::IntoIter<Token>>,
}

impl Parser {
    fn expression(&mut self) -> Result<Operand> {
        let condition = self.binary(0)?;
        if !self.eat("?") {
            return Ok(condition);
        }
        let then = self.expression()?;
        if !self.eat(":") {
            return Err(Error::msg("Expected `:` in a conditional expression"));
        }
        let otherwise = self.expression()?;
        Ok(Operand::Ternary {
            condition: condition.into(),
            then: then.into(),
            otherwise: otherwise.into(),
        })
    }

    fn binary(&mut self, min_precedence: i32) -> Result<Operand> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.peek_binary_op() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.tokens.next();
            let rhs = self.binary(precedence + 1)?;
            lhs = Operand::Binary {
                op,
                lhs: lhs.into(),
                rhs: rhs.into(),
            };
        }
        Ok(lhs)
    }

    fn peek_binary_op(&mut self) -> Option<BinaryOpType> {
        match self.tokens.peek()? {
            Token::Symbol(v) => BinaryOpType::from_token(v),
            Token::Ident(v) => BinaryOpType::from_token(v),
            _ => None,
        }
    }

    fn unary(&mut self) -> Result<Operand> {
        let op = match self.tokens.peek() {
            Some(Token::Symbol("!")) => UnaryOpType::Not,
            Some(Token::Symbol("-")) => UnaryOpType::Negative,
            Some(Token::Ident(v)) if v.eq_ignore_ascii_case("not") => UnaryOpType::Not,
            _ => return self.primary(),
        };
        self.tokens.next();
        Ok(Operand::Unary {
            op,
            v: self.unary()?.into(),
        })
    }

    fn primary(&mut self) -> Result<Operand> {
        let Some(token) = self.tokens.next() else {
            return Err(Error::msg("Unexpected end of the expression"));
        };
        Ok(match token {
            Token::Symbol("#") => Operand::Binding(self.path()?),
            Token::Symbol("(") => {
                let result = self.expression()?;
                if !self.eat(")") {
                    return Err(Error::msg("Expected `)`"));
                }
                result
            }
            Token::Str(v) => Operand::Literal(Value::Varchar(Some(v))),
            Token::Int(v) => Operand::Literal(Value::Int64(Some(v))),
            Token::Float(v) => Operand::Literal(Value::Float64(Some(v))),
            Token::Ident(v) => match v.to_ascii_lowercase().as_str() {
                "true" => Operand::Literal(Value::Boolean(Some(true))),
                "false" => Operand::Literal(Value::Boolean(Some(false))),
                "null" => Operand::Literal(Value::Null),
                _ => Operand::Property(self.path_from(v)?),
            },
            token => return Err(Error::msg(format!("Unexpected {token:?}"))),
        })
    }

    fn path(&mut self) -> Result<String> {
        match self.tokens.next() {
            Some(Token::Ident(v)) => self.path_from(v),
            token => Err(Error::msg(format!(
                "Expected a name after `#`, found {token:?}"
            ))),
        }
    }

    fn path_from(&mut self, mut path: String) -> Result<String> {
        while self.eat(".") {
            let Some(Token::Ident(v)) = self.tokens.next() else {
                return Err(Error::msg(format!("Expected a name after `{path}.`")));
            };
            path.push('.');
            path.push_str(&v);
        }
        Ok(path)
    }

    fn eat(&mut self, symbol: &str) -> bool {
        if matches!(self.tokens.peek(), Some(Token::Symbol(v)) if *v == symbol) {
            self.tokens.next();
            return true;
        }
        false
    }
}
