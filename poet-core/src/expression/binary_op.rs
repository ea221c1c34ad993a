use super::OpPrecedence;
use crate::Value;
use anyhow::{Error, Result};
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpType {
    Multiplication,
    Division,
    Remainder,
    Addition,
    Subtraction,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOpType {
    /// Operator spelled by a symbol or by a (case insensitive) keyword.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "*" => BinaryOpType::Multiplication,
            "/" => BinaryOpType::Division,
            "%" => BinaryOpType::Remainder,
            "+" => BinaryOpType::Addition,
            "-" => BinaryOpType::Subtraction,
            "==" => BinaryOpType::Equal,
            "!=" => BinaryOpType::NotEqual,
            "<" => BinaryOpType::Less,
            ">" => BinaryOpType::Greater,
            "<=" => BinaryOpType::LessEqual,
            ">=" => BinaryOpType::GreaterEqual,
            "&&" => BinaryOpType::And,
            "||" => BinaryOpType::Or,
            _ => match token.to_ascii_lowercase().as_str() {
                "eq" => BinaryOpType::Equal,
                "ne" => BinaryOpType::NotEqual,
                "lt" => BinaryOpType::Less,
                "gt" => BinaryOpType::Greater,
                "le" => BinaryOpType::LessEqual,
                "ge" => BinaryOpType::GreaterEqual,
                "and" => BinaryOpType::And,
                "or" => BinaryOpType::Or,
                _ => return None,
            },
        })
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOpType::And | BinaryOpType::Or)
    }

    /// Applies a non logical operator, `and` / `or` are evaluated lazily by the caller.
    pub fn apply(&self, lhs: Value, rhs: Value) -> Result<Value> {
        match self {
            BinaryOpType::Addition
                if matches!(lhs, Value::Varchar(Some(..)))
                    || matches!(rhs, Value::Varchar(Some(..))) =>
            {
                Ok(Value::Varchar(Some(format!("{lhs}{rhs}"))))
            }
            BinaryOpType::Addition
            | BinaryOpType::Subtraction
            | BinaryOpType::Multiplication
            | BinaryOpType::Division
            | BinaryOpType::Remainder => self.arithmetic(&lhs, &rhs),
            BinaryOpType::Equal => Ok(Value::Boolean(Some(equals(&lhs, &rhs)))),
            BinaryOpType::NotEqual => Ok(Value::Boolean(Some(!equals(&lhs, &rhs)))),
            BinaryOpType::Less
            | BinaryOpType::Greater
            | BinaryOpType::LessEqual
            | BinaryOpType::GreaterEqual => {
                let ordering = compare(&lhs, &rhs).ok_or_else(|| {
                    Error::msg(format!("Cannot compare {lhs:?} with {rhs:?}"))
                })?;
                Ok(Value::Boolean(Some(match self {
                    BinaryOpType::Less => ordering.is_lt(),
                    BinaryOpType::Greater => ordering.is_gt(),
                    BinaryOpType::LessEqual => ordering.is_le(),
                    _ => ordering.is_ge(),
                })))
            }
            BinaryOpType::And | BinaryOpType::Or => {
                let (Some(l), Some(r)) = (truth(&lhs), truth(&rhs)) else {
                    return Err(Error::msg(format!(
                        "The operands of `{self}` must be booleans, found {lhs:?} and {rhs:?}"
                    )));
                };
                Ok(Value::Boolean(Some(if *self == BinaryOpType::And {
                    l && r
                } else {
                    l || r
                })))
            }
        }
    }

    fn arithmetic(&self, lhs: &Value, rhs: &Value) -> Result<Value> {
        let (Some(l), Some(r)) = (Number::of(lhs), Number::of(rhs)) else {
            return Err(Error::msg(format!(
                "Operator `{self}` needs numbers, found {lhs:?} and {rhs:?}"
            )));
        };
        let overflow = || Error::msg(format!("Integer overflow evaluating `{self}`"));
        match (l, r) {
            (Number::Int(l), Number::Int(r)) => {
                if r == 0 && matches!(self, BinaryOpType::Division | BinaryOpType::Remainder) {
                    return Err(Error::msg("Division by zero"));
                }
                let result = match self {
                    BinaryOpType::Addition => l.checked_add(r),
                    BinaryOpType::Subtraction => l.checked_sub(r),
                    BinaryOpType::Multiplication => l.checked_mul(r),
                    BinaryOpType::Division => l.checked_div(r),
                    _ => l.checked_rem(r),
                };
                Ok(Value::Int64(Some(result.ok_or_else(overflow)?)))
            }
            (l, r) => {
                let (l, r) = (l.as_f64(), r.as_f64());
                Ok(Value::Float64(Some(match self {
                    BinaryOpType::Addition => l + r,
                    BinaryOpType::Subtraction => l - r,
                    BinaryOpType::Multiplication => l * r,
                    BinaryOpType::Division => l / r,
                    _ => l % r,
                })))
            }
        }
    }
}

impl OpPrecedence for BinaryOpType {
    fn precedence(&self) -> i32 {
        match self {
            BinaryOpType::Or => 1,
            BinaryOpType::And => 2,
            BinaryOpType::Equal
            | BinaryOpType::NotEqual
            | BinaryOpType::Less
            | BinaryOpType::Greater
            | BinaryOpType::LessEqual
            | BinaryOpType::GreaterEqual => 3,
            BinaryOpType::Addition | BinaryOpType::Subtraction => 4,
            BinaryOpType::Multiplication | BinaryOpType::Division | BinaryOpType::Remainder => 5,
        }
    }
}

impl Display for BinaryOpType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOpType::Multiplication => "*",
            BinaryOpType::Division => "/",
            BinaryOpType::Remainder => "%",
            BinaryOpType::Addition => "+",
            BinaryOpType::Subtraction => "-",
            BinaryOpType::Equal => "==",
            BinaryOpType::NotEqual => "!=",
            BinaryOpType::Less => "<",
            BinaryOpType::Greater => ">",
            BinaryOpType::LessEqual => "<=",
            BinaryOpType::GreaterEqual => ">=",
            BinaryOpType::And => "and",
            BinaryOpType::Or => "or",
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn of(value: &Value) -> Option<Self> {
        match *value {
            Value::Int32(Some(v)) => Some(Number::Int(v as _)),
            Value::Int64(Some(v)) => Some(Number::Int(v)),
            Value::Float32(Some(v)) => Some(Number::Float(v as _)),
            Value::Float64(Some(v)) => Some(Number::Float(v)),
            _ => None,
        }
    }
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as _,
            Number::Float(v) => v,
        }
    }
}

pub(crate) fn truth(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(Some(v)) => Some(*v),
        _ => None,
    }
}

fn equals(lhs: &Value, rhs: &Value) -> bool {
    if lhs.is_null() || rhs.is_null() {
        return lhs.is_null() && rhs.is_null();
    }
    match (Number::of(lhs), Number::of(rhs)) {
        (Some(Number::Int(l)), Some(Number::Int(r))) => l == r,
        (Some(l), Some(r)) => l.as_f64() == r.as_f64(),
        _ => lhs == rhs,
    }
}

fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (Number::of(lhs), Number::of(rhs)) {
        (Some(Number::Int(l)), Some(Number::Int(r))) => return Some(l.cmp(&r)),
        (Some(l), Some(r)) => return l.as_f64().partial_cmp(&r.as_f64()),
        _ => {}
    }
    match (lhs, rhs) {
        (Value::Varchar(Some(l)), Value::Varchar(Some(r))) => Some(l.cmp(r)),
        (Value::Date(Some(l)), Value::Date(Some(r))) => Some(l.cmp(r)),
        (Value::Timestamp(Some(l)), Value::Timestamp(Some(r))) => Some(l.cmp(r)),
        _ => None,
    }
}
