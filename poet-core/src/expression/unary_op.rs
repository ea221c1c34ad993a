use super::binary_op::{Number, truth};
use crate::Value;
use anyhow::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnaryOpType {
    Negative,
    Not,
}

impl UnaryOpType {
    pub fn apply(&self, value: Value) -> Result<Value> {
        match self {
            UnaryOpType::Not => truth(&value)
                .map(|v| Value::Boolean(Some(!v)))
                .ok_or_else(|| Error::msg(format!("Cannot negate {value:?}, a boolean is needed"))),
            UnaryOpType::Negative => match Number::of(&value) {
                Some(Number::Int(v)) => v
                    .checked_neg()
                    .map(|v| Value::Int64(Some(v)))
                    .ok_or_else(|| Error::msg("Integer overflow evaluating `-`")),
                Some(Number::Float(v)) => Ok(Value::Float64(Some(-v))),
                None => Err(Error::msg(format!(
                    "Cannot change the sign of {value:?}, a number is needed"
                ))),
            },
        }
    }
}
