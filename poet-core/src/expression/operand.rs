use super::{BinaryOpType, Scope, UnaryOpType, binary_op::truth};
use crate::Value;
use anyhow::{Error, Result};

/// Parsed expression of a template span.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    /// `#path`, the column bound to a field of the entity.
    Binding(String),
    /// `path`, a property of the filter object.
    Property(String),
    Unary {
        op: UnaryOpType,
        v: Box<Operand>,
    },
    Binary {
        op: BinaryOpType,
        lhs: Box<Operand>,
        rhs: Box<Operand>,
    },
    Ternary {
        condition: Box<Operand>,
        then: Box<Operand>,
        otherwise: Box<Operand>,
    },
}

impl Operand {
    pub fn evaluate(&self, scope: &Scope) -> Result<Value> {
        Ok(match self {
            Operand::Literal(v) => v.clone(),
            Operand::Binding(name) => scope.binding(name)?,
            Operand::Property(path) => normalize(scope.property(path)?),
            Operand::Unary { op, v } => op.apply(v.evaluate(scope)?)?,
            Operand::Binary { op, lhs, rhs } if op.is_logical() => {
                let lhs = lhs.evaluate(scope)?;
                match (op, truth(&lhs)) {
                    (BinaryOpType::And, Some(false)) => lhs,
                    (BinaryOpType::Or, Some(true)) => lhs,
                    _ => op.apply(lhs, rhs.evaluate(scope)?)?,
                }
            }
            Operand::Binary { op, lhs, rhs } => {
                op.apply(lhs.evaluate(scope)?, rhs.evaluate(scope)?)?
            }
            Operand::Ternary {
                condition,
                then,
                otherwise,
            } => {
                let condition = condition.evaluate(scope)?;
                match truth(&condition) {
                    Some(true) => then.evaluate(scope)?,
                    Some(false) => otherwise.evaluate(scope)?,
                    None => {
                        return Err(Error::msg(format!(
                            "The condition of `?:` must be a boolean, found {condition:?}"
                        )));
                    }
                }
            }
        })
    }
}

/// Typed NULLs become `Value::Null` so that comparisons do not depend on the field type.
fn normalize(value: Value) -> Value {
    if value.is_null() { Value::Null } else { value }
}
