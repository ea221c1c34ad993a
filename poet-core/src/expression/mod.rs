//! Evaluator of the `{...}` spans of filter, order by and group by templates.
//!
//! Text outside of the spans is copied verbatim, each span is parsed and evaluated against a
//! [`Scope`] and replaced by its textual value:
//!
//! ```text
//! {#name} like ? and {#addr.city}={'''' + city + ''''}
//! ```
//!
//! resolves to `NAME like ? and addr.CITY='Rome'` when the filter object has `city == "Rome"`.
mod binary_op;
mod op_precedence;
mod operand;
mod parser;
mod scope;
mod template;
mod token;
mod unary_op;

pub use binary_op::BinaryOpType;
pub use op_precedence::*;
pub use operand::*;
pub use parser::parse;
pub use scope::*;
pub use template::*;
pub use unary_op::*;

use crate::{EntityMetadata, Error, Properties, Result, Status};
use std::fmt::Write;

/// Resolves a template against the bindings of `metadata` and the optional filter object.
pub fn resolve(
    metadata: &EntityMetadata,
    template: &str,
    object: Option<&dyn Properties>,
) -> Result<String> {
    let failure = |e: anyhow::Error| {
        Error::with_args(Status::ExpressionEvaluationFailure, [template]).caused_by(e)
    };
    let scope = Scope::new(metadata, object);
    let mut out = String::with_capacity(template.len() + 16);
    for segment in segments(template).map_err(failure)? {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Expression(expression) => {
                let value = parse(expression)
                    .and_then(|v| v.evaluate(&scope))
                    .map_err(failure)?;
                let _ = write!(out, "{value}");
            }
        }
    }
    Ok(out)
}
