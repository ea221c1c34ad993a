use std::fmt::{self, Display, Write};

pub type Result<T> = std::result::Result<T, Error>;

/// Kind of a failure, each one identified by a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The entity declaration cannot be used: no table, more than one table where exactly one is
    /// needed, or a cycle of embedded/base fields.
    InvalidEntityDefinition,
    /// A field list names a field the entity does not have.
    InvalidField,
    /// A getter or setter could not be run on the given object.
    PropertyAccessFailure,
    /// No row mapper is registered for the requested result type.
    MissingRowMapper,
    /// A filter, order by or group by template cannot be resolved.
    ExpressionEvaluationFailure,
    /// A statement would write no column at all.
    EmptyFieldListNotAllowed,
    /// The query returned no row.
    EmptyResult,
    /// The query returned more rows than expected.
    IncorrectResultSize,
    /// Failure reported by the database driver.
    Database,
}

impl Status {
    pub const fn code(self) -> u32 {
        match self {
            Status::EmptyResult => 404,
            Status::ExpressionEvaluationFailure => 602,
            Status::IncorrectResultSize => 701,
            Status::Database => 902,
            Status::MissingRowMapper => 10010001,
            Status::InvalidEntityDefinition => 20010002,
            Status::PropertyAccessFailure => 20010004,
            Status::InvalidField => 20010005,
            Status::EmptyFieldListNotAllowed => 20010006,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error returned by every fallible operation of the crate.
///
/// It is made of a [`Status`], the positional arguments describing the failure (table, field,
/// template...) and optionally the error that caused it. It renders as
/// `{"status":20010005,args:["name"]}`.
#[derive(Debug, thiserror::Error)]
#[error("{}", describe(.status, .args))]
pub struct Error {
    status: Status,
    args: Vec<String>,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

fn describe(status: &Status, args: &[String]) -> String {
    let mut out = format!("{{\"status\":{}", status.code());
    if !args.is_empty() {
        out.push_str(",args:[");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "\"{arg}\"");
        }
        out.push(']');
    }
    out.push('}');
    out
}

impl Error {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            args: Vec::new(),
            cause: None,
        }
    }
    pub fn with_args<I>(status: Status, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        Self {
            status,
            args: args.into_iter().map(|v| v.to_string()).collect(),
            cause: None,
        }
    }
    /// Attaches the error that caused this one.
    pub fn caused_by(mut self, cause: impl Into<anyhow::Error>) -> Self {
        let cause: anyhow::Error = cause.into();
        self.cause = Some(cause.into());
        self
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn is(&self, status: Status) -> bool {
        self.status == status
    }
    pub fn args(&self) -> &[String] {
        &self.args
    }
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl From<Status> for Error {
    fn from(value: Status) -> Self {
        Error::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::new(Status::EmptyResult).to_string(),
            r#"{"status":404}"#
        );
        assert_eq!(
            Error::with_args(Status::InvalidField, ["name", "USER"]).to_string(),
            r#"{"status":20010005,args:["name","USER"]}"#
        );
        assert_eq!(
            Error::with_args(Status::Database, ["select 'a'\nfrom T"]).to_string(),
            "{\"status\":902,args:[\"select 'a'\nfrom T\"]}"
        );
    }

    #[test]
    fn test_cause() {
        let error = Error::with_args(Status::Database, ["insert"])
            .caused_by(anyhow::anyhow!("connection reset"));
        assert!(error.is(Status::Database));
        assert_eq!(error.cause().map(|v| v.to_string()).as_deref(), Some("connection reset"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
