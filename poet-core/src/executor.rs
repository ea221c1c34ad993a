use crate::{Error, GenericSqlWriter, Query, Result, RowLabeled, RowsAffected, SqlWriter, Status};

/// Database handle the queries are sent to.
///
/// Implemented by drivers, failures of the database are reported as [`Status::Database`] with
/// the driver error as cause.
pub trait Executor {
    /// Dialect used to write the statements sent to this executor.
    fn sql_writer(&self) -> &dyn SqlWriter {
        &GenericSqlWriter
    }

    /// Execute the query and returns the rows.
    fn fetch(&mut self, query: &Query) -> Result<Vec<RowLabeled>>;

    /// Execute the query and return the total number of rows affected.
    fn execute(&mut self, query: &Query) -> Result<RowsAffected>;

    /// Execute the query expecting exactly one row.
    ///
    /// No row is [`Status::EmptyResult`], more than one is [`Status::IncorrectResultSize`].
    fn fetch_one(&mut self, query: &Query) -> Result<RowLabeled> {
        let mut rows = self.fetch(query)?;
        match rows.len() {
            0 => Err(Error::new(Status::EmptyResult)),
            1 => rows.pop().ok_or_else(|| Error::new(Status::EmptyResult)),
            n => Err(Error::with_args(Status::IncorrectResultSize, [1, n])),
        }
    }
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn sql_writer(&self) -> &dyn SqlWriter {
        (**self).sql_writer()
    }
    fn fetch(&mut self, query: &Query) -> Result<Vec<RowLabeled>> {
        (**self).fetch(query)
    }
    fn execute(&mut self, query: &Query) -> Result<RowsAffected> {
        (**self).execute(query)
    }
    fn fetch_one(&mut self, query: &Query) -> Result<RowLabeled> {
        (**self).fetch_one(query)
    }
}
