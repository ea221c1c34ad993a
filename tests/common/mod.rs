#![allow(dead_code)]
use log::LevelFilter;
use poet::{
    Entity, Error, Executor, Query, Result, RowLabeled, RowNames, RowsAffected, Status, Value,
};
use std::{collections::VecDeque, env};
use time::PrimitiveDateTime;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Executor recording every query, answering fetches with the queued result sets.
#[derive(Default)]
pub struct MockExecutor {
    pub queries: Vec<Query>,
    pub results: VecDeque<Vec<RowLabeled>>,
    pub rows_affected: u64,
    /// Fail every query with `Status::Database`.
    pub broken: bool,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            rows_affected: 1,
            ..Default::default()
        }
    }
    pub fn respond(mut self, rows: Vec<RowLabeled>) -> Self {
        self.results.push_back(rows);
        self
    }
    pub fn last(&self) -> &Query {
        self.queries.last().expect("No query was executed")
    }
    fn record(&mut self, query: &Query) -> Result<()> {
        self.queries.push(query.clone());
        if self.broken {
            return Err(Error::with_args(Status::Database, [&query.sql])
                .caused_by(anyhow::anyhow!("connection refused")));
        }
        Ok(())
    }
}

impl Executor for MockExecutor {
    fn fetch(&mut self, query: &Query) -> Result<Vec<RowLabeled>> {
        self.record(query)?;
        Ok(self.results.pop_front().unwrap_or_default())
    }
    fn execute(&mut self, query: &Query) -> Result<RowsAffected> {
        self.record(query)?;
        Ok(RowsAffected {
            rows_affected: self.rows_affected,
            last_affected_id: None,
        })
    }
}

pub fn row(labels: &[&str], values: Vec<Value>) -> RowLabeled {
    let labels: RowNames = labels.iter().map(|v| v.to_string()).collect();
    RowLabeled::new(labels, values.into_boxed_slice())
}

pub fn text(value: &str) -> Value {
    Value::Varchar(Some(value.into()))
}

#[derive(Default, Debug, Clone, PartialEq, Entity)]
#[poet(table = "T_ITEM")]
pub struct Item {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Entity)]
#[poet(table = "T_USER")]
pub struct User {
    pub id: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<PrimitiveDateTime>,
}

#[derive(Default, Debug, Clone, PartialEq, Entity)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Entity)]
#[poet(
    table = "p=T_PERSON, addr=T_ADDRESS",
    join = "p.ADDRESS_ID=addr.ID"
)]
pub struct PersonView {
    #[poet(column = "p.ID")]
    pub id: Option<String>,
    #[poet(column = "p.NAME")]
    pub name: Option<String>,
    #[poet(column = "p.AGE")]
    pub age: Option<i32>,
    #[poet(embedded)]
    pub addr: Address,
}

#[derive(Default, Debug, Clone, PartialEq, Entity)]
#[poet(table = "T_CONTACT")]
pub struct Contact {
    pub id: Option<String>,
    #[poet(embedded)]
    pub home: Option<Address>,
}

#[derive(Default, Debug, Clone, PartialEq, Entity)]
pub struct Audit {
    pub created_by: Option<String>,
    pub name: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Entity)]
#[poet(table = "T_DOCUMENT", trace = "T_DOCUMENT_TRACE")]
pub struct DocumentPo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub pages: i32,
    pub published: Option<bool>,
    #[poet(read_only)]
    pub updated_at: Option<PrimitiveDateTime>,
    #[poet(column = "-")]
    pub draft: Option<String>,
    #[poet(skip)]
    pub checksum: Vec<u8>,
    #[poet(base)]
    pub audit: Audit,
}

#[derive(Default, Debug, Clone, PartialEq, Entity)]
#[poet(table = "T_NOTE")]
pub struct Note {
    pub id: Option<String>,
    #[poet(base)]
    pub audit: Option<Audit>,
}
