mod by_id;
mod mutation;
mod query;

pub use query::*;

use crate::{
    Entity, EntityMetadata, EntityRowMapper, Executor, MappingDiagnostics, MetadataStore,
    MutationHelper, Query, Result, RowLabeled, RowMappers, SetterCache, Status,
};
use std::{marker::PhantomData, sync::Arc};

/// Data access object of the entity `T`, running its statements on `E`.
///
/// ```ignore
/// let mut dao = Dao::<User, _>::new(connection);
/// let users = dao.query_for_list(&Select::new().filter("{#name} like ?"), &["a%".into()])?;
/// ```
pub struct Dao<T, E> {
    executor: E,
    store: Arc<MetadataStore>,
    setters: Arc<SetterCache>,
    mappers: RowMappers,
    diagnostics: Arc<MappingDiagnostics>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity + Default, E: Executor> Dao<T, E> {
    /// Dao backed by the process wide metadata store and setter cache.
    pub fn new(executor: E) -> Self {
        Self::with_store(executor, MetadataStore::global(), SetterCache::global())
    }

    pub fn with_store(executor: E, store: Arc<MetadataStore>, setters: Arc<SetterCache>) -> Self {
        Self {
            executor,
            store,
            setters,
            mappers: RowMappers::new(),
            diagnostics: Default::default(),
            _entity: PhantomData,
        }
    }

    /// Mappers used by the `*_mapped` queries.
    pub fn with_mappers(mut self, mappers: RowMappers) -> Self {
        self.mappers = mappers;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }
    pub fn into_executor(self) -> E {
        self.executor
    }
    pub fn mappers_mut(&mut self) -> &mut RowMappers {
        &mut self.mappers
    }

    pub fn metadata(&self) -> Result<Arc<EntityMetadata>> {
        self.store.definition_for::<T>()
    }

    /// Counters of the rows mapped by this dao.
    pub fn diagnostics(&self) -> &MappingDiagnostics {
        &self.diagnostics
    }

    fn mutation_helper(&self) -> Result<MutationHelper> {
        MutationHelper::new(self.metadata()?)
    }

    fn entity_mapper<R: Entity + Default>(&self) -> Result<EntityRowMapper<R>> {
        let metadata = self.store.definition_for::<R>()?;
        EntityRowMapper::new(
            &metadata,
            self.setters.clone(),
            self.diagnostics.clone(),
        )
    }

    fn execute(&mut self, query: Query) -> Result<u64> {
        log::info!("{query}");
        Ok(self.executor.execute(&query)?.rows_affected)
    }

    /// Rows of the query, none when the executor reports an empty result.
    fn fetch(&mut self, query: Query) -> Result<Vec<RowLabeled>> {
        log::info!("{query}");
        match self.executor.fetch(&query) {
            Err(e) if e.is(Status::EmptyResult) => Ok(Vec::new()),
            result => result,
        }
    }

    /// The only row of the query, if any.
    fn fetch_one(&mut self, query: Query) -> Result<Option<RowLabeled>> {
        log::info!("{query}");
        match self.executor.fetch_one(&query) {
            Ok(row) => Ok(Some(row)),
            Err(e) if e.is(Status::EmptyResult) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
