use crate::{Dao, Entity, Error, Executor, Query, Result, Status, Value, non_blank};
use uuid::Uuid;

impl<T: Entity + Default, E: Executor> Dao<T, E> {
    /// Insert the entity, null fields are left to the database defaults.
    pub fn create(&mut self, entity: &T) -> Result<u64> {
        let helper = self.mutation_helper()?;
        let mut query = Query::default();
        self.executor
            .sql_writer()
            .write_insert(&mut query, &helper, entity)?;
        self.execute(query)
    }

    /// Insert the entity after assigning `TABLE-uuid` to its `id` when it is null.
    pub fn create_with_id(&mut self, entity: &mut T) -> Result<u64> {
        let helper = self.mutation_helper()?;
        let def = T::entity_def();
        let Some(id) = def.read(&*entity, "id") else {
            return Err(Error::with_args(
                Status::PropertyAccessFailure,
                [def.name, "id"],
            ));
        };
        if id.is_null() {
            let id = format!("{}-{}", helper.table(), Uuid::new_v4());
            def.write(entity, "id", Value::Varchar(Some(id)))?;
        }
        let mut query = Query::default();
        self.executor
            .sql_writer()
            .write_insert(&mut query, &helper, &*entity)?;
        self.execute(query)
    }

    /// Update the selected fields of every row matching the filter, all rows without filter.
    ///
    /// The filter arguments follow the values of the updated fields, they are dropped when there
    /// is no filter.
    pub fn update(
        &mut self,
        entity: &T,
        include: Option<&str>,
        exclude: Option<&str>,
        filter: Option<&str>,
        args: &[Value],
    ) -> Result<u64> {
        let helper = self.mutation_helper()?;
        let mut query = Query::default();
        self.executor
            .sql_writer()
            .write_update(&mut query, &helper, entity, include, exclude, filter)?;
        if non_blank(filter).is_some() {
            query.params.extend_from_slice(args);
        }
        self.execute(query)
    }

    pub fn delete(&mut self, filter: Option<&str>, args: &[Value]) -> Result<u64> {
        let helper = self.mutation_helper()?;
        let mut query = Query::default();
        self.executor
            .sql_writer()
            .write_delete(&mut query, &helper, filter)?;
        if non_blank(filter).is_some() {
            query.params.extend_from_slice(args);
        }
        self.execute(query)
    }
}
