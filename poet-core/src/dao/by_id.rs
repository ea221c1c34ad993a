//! Shortcuts for entities identified by an `id` field.
use crate::{Binding, Dao, Entity, Error, Executor, Result, Select, Status, Value, split_list};

const BY_ID: &str = "{#id}=?";

impl<T: Entity + Default, E: Executor> Dao<T, E> {
    pub fn get(&mut self, id: impl Into<Value>) -> Result<Option<T>> {
        self.query_for_object(None, None, Some(BY_ID), &[id.into()])
    }

    pub fn get_as<R: Entity + Default>(&mut self, id: impl Into<Value>) -> Result<Option<R>> {
        let args = [id.into()];
        self.query_for_object_as::<R>(None, None, Some(BY_ID), Binding::Args(&args))
    }

    /// A page of the entities matching the filter.
    pub fn list(
        &mut self,
        start: i64,
        count: i64,
        order_by: Option<&str>,
        filter: Option<&str>,
        args: &[Value],
    ) -> Result<Vec<T>> {
        let select = Select {
            start,
            count,
            order_by,
            filter,
            ..Default::default()
        };
        self.query_for_list(&select, args)
    }

    pub fn list_as<R: Entity + Default>(
        &mut self,
        start: i64,
        count: i64,
        order_by: Option<&str>,
        filter: Option<&str>,
        args: &[Value],
    ) -> Result<Vec<R>> {
        let select = Select {
            start,
            count,
            order_by,
            filter,
            ..Default::default()
        };
        self.query_for_list_as::<R>(&select, Binding::Args(args))
    }

    /// Number of rows matching the filter.
    pub fn count(&mut self, filter: Option<&str>, args: &[Value]) -> Result<i64> {
        Ok(self
            .query_for_value::<i64>("count(*)", filter, args)?
            .unwrap_or_default())
    }

    pub fn update_by_id(&mut self, entity: &T, id: impl Into<Value>) -> Result<u64> {
        self.update(entity, None, None, Some(BY_ID), &[id.into()])
    }

    pub fn update_by_filter(&mut self, entity: &T, filter: &str, args: &[Value]) -> Result<u64> {
        self.update(entity, None, None, Some(filter), args)
    }

    /// Update only the comma separated `fields`.
    pub fn update_fields(&mut self, entity: &T, fields: &str, id: impl Into<Value>) -> Result<u64> {
        self.update_fields_by_filter(entity, fields, BY_ID, &[id.into()])
    }

    pub fn update_fields_by_filter(
        &mut self,
        entity: &T,
        fields: &str,
        filter: &str,
        args: &[Value],
    ) -> Result<u64> {
        if split_list(fields).next().is_none() {
            return Err(Error::with_args(
                Status::EmptyFieldListNotAllowed,
                [T::entity_def().name],
            ));
        }
        self.update(entity, Some(fields), None, Some(filter), args)
    }

    pub fn delete_by_id(&mut self, id: impl Into<Value>) -> Result<u64> {
        self.delete(Some(BY_ID), &[id.into()])
    }
}
