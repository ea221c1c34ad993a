use crate::{
    AsValue, Dao, Entity, Error, Executor, Properties, Query, Result, RowMapper, Select, Status,
    Value,
};
use std::any::type_name;

/// Where the values of a filter come from.
#[derive(Clone, Copy)]
pub enum Binding<'a> {
    /// Positional values of the `?` placeholders.
    Args(&'a [Value]),
    /// Object whose properties the filter template reads.
    Object(&'a dyn Properties),
}

impl<'a> Binding<'a> {
    fn object(&self) -> Option<&'a dyn Properties> {
        match self {
            Binding::Args(..) => None,
            Binding::Object(object) => Some(*object),
        }
    }
    fn params(&self) -> Vec<Value> {
        match self {
            Binding::Args(args) => args.to_vec(),
            Binding::Object(..) => Vec::new(),
        }
    }
}

impl<'a> From<&'a [Value]> for Binding<'a> {
    fn from(value: &'a [Value]) -> Self {
        Binding::Args(value)
    }
}

impl<T: Entity + Default, E: Executor> Dao<T, E> {
    fn select_query(&self, select: &Select, binding: Binding) -> Result<Query> {
        let metadata = self.metadata()?;
        let mut query = Query::new(String::new(), binding.params());
        self.executor
            .sql_writer()
            .write_select(&mut query.sql, &metadata, select, binding.object())?;
        Ok(query)
    }

    pub fn query_for_list(&mut self, select: &Select, args: &[Value]) -> Result<Vec<T>> {
        self.query_for_list_as::<T>(select, Binding::Args(args))
    }

    /// Like [`Dao::query_for_list`] with the filter reading the properties of `object`.
    pub fn query_for_list_by(&mut self, select: &Select, object: &dyn Properties) -> Result<Vec<T>> {
        self.query_for_list_as::<T>(select, Binding::Object(object))
    }

    /// Select rows of `T` and map them into another entity type.
    pub fn query_for_list_as<R: Entity + Default>(
        &mut self,
        select: &Select,
        binding: Binding,
    ) -> Result<Vec<R>> {
        let mapper = self.entity_mapper::<R>()?;
        self.query_for_list_with(&mapper, select, binding)
    }

    /// Select rows of `T` and map them with the mapper registered for `R`.
    pub fn query_for_list_mapped<R: 'static>(
        &mut self,
        select: &Select,
        binding: Binding,
    ) -> Result<Vec<R>> {
        let mapper = self.mappers.get::<R>()?;
        self.query_for_list_with(&*mapper, select, binding)
    }

    pub fn query_for_list_with<R>(
        &mut self,
        mapper: &dyn RowMapper<R>,
        select: &Select,
        binding: Binding,
    ) -> Result<Vec<R>> {
        let query = self.select_query(select, binding)?;
        self.fetch(query)?
            .iter()
            .enumerate()
            .map(|(i, row)| mapper.map_row(row, i))
            .collect()
    }

    /// The entity matching the filter, `None` when no row matches.
    ///
    /// More than one matching row is [`Status::IncorrectResultSize`].
    pub fn query_for_object(
        &mut self,
        include: Option<&str>,
        exclude: Option<&str>,
        filter: Option<&str>,
        args: &[Value],
    ) -> Result<Option<T>> {
        self.query_for_object_as::<T>(include, exclude, filter, Binding::Args(args))
    }

    pub fn query_for_object_by(
        &mut self,
        include: Option<&str>,
        exclude: Option<&str>,
        filter: Option<&str>,
        object: &dyn Properties,
    ) -> Result<Option<T>> {
        self.query_for_object_as::<T>(include, exclude, filter, Binding::Object(object))
    }

    pub fn query_for_object_as<R: Entity + Default>(
        &mut self,
        include: Option<&str>,
        exclude: Option<&str>,
        filter: Option<&str>,
        binding: Binding,
    ) -> Result<Option<R>> {
        let mapper = self.entity_mapper::<R>()?;
        self.query_for_object_with(&mapper, include, exclude, filter, binding)
    }

    pub fn query_for_object_mapped<R: 'static>(
        &mut self,
        include: Option<&str>,
        exclude: Option<&str>,
        filter: Option<&str>,
        binding: Binding,
    ) -> Result<Option<R>> {
        let mapper = self.mappers.get::<R>()?;
        self.query_for_object_with(&*mapper, include, exclude, filter, binding)
    }

    pub fn query_for_object_with<R>(
        &mut self,
        mapper: &dyn RowMapper<R>,
        include: Option<&str>,
        exclude: Option<&str>,
        filter: Option<&str>,
        binding: Binding,
    ) -> Result<Option<R>> {
        let select = Select {
            include,
            exclude,
            filter,
            ..Default::default()
        };
        let query = self.select_query(&select, binding)?;
        self.fetch_one(query)?
            .map(|row| mapper.map_row(&row, 0))
            .transpose()
    }

    /// Single value select: `expression` is a template like `count(*)` or `max({#age})`.
    ///
    /// `None` when no row matches or the value is null.
    pub fn query_for_value<R: AsValue>(
        &mut self,
        expression: &str,
        filter: Option<&str>,
        args: &[Value],
    ) -> Result<Option<R>> {
        self.query_for_value_with(expression, filter, Binding::Args(args))
    }

    pub fn query_for_value_by<R: AsValue>(
        &mut self,
        expression: &str,
        filter: Option<&str>,
        object: &dyn Properties,
    ) -> Result<Option<R>> {
        self.query_for_value_with(expression, filter, Binding::Object(object))
    }

    fn query_for_value_with<R: AsValue>(
        &mut self,
        expression: &str,
        filter: Option<&str>,
        binding: Binding,
    ) -> Result<Option<R>> {
        let metadata = self.metadata()?;
        let mut query = Query::new(String::new(), binding.params());
        self.executor.sql_writer().write_select_value(
            &mut query.sql,
            &metadata,
            expression,
            filter,
            binding.object(),
        )?;
        let Some(row) = self.fetch_one(query)? else {
            return Ok(None);
        };
        let value = row.values.into_vec().into_iter().next().unwrap_or_default();
        if value.is_null() {
            return Ok(None);
        }
        R::try_from_value(value).map(Some).map_err(|e| {
            Error::with_args(Status::PropertyAccessFailure, [type_name::<R>(), expression])
                .caused_by(e)
        })
    }
}
