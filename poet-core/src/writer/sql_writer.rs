use crate::{
    EntityMetadata, Error, FieldMapping, Properties, Query, Result, Status, Value,
    column_name_for, expression, non_blank, separated_by, split_list,
    writer::{Context, Fragment, MutationHelper, Select},
};
use std::{any::Any, fmt::Write};

/// Dialect printer turning entity metadata and templates into SQL statements.
///
/// Every method has a default implementation producing the generic dialect, a database
/// specific writer overrides only the pieces that differ (`write_limit` usually).
pub trait SqlWriter {
    /// Resolve a filter, order by or group by template and append it.
    fn write_template(
        &self,
        context: &Context,
        out: &mut String,
        metadata: &EntityMetadata,
        template: &str,
    ) -> Result<()> {
        out.push_str(&expression::resolve(
            metadata,
            template,
            context.visible_object(),
        )?);
        Ok(())
    }

    /// Render the projected columns, the include list wins over the exclude list.
    fn write_projection(
        &self,
        context: &Context,
        out: &mut String,
        metadata: &EntityMetadata,
        include: Option<&str>,
        exclude: Option<&str>,
    ) -> Result<()> {
        let fields = select_fields(metadata, include, exclude)?;
        if fields.is_empty() {
            return Err(Error::with_args(
                Status::EmptyFieldListNotAllowed,
                [metadata.entity_name()],
            ));
        }
        separated_by(
            out,
            fields,
            |out, (key, mapping)| self.write_projected_column(context, out, &mapping.column, key),
            ",",
        );
        Ok(())
    }

    /// Render `column as ALIAS`, the alias keeps the `$` of embedded keys.
    fn write_projected_column(&self, _context: &Context, out: &mut String, column: &str, key: &str) {
        let _ = write!(out, "{column} as {}", column_name_for(key));
    }

    fn write_from(&self, _context: &Context, out: &mut String, metadata: &EntityMetadata) {
        if let Some(from) = metadata.from_clause() {
            out.push_str(from);
            return;
        }
        separated_by(
            out,
            metadata.tables(),
            |out, (alias, name)| {
                let _ = write!(out, "{name} AS {alias}");
            },
            ",",
        );
    }

    /// Render the where clause, combining the filter with the join condition of the entity.
    ///
    /// The join condition only takes part in select statements. Nothing is written when both
    /// are missing.
    fn write_where(
        &self,
        context: &Context,
        out: &mut String,
        metadata: &EntityMetadata,
        filter: Option<&str>,
    ) -> Result<()> {
        let join = match context.fragment {
            Fragment::SqlSelectWhere => metadata.join_clause(),
            _ => None,
        };
        match (non_blank(filter), join) {
            (Some(filter), Some(join)) => {
                out.push_str(" where (");
                self.write_template(context, out, metadata, filter)?;
                let _ = write!(out, ") and ({join})");
            }
            (Some(filter), None) => {
                out.push_str(" where ");
                self.write_template(context, out, metadata, filter)?;
            }
            (None, Some(join)) => {
                let _ = write!(out, " where ({join})");
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn write_group_by(
        &self,
        context: &Context,
        out: &mut String,
        metadata: &EntityMetadata,
        group_by: Option<&str>,
    ) -> Result<()> {
        write_clause(self, context, out, metadata, " group by ", group_by)
    }

    fn write_order_by(
        &self,
        context: &Context,
        out: &mut String,
        metadata: &EntityMetadata,
        order_by: Option<&str>,
    ) -> Result<()> {
        write_clause(self, context, out, metadata, " order by ", order_by)
    }

    /// Render the page, negative starts count as zero and a non positive count selects every
    /// row.
    fn write_limit(&self, _context: &Context, out: &mut String, start: i64, count: i64) {
        if count > 0 {
            let _ = write!(out, " limit {},{}", start.max(0), count);
        }
    }

    fn write_select(
        &self,
        out: &mut String,
        metadata: &EntityMetadata,
        select: &Select,
        object: Option<&dyn Properties>,
    ) -> Result<()> {
        out.reserve(128 + metadata.field_count() * 32);
        out.push_str("select ");
        let context = Context::new(Fragment::SqlSelect, object);
        self.write_projection(&context, out, metadata, select.include, select.exclude)?;
        out.push_str(" from ");
        self.write_from(&context.switch_fragment(Fragment::SqlSelectFrom), out, metadata);
        self.write_where(
            &context.switch_fragment(Fragment::SqlSelectWhere),
            out,
            metadata,
            select.filter,
        )?;
        self.write_group_by(
            &context.switch_fragment(Fragment::SqlSelectGroupBy),
            out,
            metadata,
            select.group_by,
        )?;
        self.write_order_by(
            &context.switch_fragment(Fragment::SqlSelectOrderBy),
            out,
            metadata,
            select.order_by,
        )?;
        self.write_limit(&context, out, select.start, select.count);
        Ok(())
    }

    /// Render a single value select, `expression` is a template (`count(*)`, `max({#age})`).
    fn write_select_value(
        &self,
        out: &mut String,
        metadata: &EntityMetadata,
        expression: &str,
        filter: Option<&str>,
        object: Option<&dyn Properties>,
    ) -> Result<()> {
        out.push_str("select ");
        let context = Context::new(Fragment::SqlSelect, object);
        self.write_template(&context, out, metadata, expression)?;
        out.push_str(" from ");
        self.write_from(&context.switch_fragment(Fragment::SqlSelectFrom), out, metadata);
        self.write_where(
            &context.switch_fragment(Fragment::SqlSelectWhere),
            out,
            metadata,
            filter,
        )
    }

    /// Render the insert of `entity`, fields holding null are left out of the statement.
    fn write_insert(&self, out: &mut Query, helper: &MutationHelper, entity: &dyn Any) -> Result<()> {
        let metadata = helper.metadata();
        let mut columns = Vec::with_capacity(metadata.field_count());
        for (key, mapping) in metadata.fields() {
            if mapping.read_only || mapping.embedded {
                continue;
            }
            let value = read_field(metadata, entity, key)?;
            if value.is_null() {
                continue;
            }
            columns.push(mapping.column.as_str());
            out.params.push(value);
        }
        if columns.is_empty() {
            return Err(Error::with_args(
                Status::EmptyFieldListNotAllowed,
                [metadata.entity_name()],
            ));
        }
        let _ = write!(out.sql, "insert into {}(", helper.table());
        separated_by(&mut out.sql, columns.iter(), |out, v| out.push_str(v), ",");
        out.sql.push_str(") values (");
        separated_by(&mut out.sql, columns.iter(), |out, _| out.push('?'), ",");
        out.sql.push(')');
        Ok(())
    }

    /// Render the update of the selected fields of `entity`, null values included.
    ///
    /// The values of the filter placeholders are appended by the caller after the ones pushed
    /// here.
    fn write_update(
        &self,
        out: &mut Query,
        helper: &MutationHelper,
        entity: &dyn Any,
        include: Option<&str>,
        exclude: Option<&str>,
        filter: Option<&str>,
    ) -> Result<()> {
        let metadata = helper.metadata();
        let fields = select_fields(metadata, include, exclude)?
            .into_iter()
            .filter(|(_, mapping)| !mapping.read_only && !mapping.embedded)
            .collect::<Vec<_>>();
        if fields.is_empty() {
            return Err(Error::with_args(
                Status::EmptyFieldListNotAllowed,
                [metadata.entity_name()],
            ));
        }
        let _ = write!(out.sql, "update {} set ", helper.table());
        for (i, (key, mapping)) in fields.into_iter().enumerate() {
            out.params.push(read_field(metadata, entity, key)?);
            if i > 0 {
                out.sql.push(',');
            }
            let _ = write!(out.sql, "{}=?", mapping.column);
        }
        let context = Context::new(Fragment::SqlUpdateWhere, None);
        self.write_where(&context, &mut out.sql, metadata, filter)
    }

    fn write_delete(&self, out: &mut Query, helper: &MutationHelper, filter: Option<&str>) -> Result<()> {
        let _ = write!(out.sql, "delete from {}", helper.table());
        let context = Context::new(Fragment::SqlDeleteFromWhere, None);
        self.write_where(&context, &mut out.sql, helper.metadata(), filter)
    }
}

/// Stock dialect: every statement as written by the default methods of [`SqlWriter`].
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl SqlWriter for GenericSqlWriter {}

fn write_clause<W: SqlWriter + ?Sized>(
    writer: &W,
    context: &Context,
    out: &mut String,
    metadata: &EntityMetadata,
    keyword: &str,
    template: Option<&str>,
) -> Result<()> {
    let Some(template) = non_blank(template) else {
        return Ok(());
    };
    let mut resolved = String::new();
    writer.write_template(context, &mut resolved, metadata, template)?;
    let resolved = resolved.trim();
    if !resolved.is_empty() {
        out.push_str(keyword);
        out.push_str(resolved);
    }
    Ok(())
}

/// Fields named by the include list in its order, or the fields not in the exclude list in
/// metadata order, or every field.
fn select_fields<'m>(
    metadata: &'m EntityMetadata,
    include: Option<&str>,
    exclude: Option<&str>,
) -> Result<Vec<(&'m str, &'m FieldMapping)>> {
    let include = include.map(|v| split_list(v).collect::<Vec<_>>());
    if let Some(include) = include
        && !include.is_empty()
    {
        let mut result = Vec::with_capacity(include.len());
        for name in include {
            let Some((key, mapping)) = metadata.fields().find(|(key, _)| *key == name) else {
                return Err(Error::with_args(
                    Status::InvalidField,
                    [name, metadata.entity_name()],
                ));
            };
            if !result.iter().any(|(v, _)| *v == key) {
                result.push((key, mapping));
            }
        }
        return Ok(result);
    }
    let exclude = exclude.map(|v| split_list(v).collect::<Vec<_>>());
    Ok(metadata
        .fields()
        .filter(|(key, _)| exclude.as_ref().is_none_or(|v| !v.contains(key)))
        .collect())
}

fn read_field(metadata: &EntityMetadata, entity: &dyn Any, key: &str) -> Result<Value> {
    metadata.def().read(entity, key).ok_or_else(|| {
        Error::with_args(
            Status::PropertyAccessFailure,
            [metadata.entity_name(), key],
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit() {
        let writer = GenericSqlWriter;
        let context = Context::default();
        let mut out = String::new();
        writer.write_limit(&context, &mut out, -5, 10);
        let mut clamped = String::new();
        writer.write_limit(&context, &mut clamped, 0, 10);
        assert_eq!(out, " limit 0,10");
        assert_eq!(out, clamped);

        let mut out = String::new();
        writer.write_limit(&context, &mut out, 20, 0);
        writer.write_limit(&context, &mut out, 20, -1);
        assert_eq!(out, "");
    }

    #[test]
    fn test_projected_column() {
        let mut out = String::new();
        GenericSqlWriter.write_projected_column(
            &Context::default(),
            &mut out,
            "addr.STREET",
            "addr$street",
        );
        assert_eq!(out, "addr.STREET as ADDR$STREET");
    }
}
