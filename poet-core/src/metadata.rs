use crate::{
    EntityDef, Error, FieldDef, FieldKind, Result, Status, column_name_for, non_blank,
    table_name_for,
};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{
        Arc, LazyLock, PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// How a field key is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Column expression, `ALIAS.COLUMN` for the fields of an embedded entity.
    pub column: String,
    /// Never written by insert and update statements.
    pub read_only: bool,
    /// Registered through an embedded field, the key is `prefix$field`.
    pub embedded: bool,
}

/// Table and column mapping of one entity type.
///
/// Built once per type by the [`MetadataStore`] and immutable afterwards.
#[derive(Debug)]
pub struct EntityMetadata {
    def: &'static EntityDef,
    tables: Vec<(String, String)>,
    from_clause: Option<String>,
    join_clause: Option<String>,
    trace_table: Option<String>,
    fields: Vec<(String, FieldMapping)>,
    index: HashMap<String, usize>,
    references: HashMap<String, String>,
}

impl EntityMetadata {
    /// Extracts the mapping out of the static descriptor of an entity.
    pub fn build(def: &'static EntityDef) -> Result<Self> {
        let declaration = match non_blank(def.tables) {
            Some(tables) => tables.to_owned(),
            None => table_name_for(def.name),
        };
        let tables = parse_tables(&declaration);
        if tables.is_empty() {
            return Err(Error::with_args(
                Status::InvalidEntityDefinition,
                [def.name, "no table declared"],
            ));
        }
        let mut result = Self {
            def,
            tables,
            from_clause: non_blank(def.from).map(str::to_owned),
            join_clause: non_blank(def.join).map(str::to_owned),
            trace_table: non_blank(def.trace).map(str::to_owned),
            fields: Vec::with_capacity(def.fields.len()),
            index: HashMap::with_capacity(def.fields.len()),
            references: HashMap::new(),
        };
        let mut visiting = Vec::new();
        result.collect(def, &mut visiting)?;
        Ok(result)
    }

    fn collect(&mut self, def: &'static EntityDef, visiting: &mut Vec<TypeId>) -> Result<()> {
        enter(def, visiting)?;
        for field in def.fields.iter() {
            match &field.kind {
                FieldKind::Value { .. } => self.register(field, None),
                FieldKind::Embedded(nested) => {
                    self.collect_embedded(field.name, (nested.def)(), visiting)?
                }
                FieldKind::Base(..) | FieldKind::Skip => {}
            }
        }
        // Bases last so the fields declared on the type win
        for nested in def.bases() {
            self.collect((nested.def)(), visiting)?;
        }
        visiting.pop();
        Ok(())
    }

    fn collect_embedded(
        &mut self,
        prefix: &str,
        def: &'static EntityDef,
        visiting: &mut Vec<TypeId>,
    ) -> Result<()> {
        enter(def, visiting)?;
        for field in def.fields.iter() {
            match &field.kind {
                FieldKind::Value { .. } => self.register(field, Some(prefix)),
                FieldKind::Embedded(nested) | FieldKind::Base(nested) => {
                    self.collect_embedded(prefix, (nested.def)(), visiting)?
                }
                FieldKind::Skip => {}
            }
        }
        visiting.pop();
        Ok(())
    }

    fn register(&mut self, field: &FieldDef, prefix: Option<&str>) {
        let key = match prefix {
            Some(prefix) => format!("{prefix}${}", field.name),
            None => field.name.to_owned(),
        };
        if self.index.contains_key(&key) {
            return;
        }
        let column = match field.column.map(str::trim) {
            Some("-") => return,
            Some(column) if !column.is_empty() => column.to_owned(),
            _ => match prefix {
                Some(prefix) => format!("{prefix}.{}", column_name_for(field.name)),
                None => column_name_for(field.name),
            },
        };
        if let Some(prefix) = prefix {
            self.references
                .insert(format!("{prefix}.{}", field.name), column.clone());
        }
        self.index.insert(key.clone(), self.fields.len());
        self.fields.push((
            key,
            FieldMapping {
                column,
                read_only: field.read_only,
                embedded: prefix.is_some(),
            },
        ));
    }

    pub fn def(&self) -> &'static EntityDef {
        self.def
    }
    pub fn entity_name(&self) -> &'static str {
        self.def.name
    }
    /// Declared tables as `(alias, name)`, in declaration order.
    pub fn tables(&self) -> &[(String, String)] {
        &self.tables
    }
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
    pub fn table_aliases(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(alias, _)| alias.as_str())
    }
    pub fn table_name(&self, alias: &str) -> Option<&str> {
        self.tables
            .iter()
            .find(|(v, _)| v == alias)
            .map(|(_, name)| name.as_str())
    }
    pub fn from_clause(&self) -> Option<&str> {
        self.from_clause.as_deref()
    }
    pub fn join_clause(&self) -> Option<&str> {
        self.join_clause.as_deref()
    }
    pub fn trace_table(&self) -> Option<&str> {
        self.trace_table.as_deref()
    }
    /// Field keys with their mapping, in metadata order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldMapping)> {
        self.fields.iter().map(|(key, mapping)| (key.as_str(), mapping))
    }
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
    pub fn field(&self, key: &str) -> Option<&FieldMapping> {
        self.index.get(key).map(|&i| &self.fields[i].1)
    }
    pub fn field_column(&self, key: &str) -> Option<&str> {
        self.field(key).map(|v| v.column.as_str())
    }
    pub fn is_field_read_only(&self, key: &str) -> bool {
        self.field(key).is_some_and(|v| v.read_only)
    }
    /// Column of an embedded field addressed as `prefix.field`.
    pub fn reference(&self, alias: &str) -> Option<&str> {
        self.references.get(alias).map(String::as_str)
    }
    /// Column bound to `#name` in templates: a field key first, then an embedded reference.
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.field_column(name).or_else(|| self.reference(name))
    }
}

fn enter(def: &EntityDef, visiting: &mut Vec<TypeId>) -> Result<()> {
    let id = (def.type_id)();
    if visiting.contains(&id) {
        return Err(Error::with_args(
            Status::InvalidEntityDefinition,
            [def.name, "cyclic embedded or base field"],
        ));
    }
    visiting.push(id);
    Ok(())
}

fn parse_tables(declaration: &str) -> Vec<(String, String)> {
    let compact = declaration
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    compact
        .split(',')
        .filter(|v| !v.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((alias, name)) => (alias.to_owned(), name.to_owned()),
            None => (entry.to_owned(), entry.to_owned()),
        })
        .collect()
}

/// Memoizes the [`EntityMetadata`] of every entity type.
///
/// Entries are created on first use and never evicted. Lookups of known types only take the
/// read lock, a missing entry is built under the write lock after checking again, so exactly
/// one instance is ever published per type.
#[derive(Default, Debug)]
pub struct MetadataStore {
    entries: RwLock<HashMap<TypeId, Arc<EntityMetadata>>>,
    builds: AtomicUsize,
}

impl MetadataStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Store shared by the whole process.
    pub fn global() -> Arc<MetadataStore> {
        static GLOBAL: LazyLock<Arc<MetadataStore>> = LazyLock::new(Default::default);
        GLOBAL.clone()
    }

    pub fn definition_for<T: crate::Entity>(&self) -> Result<Arc<EntityMetadata>> {
        self.definition_of(T::entity_def())
    }

    pub fn definition_of(&self, def: &'static EntityDef) -> Result<Arc<EntityMetadata>> {
        let key = (def.type_id)();
        if let Some(metadata) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(metadata.clone());
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(metadata) = entries.get(&key) {
            return Ok(metadata.clone());
        }
        self.builds.fetch_add(1, Ordering::Relaxed);
        let metadata = Arc::new(EntityMetadata::build(def)?);
        log::debug!(
            "Built the metadata of {}: {} table(s), {} field(s)",
            def.name,
            metadata.table_count(),
            metadata.field_count()
        );
        entries.insert(key, metadata.clone());
        Ok(metadata)
    }

    /// Number of descriptor extractions performed so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
