use crate::{
    Entity, EntityDef, EntityMetadata, Error, FieldDef, FieldKind, NestedMut, Result, RowLabeled,
    Status, Value, ValueType, column_name_for, field_name_for,
};
use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt::{self, Debug},
    marker::PhantomData,
    sync::{
        Arc, LazyLock, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

/// Converts a result row into a value.
pub trait RowMapper<R> {
    fn map_row(&self, row: &RowLabeled, index: usize) -> Result<R>;
}

impl<R, F> RowMapper<R> for F
where
    F: Fn(&RowLabeled, usize) -> Result<R>,
{
    fn map_row(&self, row: &RowLabeled, index: usize) -> Result<R> {
        self(row, index)
    }
}

/// Setter reached from the entity being mapped.
#[derive(Debug)]
pub struct ResolvedSetter {
    /// Accessors walked from the root entity to the owner of the field (bases, embedded entity).
    hops: Vec<NestedMut>,
    field: &'static FieldDef,
}

impl ResolvedSetter {
    pub fn field(&self) -> &'static FieldDef {
        self.field
    }
}

type SetterKey = (TypeId, String, String);

/// Memoizes the setter of each `(entity type, embedded prefix, column label)`, including the
/// labels that have none.
///
/// Entries are never evicted, the number of distinct labels seen is bounded by the projections
/// the application writes.
#[derive(Default)]
pub struct SetterCache {
    entries: RwLock<HashMap<SetterKey, Option<Arc<ResolvedSetter>>>>,
}

impl SetterCache {
    pub fn new() -> Self {
        Default::default()
    }

    /// Cache shared by the whole process.
    pub fn global() -> Arc<SetterCache> {
        static GLOBAL: LazyLock<Arc<SetterCache>> = LazyLock::new(Default::default);
        GLOBAL.clone()
    }

    /// Setter for the column `label`, read through the embedded field named after `prefix` when
    /// not empty.
    pub fn resolve(
        &self,
        def: &'static EntityDef,
        prefix: &str,
        label: &str,
    ) -> Option<Arc<ResolvedSetter>> {
        let key = ((def.type_id)(), prefix.to_owned(), label.to_owned());
        if let Some(entry) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return entry.clone();
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(key)
            .or_insert_with(|| {
                let mut hops = Vec::new();
                let owner = if prefix.is_empty() {
                    def
                } else {
                    find_embedded(def, prefix, &mut hops)?
                };
                find_value(owner, label, !prefix.is_empty(), &mut hops)
                    .map(|field| Arc::new(ResolvedSetter { hops, field }))
            })
            .clone()
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

impl Debug for SetterCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetterCache")
            .field("len", &self.len())
            .finish()
    }
}

fn matches_label(field: &FieldDef, label: &str) -> bool {
    field.name == field_name_for(label) || column_name_for(field.name).eq_ignore_ascii_case(label)
}

/// Value field matching `label` among the own fields, then inside the bases. Under an embedded
/// prefix the embedded entities are searched as well, they share the prefix of their owner.
fn find_value(
    def: &'static EntityDef,
    label: &str,
    flatten: bool,
    hops: &mut Vec<NestedMut>,
) -> Option<&'static FieldDef> {
    if let Some(field) = def
        .fields
        .iter()
        .find(|v| matches!(v.kind, FieldKind::Value { .. }) && matches_label(v, label))
    {
        return Some(field);
    }
    for field in def.fields.iter() {
        let nested = match &field.kind {
            FieldKind::Base(nested) => nested,
            FieldKind::Embedded(nested) if flatten => nested,
            _ => continue,
        };
        hops.push(nested.get_mut);
        if let Some(found) = find_value((nested.def)(), label, flatten, hops) {
            return Some(found);
        }
        hops.pop();
    }
    None
}

fn find_embedded(
    def: &'static EntityDef,
    prefix: &str,
    hops: &mut Vec<NestedMut>,
) -> Option<&'static EntityDef> {
    for field in def.fields.iter() {
        if let FieldKind::Embedded(nested) = &field.kind
            && matches_label(field, prefix)
        {
            hops.push(nested.get_mut);
            return Some((nested.def)());
        }
    }
    for nested in def.bases() {
        hops.push(nested.get_mut);
        if let Some(found) = find_embedded((nested.def)(), prefix, hops) {
            return Some(found);
        }
        hops.pop();
    }
    None
}

/// Reason a column was not assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// No field of the entity matches the column.
    MissingSetter,
    /// The field has a type that cannot be read from a row.
    UnsupportedType,
    /// The embedded entity holding the field is missing.
    NullEmbedded,
    /// The value cannot be converted to the type of the field.
    ConversionFailed,
    /// NULL for a field that is not an `Option`.
    NullValue,
}

/// Counters of the mapping work, skipped columns are grouped by [`Skip`] reason.
#[derive(Default, Debug)]
pub struct MappingDiagnostics {
    rows: AtomicU64,
    columns_set: AtomicU64,
    missing_setter: AtomicU64,
    unsupported_type: AtomicU64,
    null_embedded: AtomicU64,
    conversion_failed: AtomicU64,
    null_value: AtomicU64,
}

/// Point in time copy of a [`MappingDiagnostics`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingCounts {
    pub rows: u64,
    pub columns_set: u64,
    pub missing_setter: u64,
    pub unsupported_type: u64,
    pub null_embedded: u64,
    pub conversion_failed: u64,
    pub null_value: u64,
}

impl MappingCounts {
    pub fn skipped(&self) -> u64 {
        self.missing_setter
            + self.unsupported_type
            + self.null_embedded
            + self.conversion_failed
            + self.null_value
    }
}

impl MappingDiagnostics {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn record_skip(&self, skip: Skip) {
        let counter = match skip {
            Skip::MissingSetter => &self.missing_setter,
            Skip::UnsupportedType => &self.unsupported_type,
            Skip::NullEmbedded => &self.null_embedded,
            Skip::ConversionFailed => &self.conversion_failed,
            Skip::NullValue => &self.null_value,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MappingCounts {
        MappingCounts {
            rows: self.rows.load(Ordering::Relaxed),
            columns_set: self.columns_set.load(Ordering::Relaxed),
            missing_setter: self.missing_setter.load(Ordering::Relaxed),
            unsupported_type: self.unsupported_type.load(Ordering::Relaxed),
            null_embedded: self.null_embedded.load(Ordering::Relaxed),
            conversion_failed: self.conversion_failed.load(Ordering::Relaxed),
            null_value: self.null_value.load(Ordering::Relaxed),
        }
    }
}

/// Maps rows into `T` by column label.
///
/// A label `PREFIX$COLUMN` is assigned to the embedded entity stored in the field named after
/// `PREFIX`, which must already exist in `T::default()`. Columns that cannot be assigned are
/// skipped with a warning, the row is returned anyway.
pub struct EntityRowMapper<T> {
    setters: Arc<SetterCache>,
    diagnostics: Arc<MappingDiagnostics>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity + Default> EntityRowMapper<T> {
    /// The metadata proves the descriptor of `T` is well formed (no cycles among its nested
    /// entities).
    pub fn new(
        metadata: &EntityMetadata,
        setters: Arc<SetterCache>,
        diagnostics: Arc<MappingDiagnostics>,
    ) -> Result<Self> {
        if (metadata.def().type_id)() != TypeId::of::<T>() {
            return Err(Error::with_args(
                Status::InvalidEntityDefinition,
                [metadata.entity_name(), type_name::<T>()],
            ));
        }
        Ok(Self {
            setters,
            diagnostics,
            _entity: PhantomData,
        })
    }

    pub fn diagnostics(&self) -> &MappingDiagnostics {
        &self.diagnostics
    }

    fn assign(&self, entity: &mut T, label: &str, value: &Value) -> std::result::Result<(), Skip> {
        let (prefix, column) = label.split_once('$').unwrap_or(("", label));
        let setter = self
            .setters
            .resolve(T::entity_def(), prefix, column)
            .ok_or(Skip::MissingSetter)?;
        let FieldKind::Value { ty, nullable, set, .. } = &setter.field.kind else {
            return Err(Skip::MissingSetter);
        };
        let Some(set) = set else {
            return Err(Skip::UnsupportedType);
        };
        if let ValueType::Unsupported(..) = ty {
            return Err(Skip::UnsupportedType);
        }
        if value.is_null() && !nullable {
            return Err(Skip::NullValue);
        }
        let mut target: &mut dyn Any = entity;
        for hop in &setter.hops {
            target = hop(target).ok_or(Skip::NullEmbedded)?;
        }
        set(target, value.clone()).map_err(|e| {
            log::warn!("Cannot assign {label} of {}: {e:#}", type_name::<T>());
            Skip::ConversionFailed
        })
    }
}

impl<T: Entity + Default> RowMapper<T> for EntityRowMapper<T> {
    fn map_row(&self, row: &RowLabeled, _index: usize) -> Result<T> {
        let mut entity = T::default();
        for (label, value) in row.iter() {
            match self.assign(&mut entity, label, value) {
                Ok(()) => {
                    self.diagnostics.columns_set.fetch_add(1, Ordering::Relaxed);
                }
                Err(skip) => {
                    if skip != Skip::ConversionFailed {
                        log::warn!(
                            "Skipped column {label} of {}: {skip:?}",
                            type_name::<T>()
                        );
                    }
                    self.diagnostics.record_skip(skip);
                }
            }
        }
        self.diagnostics.rows.fetch_add(1, Ordering::Relaxed);
        Ok(entity)
    }
}

type SharedMapper<R> = Arc<dyn RowMapper<R> + Send + Sync>;

/// Row mappers for result types that are not entities, looked up by type.
#[derive(Default)]
pub struct RowMappers {
    mappers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RowMappers {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers the mapper of `R`, replacing the previous one.
    pub fn register<R: 'static>(&mut self, mapper: impl RowMapper<R> + Send + Sync + 'static) {
        let mapper: SharedMapper<R> = Arc::new(mapper);
        self.mappers.insert(TypeId::of::<R>(), Box::new(mapper));
    }

    pub fn get<R: 'static>(&self) -> Result<SharedMapper<R>> {
        self.mappers
            .get(&TypeId::of::<R>())
            .and_then(|v| v.downcast_ref::<SharedMapper<R>>())
            .cloned()
            .ok_or_else(|| Error::with_args(Status::MissingRowMapper, [type_name::<R>()]))
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}

impl Debug for RowMappers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowMappers")
            .field("len", &self.mappers.len())
            .finish()
    }
}
