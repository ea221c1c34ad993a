use crate::{Error, Result, Status, Value};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

/// Reads a value field out of its owner, `None` when the owner has a different type.
pub type Getter = fn(&dyn Any) -> Option<Value>;
/// Converts the value and stores it into a field of the owner.
pub type Setter = fn(&mut dyn Any, Value) -> Result<()>;
/// Borrows a nested entity (embedded or base) out of its owner.
pub type NestedRef = fn(&dyn Any) -> Option<&dyn Any>;
pub type NestedMut = fn(&mut dyn Any) -> Option<&mut dyn Any>;

/// A struct mapped to one or more tables.
///
/// Implemented through `#[derive(Entity)]`, which generates the static descriptor of the struct.
pub trait Entity: Any + Send + Sync {
    fn entity_def() -> &'static EntityDef;
}

/// Static description of an entity type: what the metadata store reads to build the
/// [`EntityMetadata`](crate::EntityMetadata) of the type.
#[derive(Debug)]
pub struct EntityDef {
    /// Name of the Rust type.
    pub name: &'static str,
    pub type_id: fn() -> TypeId,
    /// Table declaration `alias=name,name2`, the name is derived from the type name when missing.
    pub tables: Option<&'static str>,
    /// Join condition appended to the where clause of every select.
    pub join: Option<&'static str>,
    /// Replaces the generated from clause.
    pub from: Option<&'static str>,
    /// Table used for audit trails.
    pub trace: Option<&'static str>,
    pub fields: Box<[FieldDef]>,
}

#[derive(Debug)]
pub struct FieldDef {
    pub name: &'static str,
    /// Declared column, `"-"` excludes the field from the mapping.
    pub column: Option<&'static str>,
    pub read_only: bool,
    pub kind: FieldKind,
}

#[derive(Debug)]
pub enum FieldKind {
    /// Scalar field stored in a column.
    Value {
        ty: ValueType,
        nullable: bool,
        get: Getter,
        /// Missing when the type of the field cannot be read from a row.
        set: Option<Setter>,
    },
    /// Entity nested in the owner, its fields are mapped as `prefix$field`.
    Embedded(Nested),
    /// Entity whose fields are flattened into the owner, unless the owner declares them too.
    Base(Nested),
    /// Field not persisted.
    Skip,
}

#[derive(Debug, Clone, Copy)]
pub struct Nested {
    pub def: fn() -> &'static EntityDef,
    pub get: NestedRef,
    pub get_mut: NestedMut,
}

/// Type of a value field, as far as the row mapper is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Int32,
    Int64,
    Float32,
    Float64,
    Date,
    Timestamp,
    /// Persisted through its getter but never assigned from a row. Carries the Rust type name.
    Unsupported(&'static str),
}

impl EntityDef {
    /// Field declared directly on the type.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|v| v.name == name)
    }

    pub fn bases(&self) -> impl Iterator<Item = &Nested> {
        self.fields.iter().filter_map(|v| match &v.kind {
            FieldKind::Base(nested) => Some(nested),
            _ => None,
        })
    }

    /// Reads a value out of `entity`, which must be of the type described.
    ///
    /// The path is either a field name or `embedded.field` (`embedded$field` is accepted too).
    /// Fields of the bases are visible. A field of a missing nested entity reads as the null of
    /// its type. Returns `None` when the path does not lead to a value.
    pub fn read(&self, entity: &dyn Any, path: &str) -> Option<Value> {
        if (*entity).type_id() != (self.type_id)() {
            return None;
        }
        let (head, rest) = split_path(path);
        match (self.field(head).map(|v| &v.kind), rest) {
            (Some(FieldKind::Value { get, .. }), None) => return get(entity),
            (Some(FieldKind::Embedded(nested)), Some(rest)) => {
                let def = (nested.def)();
                return match (nested.get)(entity) {
                    Some(sub) => def.read(sub, rest),
                    None => def.null_of(rest),
                };
            }
            _ => {}
        }
        self.bases().find_map(|nested| {
            let def = (nested.def)();
            match (nested.get)(entity) {
                Some(base) => def.read(base, path),
                None => def.null_of(path),
            }
        })
    }

    /// Null of the type of the value field at `path`, resolved like [`EntityDef::read`].
    fn null_of(&self, path: &str) -> Option<Value> {
        let (head, rest) = split_path(path);
        match (self.field(head).map(|v| &v.kind), rest) {
            (Some(FieldKind::Value { ty, .. }), None) => return Some(ty.null()),
            (Some(FieldKind::Embedded(nested)), Some(rest)) => {
                return (nested.def)().null_of(rest);
            }
            _ => {}
        }
        self.bases().find_map(|nested| (nested.def)().null_of(path))
    }

    /// Assigns a value field of `entity`, looking into the bases when the type does not declare
    /// it.
    pub fn write(&self, entity: &mut dyn Any, name: &str, value: Value) -> Result<()> {
        if let Some(FieldDef {
            kind: FieldKind::Value { set: Some(set), .. },
            ..
        }) = self.field(name)
        {
            return set(entity, value);
        }
        for nested in self.bases() {
            let def = (nested.def)();
            if !def.declares(name) {
                continue;
            }
            let Some(base) = (nested.get_mut)(entity) else {
                break;
            };
            return def.write(base, name, value);
        }
        Err(Error::with_args(
            Status::PropertyAccessFailure,
            [self.name, name],
        ))
    }

    fn declares(&self, name: &str) -> bool {
        matches!(
            self.field(name),
            Some(FieldDef {
                kind: FieldKind::Value { set: Some(..), .. },
                ..
            })
        ) || self.bases().any(|v| (v.def)().declares(name))
    }
}

fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once(['.', '$']) {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

impl ValueType {
    /// Typed null of the values stored in a field of this type.
    pub fn null(&self) -> Value {
        match self {
            ValueType::Text => Value::Varchar(None),
            ValueType::Int32 => Value::Int32(None),
            ValueType::Int64 => Value::Int64(None),
            ValueType::Float32 => Value::Float32(None),
            ValueType::Float64 => Value::Float64(None),
            ValueType::Date => Value::Date(None),
            ValueType::Timestamp => Value::Timestamp(None),
            ValueType::Unsupported(..) => Value::Null,
        }
    }
}

/// Named values a filter template can read as bare identifiers.
pub trait Properties {
    fn property(&self, path: &str) -> Option<Value>;
}

impl<T: Entity> Properties for T {
    fn property(&self, path: &str) -> Option<Value> {
        T::entity_def().read(self, path)
    }
}

impl Properties for HashMap<String, Value> {
    fn property(&self, path: &str) -> Option<Value> {
        self.get(path).cloned()
    }
}
