use crate::{EntityMetadata, Properties, Value};
use anyhow::{Error, Result};

/// Symbols visible to a template.
///
/// `#name` is bound to the column of the field (or embedded reference) `name` of the entity,
/// a bare `name` reads the property of the filter object.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    metadata: &'a EntityMetadata,
    object: Option<&'a dyn Properties>,
}

impl<'a> Scope<'a> {
    pub fn new(metadata: &'a EntityMetadata, object: Option<&'a dyn Properties>) -> Self {
        Self { metadata, object }
    }

    pub fn binding(&self, name: &str) -> Result<Value> {
        self.metadata
            .binding(name)
            .map(|v| Value::Varchar(Some(v.to_owned())))
            .ok_or_else(|| {
                Error::msg(format!(
                    "Unknown field `#{name}` of {}",
                    self.metadata.entity_name()
                ))
            })
    }

    pub fn property(&self, path: &str) -> Result<Value> {
        let Some(object) = self.object else {
            return Err(Error::msg(format!(
                "Cannot read `{path}` without a filter object"
            )));
        };
        object
            .property(path)
            .ok_or_else(|| Error::msg(format!("Unknown property `{path}` of the filter object")))
    }
}
