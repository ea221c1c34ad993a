use crate::{EntityMetadata, Error, Result, Status};
use std::sync::Arc;

/// Gate to the insert, update and delete statements of an entity.
///
/// Writing is only possible for entities mapped to exactly one table, the check happens once
/// here instead of on every statement.
#[derive(Debug, Clone)]
pub struct MutationHelper {
    metadata: Arc<EntityMetadata>,
    table: String,
}

impl MutationHelper {
    pub fn new(metadata: Arc<EntityMetadata>) -> Result<Self> {
        let table = match metadata.tables() {
            [(_, name)] => name.clone(),
            tables => {
                log::error!(
                    "Cannot write {}: it is mapped to {} tables",
                    metadata.entity_name(),
                    tables.len()
                );
                return Err(Error::with_args(
                    Status::InvalidEntityDefinition,
                    [metadata.entity_name(), "exactly one table is needed to write"],
                ));
            }
        };
        Ok(Self { metadata, table })
    }

    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    /// Name of the table written.
    pub fn table(&self) -> &str {
        &self.table
    }
}
