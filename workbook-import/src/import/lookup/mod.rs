//! Data lookup: the collaborator that serves schemas, resolves references
//! and stores imported entities and access grants

mod memory;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{Entity, MacGrants, Rights, TypeSchema};

pub use memory::{MemoryLookup, SchemaCatalog, StoreSnapshot, StoredEntity};

/// Operations an import needs from its data store
///
/// Implementations must accept concurrent calls: every row pipeline of a
/// sheet is in flight at the same time.
#[async_trait]
pub trait DataLookup: Send + Sync {
    /// Schema for a type, `None` when the type is unknown
    async fn type_by_name(&self, type_name: &str) -> anyhow::Result<Option<TypeSchema>>;

    async fn entity_by_id(&self, id: &str) -> anyhow::Result<Value>;

    async fn entity_by_alias(&self, alias: &str) -> anyhow::Result<Value>;

    /// Persist a finished entity
    async fn add(&self, type_name: &str, entity: Entity) -> anyhow::Result<()>;

    async fn store_mac_by_alias(
        &self,
        alias: &str,
        role_name: &str,
        rights: Rights,
    ) -> anyhow::Result<()>;

    async fn store_mac_by_type(
        &self,
        type_name: &str,
        role_name: &str,
        rights: Rights,
    ) -> anyhow::Result<()>;

    /// Grants for an alias or, failing that, its type. Answered directly,
    /// without suspending.
    fn retrieve_mac(&self, alias: Option<&str>, type_name: &str) -> MacGrants;
}
