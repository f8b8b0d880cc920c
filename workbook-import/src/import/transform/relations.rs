//! Resolve pending relationship references through the lookup

use crate::import::lookup::DataLookup;
use crate::import::types::{Entity, ImportError, ImportResult, Relation};

/// Replace every pending `{id}` / `{alias}` reference with the entity the
/// lookup returns. Inline values pass through untouched.
///
/// References are resolved one after another; the first failing lookup
/// aborts the entity.
pub async fn resolve_relations(entity: &mut Entity, lookup: &dyn DataLookup) -> ImportResult<()> {
    for (name, relation) in entity.rel.iter_mut() {
        let resolved = match &*relation {
            Relation::Id { id } => {
                log::debug!("Resolving {} relationship '{}' by id {}", entity.type_name, name, id);
                lookup
                    .entity_by_id(id)
                    .await
                    .map_err(|source| ImportError::lookup("entityById", source))?
            }
            Relation::Alias { alias } => {
                log::debug!(
                    "Resolving {} relationship '{}' by alias {}",
                    entity.type_name,
                    name,
                    alias
                );
                lookup
                    .entity_by_alias(alias)
                    .await
                    .map_err(|source| ImportError::lookup("entityByAlias", source))?
            }
            Relation::Value(_) => continue,
        };
        *relation = Relation::Value(resolved);
    }
    Ok(())
}
