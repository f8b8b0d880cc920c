//! Entity builder: one row in, one committed entity out

use super::lookup::DataLookup;
use super::transform::{apply_row, resolve_relations};
use super::types::{Entity, ImportError, ImportResult, Row};

/// Build an entity of `type_name` from `row`, without resolving or storing it
///
/// Fetches the type schema, applies the row and attaches the MAC grants
/// for the entity's alias or type.
pub async fn prepare_entity(
    type_name: &str,
    lookup: &dyn DataLookup,
    row: &Row,
) -> ImportResult<Entity> {
    let schema = lookup
        .type_by_name(type_name)
        .await
        .map_err(|source| ImportError::lookup("typeByName", source))?
        .ok_or_else(|| ImportError::TypeNotFound {
            type_name: type_name.to_string(),
        })?;

    let properties = schema.properties().ok_or_else(|| ImportError::Schema {
        type_name: type_name.to_string(),
    })?;

    let mut entity = Entity::new(type_name);
    let ad_hoc = apply_row(&mut entity, properties, row)?;
    if !ad_hoc.is_empty() {
        log::debug!("{} row carried undeclared columns {:?}", type_name, ad_hoc);
    }

    entity.mac = lookup.retrieve_mac(entity.alias.as_deref(), type_name);
    Ok(entity)
}

/// Build, resolve and store one entity
///
/// Nothing is rolled back on failure: entities stored by other rows stay.
pub async fn build_entity(type_name: &str, lookup: &dyn DataLookup, row: &Row) -> ImportResult<()> {
    let mut entity = prepare_entity(type_name, lookup, row).await?;

    resolve_relations(&mut entity, lookup).await?;

    log::debug!(
        "Adding {} entity{}",
        type_name,
        entity
            .alias
            .as_deref()
            .map(|a| format!(" '{}'", a))
            .unwrap_or_default()
    );
    lookup
        .add(type_name, entity)
        .await
        .map_err(|source| ImportError::lookup("add", source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::lookup::testing::RecordingLookup;
    use crate::import::types::{PropertyDescriptor, Relation, Rights, TypeSchema};
    use serde_json::json;

    fn lookup() -> RecordingLookup {
        RecordingLookup::with_types([
            TypeSchema::new("Department", vec![PropertyDescriptor::scalar("Name", "name")]),
            TypeSchema::new(
                "Employee",
                vec![
                    PropertyDescriptor::scalar("Name", "name").required(),
                    PropertyDescriptor::relationship("Department", "Department").required(),
                ],
            ),
            TypeSchema::without_properties("Broken"),
        ])
    }

    #[tokio::test]
    async fn test_id_placeholder_resolved_before_add() {
        let lookup = lookup();
        let mut dept = Entity::new("Department");
        dept.doc.insert("name".into(), json!("Engineering"));
        let id = lookup.inner.seed(dept).unwrap();

        let row = Row::from_pairs([("Name", json!("Ada")), ("Department:id", json!(id.clone()))]);

        let prepared = prepare_entity("Employee", &lookup, &row).await.unwrap();
        assert_eq!(prepared.rel["Department"], Relation::id(id.clone()));

        build_entity("Employee", &lookup, &row).await.unwrap();

        let stored = lookup.inner.entities_of_type("Employee");
        assert_eq!(stored.len(), 1);
        let expected = lookup.inner.entity_by_id(&id).await.unwrap();
        assert_eq!(stored[0].entity.rel["Department"], Relation::Value(expected));
        assert_eq!(stored[0].entity.doc["name"], json!("Ada"));
    }

    #[tokio::test]
    async fn test_mac_attached_by_alias() {
        let lookup = lookup();
        lookup
            .inner
            .store_mac_by_alias("eng", "admin", Rights::all())
            .await
            .unwrap();

        let row = Row::from_pairs([("Name", json!("Engineering")), ("alias", json!("eng"))]);
        build_entity("Department", &lookup, &row).await.unwrap();

        let stored = lookup.inner.entities_of_type("Department");
        assert_eq!(stored[0].entity.mac.get("admin"), Some(&Rights::all()));
        assert!(lookup.calls().contains(&"retrieveMac(eng, Department)".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let lookup = lookup();
        let err = build_entity("Ghost", &lookup, &Row::new()).await.unwrap_err();
        assert!(matches!(err, ImportError::TypeNotFound { ref type_name } if type_name == "Ghost"));
    }

    #[tokio::test]
    async fn test_type_without_properties() {
        let lookup = lookup();
        let err = build_entity("Broken", &lookup, &Row::new()).await.unwrap_err();
        assert!(matches!(err, ImportError::Schema { .. }));
    }

    #[tokio::test]
    async fn test_validation_failure_stores_nothing() {
        let lookup = lookup();
        let row = Row::from_pairs([("Name", json!("Ada"))]);
        let err = build_entity("Employee", &lookup, &row).await.unwrap_err();

        assert!(matches!(err, ImportError::Validation { ref property, .. } if property == "Department"));
        assert!(lookup.calls_to("add").is_empty());
        assert_eq!(lookup.inner.entity_count(), 0);
    }

    #[tokio::test]
    async fn test_unresolvable_alias_stores_nothing() {
        let lookup = lookup();
        let row = Row::from_pairs([("Name", json!("Ada")), ("Department:alias", json!("nope"))]);
        let err = build_entity("Employee", &lookup, &row).await.unwrap_err();

        assert!(matches!(err, ImportError::Lookup { .. }));
        assert!(lookup.calls_to("add").is_empty());
    }
}
