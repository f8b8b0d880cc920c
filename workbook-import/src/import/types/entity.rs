//! Entity records produced from sheet rows

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::rights::MacGrants;

/// A related entity, either still pending lookup or materialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation {
    /// Reference by store id, resolved through `entityById`
    Id { id: String },
    /// Reference by alias, resolved through `entityByAlias`
    Alias { alias: String },
    /// Resolved entity, or inline data taken from ad-hoc columns
    Value(Value),
}

impl Relation {
    pub fn id(id: impl Into<String>) -> Self {
        Relation::Id { id: id.into() }
    }

    pub fn alias(alias: impl Into<String>) -> Self {
        Relation::Alias {
            alias: alias.into(),
        }
    }

    /// Empty inline object, filled by ad-hoc columns
    pub fn inline() -> Self {
        Relation::Value(Value::Object(Map::new()))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Relation::Id { .. } | Relation::Alias { .. })
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Relation::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// One entity built from one row
///
/// Every key in `rel` is present from the moment the relationship is
/// recorded; it holds either a pending reference or the resolved value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub doc: Map<String, Value>,
    #[serde(default)]
    pub rel: BTreeMap<String, Relation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub mac: MacGrants,
}

impl Entity {
    /// Fresh entity with an empty document and no relationships
    pub fn new(type_name: impl Into<String>) -> Self {
        Entity {
            type_name: type_name.into(),
            doc: Map::new(),
            rel: BTreeMap::new(),
            alias: None,
            mac: MacGrants::new(),
        }
    }

    /// Relationships still waiting for a lookup
    pub fn pending_relations(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.rel
            .iter()
            .filter(|(_, r)| r.is_pending())
            .map(|(k, r)| (k.as_str(), r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relation_serializes_as_placeholder() {
        assert_eq!(serde_json::to_value(Relation::id("42")).unwrap(), json!({"id": "42"}));
        assert_eq!(
            serde_json::to_value(Relation::alias("eng")).unwrap(),
            json!({"alias": "eng"})
        );
    }

    #[test]
    fn test_entity_serialized_shape() {
        let mut entity = Entity::new("Employee");
        entity.doc.insert("name".into(), json!("Ada"));
        entity.rel.insert("Department".into(), Relation::alias("eng"));
        entity.alias = Some("ada".into());

        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(value["type"], json!("Employee"));
        assert_eq!(value["doc"]["name"], json!("Ada"));
        assert_eq!(value["rel"]["Department"], json!({"alias": "eng"}));
        assert_eq!(value["alias"], json!("ada"));
        assert_eq!(value["mac"], json!({}));
    }

    #[test]
    fn test_pending_relations() {
        let mut entity = Entity::new("Employee");
        entity.rel.insert("Department".into(), Relation::id("1"));
        entity.rel.insert("Office".into(), Relation::inline());

        let pending: Vec<_> = entity.pending_relations().map(|(k, _)| k).collect();
        assert_eq!(pending, vec!["Department"]);
    }
}
