//! Type schema descriptors served by the lookup

use serde::{Deserialize, Serialize};

/// A named entity type and its declared properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSchema {
    pub name: String,
    #[serde(default)]
    pub doc: TypeDoc,
}

/// Body of a type schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDoc {
    /// Ordered property declarations; `None` when the type declares none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties_list: Option<Vec<PropertyDescriptor>>,
}

impl TypeSchema {
    pub fn new(name: impl Into<String>, properties: Vec<PropertyDescriptor>) -> Self {
        TypeSchema {
            name: name.into(),
            doc: TypeDoc {
                properties_list: Some(properties),
            },
        }
    }

    /// A type with no property list at all
    pub fn without_properties(name: impl Into<String>) -> Self {
        TypeSchema {
            name: name.into(),
            doc: TypeDoc::default(),
        }
    }

    pub fn properties(&self) -> Option<&[PropertyDescriptor]> {
        self.doc.properties_list.as_deref()
    }
}

/// One declared property of a type
///
/// A property with `type_name` set is a relationship column: besides the
/// plain `name` column it may be supplied through `<type_name>:id` or
/// `<type_name>:alias`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Column name in the sheet
    pub name: String,
    /// Dotted path into the entity document (defaults to `name`)
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl PropertyDescriptor {
    /// Scalar property stored at `path`
    pub fn scalar(name: impl Into<String>, path: impl Into<String>) -> Self {
        PropertyDescriptor {
            name: name.into(),
            path: path.into(),
            type_name: None,
            required: false,
        }
    }

    /// Relationship property pointing at entities of `type_name`
    pub fn relationship(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let name = name.into();
        PropertyDescriptor {
            path: name.clone(),
            name,
            type_name: Some(type_name.into()),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Path used when the plain column is present
    pub fn doc_path(&self) -> &str {
        if self.path.is_empty() {
            &self.name
        } else {
            &self.path
        }
    }

    pub fn id_column(&self) -> Option<String> {
        self.type_name.as_ref().map(|t| format!("{}:id", t))
    }

    pub fn alias_column(&self) -> Option<String> {
        self.type_name.as_ref().map(|t| format!("{}:alias", t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_schema() {
        let schema: TypeSchema = serde_json::from_str(
            r#"{
                "name": "Employee",
                "doc": {
                    "propertiesList": [
                        {"name": "Name", "path": "name", "required": true},
                        {"name": "Department", "typeName": "Department"}
                    ]
                }
            }"#,
        )
        .unwrap();

        let props = schema.properties().unwrap();
        assert_eq!(props.len(), 2);
        assert!(props[0].required);
        assert_eq!(props[1].type_name.as_deref(), Some("Department"));
        assert!(!props[1].required);
        assert_eq!(props[1].doc_path(), "Department");
    }

    #[test]
    fn test_missing_doc_has_no_properties() {
        let schema: TypeSchema = serde_json::from_str(r#"{"name": "Ghost"}"#).unwrap();
        assert!(schema.properties().is_none());
    }

    #[test]
    fn test_override_columns() {
        let prop = PropertyDescriptor::relationship("Dept", "Department");
        assert_eq!(prop.id_column().as_deref(), Some("Department:id"));
        assert_eq!(prop.alias_column().as_deref(), Some("Department:alias"));
        assert!(PropertyDescriptor::scalar("a", "b").id_column().is_none());
    }
}
