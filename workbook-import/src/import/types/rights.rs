//! Access rights granted through the MAC sheet

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::sheet::{Row, is_truthy};

/// Rights flags for one role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rights {
    pub query: bool,
    pub update: bool,
    pub remove: bool,
    pub create: bool,
}

impl Rights {
    /// Read the four flag columns of a control row
    pub fn from_row(row: &Row) -> Self {
        let flag = |column: &str| row.get(column).is_some_and(is_truthy);
        Rights {
            query: flag("query"),
            update: flag("update"),
            remove: flag("remove"),
            create: flag("create"),
        }
    }

    pub fn all() -> Self {
        Rights {
            query: true,
            update: true,
            remove: true,
            create: true,
        }
    }
}

/// Rights attached to an entity, keyed by role name
pub type MacGrants = BTreeMap<String, Rights>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rights_from_row() {
        let row = Row::from_pairs([
            ("query", json!("1")),
            ("update", json!("")),
            ("remove", json!(0)),
            ("create", json!(true)),
        ]);
        assert_eq!(
            Rights::from_row(&row),
            Rights {
                query: true,
                update: false,
                remove: false,
                create: true,
            }
        );
    }

    #[test]
    fn test_missing_columns_are_false() {
        assert_eq!(Rights::from_row(&Row::new()), Rights::default());
    }
}
