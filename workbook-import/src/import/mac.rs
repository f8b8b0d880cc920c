//! MAC (mandatory access control) sheet translation
//!
//! Each control row grants a role the `query`/`update`/`remove`/`create`
//! rights on either one entity (by `Entity:alias`) or a whole type (by
//! `Type:name`). Rows naming neither, or naming no role, are skipped.

use futures::future::join_all;

use super::lookup::DataLookup;
use super::types::{ImportError, ImportResult, Rights, Row, cell_text};

pub const ENTITY_ALIAS_COLUMN: &str = "Entity:alias";
pub const TYPE_NAME_COLUMN: &str = "Type:name";
pub const ROLE_NAME_COLUMN: &str = "Role:name";

/// What a grant applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacTarget {
    Alias(String),
    Type(String),
}

/// A rights grant read from one control row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacGrant {
    pub target: MacTarget,
    pub role: String,
    pub rights: Rights,
}

/// Read a control row; `None` when it names no target or no role
pub fn translate_mac_row(row: &Row) -> Option<MacGrant> {
    let target = if let Some(alias) = row.present(ENTITY_ALIAS_COLUMN) {
        MacTarget::Alias(cell_text(alias))
    } else if let Some(type_name) = row.present(TYPE_NAME_COLUMN) {
        MacTarget::Type(cell_text(type_name))
    } else {
        log::warn!("MAC row without {} or {} skipped", ENTITY_ALIAS_COLUMN, TYPE_NAME_COLUMN);
        return None;
    };

    let Some(role) = row.present(ROLE_NAME_COLUMN).map(cell_text) else {
        log::warn!("MAC row without {} skipped: {}", ROLE_NAME_COLUMN, row);
        return None;
    };

    Some(MacGrant {
        target,
        role,
        rights: Rights::from_row(row),
    })
}

/// Translate one control row and hand the grant to the lookup
///
/// Returns whether a grant was stored.
pub async fn store_mac_row(lookup: &dyn DataLookup, row: &Row) -> ImportResult<bool> {
    let Some(grant) = translate_mac_row(row) else {
        return Ok(false);
    };

    match &grant.target {
        MacTarget::Alias(alias) => lookup
            .store_mac_by_alias(alias, &grant.role, grant.rights)
            .await
            .map_err(|source| ImportError::lookup("storeMacByAlias", source))?,
        MacTarget::Type(type_name) => lookup
            .store_mac_by_type(type_name, &grant.role, grant.rights)
            .await
            .map_err(|source| ImportError::lookup("storeMacByType", source))?,
    }
    Ok(true)
}

/// Store every row of the control sheet, all rows in flight together
///
/// Returns the number of grants stored, or the first failure in row order.
pub async fn store_mac_sheet(lookup: &dyn DataLookup, rows: &[Row]) -> ImportResult<usize> {
    let results = join_all(rows.iter().map(|row| store_mac_row(lookup, row))).await;

    let mut stored = 0;
    for result in results {
        if result? {
            stored += 1;
        }
    }
    log::info!("Stored {} MAC grants from {} rows", stored, rows.len());
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::lookup::MemoryLookup;
    use crate::import::lookup::testing::RecordingLookup;
    use serde_json::json;

    #[tokio::test]
    async fn test_alias_grant() {
        let lookup = RecordingLookup::new(MemoryLookup::new());
        let row = Row::from_pairs([
            ("Entity:alias", json!("bob")),
            ("Role:name", json!("admin")),
            ("query", json!("1")),
            ("update", json!("")),
            ("remove", json!("")),
            ("create", json!("")),
        ]);

        assert!(store_mac_row(&lookup, &row).await.unwrap());

        let expected = Rights {
            query: true,
            update: false,
            remove: false,
            create: false,
        };
        assert_eq!(
            lookup.calls(),
            vec![format!("storeMacByAlias(bob, admin, {:?})", expected)]
        );
    }

    #[tokio::test]
    async fn test_type_grant() {
        let lookup = RecordingLookup::new(MemoryLookup::new());
        let row = Row::from_pairs([
            ("Type:name", json!("Employee")),
            ("Role:name", json!("hr")),
            ("query", json!(1)),
            ("update", json!(1)),
        ]);

        assert!(store_mac_row(&lookup, &row).await.unwrap());
        assert_eq!(lookup.calls_to("storeMacByType").len(), 1);
        let grants = lookup.inner.retrieve_mac(None, "Employee");
        assert!(grants["hr"].query && grants["hr"].update);
        assert!(!grants["hr"].remove && !grants["hr"].create);
    }

    #[test]
    fn test_alias_takes_precedence_over_type() {
        let row = Row::from_pairs([
            ("Entity:alias", json!("bob")),
            ("Type:name", json!("Employee")),
            ("Role:name", json!("admin")),
        ]);
        let grant = translate_mac_row(&row).unwrap();
        assert_eq!(grant.target, MacTarget::Alias("bob".into()));
    }

    #[tokio::test]
    async fn test_untargeted_row_is_skipped() {
        let lookup = RecordingLookup::new(MemoryLookup::new());
        let row = Row::from_pairs([("Role:name", json!("admin")), ("query", json!("1"))]);

        assert!(!store_mac_row(&lookup, &row).await.unwrap());
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_row_without_role_is_skipped() {
        let lookup = RecordingLookup::new(MemoryLookup::new());
        let by_alias = Row::from_pairs([("Entity:alias", json!("bob")), ("query", json!("1"))]);
        let by_type = Row::from_pairs([("Type:name", json!("Employee")), ("Role:name", json!(""))]);

        assert!(translate_mac_row(&by_alias).is_none());
        assert!(!store_mac_row(&lookup, &by_alias).await.unwrap());
        assert!(!store_mac_row(&lookup, &by_type).await.unwrap());
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sheet_counts_stored_grants() {
        let lookup = RecordingLookup::new(MemoryLookup::new());
        let rows = vec![
            Row::from_pairs([("Entity:alias", json!("a")), ("Role:name", json!("r"))]),
            Row::from_pairs([("Role:name", json!("r"))]),
            Row::from_pairs([("Type:name", json!("T")), ("Role:name", json!("r"))]),
        ];
        assert_eq!(store_mac_sheet(&lookup, &rows).await.unwrap(), 2);
    }
}
