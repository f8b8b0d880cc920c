//! Apply row cells onto an entity

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::path::{ColumnPath, property_path};
use crate::import::types::{
    Entity, ImportError, ImportResult, PropertyDescriptor, Relation, Row, cell_text, is_blank,
};

/// Column moved to the entity's top-level alias
pub const ALIAS_COLUMN: &str = "alias";

/// Fill an entity from one row
///
/// Declared properties are applied first, in schema order. The `alias`
/// column then becomes the entity alias, and every column not consumed by
/// those steps is written at its `:`-qualified location. Returns those
/// leftover columns, in row order.
pub fn apply_row(
    entity: &mut Entity,
    properties: &[PropertyDescriptor],
    row: &Row,
) -> ImportResult<Vec<String>> {
    let mut consumed: HashSet<String> = HashSet::new();

    for property in properties {
        apply_property(entity, property, row, &mut consumed)?;
    }

    if let Some(alias) = available(row, ALIAS_COLUMN, &consumed) {
        entity.alias = Some(cell_text(alias));
        consumed.insert(ALIAS_COLUMN.to_string());
    }

    let mut ad_hoc = Vec::new();
    for (column, value) in row.iter() {
        if consumed.contains(column) || is_blank(value) {
            continue;
        }
        set_column_value(entity, &ColumnPath::parse(column), value.clone());
        ad_hoc.push(column.to_string());
    }

    Ok(ad_hoc)
}

/// A non-blank cell that no earlier step has taken
fn available<'r>(row: &'r Row, column: &str, consumed: &HashSet<String>) -> Option<&'r Value> {
    if consumed.contains(column) {
        return None;
    }
    row.present(column)
}

fn apply_property(
    entity: &mut Entity,
    property: &PropertyDescriptor,
    row: &Row,
    consumed: &mut HashSet<String>,
) -> ImportResult<()> {
    if let Some(value) = available(row, &property.name, consumed) {
        let segments = property_path(property.doc_path());
        if !set_path(&mut entity.doc, &segments, value.clone()) {
            log::warn!(
                "Property '{}' of {} not written: '{}' crosses a non-object value",
                property.name,
                entity.type_name,
                property.doc_path()
            );
        }
        consumed.insert(property.name.clone());
        return Ok(());
    }

    let id_column = property.id_column();
    let alias_column = property.alias_column();

    if let (Some(type_name), Some(id_column), Some(alias_column)) =
        (&property.type_name, &id_column, &alias_column)
    {
        if let Some(id) = available(row, id_column, consumed) {
            entity.rel.insert(type_name.clone(), Relation::id(cell_text(id)));
            consumed.insert(id_column.clone());
            return Ok(());
        }
        if let Some(alias) = available(row, alias_column, consumed) {
            entity
                .rel
                .insert(type_name.clone(), Relation::alias(cell_text(alias)));
            consumed.insert(alias_column.clone());
            return Ok(());
        }
    }

    if property.required {
        return Err(ImportError::Validation {
            property: property.name.clone(),
            row: row.to_string(),
            id_column,
            alias_column,
        });
    }

    log::debug!(
        "Optional property '{}' of {} not supplied",
        property.name,
        entity.type_name
    );
    Ok(())
}

/// Write `value` at `segments` below `target`, creating intermediate
/// objects as needed. Existing objects are reused; blank intermediates are
/// replaced. Returns false when a non-object value is in the way.
pub fn set_path(target: &mut Map<String, Value>, segments: &[String], value: Value) -> bool {
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut location = target;
    for segment in parents {
        let slot = location
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if is_blank(slot) {
            *slot = Value::Object(Map::new());
        }
        location = match slot {
            Value::Object(map) => map,
            _ => return false,
        };
    }

    location.insert(last.clone(), value);
    true
}

/// Write an ad-hoc column value at its `:`-qualified location
///
/// Qualified columns land inside the named relationship. A relationship
/// still pending an id/alias lookup is replaced wholesale on resolution,
/// so values aimed at it are dropped.
pub fn set_column_value(entity: &mut Entity, path: &ColumnPath, value: Value) {
    let Some(first) = path.relations.first() else {
        set_path(&mut entity.doc, std::slice::from_ref(&path.property), value);
        return;
    };

    let relation = entity
        .rel
        .entry(first.clone())
        .or_insert_with(Relation::inline);

    if let Relation::Value(inner) = &mut *relation {
        if is_blank(inner) {
            *inner = Value::Object(Map::new());
        }
    }

    let written = match &mut *relation {
        Relation::Value(Value::Object(map)) => set_path(map, &path.nested_segments(), value),
        _ => false,
    };

    if !written {
        log::warn!(
            "Column '{}' of {} ignored: relationship '{}' does not accept inline values",
            path.segments().join("."),
            entity.type_name,
            first
        );
    }
}
