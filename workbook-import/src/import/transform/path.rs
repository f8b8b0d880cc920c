//! Column name and property path resolution

/// Where a sheet column lands inside an entity
///
/// `Department:Manager:name` is the `name` property of the `Manager`
/// relationship of the `Department` relationship, i.e. the segments
/// `rel.Department.rel.Manager.doc.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPath {
    /// Relationship qualifiers, outermost first
    pub relations: Vec<String>,
    /// Final property name
    pub property: String,
}

impl ColumnPath {
    /// Parse a `:`-qualified column name
    ///
    /// Empty segments are kept as empty keys.
    pub fn parse(column: &str) -> Self {
        let mut parts: Vec<String> = column.split(':').map(str::to_string).collect();
        // split always yields at least one part
        let property = parts.pop().unwrap_or_default();
        ColumnPath {
            relations: parts,
            property,
        }
    }

    /// Whether the column targets the entity's own document
    pub fn is_local(&self) -> bool {
        self.relations.is_empty()
    }

    /// Full segment list: `rel`, qualifier, ..., `doc`, property
    pub fn segments(&self) -> Vec<String> {
        segments_for(&self.relations, &self.property)
    }

    /// Segments below the first relationship, for writing inside it
    pub fn nested_segments(&self) -> Vec<String> {
        segments_for(self.relations.get(1..).unwrap_or(&[]), &self.property)
    }
}

fn segments_for(relations: &[String], property: &str) -> Vec<String> {
    let mut segments = Vec::with_capacity(relations.len() * 2 + 2);
    for relation in relations {
        segments.push("rel".to_string());
        segments.push(relation.clone());
    }
    segments.push("doc".to_string());
    segments.push(property.to_string());
    segments
}

/// Split a schema property path such as `address.city` on dots
pub fn property_path(path: &str) -> Vec<String> {
    path.split('.').map(str::to_string).collect()
}
