//! Row-to-entity transforms: path resolution, property application and
//! relationship resolution

mod path;
mod properties;
mod relations;

pub use path::{ColumnPath, property_path};
pub use properties::{apply_row, set_column_value, set_path};
pub use relations::resolve_relations;
