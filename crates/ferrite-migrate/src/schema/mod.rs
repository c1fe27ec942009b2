//! Table schemas: declared in code or rebuilt from catalog metadata.

mod column;
mod introspect;
mod table;

pub use column::{ColumnDescriptor, ForeignRef};
pub use introspect::{MetadataRow, MetadataSource, TableInfo};
pub use table::{Schema, DEFAULT_CHARSET, DEFAULT_COLLATION, PIVOT_MARKER};
