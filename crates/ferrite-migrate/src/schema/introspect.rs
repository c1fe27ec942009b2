//! Rebuilding schema descriptors from catalog metadata.
//!
//! A [`MetadataSource`] supplies rows shaped like the
//! `information_schema.COLUMNS` view joined with key usage; this
//! module maps them back into [`ColumnDescriptor`]s so a live table
//! can be diffed against a declared one.

use tracing::debug;

use crate::error::Result;
use crate::schema::column::{ColumnDescriptor, ForeignRef};
use crate::schema::table::Schema;
use crate::types::{TypeId, TypeOptions, TypeRegistry};

use ferrite_sql_core::SqlValue;

/// One introspected column, as the catalog reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRow {
    /// `COLUMN_NAME`.
    pub column_name: String,
    /// `DATA_TYPE`: bare type keyword, lowercase.
    pub data_type: String,
    /// `COLUMN_TYPE`: full type expression, carries `unsigned`.
    pub column_type: String,
    /// `IS_NULLABLE`: `YES` or `NO`.
    pub is_nullable: String,
    /// `COLUMN_KEY`: empty, `PRI`, `UNI`, or `MUL`.
    pub column_key: String,
    /// `EXTRA`: carries `auto_increment`.
    pub extra: String,
    /// `COLUMN_DEFAULT` in storage text form.
    pub column_default: Option<String>,
    /// `CHARACTER_MAXIMUM_LENGTH`.
    pub character_maximum_length: Option<u32>,
    /// `NUMERIC_PRECISION`.
    pub numeric_precision: Option<u8>,
    /// `NUMERIC_SCALE`.
    pub numeric_scale: Option<u8>,
    /// Referenced table for FK columns.
    pub referenced_table: Option<String>,
    /// Referenced column for FK columns.
    pub referenced_column: Option<String>,
    /// FK constraint name.
    pub constraint_name: Option<String>,
}

/// Table-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Character set.
    pub charset: String,
    /// Collation.
    pub collation: String,
    /// Table comment.
    pub comment: Option<String>,
}

/// Supplies catalog metadata for live tables.
pub trait MetadataSource {
    /// Column rows for `table`, in ordinal position order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`](crate::error::SchemaError) when the
    /// catalog cannot be read.
    fn columns(&mut self, table: &str) -> Result<Vec<MetadataRow>>;

    /// Charset, collation, and comment for `table`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`](crate::error::SchemaError) when the
    /// catalog cannot be read.
    fn table_info(&mut self, table: &str) -> Result<TableInfo>;
}

impl ColumnDescriptor {
    /// Rebuilds a descriptor from one catalog row.
    ///
    /// The stored default is decoded through the type's converter so
    /// the descriptor carries it in code representation, same as a
    /// declared column would.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`](crate::error::SchemaError::UnknownType)
    /// for an unrecognized `DATA_TYPE` and
    /// [`SchemaError::InvalidValue`](crate::error::SchemaError::InvalidValue)
    /// for a default that does not parse as the column's type.
    pub fn from_metadata(row: &MetadataRow, registry: &TypeRegistry) -> Result<Self> {
        let type_id = TypeId::from_data_type(&row.data_type)?;

        let precision = match (row.numeric_precision, row.numeric_scale) {
            (Some(p), Some(s)) if matches!(type_id, TypeId::Float | TypeId::Double) => {
                Some((p, s))
            }
            _ => None,
        };
        let options = TypeOptions {
            length: row.character_maximum_length,
            precision,
            unsigned: row.column_type.to_ascii_lowercase().contains("unsigned"),
        };

        let default = match &row.column_default {
            Some(text) => {
                let converter = registry.converter(type_id);
                Some(converter.to_code(&SqlValue::Text(text.clone()))?)
            }
            None => None,
        };

        let mut column = Self::new(&row.column_name, type_id);
        column.options = options;
        column.nullable = row.is_nullable.eq_ignore_ascii_case("yes");
        column.default = default;
        column.auto_increment = row.extra.to_ascii_lowercase().contains("auto_increment");
        column.primary = row.column_key.eq_ignore_ascii_case("pri");
        column.unique = row.column_key.eq_ignore_ascii_case("uni");
        if let (Some(table), Some(target)) = (&row.referenced_table, &row.referenced_column) {
            column.foreign = Some(ForeignRef {
                table: table.clone(),
                column: target.clone(),
                constraint: row.constraint_name.clone(),
            });
        }
        Ok(column)
    }
}

impl Schema {
    /// Assembles a full schema from catalog metadata.
    ///
    /// # Errors
    ///
    /// Propagates source failures and per-column mapping errors.
    pub fn from_metadata(
        source: &mut dyn MetadataSource,
        registry: &TypeRegistry,
        table: &str,
    ) -> Result<Self> {
        let info = source.table_info(table)?;
        let rows = source.columns(table)?;

        let mut schema = Self::new(table);
        schema.charset = info.charset;
        schema.collation = info.collation;
        schema.comment = info.comment;
        for row in &rows {
            schema
                .columns
                .push(ColumnDescriptor::from_metadata(row, registry)?);
        }
        debug!(table, columns = schema.columns.len(), "introspected schema");
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    fn varchar_row() -> MetadataRow {
        MetadataRow {
            column_name: String::from("email"),
            data_type: String::from("varchar"),
            column_type: String::from("varchar(255)"),
            is_nullable: String::from("NO"),
            column_key: String::from("UNI"),
            character_maximum_length: Some(255),
            ..MetadataRow::default()
        }
    }

    #[test]
    fn varchar_metadata_maps_onto_a_descriptor() {
        let registry = TypeRegistry::new();
        let column = ColumnDescriptor::from_metadata(&varchar_row(), &registry).unwrap();
        assert_eq!(column.type_id, TypeId::Varchar);
        assert_eq!(column.options.length, Some(255));
        assert!(!column.nullable);
        assert!(column.unique);
        assert!(!column.primary);
    }

    #[test]
    fn primary_key_and_auto_increment_flags_are_read() {
        let registry = TypeRegistry::new();
        let row = MetadataRow {
            column_name: String::from("id"),
            data_type: String::from("bigint"),
            column_type: String::from("bigint unsigned"),
            is_nullable: String::from("NO"),
            column_key: String::from("PRI"),
            extra: String::from("auto_increment"),
            ..MetadataRow::default()
        };
        let column = ColumnDescriptor::from_metadata(&row, &registry).unwrap();
        assert!(column.primary);
        assert!(column.auto_increment);
        assert!(column.options.unsigned);
    }

    #[test]
    fn foreign_key_metadata_carries_the_constraint_name() {
        let registry = TypeRegistry::new();
        let row = MetadataRow {
            column_name: String::from("user_id"),
            data_type: String::from("bigint"),
            column_type: String::from("bigint unsigned"),
            is_nullable: String::from("NO"),
            column_key: String::from("MUL"),
            referenced_table: Some(String::from("users")),
            referenced_column: Some(String::from("id")),
            constraint_name: Some(String::from("orders_ibfk_1")),
            ..MetadataRow::default()
        };
        let column = ColumnDescriptor::from_metadata(&row, &registry).unwrap();
        let foreign = column.foreign.clone().unwrap();
        assert_eq!(foreign.constraint.as_deref(), Some("orders_ibfk_1"));
        assert_eq!(column.foreign_name("orders").as_deref(), Some("orders_ibfk_1"));
    }

    #[test]
    fn stored_default_decodes_through_the_type() {
        let registry = TypeRegistry::new();
        let row = MetadataRow {
            column_name: String::from("starts_at"),
            data_type: String::from("datetime"),
            column_type: String::from("datetime"),
            is_nullable: String::from("YES"),
            column_default: Some(String::from("2024-01-01 00:00:00")),
            ..MetadataRow::default()
        };
        let column = ColumnDescriptor::from_metadata(&row, &registry).unwrap();
        assert!(matches!(column.default, Some(SqlValue::DateTime(_))));
    }

    #[test]
    fn unknown_data_type_fails_the_mapping() {
        let registry = TypeRegistry::new();
        let row = MetadataRow {
            column_name: String::from("shape"),
            data_type: String::from("geometry"),
            ..MetadataRow::default()
        };
        assert!(matches!(
            ColumnDescriptor::from_metadata(&row, &registry),
            Err(SchemaError::UnknownType(_))
        ));
    }
}
