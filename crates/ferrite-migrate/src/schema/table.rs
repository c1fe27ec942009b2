//! Declarative table schemas.
//!
//! `Schema::new("users")` starts an empty description; the definition
//! methods append a column and hand back `&mut ColumnDescriptor` so
//! modifiers chain at the call site:
//!
//! ```rust
//! use ferrite_migrate::schema::Schema;
//!
//! let mut schema = Schema::new("users");
//! schema.increments("id");
//! schema.varchar("email", 255).unique();
//! schema.varchar("nickname", 64).nullable();
//! schema.timestamps();
//! ```

use crate::schema::column::ColumnDescriptor;
use crate::types::{TypeId, TypeOptions};

/// Comment marker identifying a junction table.
pub const PIVOT_MARKER: &str = "PIVOT;";

/// Default character set for new tables.
pub const DEFAULT_CHARSET: &str = "utf8mb4";

/// Default collation for new tables.
pub const DEFAULT_COLLATION: &str = "utf8mb4_unicode_ci";

/// An ordered description of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Table name.
    pub table: String,
    /// Columns in definition order.
    pub columns: Vec<ColumnDescriptor>,
    /// Character set.
    pub charset: String,
    /// Collation.
    pub collation: String,
    /// Table comment; doubles as a marker side-channel.
    pub comment: Option<String>,
}

impl Schema {
    /// Creates an empty schema with the default charset and collation.
    #[must_use]
    pub fn new(table: &str) -> Self {
        Self {
            table: String::from(table),
            columns: Vec::new(),
            charset: String::from(DEFAULT_CHARSET),
            collation: String::from(DEFAULT_COLLATION),
            comment: None,
        }
    }

    /// Sets the table comment.
    pub fn comment(&mut self, comment: &str) -> &mut Self {
        self.comment = Some(String::from(comment));
        self
    }

    /// Whether the table is marked as a junction table.
    #[must_use]
    pub fn is_pivot(&self) -> bool {
        self.comment
            .as_deref()
            .is_some_and(|c| c.starts_with(PIVOT_MARKER))
    }

    /// Finds a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Appends an already-built column.
    pub fn push(&mut self, column: ColumnDescriptor) -> &mut ColumnDescriptor {
        self.columns.push(column);
        // Just pushed, so never empty.
        let index = self.columns.len() - 1;
        &mut self.columns[index]
    }

    fn add(&mut self, name: &str, type_id: TypeId) -> &mut ColumnDescriptor {
        self.push(ColumnDescriptor::new(name, type_id))
    }

    fn add_sized(&mut self, name: &str, type_id: TypeId, length: u32) -> &mut ColumnDescriptor {
        let mut column = ColumnDescriptor::new(name, type_id);
        column.options = TypeOptions::length(length);
        self.push(column)
    }

    /// `BIT(length)` column.
    pub fn bit(&mut self, name: &str, length: u32) -> &mut ColumnDescriptor {
        self.add_sized(name, TypeId::Bit, length)
    }

    /// `TINYINT` column.
    pub fn tiny_int(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::TinyInt)
    }

    /// `TINYINT UNSIGNED` column.
    pub fn unsigned_tiny_int(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::TinyInt).unsigned()
    }

    /// `SMALLINT` column.
    pub fn small_int(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::SmallInt)
    }

    /// `SMALLINT UNSIGNED` column.
    pub fn unsigned_small_int(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::SmallInt).unsigned()
    }

    /// `MEDIUMINT` column.
    pub fn medium_int(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::MediumInt)
    }

    /// `MEDIUMINT UNSIGNED` column.
    pub fn unsigned_medium_int(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::MediumInt).unsigned()
    }

    /// `INT` column.
    pub fn integer(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::Int)
    }

    /// `INT UNSIGNED` column.
    pub fn unsigned_int(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::Int).unsigned()
    }

    /// `BIGINT` column.
    pub fn big_int(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::BigInt)
    }

    /// `BIGINT UNSIGNED` column.
    pub fn unsigned_big_int(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::BigInt).unsigned()
    }

    /// `FLOAT` column.
    pub fn float(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::Float)
    }

    /// `DOUBLE` column.
    pub fn double(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::Double)
    }

    /// `CHAR(length)` column.
    pub fn char(&mut self, name: &str, length: u32) -> &mut ColumnDescriptor {
        self.add_sized(name, TypeId::Char, length)
    }

    /// `VARCHAR(length)` column.
    pub fn varchar(&mut self, name: &str, length: u32) -> &mut ColumnDescriptor {
        self.add_sized(name, TypeId::Varchar, length)
    }

    /// `TINYTEXT` column.
    pub fn tiny_text(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::TinyText)
    }

    /// `TEXT` column.
    pub fn text(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::Text)
    }

    /// `MEDIUMTEXT` column.
    pub fn medium_text(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::MediumText)
    }

    /// `LONGTEXT` column.
    pub fn long_text(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::LongText)
    }

    /// `JSON` column.
    pub fn json(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::Json)
    }

    /// `DATE` column.
    pub fn date(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::Date)
    }

    /// `TIME` column.
    pub fn time(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::Time)
    }

    /// `DATETIME` column.
    pub fn date_time(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::DateTime)
    }

    /// `TIMESTAMP` column.
    pub fn timestamp(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::Timestamp)
    }

    /// `BIGINT UNSIGNED` primary key named `id`.
    pub fn primary(&mut self) -> &mut ColumnDescriptor {
        self.increments("id")
    }

    /// Auto-incrementing `BIGINT UNSIGNED` primary key.
    pub fn increments(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::BigInt)
            .unsigned()
            .auto_increment()
            .primary()
    }

    /// `CHAR(36)` column for textual UUIDs.
    pub fn uuid(&mut self, name: &str) -> &mut ColumnDescriptor {
        self.char(name, 36)
    }

    /// Nullable `created_at` and `updated_at` TIMESTAMP pair.
    pub fn timestamps(&mut self) {
        self.timestamp("created_at").nullable();
        self.timestamp("updated_at").nullable();
    }

    /// `BIGINT UNSIGNED` column with a foreign key to
    /// `table`.`column`.
    pub fn foreign(&mut self, name: &str, table: &str, column: &str) -> &mut ColumnDescriptor {
        self.add(name, TypeId::BigInt).unsigned().foreign(table, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrite_sql_core::SqlValue;

    #[test]
    fn new_schema_uses_utf8mb4_defaults() {
        let schema = Schema::new("users");
        assert_eq!(schema.charset, "utf8mb4");
        assert_eq!(schema.collation, "utf8mb4_unicode_ci");
        assert!(!schema.is_pivot());
    }

    #[test]
    fn definitions_preserve_order_and_chain() {
        let mut schema = Schema::new("users");
        schema.increments("id");
        schema.varchar("email", 255).unique();
        schema.tiny_int("signin_attempts").default(0);
        schema.timestamps();

        let names: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["id", "email", "signin_attempts", "created_at", "updated_at"]
        );
        assert!(schema.column("email").unwrap().unique);
        assert_eq!(
            schema.column("signin_attempts").unwrap().default,
            Some(SqlValue::Int(0))
        );
        assert!(schema.column("created_at").unwrap().nullable);
    }

    #[test]
    fn increments_is_an_unsigned_auto_increment_primary_key() {
        let mut schema = Schema::new("users");
        schema.increments("id");
        let id = schema.column("id").unwrap();
        assert_eq!(id.type_id, TypeId::BigInt);
        assert!(id.options.unsigned);
        assert!(id.auto_increment);
        assert!(id.primary);
    }

    #[test]
    fn foreign_helper_builds_an_unsigned_reference() {
        let mut schema = Schema::new("orders");
        schema.foreign("user_id", "users", "id");
        let fk = schema.column("user_id").unwrap();
        assert!(fk.options.unsigned);
        let target = fk.foreign.as_ref().unwrap();
        assert_eq!(target.table, "users");
        assert_eq!(target.column, "id");
    }

    #[test]
    fn pivot_marker_is_detected_by_prefix() {
        let mut schema = Schema::new("order_product");
        schema.comment("PIVOT; links orders to products");
        assert!(schema.is_pivot());
    }
}
