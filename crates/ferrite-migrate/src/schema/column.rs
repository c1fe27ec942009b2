//! Column descriptors and their fluent modifiers.

use ferrite_sql_core::{SqlValue, ToSqlValue};

use crate::types::{TypeId, TypeOptions};

/// A foreign key target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignRef {
    /// Referenced table.
    pub table: String,
    /// Referenced column.
    pub column: String,
    /// Constraint name, populated by introspection. Required to drop
    /// the key.
    pub constraint: Option<String>,
}

/// Describes a single table column.
///
/// Columns are NOT NULL unless [`ColumnDescriptor::nullable`] is
/// called.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Column type.
    pub type_id: TypeId,
    /// Length / precision / signedness options.
    pub options: TypeOptions,
    /// Whether NULL is accepted.
    pub nullable: bool,
    /// Default value, stored in code representation.
    pub default: Option<SqlValue>,
    /// AUTO_INCREMENT flag.
    pub auto_increment: bool,
    /// Placement hint: the column this one follows in ALTERs.
    pub after: Option<String>,
    /// PRIMARY KEY membership.
    pub primary: bool,
    /// UNIQUE constraint.
    pub unique: bool,
    /// Foreign key target, if any.
    pub foreign: Option<ForeignRef>,
}

impl ColumnDescriptor {
    /// Creates a NOT NULL column of the given type.
    #[must_use]
    pub fn new(name: &str, type_id: TypeId) -> Self {
        Self {
            name: String::from(name),
            type_id,
            options: TypeOptions::default(),
            nullable: false,
            default: None,
            auto_increment: false,
            after: None,
            primary: false,
            unique: false,
            foreign: None,
        }
    }

    /// Sets the length option.
    pub fn length(&mut self, length: u32) -> &mut Self {
        self.options.length = Some(length);
        self
    }

    /// Sets the `(precision, scale)` option.
    pub fn precision(&mut self, precision: u8, scale: u8) -> &mut Self {
        self.options.precision = Some((precision, scale));
        self
    }

    /// Marks the column UNSIGNED.
    pub fn unsigned(&mut self) -> &mut Self {
        self.options.unsigned = true;
        self
    }

    /// Allows NULL.
    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Sets the default value.
    pub fn default<V: ToSqlValue>(&mut self, value: V) -> &mut Self {
        self.default = Some(value.to_sql_value());
        self
    }

    /// Marks the column AUTO_INCREMENT.
    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    /// Places the column after another in ALTER statements.
    pub fn after(&mut self, column: &str) -> &mut Self {
        self.after = Some(String::from(column));
        self
    }

    /// Adds the column to the primary key.
    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self
    }

    /// Adds a UNIQUE constraint.
    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    /// Points the column at a foreign key target.
    pub fn foreign(&mut self, table: &str, column: &str) -> &mut Self {
        self.foreign = Some(ForeignRef {
            table: String::from(table),
            column: String::from(column),
            constraint: None,
        });
        self
    }

    /// Conventional name for this column's UNIQUE index.
    #[must_use]
    pub fn unique_name(&self, table: &str) -> String {
        format!("uq_{table}_{}", self.name)
    }

    /// Name of the FK constraint: the introspected name when present,
    /// otherwise the conventional one used at creation time.
    #[must_use]
    pub fn foreign_name(&self, table: &str) -> Option<String> {
        self.foreign.as_ref().map(|f| {
            f.constraint
                .clone()
                .unwrap_or_else(|| format!("fk_{table}_{}", self.name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_not_null_by_default() {
        let column = ColumnDescriptor::new("email", TypeId::Varchar);
        assert!(!column.nullable);
        assert!(column.default.is_none());
    }

    #[test]
    fn modifier_order_does_not_matter() {
        let mut a = ColumnDescriptor::new("age", TypeId::Int);
        a.unsigned().nullable();
        let mut b = ColumnDescriptor::new("age", TypeId::Int);
        b.nullable().unsigned();
        assert_eq!(a, b);
    }

    #[test]
    fn constraint_names_follow_convention() {
        let mut column = ColumnDescriptor::new("user_id", TypeId::BigInt);
        column.foreign("users", "id");
        assert_eq!(column.unique_name("orders"), "uq_orders_user_id");
        assert_eq!(
            column.foreign_name("orders").as_deref(),
            Some("fk_orders_user_id")
        );
    }
}
