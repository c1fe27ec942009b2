//! The INSERT description and its fluent builder.

use std::collections::BTreeMap;

use crate::value::{SqlValue, ToSqlValue};

/// One row of column/value pairs.
///
/// Keys are held sorted, so a single-row insert already lists its
/// columns in sorted order and multi-row inserts union cleanly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowValues {
    pub(crate) values: BTreeMap<String, SqlValue>,
}

impl RowValues {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets one column's value.
    #[must_use]
    pub fn set<V: ToSqlValue>(mut self, column: &str, value: V) -> Self {
        self.values
            .insert(String::from(column), value.to_sql_value());
        self
    }

    /// Returns `true` if no values were set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The structured description of one INSERT prior to compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub(crate) table: String,
    pub(crate) rows: Vec<RowValues>,
}

impl Insert {
    /// Creates an insert into `table` with no rows yet.
    #[must_use]
    pub const fn table(table: String) -> Self {
        Self {
            table,
            rows: Vec::new(),
        }
    }

    /// Creates an insert into `table`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn into(table: &str) -> Self {
        Self::table(String::from(table))
    }

    /// Adds one row, built through the closure.
    #[must_use]
    pub fn row<F>(mut self, f: F) -> Self
    where
        F: FnOnce(RowValues) -> RowValues,
    {
        self.rows.push(f(RowValues::new()));
        self
    }

    /// Adds an already-built row.
    #[must_use]
    pub fn push_row(mut self, row: RowValues) -> Self {
        self.rows.push(row);
        self
    }

    /// Returns the target table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Returns the rows added so far.
    #[must_use]
    pub fn rows(&self) -> &[RowValues] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_keys_are_sorted() {
        let insert = Insert::into("users").row(|r| r.set("name", "a").set("age", 5));
        let keys: Vec<&String> = insert.rows[0].values.keys().collect();
        assert_eq!(keys, vec!["age", "name"]);
    }

    #[test]
    fn multiple_rows_accumulate() {
        let insert = Insert::into("users")
            .row(|r| r.set("name", "a"))
            .row(|r| r.set("name", "b").set("age", 5));
        assert_eq!(insert.rows().len(), 2);
    }
}
