//! The UPDATE description and its fluent builder.

use crate::condition::Conditions;
use crate::value::{SqlValue, ToSqlValue};

use super::WhereClauses;

/// The structured description of one UPDATE prior to compilation.
///
/// Assignments keep insertion order; their values precede WHERE values
/// in the compiled parameter list, matching clause emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub(crate) table: String,
    pub(crate) assignments: Vec<(String, SqlValue)>,
    pub(crate) wheres: Conditions,
}

impl Update {
    /// Creates an update of `table` with no assignments yet.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: String::from(table),
            assignments: Vec::new(),
            wheres: Conditions::new(),
        }
    }

    /// Adds a `SET column = ?` assignment.
    #[must_use]
    pub fn set<V: ToSqlValue>(mut self, column: &str, value: V) -> Self {
        self.assignments
            .push((String::from(column), value.to_sql_value()));
        self
    }

    /// Returns the target table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }
}

impl WhereClauses for Update {
    fn wheres_mut(&mut self) -> &mut Conditions {
        &mut self.wheres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_keep_insertion_order() {
        let update = Update::table("users").set("b", 1).set("a", 2);
        let columns: Vec<&str> = update
            .assignments
            .iter()
            .map(|(c, _)| c.as_str())
            .collect();
        assert_eq!(columns, vec!["b", "a"]);
    }
}
