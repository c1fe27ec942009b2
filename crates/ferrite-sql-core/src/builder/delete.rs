//! The DELETE description and its fluent builder.

use crate::condition::Conditions;

use super::WhereClauses;

/// The structured description of one DELETE prior to compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub(crate) table: String,
    pub(crate) wheres: Conditions,
}

impl Delete {
    /// Creates a delete from `table`.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: String::from(table),
            wheres: Conditions::new(),
        }
    }

    /// Returns the target table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }
}

impl WhereClauses for Delete {
    fn wheres_mut(&mut self) -> &mut Conditions {
        &mut self.wheres
    }
}
