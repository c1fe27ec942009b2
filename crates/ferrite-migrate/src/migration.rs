//! The migration contract.
//!
//! A migration body executes the DDL this crate produces; sequencing,
//! history, and rollback policy live with the caller.

use ferrite_sql_core::{ExecError, StatementExecutor};

/// One reversible schema change.
pub trait Migration {
    /// Stable identifier, used for ordering and history.
    fn name(&self) -> &str;

    /// Applies the change.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] when a statement fails; earlier
    /// statements of the body are not rolled back here.
    fn apply(&self, executor: &mut dyn StatementExecutor) -> Result<(), ExecError>;

    /// Reverts the change.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] when a statement fails.
    fn revert(&self, executor: &mut dyn StatementExecutor) -> Result<(), ExecError>;
}
