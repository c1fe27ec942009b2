//! Statement execution seam.
//!
//! The compiler produces [`Compiled`](crate::compiler::Compiled)
//! statements; anything that can run one against a live connection
//! implements [`StatementExecutor`]. Keeping the seam a trait lets the
//! builder and compiler layers stay connection-free, and lets tests
//! substitute a recording executor.

use std::collections::BTreeMap;

use crate::compiler::Compiled;
use crate::value::SqlValue;

/// One result row, keyed by column name.
pub type Row = BTreeMap<String, SqlValue>;

/// What a statement produced when it ran.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// Rows returned by a SELECT.
    Rows(Vec<Row>),
    /// An INSERT ran; `last_insert_id` is the generated id of the
    /// FIRST row of the batch (MySQL semantics for multi-row inserts).
    Inserted { last_insert_id: i64 },
    /// Rows affected by an UPDATE or DELETE.
    Affected(u64),
}

/// Execution-layer failure.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The connection rejected or lost the statement.
    #[error("statement failed: {0}")]
    Statement(String),
    /// The connection itself is unusable.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Runs compiled statements against some backing connection.
pub trait StatementExecutor {
    /// Executes one statement with its parameters bound positionally.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] when the statement or connection fails.
    /// A failure is never reported as an empty [`ExecOutcome::Rows`].
    fn execute(&mut self, stmt: &Compiled) -> Result<ExecOutcome, ExecError>;
}
