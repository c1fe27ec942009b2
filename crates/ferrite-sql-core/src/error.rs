//! Error types for query construction and compilation.

/// Errors raised while building or compiling a query.
///
/// All variants describe a malformed builder invocation and are raised
/// at the call that first observes the problem. Nothing is retried and
/// nothing degrades into an empty result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operator string outside the fixed allow-list was used.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// An IN/NOT IN condition was given an empty value list.
    #[error("IN condition on column '{column}' requires a non-empty value list")]
    EmptyInList {
        /// Column the condition targets.
        column: String,
    },

    /// A nested condition group resolved to zero conditions.
    #[error("nested condition group is empty")]
    EmptyConditionGroup,

    /// An INSERT was compiled with no rows.
    #[error("INSERT into '{table}' has no rows")]
    EmptyInsert {
        /// Target table.
        table: String,
    },

    /// An UPDATE was compiled with no assignments.
    #[error("UPDATE of '{table}' has no assignments")]
    EmptyUpdate {
        /// Target table.
        table: String,
    },
}

/// Result type for query building and compilation.
pub type Result<T> = std::result::Result<T, Error>;
