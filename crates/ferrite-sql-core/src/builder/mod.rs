//! Fluent statement builders.
//!
//! Each builder accumulates an immutable description of one statement;
//! compilation happens separately in [`crate::compiler::SqlCompiler`]
//! and never mutates the builder, so a statement can be compiled repeatedly.

mod delete;
mod insert;
mod query;
mod update;

pub use delete::Delete;
pub use insert::{Insert, RowValues};
pub use query::{AggregateFunc, Direction, JoinKind, JoinSpec, Projection, Query};
pub use update::Update;

use crate::condition::Conditions;
use crate::error::Result;
use crate::value::{SqlValue, ToSqlValue};

/// WHERE-clause composition, shared by the SELECT, UPDATE, and DELETE
/// builders.
///
/// Every method mirrors one on [`Conditions`]; the first condition's
/// connector is ignored at render time, later ones are emitted
/// literally.
pub trait WhereClauses: Sized {
    /// Access to the builder's WHERE condition list.
    fn wheres_mut(&mut self) -> &mut Conditions;

    #[doc(hidden)]
    fn map_wheres(mut self, f: impl FnOnce(Conditions) -> Conditions) -> Self {
        let conditions = std::mem::take(self.wheres_mut());
        *self.wheres_mut() = f(conditions);
        self
    }

    #[doc(hidden)]
    fn try_map_wheres(mut self, f: impl FnOnce(Conditions) -> Result<Conditions>) -> Result<Self> {
        let conditions = std::mem::take(self.wheres_mut());
        *self.wheres_mut() = f(conditions)?;
        Ok(self)
    }

    /// `WHERE column = ?`, joined with AND.
    #[must_use]
    fn where_eq<V: ToSqlValue>(self, column: &str, value: V) -> Self {
        self.map_wheres(|c| c.eq(column, value))
    }

    /// `WHERE column = ?`, joined with OR.
    #[must_use]
    fn or_where_eq<V: ToSqlValue>(self, column: &str, value: V) -> Self {
        self.map_wheres(|c| c.or_eq(column, value))
    }

    /// `WHERE column OP ?`, joined with AND.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownOperator`] for an operator
    /// outside the allow-list.
    fn where_cmp<V: ToSqlValue>(self, column: &str, op: &str, value: V) -> Result<Self> {
        self.try_map_wheres(|c| c.cmp(column, op, value))
    }

    /// `WHERE column OP ?`, joined with OR.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownOperator`] for an operator
    /// outside the allow-list.
    fn or_where_cmp<V: ToSqlValue>(self, column: &str, op: &str, value: V) -> Result<Self> {
        self.try_map_wheres(|c| c.or_cmp(column, op, value))
    }

    /// Appends a parenthesized group resolved from a fresh child list,
    /// joined with AND.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyConditionGroup`] if the closure
    /// adds no conditions, or any error it raises.
    fn where_group<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(Conditions) -> Result<Conditions>,
    {
        self.try_map_wheres(|c| c.group(f))
    }

    /// Like [`WhereClauses::where_group`], joined with OR.
    ///
    /// # Errors
    ///
    /// Same as [`WhereClauses::where_group`].
    fn or_where_group<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(Conditions) -> Result<Conditions>,
    {
        self.try_map_wheres(|c| c.or_group(f))
    }

    /// Appends a group of `(column, operator, value)` triples, each
    /// joined with AND inside the group.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownOperator`] or
    /// [`crate::Error::EmptyConditionGroup`].
    fn where_all(self, triples: &[(&str, &str, SqlValue)]) -> Result<Self> {
        self.try_map_wheres(|c| c.all(triples))
    }

    /// `WHERE column IN (?,...)`, joined with AND.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyInList`] for an empty value list.
    fn where_in<V: ToSqlValue>(self, column: &str, values: Vec<V>) -> Result<Self> {
        self.try_map_wheres(|c| c.in_list(column, values))
    }

    /// `WHERE column NOT IN (?,...)`, joined with AND.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyInList`] for an empty value list.
    fn where_not_in<V: ToSqlValue>(self, column: &str, values: Vec<V>) -> Result<Self> {
        self.try_map_wheres(|c| c.not_in_list(column, values))
    }

    /// `WHERE column IN (?,...)`, joined with OR.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyInList`] for an empty value list.
    fn or_where_in<V: ToSqlValue>(self, column: &str, values: Vec<V>) -> Result<Self> {
        self.try_map_wheres(|c| c.or_in_list(column, values))
    }

    /// `WHERE column NOT IN (?,...)`, joined with OR.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyInList`] for an empty value list.
    fn or_where_not_in<V: ToSqlValue>(self, column: &str, values: Vec<V>) -> Result<Self> {
        self.try_map_wheres(|c| c.or_not_in_list(column, values))
    }

    /// `WHERE column BETWEEN ? AND ?`, joined with AND.
    #[must_use]
    fn where_between<L: ToSqlValue, H: ToSqlValue>(self, column: &str, low: L, high: H) -> Self {
        self.map_wheres(|c| c.between(column, low, high))
    }

    /// `WHERE column NOT BETWEEN ? AND ?`, joined with AND.
    #[must_use]
    fn where_not_between<L: ToSqlValue, H: ToSqlValue>(
        self,
        column: &str,
        low: L,
        high: H,
    ) -> Self {
        self.map_wheres(|c| c.not_between(column, low, high))
    }

    /// `WHERE column BETWEEN ? AND ?`, joined with OR.
    #[must_use]
    fn or_where_between<L: ToSqlValue, H: ToSqlValue>(self, column: &str, low: L, high: H) -> Self {
        self.map_wheres(|c| c.or_between(column, low, high))
    }

    /// `WHERE column NOT BETWEEN ? AND ?`, joined with OR.
    #[must_use]
    fn or_where_not_between<L: ToSqlValue, H: ToSqlValue>(
        self,
        column: &str,
        low: L,
        high: H,
    ) -> Self {
        self.map_wheres(|c| c.or_not_between(column, low, high))
    }

    /// `WHERE column IS NULL`, joined with AND.
    #[must_use]
    fn where_null(self, column: &str) -> Self {
        self.map_wheres(|c| c.null(column))
    }

    /// `WHERE column IS NOT NULL`, joined with AND.
    #[must_use]
    fn where_not_null(self, column: &str) -> Self {
        self.map_wheres(|c| c.not_null(column))
    }

    /// `WHERE column IS NULL`, joined with OR.
    #[must_use]
    fn or_where_null(self, column: &str) -> Self {
        self.map_wheres(|c| c.or_null(column))
    }

    /// `WHERE column IS NOT NULL`, joined with OR.
    #[must_use]
    fn or_where_not_null(self, column: &str) -> Self {
        self.map_wheres(|c| c.or_not_null(column))
    }
}
