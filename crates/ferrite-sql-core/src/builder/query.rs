//! The SELECT description and its fluent builder.

use crate::condition::Conditions;
use crate::dialect::Dialect;
use crate::error::Result;

use super::WhereClauses;

/// One projected item in the SELECT list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// A bare column reference, quoted by the dialect.
    Column(String),
    /// A pre-formed expression, passed through unquoted.
    Raw(String),
    /// An aggregate over a column (or `*` when `column` is `None`).
    Aggregate {
        /// Aggregate function.
        func: AggregateFunc,
        /// Aggregated column; `None` means `*`.
        column: Option<String>,
    },
}

impl Projection {
    /// Renders the projection for the given dialect.
    #[must_use]
    pub fn render(&self, dialect: &dyn Dialect) -> String {
        match self {
            Self::Column(column) => dialect.quote_column(column),
            Self::Raw(expr) => expr.clone(),
            Self::Aggregate { func, column } => {
                let inner = column
                    .as_deref()
                    .map_or_else(|| String::from("*"), |c| dialect.quote_column(c));
                format!("{}({inner}) AS {}", func.keyword(), func.alias())
            }
        }
    }
}

/// Aggregate functions the select pipeline can project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    /// `COUNT`
    Count,
    /// `AVG`
    Avg,
    /// `MIN`
    Min,
    /// `MAX`
    Max,
}

impl AggregateFunc {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
        }
    }

    /// Returns the result alias used in the projection.
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// Sort direction for ORDER BY entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `CROSS JOIN` (no ON clause)
    Cross,
}

impl JoinKind {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// One join of the query. A join holds its own projection and ON
/// columns referencing the parent table, never the parent's builder
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    /// Join flavor.
    pub kind: JoinKind,
    /// Joined table.
    pub table: String,
    /// Left side of the ON equality (usually parent-qualified).
    pub left: Option<String>,
    /// Right side of the ON equality (usually join-qualified).
    pub right: Option<String>,
    /// Extra columns this join contributes to the SELECT list.
    pub columns: Vec<String>,
}

impl JoinSpec {
    /// Creates a join with an `ON left = right` condition.
    #[must_use]
    pub fn new(kind: JoinKind, table: &str, left: &str, right: &str) -> Self {
        Self {
            kind,
            table: String::from(table),
            left: Some(String::from(left)),
            right: Some(String::from(right)),
            columns: Vec::new(),
        }
    }

    /// Creates a cross join (no ON condition).
    #[must_use]
    pub fn cross(table: &str) -> Self {
        Self {
            kind: JoinKind::Cross,
            table: String::from(table),
            left: None,
            right: None,
            columns: Vec::new(),
        }
    }

    /// Adds columns this join projects into the SELECT list.
    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns
            .extend(columns.iter().map(|c| String::from(*c)));
        self
    }
}

/// The full structured description of one SELECT prior to compilation.
///
/// Built incrementally through the fluent methods; compilation reads
/// it without mutating, so the same description compiles repeatedly to the
/// same statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub(crate) table: String,
    pub(crate) projections: Vec<Projection>,
    pub(crate) distinct: bool,
    pub(crate) wheres: Conditions,
    pub(crate) group_by: Vec<String>,
    pub(crate) havings: Conditions,
    pub(crate) order_by: Vec<(String, Direction)>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) joins: Vec<JoinSpec>,
}

impl Query {
    /// Creates a query against `table`, projecting `*` until columns
    /// are specified.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: String::from(table),
            projections: Vec::new(),
            distinct: false,
            wheres: Conditions::new(),
            group_by: Vec::new(),
            havings: Conditions::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            joins: Vec::new(),
        }
    }

    /// Returns the target table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Projects the given columns instead of `*`.
    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.projections.extend(
            columns
                .iter()
                .map(|c| Projection::Column(String::from(*c))),
        );
        self
    }

    /// Projects a pre-formed expression; bypasses identifier quoting.
    #[must_use]
    pub fn raw(mut self, expr: &str) -> Self {
        self.projections.push(Projection::Raw(String::from(expr)));
        self
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a GROUP BY column.
    #[must_use]
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(String::from(column));
        self
    }

    /// Composes the HAVING list; resolved with the same method family
    /// as WHERE.
    ///
    /// # Errors
    ///
    /// Propagates any configuration error the closure raises.
    pub fn having<F>(mut self, f: F) -> Result<Self>
    where
        F: FnOnce(Conditions) -> Result<Conditions>,
    {
        self.havings = f(std::mem::take(&mut self.havings))?;
        Ok(self)
    }

    /// Adds an ORDER BY entry.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order_by.push((String::from(column), direction));
        self
    }

    /// Sets LIMIT. Unset means no LIMIT clause at all.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets OFFSET. Unset means no OFFSET clause at all.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Adds a join spec.
    #[must_use]
    pub fn join_spec(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    /// Adds an `INNER JOIN table ON left = right`.
    #[must_use]
    pub fn join(self, table: &str, left: &str, right: &str) -> Self {
        self.join_spec(JoinSpec::new(JoinKind::Inner, table, left, right))
    }

    /// Adds a `LEFT JOIN table ON left = right`.
    #[must_use]
    pub fn left_join(self, table: &str, left: &str, right: &str) -> Self {
        self.join_spec(JoinSpec::new(JoinKind::Left, table, left, right))
    }

    /// Adds a `RIGHT JOIN table ON left = right`.
    #[must_use]
    pub fn right_join(self, table: &str, left: &str, right: &str) -> Self {
        self.join_spec(JoinSpec::new(JoinKind::Right, table, left, right))
    }

    /// Adds a `CROSS JOIN table`.
    #[must_use]
    pub fn cross_join(self, table: &str) -> Self {
        self.join_spec(JoinSpec::cross(table))
    }

    fn aggregate(mut self, func: AggregateFunc, column: Option<&str>) -> Self {
        self.projections = vec![Projection::Aggregate {
            func,
            column: column.map(String::from),
        }];
        self
    }

    /// Projects `COUNT(*) AS count`, leaving the rest of the query
    /// untouched.
    #[must_use]
    pub fn count(self) -> Self {
        self.aggregate(AggregateFunc::Count, None)
    }

    /// Projects `AVG(column) AS avg`.
    #[must_use]
    pub fn avg(self, column: &str) -> Self {
        self.aggregate(AggregateFunc::Avg, Some(column))
    }

    /// Projects `MIN(column) AS min`.
    #[must_use]
    pub fn min(self, column: &str) -> Self {
        self.aggregate(AggregateFunc::Min, Some(column))
    }

    /// Projects `MAX(column) AS max`.
    #[must_use]
    pub fn max(self, column: &str) -> Self {
        self.aggregate(AggregateFunc::Max, Some(column))
    }
}

impl WhereClauses for Query {
    fn wheres_mut(&mut self) -> &mut Conditions {
        &mut self.wheres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let q = Query::table("users");
        assert_eq!(q.table_name(), "users");
        assert!(q.projections.is_empty());
        assert!(!q.distinct);
        assert!(q.limit.is_none());
        assert!(q.offset.is_none());
    }

    #[test]
    fn aggregate_replaces_projection_only() {
        let q = Query::table("users")
            .columns(&["id", "name"])
            .where_eq("active", true)
            .count();
        assert_eq!(q.projections.len(), 1);
        assert!(matches!(
            q.projections[0],
            Projection::Aggregate {
                func: AggregateFunc::Count,
                column: None
            }
        ));
        // WHERE state is untouched by the aggregate helper.
        assert!(!q.wheres.is_empty());
    }

    #[test]
    fn join_spec_is_composed() {
        let q = Query::table("users").join_spec(
            JoinSpec::new(JoinKind::Left, "orders", "users.id", "orders.user_id")
                .columns(&["orders.amount"]),
        );
        assert_eq!(q.joins.len(), 1);
        assert_eq!(q.joins[0].columns, vec![String::from("orders.amount")]);
    }
}
