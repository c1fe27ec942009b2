//! Condition trees for WHERE and HAVING clauses.
//!
//! A condition list is an ordered sequence of [`ConditionNode`]s, each
//! carrying the boolean connector that joins it to the *previous* node.
//! The first node's connector is ignored at render time; every later
//! connector is emitted literally, left to right. Precedence is never
//! inferred — only an explicit [`ConditionNode::Nested`] group
//! introduces parentheses.

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::value::{SqlValue, ToSqlValue};

/// Boolean connector joining a condition to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// AND connector.
    And,
    /// OR connector.
    Or,
}

impl Connector {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Comparison operator allow-list for basic conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<>`
    Ne,
    /// `<=>` (null-safe equality)
    NullSafeEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
}

impl Operator {
    /// Parses an operator string against the fixed allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperator`] for anything else.
    pub fn parse(op: &str) -> Result<Self> {
        match op {
            "=" => Ok(Self::Eq),
            "!=" => Ok(Self::NotEq),
            "<>" => Ok(Self::Ne),
            "<=>" => Ok(Self::NullSafeEq),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::GtEq),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::LtEq),
            "LIKE" => Ok(Self::Like),
            "NOT LIKE" => Ok(Self::NotLike),
            other => Err(Error::UnknownOperator(String::from(other))),
        }
    }

    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Ne => "<>",
            Self::NullSafeEq => "<=>",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }
}

/// One predicate (or predicate group) in a condition list.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    /// `column OP ?`
    Basic {
        /// Column reference.
        column: String,
        /// Comparison operator.
        operator: Operator,
        /// Bound value.
        value: SqlValue,
        /// Connector to the previous node.
        connector: Connector,
    },
    /// A parenthesized group of child conditions.
    Nested {
        /// Connector to the previous node.
        connector: Connector,
        /// Child conditions, rendered inside parentheses.
        children: Vec<ConditionNode>,
    },
    /// `column [NOT] BETWEEN ? AND ?` — always exactly two placeholders.
    Between {
        /// Column reference.
        column: String,
        /// Lower bound.
        low: SqlValue,
        /// Upper bound.
        high: SqlValue,
        /// Negation flag.
        negated: bool,
        /// Connector to the previous node.
        connector: Connector,
    },
    /// `column [NOT] IN (?,?,...)` — one placeholder per value.
    In {
        /// Column reference.
        column: String,
        /// Bound values; never empty.
        values: Vec<SqlValue>,
        /// Negation flag.
        negated: bool,
        /// Connector to the previous node.
        connector: Connector,
    },
    /// `column IS [NOT] NULL` — contributes no placeholders.
    IsNull {
        /// Column reference.
        column: String,
        /// Negation flag.
        negated: bool,
        /// Connector to the previous node.
        connector: Connector,
    },
}

impl ConditionNode {
    /// Returns this node's connector.
    #[must_use]
    pub const fn connector(&self) -> Connector {
        match self {
            Self::Basic { connector, .. }
            | Self::Nested { connector, .. }
            | Self::Between { connector, .. }
            | Self::In { connector, .. }
            | Self::IsNull { connector, .. } => *connector,
        }
    }

    /// Renders this node's clause text (without its connector) and
    /// appends its bound values to `params` in placeholder order.
    fn render_clause(&self, dialect: &dyn Dialect, params: &mut Vec<SqlValue>) -> String {
        match self {
            Self::Basic {
                column,
                operator,
                value,
                ..
            } => {
                params.push(value.clone());
                format!(
                    "{} {} {}",
                    dialect.quote_column(column),
                    operator.as_sql(),
                    dialect.placeholder()
                )
            }
            Self::Nested { children, .. } => {
                format!("({})", render_list(children, dialect, params))
            }
            Self::Between {
                column,
                low,
                high,
                negated,
                ..
            } => {
                params.push(low.clone());
                params.push(high.clone());
                let keyword = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                let p = dialect.placeholder();
                format!("{} {keyword} {p} AND {p}", dialect.quote_column(column))
            }
            Self::In {
                column,
                values,
                negated,
                ..
            } => {
                let group: Vec<&str> = values.iter().map(|_| dialect.placeholder()).collect();
                params.extend(values.iter().cloned());
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!(
                    "{} {keyword} ({})",
                    dialect.quote_column(column),
                    group.join(",")
                )
            }
            Self::IsNull {
                column, negated, ..
            } => {
                let keyword = if *negated { "IS NOT NULL" } else { "IS NULL" };
                format!("{} {keyword}", dialect.quote_column(column))
            }
        }
    }
}

/// Renders a condition list: first node without its connector, every
/// later node prefixed by its own, values collected in placeholder
/// order. Value collection is structural — only `IsNull` nodes bind
/// nothing; legitimate NULL or empty-string values are preserved.
fn render_list(nodes: &[ConditionNode], dialect: &dyn Dialect, params: &mut Vec<SqlValue>) -> String {
    let mut sql = String::new();
    for (i, node) in nodes.iter().enumerate() {
        let clause = node.render_clause(dialect, params);
        if i == 0 {
            sql.push_str(&clause);
        } else {
            sql.push(' ');
            sql.push_str(node.connector().as_sql());
            sql.push(' ');
            sql.push_str(&clause);
        }
    }
    sql
}

/// An ordered list of conditions under construction.
///
/// Backs the WHERE and HAVING lists of the query builders, and is
/// handed to nested-group closures so a group composes with the same
/// method family as its parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    nodes: Vec<ConditionNode>,
}

impl Conditions {
    /// Creates an empty condition list.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Returns `true` if no conditions were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the conditions added so far.
    #[must_use]
    pub fn nodes(&self) -> &[ConditionNode] {
        &self.nodes
    }

    /// Appends an already-built node.
    #[must_use]
    pub fn push(mut self, node: ConditionNode) -> Self {
        self.nodes.push(node);
        self
    }

    fn basic(self, column: &str, operator: Operator, value: SqlValue, connector: Connector) -> Self {
        self.push(ConditionNode::Basic {
            column: String::from(column),
            operator,
            value,
            connector,
        })
    }

    /// `column = ?`, joined with AND.
    #[must_use]
    pub fn eq<V: ToSqlValue>(self, column: &str, value: V) -> Self {
        self.basic(column, Operator::Eq, value.to_sql_value(), Connector::And)
    }

    /// `column = ?`, joined with OR.
    #[must_use]
    pub fn or_eq<V: ToSqlValue>(self, column: &str, value: V) -> Self {
        self.basic(column, Operator::Eq, value.to_sql_value(), Connector::Or)
    }

    /// `column OP ?`, joined with AND. The operator must be in the
    /// allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperator`] for an operator outside the
    /// allow-list.
    pub fn cmp<V: ToSqlValue>(self, column: &str, op: &str, value: V) -> Result<Self> {
        let operator = Operator::parse(op)?;
        Ok(self.basic(column, operator, value.to_sql_value(), Connector::And))
    }

    /// `column OP ?`, joined with OR.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperator`] for an operator outside the
    /// allow-list.
    pub fn or_cmp<V: ToSqlValue>(self, column: &str, op: &str, value: V) -> Result<Self> {
        let operator = Operator::parse(op)?;
        Ok(self.basic(column, operator, value.to_sql_value(), Connector::Or))
    }

    fn group_with<F>(self, connector: Connector, f: F) -> Result<Self>
    where
        F: FnOnce(Self) -> Result<Self>,
    {
        let child = f(Self::new())?;
        if child.is_empty() {
            return Err(Error::EmptyConditionGroup);
        }
        Ok(self.push(ConditionNode::Nested {
            connector,
            children: child.nodes,
        }))
    }

    /// Resolves `f` against a fresh child list and appends the result
    /// as a parenthesized group, joined with AND.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyConditionGroup`] if the closure adds no
    /// conditions, or any error the closure itself raises.
    pub fn group<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(Self) -> Result<Self>,
    {
        self.group_with(Connector::And, f)
    }

    /// Like [`Conditions::group`], joined with OR.
    ///
    /// # Errors
    ///
    /// Same as [`Conditions::group`].
    pub fn or_group<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(Self) -> Result<Self>,
    {
        self.group_with(Connector::Or, f)
    }

    /// Appends a group of `(column, operator, value)` triples, each
    /// joined with AND inside the group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperator`] if any triple's operator is
    /// not in the allow-list, or [`Error::EmptyConditionGroup`] for an
    /// empty slice.
    pub fn all(self, triples: &[(&str, &str, SqlValue)]) -> Result<Self> {
        if triples.is_empty() {
            return Err(Error::EmptyConditionGroup);
        }
        let mut children = Vec::with_capacity(triples.len());
        for (column, op, value) in triples {
            children.push(ConditionNode::Basic {
                column: String::from(*column),
                operator: Operator::parse(op)?,
                value: value.clone(),
                connector: Connector::And,
            });
        }
        Ok(self.push(ConditionNode::Nested {
            connector: Connector::And,
            children,
        }))
    }

    fn in_with<V: ToSqlValue>(
        self,
        column: &str,
        values: Vec<V>,
        negated: bool,
        connector: Connector,
    ) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::EmptyInList {
                column: String::from(column),
            });
        }
        Ok(self.push(ConditionNode::In {
            column: String::from(column),
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated,
            connector,
        }))
    }

    /// `column IN (?,...)`, joined with AND.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInList`] for an empty value list.
    pub fn in_list<V: ToSqlValue>(self, column: &str, values: Vec<V>) -> Result<Self> {
        self.in_with(column, values, false, Connector::And)
    }

    /// `column NOT IN (?,...)`, joined with AND.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInList`] for an empty value list.
    pub fn not_in_list<V: ToSqlValue>(self, column: &str, values: Vec<V>) -> Result<Self> {
        self.in_with(column, values, true, Connector::And)
    }

    /// `column IN (?,...)`, joined with OR.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInList`] for an empty value list.
    pub fn or_in_list<V: ToSqlValue>(self, column: &str, values: Vec<V>) -> Result<Self> {
        self.in_with(column, values, false, Connector::Or)
    }

    /// `column NOT IN (?,...)`, joined with OR.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInList`] for an empty value list.
    pub fn or_not_in_list<V: ToSqlValue>(self, column: &str, values: Vec<V>) -> Result<Self> {
        self.in_with(column, values, true, Connector::Or)
    }

    fn between_with<L: ToSqlValue, H: ToSqlValue>(
        self,
        column: &str,
        low: L,
        high: H,
        negated: bool,
        connector: Connector,
    ) -> Self {
        self.push(ConditionNode::Between {
            column: String::from(column),
            low: low.to_sql_value(),
            high: high.to_sql_value(),
            negated,
            connector,
        })
    }

    /// `column BETWEEN ? AND ?`, joined with AND.
    #[must_use]
    pub fn between<L: ToSqlValue, H: ToSqlValue>(self, column: &str, low: L, high: H) -> Self {
        self.between_with(column, low, high, false, Connector::And)
    }

    /// `column NOT BETWEEN ? AND ?`, joined with AND.
    #[must_use]
    pub fn not_between<L: ToSqlValue, H: ToSqlValue>(self, column: &str, low: L, high: H) -> Self {
        self.between_with(column, low, high, true, Connector::And)
    }

    /// `column BETWEEN ? AND ?`, joined with OR.
    #[must_use]
    pub fn or_between<L: ToSqlValue, H: ToSqlValue>(self, column: &str, low: L, high: H) -> Self {
        self.between_with(column, low, high, false, Connector::Or)
    }

    /// `column NOT BETWEEN ? AND ?`, joined with OR.
    #[must_use]
    pub fn or_not_between<L: ToSqlValue, H: ToSqlValue>(
        self,
        column: &str,
        low: L,
        high: H,
    ) -> Self {
        self.between_with(column, low, high, true, Connector::Or)
    }

    fn null_with(self, column: &str, negated: bool, connector: Connector) -> Self {
        self.push(ConditionNode::IsNull {
            column: String::from(column),
            negated,
            connector,
        })
    }

    /// `column IS NULL`, joined with AND.
    #[must_use]
    pub fn null(self, column: &str) -> Self {
        self.null_with(column, false, Connector::And)
    }

    /// `column IS NOT NULL`, joined with AND.
    #[must_use]
    pub fn not_null(self, column: &str) -> Self {
        self.null_with(column, true, Connector::And)
    }

    /// `column IS NULL`, joined with OR.
    #[must_use]
    pub fn or_null(self, column: &str) -> Self {
        self.null_with(column, false, Connector::Or)
    }

    /// `column IS NOT NULL`, joined with OR.
    #[must_use]
    pub fn or_not_null(self, column: &str) -> Self {
        self.null_with(column, true, Connector::Or)
    }

    /// Renders the list into clause text and its bound values, in the
    /// exact left-to-right order the placeholders appear.
    #[must_use]
    pub fn render(&self, dialect: &dyn Dialect) -> (String, Vec<SqlValue>) {
        let mut params = Vec::new();
        let sql = render_list(&self.nodes, dialect, &mut params);
        (sql, params)
    }
}
