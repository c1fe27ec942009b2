//! Dialect-aware statement compiler.
//!
//! Renders a built statement into SQL text plus the ordered parameter
//! list, keeping placeholders and values in lock-step. Compilation
//! never mutates the builder, so compiling twice yields the same
//! statement.

use std::collections::BTreeSet;

use tracing::debug;

use crate::builder::{Delete, Insert, JoinKind, Query, Update};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::value::SqlValue;

/// A compiled statement: SQL text and its positionally-bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    /// SQL text with `?` placeholders.
    pub sql: String,
    /// Bound values, ordered to match the placeholders left to right.
    pub params: Vec<SqlValue>,
}

/// Compiles built statements for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct SqlCompiler<D: Dialect> {
    dialect: D,
}

impl<D: Dialect> SqlCompiler<D> {
    /// Creates a compiler for the given dialect.
    pub const fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// Returns the compiler's dialect.
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Compiles a SELECT statement.
    ///
    /// Clause order is fixed; each clause renders to nothing when its
    /// part of the query is unset. Parameters are collected WHERE-first,
    /// then HAVING, matching clause emission order.
    #[must_use]
    pub fn compile_select(&self, query: &Query) -> Compiled {
        let mut sql = String::from("SELECT ");
        let mut params = Vec::new();

        if query.distinct {
            sql.push_str("DISTINCT ");
        }

        let mut projections: Vec<String> = query
            .projections
            .iter()
            .map(|p| p.render(&self.dialect))
            .collect();
        for join in &query.joins {
            projections.extend(join.columns.iter().map(|c| self.dialect.quote_column(c)));
        }
        if projections.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&projections.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.dialect.quote_identifier(&query.table));

        for join in &query.joins {
            sql.push(' ');
            sql.push_str(join.kind.keyword());
            sql.push(' ');
            sql.push_str(&self.dialect.quote_identifier(&join.table));
            if join.kind != JoinKind::Cross {
                if let (Some(left), Some(right)) = (&join.left, &join.right) {
                    sql.push_str(" ON ");
                    sql.push_str(&self.dialect.quote_column(left));
                    sql.push_str(" = ");
                    sql.push_str(&self.dialect.quote_column(right));
                }
            }
        }

        if !query.wheres.is_empty() {
            let (clause, values) = query.wheres.render(&self.dialect);
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
            params.extend(values);
        }

        if !query.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            let columns: Vec<String> = query
                .group_by
                .iter()
                .map(|c| self.dialect.quote_column(c))
                .collect();
            sql.push_str(&columns.join(", "));
        }

        if !query.havings.is_empty() {
            let (clause, values) = query.havings.render(&self.dialect);
            sql.push_str(" HAVING ");
            sql.push_str(&clause);
            params.extend(values);
        }

        if !query.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let entries: Vec<String> = query
                .order_by
                .iter()
                .map(|(c, d)| format!("{} {}", self.dialect.quote_column(c), d.as_sql()))
                .collect();
            sql.push_str(&entries.join(", "));
        }

        if let Some(n) = query.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        if let Some(n) = query.offset {
            sql.push_str(&format!(" OFFSET {n}"));
        }

        debug!(table = %query.table, params = params.len(), "compiled SELECT");
        Compiled { sql, params }
    }

    /// Compiles an INSERT statement.
    ///
    /// Multi-row inserts with heterogeneous keys use the sorted union
    /// of all rows' columns; a row missing a column binds NULL in that
    /// slot. Single-row inserts use the row's own (sorted) keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInsert`] when the insert has no rows.
    pub fn compile_insert(&self, insert: &Insert) -> Result<Compiled> {
        if insert.rows.is_empty() {
            return Err(Error::EmptyInsert {
                table: insert.table.clone(),
            });
        }

        // BTreeSet keeps the union sorted; a single row's BTreeMap keys
        // are already sorted, so both paths agree on ordering.
        let columns: Vec<&String> = insert
            .rows
            .iter()
            .flat_map(|row| row.values.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut sql = String::from("INSERT INTO ");
        sql.push_str(&self.dialect.quote_identifier(&insert.table));
        sql.push_str(" (");
        let quoted: Vec<String> = columns
            .iter()
            .map(|c| self.dialect.quote_identifier(c.as_str()))
            .collect();
        sql.push_str(&quoted.join(", "));
        sql.push_str(") VALUES ");

        let group = {
            let placeholders: Vec<&str> =
                columns.iter().map(|_| self.dialect.placeholder()).collect();
            format!("({})", placeholders.join(","))
        };
        let groups: Vec<&str> = insert.rows.iter().map(|_| group.as_str()).collect();
        sql.push_str(&groups.join(", "));

        let mut params = Vec::with_capacity(insert.rows.len() * columns.len());
        for row in &insert.rows {
            for column in &columns {
                params.push(
                    row.values
                        .get(column.as_str())
                        .cloned()
                        .unwrap_or(SqlValue::Null),
                );
            }
        }

        debug!(
            table = %insert.table,
            rows = insert.rows.len(),
            columns = columns.len(),
            "compiled INSERT"
        );
        Ok(Compiled { sql, params })
    }

    /// Compiles an UPDATE statement.
    ///
    /// Assignment values precede WHERE values in the parameter list,
    /// matching their order in the rendered text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyUpdate`] when the update has no assignments.
    pub fn compile_update(&self, update: &Update) -> Result<Compiled> {
        if update.assignments.is_empty() {
            return Err(Error::EmptyUpdate {
                table: update.table.clone(),
            });
        }

        let mut sql = String::from("UPDATE ");
        let mut params = Vec::new();

        sql.push_str(&self.dialect.quote_identifier(&update.table));
        sql.push_str(" SET ");
        let assignments: Vec<String> = update
            .assignments
            .iter()
            .map(|(column, _)| {
                format!(
                    "{} = {}",
                    self.dialect.quote_column(column),
                    self.dialect.placeholder()
                )
            })
            .collect();
        sql.push_str(&assignments.join(", "));
        params.extend(update.assignments.iter().map(|(_, v)| v.clone()));

        if !update.wheres.is_empty() {
            let (clause, values) = update.wheres.render(&self.dialect);
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
            params.extend(values);
        }

        debug!(table = %update.table, params = params.len(), "compiled UPDATE");
        Ok(Compiled { sql, params })
    }

    /// Compiles a DELETE statement.
    #[must_use]
    pub fn compile_delete(&self, delete: &Delete) -> Compiled {
        let mut sql = String::from("DELETE FROM ");
        let mut params = Vec::new();

        sql.push_str(&self.dialect.quote_identifier(&delete.table));
        if !delete.wheres.is_empty() {
            let (clause, values) = delete.wheres.render(&self.dialect);
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
            params.extend(values);
        }

        debug!(table = %delete.table, params = params.len(), "compiled DELETE");
        Compiled { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Direction, WhereClauses};
    use crate::dialect::MySqlDialect;

    fn compiler() -> SqlCompiler<MySqlDialect> {
        SqlCompiler::new(MySqlDialect::new())
    }

    #[test]
    fn select_defaults_to_star() {
        let compiled = compiler().compile_select(&Query::table("users"));
        assert_eq!(compiled.sql, "SELECT * FROM `users`");
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn select_where_chain() {
        // Example: where("age", ">", 18).where("status", "active")
        let query = Query::table("users")
            .where_cmp("age", ">", 18)
            .unwrap()
            .where_eq("status", "active");
        let compiled = compiler().compile_select(&query);
        assert_eq!(
            compiled.sql,
            "SELECT * FROM `users` WHERE `age` > ? AND `status` = ?"
        );
        assert_eq!(
            compiled.params,
            vec![SqlValue::Int(18), SqlValue::Text(String::from("active"))]
        );
    }

    #[test]
    fn select_where_in() {
        let query = Query::table("users").where_in("id", vec![1, 2, 3]).unwrap();
        let compiled = compiler().compile_select(&query);
        assert_eq!(compiled.sql, "SELECT * FROM `users` WHERE `id` IN (?,?,?)");
        assert_eq!(
            compiled.params,
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
        );
    }

    #[test]
    fn select_nested_group() {
        let query = Query::table("t")
            .where_eq("a", 1)
            .where_group(|g| Ok(g.eq("b", 2).or_eq("c", 3)))
            .unwrap();
        let compiled = compiler().compile_select(&query);
        assert_eq!(
            compiled.sql,
            "SELECT * FROM `t` WHERE `a` = ? AND (`b` = ? OR `c` = ?)"
        );
        assert_eq!(
            compiled.params,
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
        );
    }

    #[test]
    fn select_full_clause_order() {
        let query = Query::table("orders")
            .columns(&["status"])
            .distinct()
            .where_not_null("user_id")
            .group_by("status")
            .having(|h| h.cmp("status", "!=", "void"))
            .unwrap()
            .order_by("status", Direction::Desc)
            .limit(5)
            .offset(10);
        let compiled = compiler().compile_select(&query);
        assert_eq!(
            compiled.sql,
            "SELECT DISTINCT `status` FROM `orders` WHERE `user_id` IS NOT NULL \
             GROUP BY `status` HAVING `status` != ? ORDER BY `status` DESC LIMIT 5 OFFSET 10"
        );
        // WHERE values first, then HAVING values.
        assert_eq!(compiled.params, vec![SqlValue::Text(String::from("void"))]);
    }

    #[test]
    fn limit_without_offset_has_no_offset_clause() {
        let query = Query::table("users").limit(10);
        let compiled = compiler().compile_select(&query);
        assert_eq!(compiled.sql, "SELECT * FROM `users` LIMIT 10");
        assert!(!compiled.sql.contains("OFFSET"));
    }

    #[test]
    fn where_then_having_param_order() {
        let query = Query::table("orders")
            .raw("COUNT(*) AS count")
            .where_eq("status", "paid")
            .group_by("user_id")
            .having(|h| h.cmp("count", ">", 3))
            .unwrap();
        let compiled = compiler().compile_select(&query);
        assert_eq!(
            compiled.params,
            vec![SqlValue::Text(String::from("paid")), SqlValue::Int(3)]
        );
    }

    #[test]
    fn aggregate_projection_bypasses_quoting() {
        let compiled = compiler().compile_select(&Query::table("users").count());
        assert_eq!(compiled.sql, "SELECT COUNT(*) AS count FROM `users`");

        let compiled = compiler().compile_select(&Query::table("users").avg("age"));
        assert_eq!(compiled.sql, "SELECT AVG(`age`) AS avg FROM `users`");
    }

    #[test]
    fn select_with_join() {
        let query = Query::table("users")
            .columns(&["users.id"])
            .left_join("orders", "users.id", "orders.user_id");
        let compiled = compiler().compile_select(&query);
        assert_eq!(
            compiled.sql,
            "SELECT `users`.`id` FROM `users` LEFT JOIN `orders` \
             ON `users`.`id` = `orders`.`user_id`"
        );
    }

    #[test]
    fn join_projection_is_appended() {
        use crate::builder::{JoinKind, JoinSpec};
        let query = Query::table("users").columns(&["users.name"]).join_spec(
            JoinSpec::new(JoinKind::Inner, "orders", "users.id", "orders.user_id")
                .columns(&["orders.amount"]),
        );
        let compiled = compiler().compile_select(&query);
        assert!(compiled
            .sql
            .starts_with("SELECT `users`.`name`, `orders`.`amount` FROM `users`"));
    }

    #[test]
    fn insert_single_row_uses_own_sorted_keys() {
        let insert = Insert::into("users").row(|r| r.set("name", "a").set("age", 5));
        let compiled = compiler().compile_insert(&insert).unwrap();
        assert_eq!(
            compiled.sql,
            "INSERT INTO `users` (`age`, `name`) VALUES (?,?)"
        );
        assert_eq!(
            compiled.params,
            vec![SqlValue::Int(5), SqlValue::Text(String::from("a"))]
        );
    }

    #[test]
    fn insert_union_of_heterogeneous_rows() {
        // Example: insert of [{name:"a"}, {name:"b", age:5}]
        let insert = Insert::into("users")
            .row(|r| r.set("name", "a"))
            .row(|r| r.set("name", "b").set("age", 5));
        let compiled = compiler().compile_insert(&insert).unwrap();
        assert_eq!(
            compiled.sql,
            "INSERT INTO `users` (`age`, `name`) VALUES (?,?), (?,?)"
        );
        assert_eq!(
            compiled.params,
            vec![
                SqlValue::Null,
                SqlValue::Text(String::from("a")),
                SqlValue::Int(5),
                SqlValue::Text(String::from("b")),
            ]
        );
    }

    #[test]
    fn insert_with_no_rows_is_an_error() {
        let result = compiler().compile_insert(&Insert::into("users"));
        assert!(matches!(
            result,
            Err(Error::EmptyInsert { table }) if table == "users"
        ));
    }

    #[test]
    fn update_assignment_params_precede_where_params() {
        let update = Update::table("users")
            .set("name", "z")
            .set("active", false)
            .where_eq("id", 9);
        let compiled = compiler().compile_update(&update).unwrap();
        assert_eq!(
            compiled.sql,
            "UPDATE `users` SET `name` = ?, `active` = ? WHERE `id` = ?"
        );
        assert_eq!(
            compiled.params,
            vec![
                SqlValue::Text(String::from("z")),
                SqlValue::Bool(false),
                SqlValue::Int(9),
            ]
        );
    }

    #[test]
    fn update_without_assignments_is_an_error() {
        let result = compiler().compile_update(&Update::table("users"));
        assert!(matches!(result, Err(Error::EmptyUpdate { .. })));
    }

    #[test]
    fn delete_with_where() {
        let delete = Delete::table("users").where_eq("id", 4);
        let compiled = compiler().compile_delete(&delete);
        assert_eq!(compiled.sql, "DELETE FROM `users` WHERE `id` = ?");
        assert_eq!(compiled.params, vec![SqlValue::Int(4)]);
    }

    #[test]
    fn compilation_is_repeatable() {
        let query = Query::table("users")
            .where_between("age", 20, 30)
            .where_in("id", vec![1, 2])
            .unwrap();
        let c = compiler();
        assert_eq!(c.compile_select(&query), c.compile_select(&query));
    }
}
