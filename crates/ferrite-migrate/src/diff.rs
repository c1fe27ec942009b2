//! DDL generation: table creation and minimal schema diffs.
//!
//! The differ renders full column definitions and emits only the
//! ALTER fragments a change actually needs. Constraint fragments come
//! out in a fixed order (primary, then foreign, then unique) so the
//! produced DDL is deterministic.

use tracing::{debug, trace};

use ferrite_sql_core::{Dialect, SqlValue};

use crate::error::{Result, SchemaError};
use crate::schema::{ColumnDescriptor, Schema, PIVOT_MARKER};
use crate::types::TypeRegistry;

/// Generates DDL for one dialect, using a shared type registry.
pub struct SchemaDiffer<D: Dialect> {
    dialect: D,
    registry: TypeRegistry,
}

impl<D: Dialect> SchemaDiffer<D> {
    /// Creates a differ over the given dialect and registry.
    pub const fn new(dialect: D, registry: TypeRegistry) -> Self {
        Self { dialect, registry }
    }

    /// Renders one full column definition, e.g.
    /// `` `email` VARCHAR(255) NOT NULL DEFAULT 'x' ``.
    ///
    /// # Errors
    ///
    /// Propagates type bounds and option errors.
    pub fn column_sql(&self, column: &ColumnDescriptor) -> Result<String> {
        let mut out = self.dialect.quote_identifier(&column.name);
        out.push(' ');
        out.push_str(&self.registry.sql(column.type_id, &column.options)?);
        out.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
        if let Some(default) = &column.default {
            let stored = self
                .registry
                .converter(column.type_id)
                .to_storage(default)?;
            out.push_str(" DEFAULT ");
            out.push_str(&stored.to_sql_inline());
        }
        if column.auto_increment {
            out.push_str(" AUTO_INCREMENT");
        }
        if let Some(after) = &column.after {
            out.push_str(" AFTER ");
            out.push_str(&self.dialect.quote_identifier(after));
        }
        Ok(out)
    }

    /// Diffs one column against its previous shape.
    ///
    /// The first fragment is always a `MODIFY COLUMN` carrying the
    /// full new definition; after that only toggled constraints emit
    /// fragments, primary first, then foreign, then unique.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ConstraintNotFound`] when a foreign key
    /// must be dropped but the old column carries no constraint name.
    pub fn diff_column(
        &self,
        table: &str,
        old: &ColumnDescriptor,
        new: &ColumnDescriptor,
    ) -> Result<Vec<String>> {
        let mut fragments = vec![format!("MODIFY COLUMN {}", self.column_sql(new)?)];

        if new.primary && !old.primary {
            fragments.push(format!(
                "ADD PRIMARY KEY ({})",
                self.dialect.quote_identifier(&new.name)
            ));
        } else if old.primary && !new.primary {
            fragments.push(String::from("DROP PRIMARY KEY"));
        }

        if new.foreign.is_some() && old.foreign.is_none() {
            fragments.push(self.add_foreign_fragment(table, new));
        } else if old.foreign.is_some() && new.foreign.is_none() {
            fragments.push(self.drop_foreign_fragment(table, old)?);
        }

        if new.unique && !old.unique {
            fragments.push(format!(
                "ADD CONSTRAINT {} UNIQUE ({})",
                self.dialect.quote_identifier(&new.unique_name(table)),
                self.dialect.quote_identifier(&new.name)
            ));
        } else if old.unique && !new.unique {
            fragments.push(format!(
                "DROP INDEX {}",
                self.dialect.quote_identifier(&old.unique_name(table))
            ));
        }

        debug!(table, column = %new.name, fragments = fragments.len(), "diffed column");
        Ok(fragments)
    }

    /// Diffs a whole table, column by column.
    ///
    /// Every column of the new schema must already exist in the old
    /// one; additions go through [`SchemaDiffer::add_columns`]
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoSuchColumn`] for a new column absent
    /// from the old schema, plus anything `diff_column` raises.
    pub fn alter_columns(&self, old: &Schema, new: &Schema) -> Result<Vec<String>> {
        let mut statements = Vec::new();
        for column in &new.columns {
            let Some(previous) = old.column(&column.name) else {
                return Err(SchemaError::NoSuchColumn {
                    table: old.table.clone(),
                    column: column.name.clone(),
                });
            };
            for fragment in self.diff_column(&new.table, previous, column)? {
                statements.push(format!(
                    "ALTER TABLE {} {fragment}",
                    self.dialect.quote_identifier(&new.table)
                ));
            }
        }
        Ok(statements)
    }

    /// Statements that remove one column, in execution order: unique
    /// index, foreign key, primary key, then the column itself.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoSuchColumn`] for an unknown column and
    /// [`SchemaError::ConstraintNotFound`] for a foreign key with no
    /// recorded constraint name.
    pub fn drop_column(&self, schema: &Schema, name: &str) -> Result<Vec<String>> {
        let Some(column) = schema.column(name) else {
            return Err(SchemaError::NoSuchColumn {
                table: schema.table.clone(),
                column: String::from(name),
            });
        };
        let table = self.dialect.quote_identifier(&schema.table);

        let mut statements = Vec::new();
        if column.unique {
            statements.push(format!(
                "ALTER TABLE {table} DROP INDEX {}",
                self.dialect.quote_identifier(&column.unique_name(&schema.table))
            ));
        }
        if column.foreign.is_some() {
            let fragment = self.drop_foreign_fragment(&schema.table, column)?;
            statements.push(format!("ALTER TABLE {table} {fragment}"));
        }
        if column.primary {
            statements.push(format!("ALTER TABLE {table} DROP PRIMARY KEY"));
        }
        statements.push(format!(
            "ALTER TABLE {table} DROP COLUMN {}",
            self.dialect.quote_identifier(&column.name)
        ));

        debug!(
            table = %schema.table,
            column = name,
            statements = statements.len(),
            "planned column drop"
        );
        Ok(statements)
    }

    /// Renders the CREATE TABLE statement for a schema.
    ///
    /// # Errors
    ///
    /// Propagates column rendering errors.
    pub fn create_table(&self, schema: &Schema) -> Result<String> {
        let mut parts = Vec::with_capacity(schema.columns.len() + 2);
        for column in &schema.columns {
            parts.push(self.column_sql(column)?);
        }

        let primaries: Vec<String> = schema
            .columns
            .iter()
            .filter(|c| c.primary)
            .map(|c| self.dialect.quote_identifier(&c.name))
            .collect();
        if !primaries.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", primaries.join(", ")));
        }
        for column in &schema.columns {
            if column.foreign.is_some() {
                parts.push(self.add_constraint_clause(&schema.table, column));
            }
        }
        for column in schema.columns.iter().filter(|c| c.unique) {
            parts.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                self.dialect.quote_identifier(&column.unique_name(&schema.table)),
                self.dialect.quote_identifier(&column.name)
            ));
        }

        let mut sql = format!(
            "CREATE TABLE {} ({})",
            self.dialect.quote_identifier(&schema.table),
            parts.join(", ")
        );
        sql.push_str(&format!(
            " DEFAULT CHARSET={} COLLATE={}",
            schema.charset, schema.collation
        ));
        if let Some(comment) = &schema.comment {
            sql.push_str(&format!(
                " COMMENT={}",
                SqlValue::Text(comment.clone()).to_sql_inline()
            ));
        }
        trace!(%sql, "rendered CREATE TABLE");
        Ok(sql)
    }

    /// Builds and renders the junction table between `a` and `b`.
    ///
    /// The table is named from the sorted pair (`a_b`), carries one FK
    /// column per side, and is tagged with the junction comment
    /// marker.
    ///
    /// # Errors
    ///
    /// Propagates column rendering errors.
    pub fn create_pivot(&self, a: &str, b: &str) -> Result<String> {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let mut schema = Schema::new(&format!("{first}_{second}"));
        schema.comment(PIVOT_MARKER);
        schema.foreign(&format!("{first}_id"), first, "id");
        schema.foreign(&format!("{second}_id"), second, "id");
        self.create_table(&schema)
    }

    /// Append-only ALTER adding every column of `schema`.
    ///
    /// # Errors
    ///
    /// Propagates column rendering errors.
    pub fn add_columns(&self, schema: &Schema) -> Result<String> {
        let mut adds = Vec::with_capacity(schema.columns.len());
        for column in &schema.columns {
            adds.push(format!("ADD COLUMN {}", self.column_sql(column)?));
        }
        Ok(format!(
            "ALTER TABLE {} {}",
            self.dialect.quote_identifier(&schema.table),
            adds.join(", ")
        ))
    }

    /// Renames a column, re-rendering its definition with the first
    /// occurrence of the old name substituted.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoSuchColumn`] for an unknown column.
    pub fn rename_column(&self, schema: &Schema, from: &str, to: &str) -> Result<String> {
        let Some(column) = schema.column(from) else {
            return Err(SchemaError::NoSuchColumn {
                table: schema.table.clone(),
                column: String::from(from),
            });
        };
        let definition = self.column_sql(column)?.replacen(
            &self.dialect.quote_identifier(from),
            &self.dialect.quote_identifier(to),
            1,
        );
        Ok(format!(
            "ALTER TABLE {} CHANGE COLUMN {} {definition}",
            self.dialect.quote_identifier(&schema.table),
            self.dialect.quote_identifier(from)
        ))
    }

    /// Renders a TRUNCATE statement.
    #[must_use]
    pub fn truncate(&self, table: &str) -> String {
        format!("TRUNCATE TABLE {}", self.dialect.quote_identifier(table))
    }

    fn add_foreign_fragment(&self, table: &str, column: &ColumnDescriptor) -> String {
        format!("ADD {}", self.add_constraint_clause(table, column))
    }

    fn add_constraint_clause(&self, table: &str, column: &ColumnDescriptor) -> String {
        // Callers check column.foreign first.
        let Some(foreign) = &column.foreign else {
            return String::new();
        };
        let name = column
            .foreign_name(table)
            .unwrap_or_default();
        format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.dialect.quote_identifier(&name),
            self.dialect.quote_identifier(&column.name),
            self.dialect.quote_identifier(&foreign.table),
            self.dialect.quote_identifier(&foreign.column)
        )
    }

    fn drop_foreign_fragment(&self, table: &str, column: &ColumnDescriptor) -> Result<String> {
        let constraint = column
            .foreign
            .as_ref()
            .and_then(|f| f.constraint.as_deref())
            .ok_or_else(|| SchemaError::ConstraintNotFound {
                kind: "foreign key",
                table: String::from(table),
                column: column.name.clone(),
            })?;
        Ok(format!(
            "DROP FOREIGN KEY {}",
            self.dialect.quote_identifier(constraint)
        ))
    }
}
