//! End-to-end lifecycle: define a schema, migrate it, query it, and
//! evolve it through the differ.

use ferrite_migrate::schema::{MetadataRow, Schema};
use ferrite_migrate::types::TypeRegistry;
use ferrite_migrate::{ColumnDescriptor, Migration, SchemaDiffer};
use ferrite_sql_core::builder::{Query, WhereClauses};
use ferrite_sql_core::{
    Compiled, ExecError, ExecOutcome, Insert, MySqlDialect, SqlCompiler, SqlValue,
    StatementExecutor,
};

/// Records every statement it is asked to run.
#[derive(Default)]
struct RecordingExecutor {
    statements: Vec<Compiled>,
}

impl StatementExecutor for RecordingExecutor {
    fn execute(&mut self, stmt: &Compiled) -> Result<ExecOutcome, ExecError> {
        self.statements.push(stmt.clone());
        Ok(ExecOutcome::Affected(0))
    }
}

struct CreateUsers;

impl Migration for CreateUsers {
    fn name(&self) -> &str {
        "0001_create_users"
    }

    fn apply(&self, executor: &mut dyn StatementExecutor) -> Result<(), ExecError> {
        let mut schema = Schema::new("users");
        schema.increments("id");
        schema.varchar("email", 255).unique();
        schema.tiny_int("signin_attempts").unsigned().default(0);
        schema.timestamps();

        let differ = SchemaDiffer::new(MySqlDialect::new(), TypeRegistry::new());
        let sql = differ
            .create_table(&schema)
            .map_err(|e| ExecError::Statement(e.to_string()))?;
        executor.execute(&Compiled {
            sql,
            params: Vec::new(),
        })?;
        Ok(())
    }

    fn revert(&self, executor: &mut dyn StatementExecutor) -> Result<(), ExecError> {
        executor.execute(&Compiled {
            sql: String::from("DROP TABLE `users`"),
            params: Vec::new(),
        })?;
        Ok(())
    }
}

#[test]
fn migration_produces_runnable_create_table() {
    let mut executor = RecordingExecutor::default();
    CreateUsers.apply(&mut executor).unwrap();

    assert_eq!(executor.statements.len(), 1);
    let sql = &executor.statements[0].sql;
    assert!(sql.starts_with("CREATE TABLE `users` ("));
    assert!(sql.contains("`email` VARCHAR(255) NOT NULL"));
    assert!(sql.contains("`signin_attempts` TINYINT UNSIGNED NOT NULL DEFAULT 0"));
    assert!(sql.contains("PRIMARY KEY (`id`)"));
    assert!(sql.contains("DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci"));

    CreateUsers.revert(&mut executor).unwrap();
    assert_eq!(executor.statements[1].sql, "DROP TABLE `users`");
}

#[test]
fn queries_against_the_migrated_table_compile() {
    let compiler = SqlCompiler::new(MySqlDialect::new());

    let compiled = compiler.compile_select(
        &Query::table("users")
            .columns(&["id", "email"])
            .where_cmp("signin_attempts", ">=", 3)
            .unwrap()
            .where_null("updated_at"),
    );
    assert_eq!(
        compiled.sql,
        "SELECT `id`, `email` FROM `users` \
         WHERE `signin_attempts` >= ? AND `updated_at` IS NULL"
    );
    assert_eq!(compiled.params, vec![SqlValue::Int(3)]);

    let compiled = compiler
        .compile_insert(
            &Insert::into("users")
                .row(|r| r.set("email", "a@example.com"))
                .row(|r| r.set("email", "b@example.com").set("signin_attempts", 1)),
        )
        .unwrap();
    assert_eq!(
        compiled.sql,
        "INSERT INTO `users` (`email`, `signin_attempts`) VALUES (?,?), (?,?)"
    );
    assert_eq!(compiled.params[1], SqlValue::Null);
}

#[test]
fn introspected_column_diffs_into_a_modify_redefinition() {
    let registry = TypeRegistry::new();
    let row = MetadataRow {
        column_name: String::from("email"),
        data_type: String::from("varchar"),
        column_type: String::from("varchar(191)"),
        is_nullable: String::from("YES"),
        character_maximum_length: Some(191),
        ..MetadataRow::default()
    };
    let live = ColumnDescriptor::from_metadata(&row, &registry).unwrap();

    let mut declared = Schema::new("users");
    declared.varchar("email", 255).unique();

    let differ = SchemaDiffer::new(MySqlDialect::new(), registry);
    let fragments = differ
        .diff_column("users", &live, declared.column("email").unwrap())
        .unwrap();
    assert_eq!(
        fragments,
        vec![
            "MODIFY COLUMN `email` VARCHAR(255) NOT NULL",
            "ADD CONSTRAINT `uq_users_email` UNIQUE (`email`)",
        ]
    );
}
