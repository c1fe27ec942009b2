//! # ferrite-sql-core
//!
//! A fluent SQL builder and dialect-aware compiler.
//!
//! This crate provides:
//! - Connector-carrying condition lists with nested groups
//! - Fluent SELECT / INSERT / UPDATE / DELETE builders
//! - A compiler that renders a builder into SQL text plus an ordered
//!   parameter list, one value per `?` placeholder
//!
//! ## Building and compiling
//!
//! ```rust
//! use ferrite_sql_core::builder::{Query, WhereClauses};
//! use ferrite_sql_core::compiler::SqlCompiler;
//! use ferrite_sql_core::dialect::MySqlDialect;
//!
//! let query = Query::table("users")
//!     .where_cmp("age", ">", 18)?
//!     .where_eq("status", "active");
//!
//! let compiled = SqlCompiler::new(MySqlDialect::new()).compile_select(&query);
//! assert_eq!(
//!     compiled.sql,
//!     "SELECT * FROM `users` WHERE `age` > ? AND `status` = ?"
//! );
//! assert_eq!(compiled.params.len(), 2);
//! # Ok::<(), ferrite_sql_core::Error>(())
//! ```
//!
//! ## Injection safety
//!
//! Values never reach the SQL text. Every condition and assignment
//! binds through a placeholder:
//!
//! ```rust
//! use ferrite_sql_core::builder::{Query, WhereClauses};
//! use ferrite_sql_core::compiler::SqlCompiler;
//! use ferrite_sql_core::dialect::MySqlDialect;
//!
//! let hostile = "'; DROP TABLE users; --";
//! let compiled = SqlCompiler::new(MySqlDialect::new())
//!     .compile_select(&Query::table("users").where_eq("name", hostile));
//!
//! assert!(!compiled.sql.contains("DROP"));
//! assert_eq!(compiled.params.len(), 1);
//! ```

pub mod builder;
pub mod compiler;
pub mod condition;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod value;

pub use builder::{Delete, Insert, Query, Update, WhereClauses};
pub use compiler::{Compiled, SqlCompiler};
pub use condition::{Conditions, Connector, Operator};
pub use dialect::{AnsiDialect, Dialect, MySqlDialect};
pub use error::{Error, Result};
pub use executor::{ExecError, ExecOutcome, Row, StatementExecutor};
pub use value::{SqlValue, ToSqlValue};
