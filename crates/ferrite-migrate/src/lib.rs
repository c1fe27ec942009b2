//! # ferrite-migrate
//!
//! Schema definition, introspection, and diff-based DDL generation on
//! top of `ferrite-sql-core`.
//!
//! This crate provides:
//! - A declarative schema builder with a full MySQL type catalogue
//! - Value converters that move column values between code and
//!   storage representation, with strict bounds checking
//! - A differ that emits the minimal ALTER fragments for a change
//!
//! # Example
//!
//! ```rust
//! use ferrite_migrate::diff::SchemaDiffer;
//! use ferrite_migrate::schema::Schema;
//! use ferrite_migrate::types::TypeRegistry;
//! use ferrite_sql_core::MySqlDialect;
//!
//! let mut schema = Schema::new("users");
//! schema.increments("id");
//! schema.varchar("email", 255).unique();
//! schema.timestamps();
//!
//! let differ = SchemaDiffer::new(MySqlDialect::new(), TypeRegistry::new());
//! let sql = differ.create_table(&schema)?;
//! assert!(sql.starts_with("CREATE TABLE `users`"));
//! # Ok::<(), ferrite_migrate::SchemaError>(())
//! ```

pub mod diff;
pub mod error;
pub mod migration;
pub mod schema;
pub mod types;

pub use diff::SchemaDiffer;
pub use error::{Result, SchemaError};
pub use migration::Migration;
pub use schema::{ColumnDescriptor, ForeignRef, MetadataRow, MetadataSource, Schema, TableInfo};
pub use types::{TypeId, TypeOptions, TypeRegistry, ValueConverter};
