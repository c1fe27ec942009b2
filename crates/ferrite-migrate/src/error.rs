//! Error types for the schema and migration layer.

/// Errors that can occur while defining, converting, or diffing schemas.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A type option is outside the range its type accepts.
    #[error("{type_name} {option} {value} is out of range [{min}, {max}]")]
    Bounds {
        /// Name of the column type.
        type_name: &'static str,
        /// Which option was rejected.
        option: &'static str,
        /// The offending value.
        value: i64,
        /// Lowest accepted value.
        min: i64,
        /// Highest accepted value.
        max: i64,
    },

    /// A data type name from introspection has no registered type.
    #[error("Unknown column data type: {0}")]
    UnknownType(String),

    /// A constraint was needed but the column carries none of that kind.
    #[error("No {kind} constraint recorded for {table}.{column}")]
    ConstraintNotFound {
        /// Constraint kind ("unique", "foreign key", "primary key").
        kind: &'static str,
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// A named column does not exist in the table description.
    #[error("Table '{table}' has no column '{column}'")]
    NoSuchColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// A stored or in-code value does not fit the column type.
    #[error("Invalid value for {type_name}: {message}")]
    InvalidValue {
        /// Name of the column type.
        type_name: &'static str,
        /// What was wrong with the value.
        message: String,
    },

    /// A type requires an option that was not provided.
    #[error("{type_name} requires the {option} option")]
    MissingOption {
        /// Name of the column type.
        type_name: &'static str,
        /// Which option is missing.
        option: &'static str,
    },

    /// An error bubbled up from statement compilation.
    #[error(transparent)]
    Sql(#[from] ferrite_sql_core::Error),
}

/// Convenience alias for schema-layer results.
pub type Result<T> = std::result::Result<T, SchemaError>;
