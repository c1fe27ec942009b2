//! Column type catalogue and value conversion.
//!
//! Every supported column type has a [`TypeId`]; a [`ValueConverter`]
//! for a type knows how to render its SQL type expression and to move
//! values between code representation and storage representation.
//! Converters are stateless, so the [`TypeRegistry`] builds each one
//! once and hands out shared instances.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use ferrite_sql_core::SqlValue;

use crate::error::{Result, SchemaError};

/// Storage format for DATE values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage format for TIME values.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Storage format for DATETIME and TIMESTAMP values.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifies one supported column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    /// Fixed-width bit field, 1 to 64 bits.
    Bit,
    /// 8-bit integer.
    TinyInt,
    /// 16-bit integer.
    SmallInt,
    /// 24-bit integer.
    MediumInt,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Fixed-length string, up to 255 characters.
    Char,
    /// Variable-length string, up to 65535 characters.
    Varchar,
    /// Text up to 255 bytes.
    TinyText,
    /// Text up to 64 KiB.
    Text,
    /// Text up to 16 MiB.
    MediumText,
    /// Text up to 4 GiB.
    LongText,
    /// JSON document.
    Json,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time without timezone.
    DateTime,
    /// Date and time in UTC.
    Timestamp,
}

impl TypeId {
    /// The SQL keyword for this type, without any options.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Bit => "BIT",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::MediumInt => "MEDIUMINT",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::TinyText => "TINYTEXT",
            Self::Text => "TEXT",
            Self::MediumText => "MEDIUMTEXT",
            Self::LongText => "LONGTEXT",
            Self::Json => "JSON",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime => "DATETIME",
            Self::Timestamp => "TIMESTAMP",
        }
    }

    /// Maps an introspected `DATA_TYPE` name back to a type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] for a name outside the
    /// catalogue.
    pub fn from_data_type(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bit" => Ok(Self::Bit),
            "tinyint" => Ok(Self::TinyInt),
            "smallint" => Ok(Self::SmallInt),
            "mediumint" => Ok(Self::MediumInt),
            "int" => Ok(Self::Int),
            "bigint" => Ok(Self::BigInt),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "char" => Ok(Self::Char),
            "varchar" => Ok(Self::Varchar),
            "tinytext" => Ok(Self::TinyText),
            "text" => Ok(Self::Text),
            "mediumtext" => Ok(Self::MediumText),
            "longtext" => Ok(Self::LongText),
            "json" => Ok(Self::Json),
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "datetime" => Ok(Self::DateTime),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(SchemaError::UnknownType(String::from(other))),
        }
    }
}

/// Per-column options that shape a type expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeOptions {
    /// Length for BIT, CHAR, and VARCHAR.
    pub length: Option<u32>,
    /// `(precision, scale)` for FLOAT and DOUBLE.
    pub precision: Option<(u8, u8)>,
    /// UNSIGNED modifier for numeric types.
    pub unsigned: bool,
}

impl TypeOptions {
    /// Options carrying only a length.
    #[must_use]
    pub const fn length(length: u32) -> Self {
        Self {
            length: Some(length),
            precision: None,
            unsigned: false,
        }
    }
}

/// Converts values of one column type between code and storage form.
pub trait ValueConverter: Send + Sync {
    /// The type this converter handles.
    fn id(&self) -> TypeId;

    /// Renders the SQL type expression, e.g. `VARCHAR(255)` or
    /// `INT UNSIGNED`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Bounds`] when an option is outside the
    /// type's range, or [`SchemaError::MissingOption`] when a required
    /// option is absent.
    fn sql(&self, options: &TypeOptions) -> Result<String>;

    /// Converts a code-side value into its storage representation.
    ///
    /// NULL passes through unchanged for every type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidValue`] when the value does not
    /// fit the type.
    fn to_storage(&self, value: &SqlValue) -> Result<SqlValue>;

    /// Converts a storage-side value back to its code representation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidValue`] when the stored value
    /// cannot be interpreted as this type.
    fn to_code(&self, value: &SqlValue) -> Result<SqlValue>;
}

fn bounds(
    type_name: &'static str,
    option: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> SchemaError {
    SchemaError::Bounds {
        type_name,
        option,
        value,
        min,
        max,
    }
}

fn invalid(type_name: &'static str, message: impl Into<String>) -> SchemaError {
    SchemaError::InvalidValue {
        type_name,
        message: message.into(),
    }
}

/// Integer family: BIT through BIGINT.
struct IntegerConverter {
    id: TypeId,
}

impl ValueConverter for IntegerConverter {
    fn id(&self) -> TypeId {
        self.id
    }

    fn sql(&self, options: &TypeOptions) -> Result<String> {
        let keyword = self.id.keyword();
        let mut out = match (self.id, options.length) {
            (TypeId::Bit, Some(n)) => {
                let n = i64::from(n);
                if !(1..=64).contains(&n) {
                    return Err(bounds(keyword, "length", n, 1, 64));
                }
                format!("BIT({n})")
            }
            (TypeId::Bit, None) => String::from("BIT(1)"),
            (_, Some(n)) => format!("{keyword}({n})"),
            (_, None) => String::from(keyword),
        };
        if options.unsigned && self.id != TypeId::Bit {
            out.push_str(" UNSIGNED");
        }
        Ok(out)
    }

    fn to_storage(&self, value: &SqlValue) -> Result<SqlValue> {
        match value {
            SqlValue::Null => Ok(SqlValue::Null),
            SqlValue::Int(n) => Ok(SqlValue::Int(*n)),
            SqlValue::Bool(b) => Ok(SqlValue::Int(i64::from(*b))),
            other => Err(invalid(
                self.id.keyword(),
                format!("expected integer, got {other:?}"),
            )),
        }
    }

    fn to_code(&self, value: &SqlValue) -> Result<SqlValue> {
        match value {
            SqlValue::Null => Ok(SqlValue::Null),
            // BIT(1) columns come back as 0/1 and read as booleans.
            SqlValue::Int(n) if self.id == TypeId::Bit => Ok(SqlValue::Bool(*n != 0)),
            SqlValue::Int(n) => Ok(SqlValue::Int(*n)),
            other => Err(invalid(
                self.id.keyword(),
                format!("expected stored integer, got {other:?}"),
            )),
        }
    }
}

/// Float family: FLOAT and DOUBLE.
struct FloatConverter {
    id: TypeId,
}

impl ValueConverter for FloatConverter {
    fn id(&self) -> TypeId {
        self.id
    }

    fn sql(&self, options: &TypeOptions) -> Result<String> {
        let keyword = self.id.keyword();
        let mut out = match options.precision {
            Some((precision, scale)) => {
                if scale > precision {
                    return Err(bounds(
                        keyword,
                        "scale",
                        i64::from(scale),
                        0,
                        i64::from(precision),
                    ));
                }
                format!("{keyword}({precision},{scale})")
            }
            None => String::from(keyword),
        };
        if options.unsigned {
            out.push_str(" UNSIGNED");
        }
        Ok(out)
    }

    fn to_storage(&self, value: &SqlValue) -> Result<SqlValue> {
        match value {
            SqlValue::Null => Ok(SqlValue::Null),
            SqlValue::Float(f) => Ok(SqlValue::Float(*f)),
            #[allow(clippy::cast_precision_loss)]
            SqlValue::Int(n) => Ok(SqlValue::Float(*n as f64)),
            other => Err(invalid(
                self.id.keyword(),
                format!("expected float, got {other:?}"),
            )),
        }
    }

    fn to_code(&self, value: &SqlValue) -> Result<SqlValue> {
        match value {
            SqlValue::Null => Ok(SqlValue::Null),
            SqlValue::Float(f) => Ok(SqlValue::Float(*f)),
            other => Err(invalid(
                self.id.keyword(),
                format!("expected stored float, got {other:?}"),
            )),
        }
    }
}

/// Text family: CHAR, VARCHAR, the TEXT widths, and JSON.
struct TextConverter {
    id: TypeId,
}

impl TextConverter {
    /// `(min, max)` length bounds for the sized members.
    const fn length_bounds(id: TypeId) -> Option<(i64, i64)> {
        match id {
            TypeId::Char => Some((0, 255)),
            TypeId::Varchar => Some((0, 65_535)),
            _ => None,
        }
    }
}

impl ValueConverter for TextConverter {
    fn id(&self) -> TypeId {
        self.id
    }

    fn sql(&self, options: &TypeOptions) -> Result<String> {
        let keyword = self.id.keyword();
        match Self::length_bounds(self.id) {
            Some((min, max)) => {
                let Some(length) = options.length else {
                    return Err(SchemaError::MissingOption {
                        type_name: keyword,
                        option: "length",
                    });
                };
                let length = i64::from(length);
                if !(min..=max).contains(&length) {
                    return Err(bounds(keyword, "length", length, min, max));
                }
                Ok(format!("{keyword}({length})"))
            }
            None => Ok(String::from(keyword)),
        }
    }

    fn to_storage(&self, value: &SqlValue) -> Result<SqlValue> {
        match value {
            SqlValue::Null => Ok(SqlValue::Null),
            SqlValue::Text(s) => Ok(SqlValue::Text(s.clone())),
            other => Err(invalid(
                self.id.keyword(),
                format!("expected string, got {other:?}"),
            )),
        }
    }

    fn to_code(&self, value: &SqlValue) -> Result<SqlValue> {
        self.to_storage(value)
    }
}

/// Temporal family: DATE, TIME, DATETIME, TIMESTAMP.
struct TemporalConverter {
    id: TypeId,
}

impl TemporalConverter {
    const fn format(&self) -> &'static str {
        match self.id {
            TypeId::Date => DATE_FORMAT,
            TypeId::Time => TIME_FORMAT,
            _ => DATETIME_FORMAT,
        }
    }
}

impl ValueConverter for TemporalConverter {
    fn id(&self) -> TypeId {
        self.id
    }

    fn sql(&self, _options: &TypeOptions) -> Result<String> {
        Ok(String::from(self.id.keyword()))
    }

    fn to_storage(&self, value: &SqlValue) -> Result<SqlValue> {
        match value {
            SqlValue::Null => Ok(SqlValue::Null),
            SqlValue::DateTime(dt) => {
                Ok(SqlValue::Text(dt.format(self.format()).to_string()))
            }
            // Pre-formatted text is accepted if it parses back.
            SqlValue::Text(s) => {
                self.to_code(value)?;
                Ok(SqlValue::Text(s.clone()))
            }
            other => Err(invalid(
                self.id.keyword(),
                format!("expected datetime, got {other:?}"),
            )),
        }
    }

    fn to_code(&self, value: &SqlValue) -> Result<SqlValue> {
        let keyword = self.id.keyword();
        match value {
            SqlValue::Null => Ok(SqlValue::Null),
            SqlValue::DateTime(dt) => Ok(SqlValue::DateTime(*dt)),
            SqlValue::Text(s) => {
                let parsed = match self.id {
                    TypeId::Date => NaiveDate::parse_from_str(s, DATE_FORMAT)
                        .map_err(|e| invalid(keyword, e.to_string()))?
                        .and_hms_opt(0, 0, 0)
                        .ok_or_else(|| invalid(keyword, "date out of range"))?,
                    // TIME has no date of its own; round-trips pinned
                    // to the epoch date.
                    TypeId::Time => NaiveDateTime::new(
                        NaiveDate::from_ymd_opt(1970, 1, 1)
                            .ok_or_else(|| invalid(keyword, "epoch date unavailable"))?,
                        NaiveTime::parse_from_str(s, TIME_FORMAT)
                            .map_err(|e| invalid(keyword, e.to_string()))?,
                    ),
                    _ => NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                        .map_err(|e| invalid(keyword, e.to_string()))?,
                };
                Ok(SqlValue::DateTime(parsed))
            }
            other => Err(invalid(
                keyword,
                format!("expected stored datetime, got {other:?}"),
            )),
        }
    }
}

fn build_converter(id: TypeId) -> Arc<dyn ValueConverter> {
    match id {
        TypeId::Bit
        | TypeId::TinyInt
        | TypeId::SmallInt
        | TypeId::MediumInt
        | TypeId::Int
        | TypeId::BigInt => Arc::new(IntegerConverter { id }),
        TypeId::Float | TypeId::Double => Arc::new(FloatConverter { id }),
        TypeId::Char
        | TypeId::Varchar
        | TypeId::TinyText
        | TypeId::Text
        | TypeId::MediumText
        | TypeId::LongText
        | TypeId::Json => Arc::new(TextConverter { id }),
        TypeId::Date | TypeId::Time | TypeId::DateTime | TypeId::Timestamp => {
            Arc::new(TemporalConverter { id })
        }
    }
}

/// Shared, memoizing store of converters.
///
/// Converters are stateless, so the registry builds each at most once
/// and clones out `Arc` handles after that. The registry is an
/// explicit value to pass around, not process-global state.
pub struct TypeRegistry {
    converters: RwLock<HashMap<TypeId, Arc<dyn ValueConverter>>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the converter for `id`, building it on first use.
    pub fn converter(&self, id: TypeId) -> Arc<dyn ValueConverter> {
        if let Ok(map) = self.converters.read() {
            if let Some(existing) = map.get(&id) {
                return Arc::clone(existing);
            }
        }
        let built = build_converter(id);
        if let Ok(mut map) = self.converters.write() {
            // A racing writer may have inserted meanwhile; keep theirs.
            return Arc::clone(map.entry(id).or_insert(built));
        }
        debug!(?id, "type registry lock poisoned, using unshared converter");
        built
    }

    /// Renders the SQL type expression for `id` with `options`.
    ///
    /// # Errors
    ///
    /// Propagates the converter's bounds and option errors.
    pub fn sql(&self, id: TypeId, options: &TypeOptions) -> Result<String> {
        self.converter(id).sql(options)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached: Vec<TypeId> = self
            .converters
            .read()
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        f.debug_struct("TypeRegistry").field("cached", &cached).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varchar_requires_and_bounds_its_length() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry
                .sql(TypeId::Varchar, &TypeOptions::length(255))
                .unwrap(),
            "VARCHAR(255)"
        );
        assert!(matches!(
            registry.sql(TypeId::Varchar, &TypeOptions::length(65_536)),
            Err(SchemaError::Bounds { max: 65_535, .. })
        ));
        assert!(matches!(
            registry.sql(TypeId::Varchar, &TypeOptions::default()),
            Err(SchemaError::MissingOption { .. })
        ));
    }

    #[test]
    fn bit_length_is_bounded_and_defaults_to_one() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.sql(TypeId::Bit, &TypeOptions::default()).unwrap(),
            "BIT(1)"
        );
        assert_eq!(
            registry.sql(TypeId::Bit, &TypeOptions::length(64)).unwrap(),
            "BIT(64)"
        );
        assert!(matches!(
            registry.sql(TypeId::Bit, &TypeOptions::length(65)),
            Err(SchemaError::Bounds { min: 1, max: 64, .. })
        ));
    }

    #[test]
    fn unsigned_modifier_applies_to_numerics() {
        let registry = TypeRegistry::new();
        let options = TypeOptions {
            unsigned: true,
            ..TypeOptions::default()
        };
        assert_eq!(registry.sql(TypeId::BigInt, &options).unwrap(), "BIGINT UNSIGNED");
        assert_eq!(registry.sql(TypeId::Double, &options).unwrap(), "DOUBLE UNSIGNED");
    }

    #[test]
    fn registry_memoizes_converters() {
        let registry = TypeRegistry::new();
        let first = registry.converter(TypeId::Int);
        let second = registry.converter(TypeId::Int);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn datetime_round_trips_through_storage_text() {
        let registry = TypeRegistry::new();
        let converter = registry.converter(TypeId::DateTime);
        let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        let stored = converter.to_storage(&SqlValue::DateTime(dt)).unwrap();
        assert_eq!(stored, SqlValue::Text(String::from("2024-03-15 09:30:00")));
        assert_eq!(converter.to_code(&stored).unwrap(), SqlValue::DateTime(dt));
    }

    #[test]
    fn time_round_trips_on_the_epoch_date() {
        let registry = TypeRegistry::new();
        let converter = registry.converter(TypeId::Time);
        let decoded = converter
            .to_code(&SqlValue::Text(String::from("13:45:09")))
            .unwrap();
        let SqlValue::DateTime(dt) = decoded else {
            panic!("expected DateTime, got {decoded:?}");
        };
        assert_eq!(dt.format(DATETIME_FORMAT).to_string(), "1970-01-01 13:45:09");
        assert_eq!(
            converter.to_storage(&SqlValue::DateTime(dt)).unwrap(),
            SqlValue::Text(String::from("13:45:09"))
        );
    }

    #[test]
    fn bit_reads_back_as_bool() {
        let registry = TypeRegistry::new();
        let converter = registry.converter(TypeId::Bit);
        assert_eq!(
            converter.to_storage(&SqlValue::Bool(true)).unwrap(),
            SqlValue::Int(1)
        );
        assert_eq!(
            converter.to_code(&SqlValue::Int(1)).unwrap(),
            SqlValue::Bool(true)
        );
    }

    #[test]
    fn null_passes_every_converter_unchanged() {
        let registry = TypeRegistry::new();
        for id in [TypeId::Int, TypeId::Varchar, TypeId::DateTime, TypeId::Double] {
            let converter = registry.converter(id);
            assert_eq!(converter.to_storage(&SqlValue::Null).unwrap(), SqlValue::Null);
            assert_eq!(converter.to_code(&SqlValue::Null).unwrap(), SqlValue::Null);
        }
    }

    #[test]
    fn unknown_data_type_is_rejected() {
        assert!(matches!(
            TypeId::from_data_type("geometry"),
            Err(SchemaError::UnknownType(name)) if name == "geometry"
        ));
        assert_eq!(TypeId::from_data_type("VARCHAR").unwrap(), TypeId::Varchar);
    }

    #[test]
    fn type_mismatch_is_an_error_not_a_default() {
        let registry = TypeRegistry::new();
        let converter = registry.converter(TypeId::Int);
        assert!(converter
            .to_storage(&SqlValue::Text(String::from("nine")))
            .is_err());
    }
}
