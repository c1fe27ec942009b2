//! SQL dialect support.
//!
//! Different databases quote identifiers differently. The compiler is
//! generic over a [`Dialect`] so the same query renders for any
//! backend that follows the `?` positional placeholder convention.

mod ansi;
mod mysql;

pub use ansi::AnsiDialect;
pub use mysql::MySqlDialect;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the positional parameter placeholder.
    fn placeholder(&self) -> &'static str {
        "?"
    }

    /// Quotes a bare identifier.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        format!("{quote}{name}{quote}")
    }

    /// Quotes a column reference.
    ///
    /// `*` passes through unquoted, and qualified references such as
    /// `users.id` are quoted per segment.
    fn quote_column(&self, column: &str) -> String {
        if column == "*" {
            return String::from("*");
        }
        column
            .split('.')
            .map(|part| {
                if part == "*" {
                    String::from("*")
                } else {
                    self.quote_identifier(part)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_quotes_with_backticks() {
        let dialect = MySqlDialect::new();
        assert_eq!(dialect.name(), "mysql");
        assert_eq!(dialect.quote_identifier("users"), "`users`");
        assert_eq!(dialect.placeholder(), "?");
    }

    #[test]
    fn ansi_quotes_with_double_quotes() {
        let dialect = AnsiDialect::new();
        assert_eq!(dialect.quote_identifier("users"), "\"users\"");
    }

    #[test]
    fn star_passes_through() {
        let dialect = MySqlDialect::new();
        assert_eq!(dialect.quote_column("*"), "*");
        assert_eq!(dialect.quote_column("u.*"), "`u`.*");
    }

    #[test]
    fn qualified_column_quoted_per_segment() {
        let dialect = MySqlDialect::new();
        assert_eq!(dialect.quote_column("users.id"), "`users`.`id`");
    }
}
