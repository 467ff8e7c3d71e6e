//! Identifier quoting, placeholders and read casts per backend.

use crate::catalog::{ColumnDescriptor, ColumnKind, TableReference};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Quote an identifier, doubling any embedded quote character.
    pub fn quote(&self, ident: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
            Dialect::Postgres | Dialect::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    pub fn qualified(&self, table: &TableReference) -> String {
        format!("{}.{}", self.quote(&table.schema), self.quote(&table.table))
    }

    /// Placeholder for the `n`th parameter (1-based) bound to `column`.
    /// PostgreSQL casts to the column's catalog type so text-encoded values land correctly.
    pub fn placeholder(&self, n: usize, column: &ColumnDescriptor) -> String {
        match self {
            Dialect::Postgres => match &column.cast_type {
                Some(t) => format!("${}::{}", n, t),
                None => format!("${}", n),
            },
            Dialect::MySql | Dialect::Sqlite => "?".to_string(),
        }
    }

    /// SELECT-list expression for a column, cast to text where the driver has no native decoder.
    pub fn select_expr(&self, column: &ColumnDescriptor) -> String {
        let q = self.quote(&column.name);
        match self {
            Dialect::Postgres if needs_text_cast_pg(column) => format!("{}::text AS {}", q, q),
            Dialect::MySql => match mysql_read_cast(column) {
                Some(MySqlCast::Char) => format!("CAST({} AS CHAR) AS {}", q, q),
                Some(MySqlCast::Unsigned) => format!("CAST({} AS UNSIGNED) AS {}", q, q),
                Some(MySqlCast::WellKnownText) => format!("ST_AsText({}) AS {}", q, q),
                None => q,
            },
            _ => q,
        }
    }
}

enum MySqlCast {
    Char,
    Unsigned,
    WellKnownText,
}

fn mysql_read_cast(column: &ColumnDescriptor) -> Option<MySqlCast> {
    if column.kind == ColumnKind::Decimal {
        return Some(MySqlCast::Char);
    }
    match crate::catalog::base_type(&column.data_type.to_ascii_lowercase()).as_str() {
        "bit" => Some(MySqlCast::Unsigned),
        "geometry" | "point" | "linestring" | "polygon" | "multipoint" | "multilinestring"
        | "multipolygon" | "geometrycollection" | "geomcollection" => Some(MySqlCast::WellKnownText),
        _ => None,
    }
}

fn needs_text_cast_pg(column: &ColumnDescriptor) -> bool {
    match column.kind {
        ColumnKind::Decimal | ColumnKind::Other => true,
        // citext and friends classify as text but are not decodable as String
        ColumnKind::Text => !matches!(
            crate::catalog::base_type(&column.data_type.to_ascii_lowercase()).as_str(),
            "text" | "character varying" | "varchar" | "character" | "char" | "bpchar" | "name"
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(Dialect::Postgres.quote("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(Dialect::Sqlite.quote("plain"), "\"plain\"");
        assert_eq!(Dialect::MySql.quote("a`b"), "`a``b`");
    }

    #[test]
    fn placeholders_follow_backend_style() {
        let col = ColumnDescriptor::new("id", "integer", false).with_cast_type("pg_catalog.int4");
        assert_eq!(Dialect::Postgres.placeholder(3, &col), "$3::pg_catalog.int4");
        assert_eq!(Dialect::MySql.placeholder(3, &col), "?");
        assert_eq!(Dialect::Sqlite.placeholder(3, &col), "?");
    }

    #[test]
    fn undecodable_postgres_types_are_read_as_text() {
        let price = ColumnDescriptor::new("price", "numeric(10,2)", true);
        let name = ColumnDescriptor::new("name", "character varying(40)", true);
        let email = ColumnDescriptor::new("email", "citext", true);
        assert_eq!(Dialect::Postgres.select_expr(&price), "\"price\"::text AS \"price\"");
        assert_eq!(Dialect::Postgres.select_expr(&name), "\"name\"");
        assert_eq!(Dialect::Postgres.select_expr(&email), "\"email\"::text AS \"email\"");
        assert_eq!(Dialect::MySql.select_expr(&price), "CAST(`price` AS CHAR) AS `price`");
        assert_eq!(Dialect::Sqlite.select_expr(&price), "\"price\"");
    }

    #[test]
    fn mysql_types_without_a_decoder_are_converted_on_read() {
        let flags = ColumnDescriptor::new("flags", "bit(8)", true);
        let area = ColumnDescriptor::new("area", "polygon", true);
        let founded = ColumnDescriptor::new("founded", "year", true);
        assert_eq!(Dialect::MySql.select_expr(&flags), "CAST(`flags` AS UNSIGNED) AS `flags`");
        assert_eq!(Dialect::MySql.select_expr(&area), "ST_AsText(`area`) AS `area`");
        assert_eq!(Dialect::MySql.select_expr(&founded), "`founded`");
    }
}
