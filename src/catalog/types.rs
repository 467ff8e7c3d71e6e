//! Introspected table model: references, columns, primary keys.

use crate::error::AppError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A table located in a schema. Built from catalog results only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableReference {
    pub schema: String,
    pub table: String,
}

impl TableReference {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        TableReference {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Value family of a declared column type; drives payload coercion and read casts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Decimal,
    Boolean,
    Text,
    Binary,
    Json,
    Uuid,
    Temporal,
    Other,
}

impl ColumnKind {
    /// Classify a declared type as reported by any of the supported catalogs
    /// (`character varying(20)`, `int unsigned`, `tinyint(1)`, `INTEGER`, ...).
    pub fn classify(declared: &str) -> ColumnKind {
        let lowered = declared.trim().to_ascii_lowercase();
        if lowered == "tinyint(1)" {
            return ColumnKind::Boolean;
        }
        if lowered.ends_with("[]") {
            return ColumnKind::Other;
        }
        let base = base_type(&lowered);
        match base.as_str() {
            "smallint" | "integer" | "int" | "bigint" | "tinyint" | "mediumint" | "int2" | "int4"
            | "int8" | "serial" | "smallserial" | "bigserial" | "year" => ColumnKind::Integer,
            "real" | "float" | "float4" | "float8" | "double" | "double precision" => ColumnKind::Float,
            "numeric" | "decimal" | "money" => ColumnKind::Decimal,
            "boolean" | "bool" => ColumnKind::Boolean,
            "text" | "varchar" | "character varying" | "char" | "character" | "bpchar" | "name"
            | "citext" | "tinytext" | "mediumtext" | "longtext" | "clob" | "enum" | "set" => {
                ColumnKind::Text
            }
            "bytea" | "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary" => {
                ColumnKind::Binary
            }
            "json" | "jsonb" => ColumnKind::Json,
            "uuid" => ColumnKind::Uuid,
            "date" | "time" | "time without time zone" | "timestamp" | "timestamptz"
            | "timestamp without time zone" | "timestamp with time zone" | "datetime" => {
                ColumnKind::Temporal
            }
            "interval" | "point" | "multipoint" | "time with time zone" | "timetz" | "inet" | "cidr"
            | "macaddr" | "xml" | "bit" | "bit varying" | "varbit" | "tsvector" | "geometry" => {
                ColumnKind::Other
            }
            other => affinity(other),
        }
    }
}

/// Lowercased type name with parenthesized modifiers and MySQL attributes removed.
pub fn base_type(lowered: &str) -> String {
    static MODIFIERS: OnceLock<Regex> = OnceLock::new();
    let re = MODIFIERS.get_or_init(|| Regex::new(r"\([^)]*\)|\b(unsigned|zerofill)\b").expect("static regex"));
    re.replace_all(lowered, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// SQLite-style affinity for declared types no catalog names exactly.
fn affinity(base: &str) -> ColumnKind {
    if base.contains("int") {
        ColumnKind::Integer
    } else if base.contains("char") || base.contains("clob") || base.contains("text") {
        ColumnKind::Text
    } else if base.contains("blob") {
        ColumnKind::Binary
    } else if base.contains("real") || base.contains("floa") || base.contains("doub") {
        ColumnKind::Float
    } else if base.contains("bool") {
        ColumnKind::Boolean
    } else {
        ColumnKind::Other
    }
}

#[derive(Clone, Debug)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Declared type exactly as the catalog reports it.
    pub data_type: String,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub has_default: bool,
    /// Catalog-qualified type name used to cast bound parameters (PostgreSQL only).
    pub cast_type: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        let data_type = data_type.into();
        ColumnDescriptor {
            name: name.into(),
            kind: ColumnKind::classify(&data_type),
            data_type,
            nullable,
            has_default: false,
            cast_type: None,
        }
    }

    pub fn with_default(mut self, has_default: bool) -> Self {
        self.has_default = has_default;
        self
    }

    pub fn with_cast_type(mut self, cast_type: impl Into<String>) -> Self {
        self.cast_type = Some(cast_type.into());
        self
    }
}

/// Primary key columns in key order. Only single-column keys are usable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimaryKeyDescriptor {
    pub columns: Vec<String>,
}

impl PrimaryKeyDescriptor {
    pub fn new(columns: Vec<String>) -> Self {
        PrimaryKeyDescriptor { columns }
    }

    /// The key column when the key has exactly one; composite keys are rejected.
    pub fn single(&self) -> Result<&str, AppError> {
        match self.columns.as_slice() {
            [only] => Ok(only),
            cols => Err(AppError::Validation(format!(
                "composite primary key ({}) is not supported; only single-column keys can address a record",
                cols.join(", ")
            ))),
        }
    }
}

/// Everything the statement builder needs about one table.
#[derive(Clone, Debug)]
pub struct TableSchema {
    pub reference: TableReference,
    pub columns: Vec<ColumnDescriptor>,
    pub primary_key: Option<PrimaryKeyDescriptor>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The single primary-key column's descriptor.
    pub fn primary_key_column(&self) -> Result<&ColumnDescriptor, AppError> {
        let pk = self
            .primary_key
            .as_ref()
            .ok_or_else(|| AppError::MissingPrimaryKey(self.reference.clone()))?;
        let name = pk.single()?;
        self.column(name)
            .ok_or_else(|| AppError::MissingPrimaryKey(self.reference.clone()))
    }
}
