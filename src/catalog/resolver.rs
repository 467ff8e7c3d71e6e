//! Find the schema that owns a bare table name.

use super::{SchemaIntrospector, TableReference};
use crate::error::AppError;
use std::str::FromStr;

/// How a bare table name present in several schemas is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// First schema in catalog order that contains the table wins.
    #[default]
    FirstMatch,
    /// Every schema is scanned; more than one owner is an error.
    Strict,
}

impl FromStr for ResolutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_match" | "first" => Ok(ResolutionPolicy::FirstMatch),
            "strict" => Ok(ResolutionPolicy::Strict),
            other => Err(format!("expected first_match or strict, got {}", other)),
        }
    }
}

pub struct TableResolver<'a, C: ?Sized> {
    catalog: &'a C,
    policy: ResolutionPolicy,
}

impl<'a, C> TableResolver<'a, C>
where
    C: SchemaIntrospector + ?Sized,
{
    pub fn new(catalog: &'a C, policy: ResolutionPolicy) -> Self {
        TableResolver { catalog, policy }
    }

    /// Resolve `table_name`, inside `schema_hint` when the caller named one.
    /// The returned reference always carries names as the catalog spells them.
    pub async fn resolve(
        &self,
        table_name: &str,
        schema_hint: Option<&str>,
    ) -> Result<TableReference, AppError> {
        if let Some(schema) = schema_hint {
            return self.resolve_in(schema, table_name).await;
        }

        let schemas = self.catalog.list_schemas().await?;
        let mut owners = Vec::new();
        for schema in schemas {
            if !self.schema_contains(&schema, table_name).await? {
                continue;
            }
            if self.policy == ResolutionPolicy::FirstMatch {
                tracing::debug!(table = table_name, schema = %schema, "resolved table (first match)");
                return Ok(TableReference::new(schema, table_name));
            }
            owners.push(schema);
        }

        match owners.len() {
            0 => Err(not_found(table_name)),
            1 => {
                let schema = owners.remove(0);
                tracing::debug!(table = table_name, schema = %schema, "resolved table");
                Ok(TableReference::new(schema, table_name))
            }
            _ => Err(AppError::AmbiguousTable {
                table: table_name.to_string(),
                schemas: owners,
            }),
        }
    }

    async fn resolve_in(&self, schema: &str, table_name: &str) -> Result<TableReference, AppError> {
        if self.schema_contains(schema, table_name).await? {
            Ok(TableReference::new(schema, table_name))
        } else {
            Err(AppError::NotFound(format!(
                "table '{}' not found in schema '{}'",
                table_name, schema
            )))
        }
    }

    async fn schema_contains(&self, schema: &str, table_name: &str) -> Result<bool, AppError> {
        let tables = self.catalog.list_tables(schema).await?;
        Ok(tables.iter().any(|t| t == table_name))
    }
}

fn not_found(table_name: &str) -> AppError {
    AppError::NotFound(format!("schema for table '{}' not found", table_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeBackend;

    fn catalog() -> FakeBackend {
        FakeBackend::new()
            .with_table("hr", "Employees", &[("id", "integer", false)], &["id"])
            .with_table("hr", "Departments", &[("id", "integer", false)], &["id"])
            .with_table("sales", "Orders", &[("id", "integer", false)], &["id"])
            .with_table("sales", "Employees", &[("id", "integer", false)], &["id"])
            .with_schema("empty")
    }

    #[tokio::test]
    async fn every_known_pair_resolves_to_an_owning_schema() {
        let fake = catalog();
        let resolver = TableResolver::new(&fake, ResolutionPolicy::FirstMatch);
        for (schema, table) in fake.known_tables() {
            let resolved = resolver.resolve(&table, None).await.unwrap();
            let tables = fake.list_tables(&resolved.schema).await.unwrap();
            assert!(tables.contains(&table), "{} not in {}", table, resolved.schema);
            let hinted = resolver.resolve(&table, Some(&schema)).await.unwrap();
            assert_eq!(hinted, TableReference::new(schema, table));
        }
    }

    #[tokio::test]
    async fn first_match_follows_catalog_order() {
        let fake = catalog();
        let resolver = TableResolver::new(&fake, ResolutionPolicy::FirstMatch);
        let resolved = resolver.resolve("Employees", None).await.unwrap();
        assert_eq!(resolved, TableReference::new("hr", "Employees"));
    }

    #[tokio::test]
    async fn strict_policy_reports_every_owner() {
        let fake = catalog();
        let resolver = TableResolver::new(&fake, ResolutionPolicy::Strict);
        match resolver.resolve("Employees", None).await {
            Err(AppError::AmbiguousTable { table, schemas }) => {
                assert_eq!(table, "Employees");
                assert_eq!(schemas, vec!["hr".to_string(), "sales".to_string()]);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
        let unique = resolver.resolve("Orders", None).await.unwrap();
        assert_eq!(unique.schema, "sales");
    }

    #[tokio::test]
    async fn unknown_table_is_not_found() {
        let fake = catalog();
        for policy in [ResolutionPolicy::FirstMatch, ResolutionPolicy::Strict] {
            let resolver = TableResolver::new(&fake, policy);
            assert!(matches!(resolver.resolve("Nope", None).await, Err(AppError::NotFound(_))));
            assert!(matches!(
                resolver.resolve("Orders", Some("hr")).await,
                Err(AppError::NotFound(_))
            ));
            assert!(matches!(
                resolver.resolve("Orders", Some("missing")).await,
                Err(AppError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn names_are_case_sensitive() {
        let fake = catalog();
        let resolver = TableResolver::new(&fake, ResolutionPolicy::FirstMatch);
        assert!(matches!(resolver.resolve("employees", None).await, Err(AppError::NotFound(_))));
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("strict".parse::<ResolutionPolicy>(), Ok(ResolutionPolicy::Strict));
        assert_eq!("FIRST_MATCH".parse::<ResolutionPolicy>(), Ok(ResolutionPolicy::FirstMatch));
        assert!("random".parse::<ResolutionPolicy>().is_err());
    }
}
