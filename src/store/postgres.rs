//! Direct PostgreSQL client. Rows are converted to JSON inside the database
//! (`row_to_json`), so no column typing happens here. Tables without a schema
//! resolve to `public`.

use crate::error::{ConfigError, StoreError};
use crate::store::{DataStore, Record, TableRef};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

pub const DEFAULT_SCHEMA: &str = "public";

/// Quote identifier for PostgreSQL. Table names come straight from requests.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub fn select_all_sql(schema: &str, table: &str) -> String {
    format!("SELECT row_to_json(t) FROM {} t", qualified_table(schema, table))
}

/// INSERT for the given column names; the record is bound as the sole `$1` (jsonb)
/// and expanded with `jsonb_populate_record` so the database does the type coercion.
pub fn insert_sql<'a>(schema: &str, table: &str, columns: impl IntoIterator<Item = &'a str>) -> String {
    let table = qualified_table(schema, table);
    let cols = columns.into_iter().map(quoted).collect::<Vec<_>>().join(", ");
    let insert = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING *", table)
    } else {
        format!(
            "INSERT INTO {table} ({cols}) SELECT {cols} FROM jsonb_populate_record(NULL::{table}, $1) RETURNING *",
            table = table,
            cols = cols
        )
    };
    format!("WITH ins AS ({}) SELECT row_to_json(ins) FROM ins", insert)
}

pub fn ping_sql(schema: &str, table: &str) -> String {
    format!("SELECT 1 FROM {} LIMIT 1", qualified_table(schema, table))
}

fn schema_of(table: &TableRef) -> &str {
    table.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
}

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub async fn connect(database_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(timeout)
            .connect(database_url)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "could not connect to postgres");
                ConfigError::ClientInit(e.to_string())
            })?;
        Ok(PgStore::new(pool))
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn select_all(&self, table: &TableRef) -> Result<Vec<Value>, StoreError> {
        let sql = select_all_sql(schema_of(table), &table.name);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_scalar::<_, Value>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert(&self, table: &TableRef, record: &Record) -> Result<Value, StoreError> {
        let sql = insert_sql(schema_of(table), &table.name, record.keys().map(String::as_str));
        tracing::debug!(sql = %sql, "query");
        let mut query = sqlx::query_scalar::<_, Value>(&sql);
        if !record.is_empty() {
            query = query.bind(Value::Object(record.clone()));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(Value::Array(rows))
    }

    async fn ping(&self, table: &TableRef) -> Result<(), StoreError> {
        sqlx::query(&ping_sql(schema_of(table), &table.name))
            .fetch_optional(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_quotes_schema_and_table() {
        assert_eq!(
            select_all_sql("public", "database-build-8p0tx0q2wyg11r76"),
            r#"SELECT row_to_json(t) FROM "public"."database-build-8p0tx0q2wyg11r76" t"#
        );
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        assert_eq!(
            ping_sql("public", r#"x"; DROP TABLE y; --"#),
            r#"SELECT 1 FROM "public"."x""; DROP TABLE y; --" LIMIT 1"#
        );
    }

    #[test]
    fn insert_uses_record_keys_as_columns() {
        let sql = insert_sql("public", "resultados", ["tabla", "x"]);
        assert_eq!(
            sql,
            r#"WITH ins AS (INSERT INTO "public"."resultados" ("tabla", "x") SELECT "tabla", "x" FROM jsonb_populate_record(NULL::"public"."resultados", $1) RETURNING *) SELECT row_to_json(ins) FROM ins"#
        );
    }

    #[test]
    fn schema_follows_the_table_ref() {
        let t = TableRef::new("pollos_chanchos").in_schema(Some("granja"));
        assert_eq!(
            select_all_sql(schema_of(&t), &t.name),
            r#"SELECT row_to_json(t) FROM "granja"."pollos_chanchos" t"#
        );
        let t = TableRef::new("pollos_chanchos");
        assert_eq!(schema_of(&t), "public");
    }

    #[test]
    fn empty_record_inserts_defaults() {
        let sql = insert_sql("public", "pollos_chanchos", std::iter::empty());
        assert_eq!(
            sql,
            r#"WITH ins AS (INSERT INTO "public"."pollos_chanchos" DEFAULT VALUES RETURNING *) SELECT row_to_json(ins) FROM ins"#
        );
    }
}
