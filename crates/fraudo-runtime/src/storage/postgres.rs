//! PostgreSQL event repository

use super::{AggregateQuery, EventRepository, HistoricalEvent, SqlParam};
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use sqlx::PgPool;

/// Event repository backed by one PostgreSQL table
///
/// Attributes live in a JSONB column so both domains share the schema;
/// payment and P2P engines point at different tables.
pub struct PostgresEventRepository {
    pool: PgPool,
    table: String,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        let valid = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid {
            return Err(RuntimeError::AggregateQuery(format!(
                "Invalid table name: {}",
                table
            )));
        }
        Ok(Self { pool, table })
    }

    /// Connect and create the events table if missing
    pub async fn connect(url: &str, max_connections: u32, table: &str) -> Result<Self> {
        tracing::info!("Creating PostgreSQL connection pool for {}", table);
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await
            .map_err(|e| {
                RuntimeError::AggregateQuery(format!("Failed to connect to PostgreSQL: {}", e))
            })?;

        let repository = Self::new(pool, table)?;
        repository.ensure_schema().await?;
        Ok(repository)
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let statements = [
            format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id UUID PRIMARY KEY,
                    timestamp BIGINT NOT NULL,
                    template_id TEXT NOT NULL,
                    rule_id TEXT,
                    event_kind TEXT NOT NULL DEFAULT 'operation',
                    status TEXT NOT NULL,
                    error_code TEXT,
                    amount BIGINT NOT NULL,
                    attributes JSONB NOT NULL
                )",
                self.table
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {}_timestamp_idx ON {} (timestamp)",
                self.table.replace('.', "_"),
                self.table
            ),
        ];

        for statement in &statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| RuntimeError::AggregateQuery(format!("Schema setup failed: {}", e)))?;
        }
        Ok(())
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (id, timestamp, template_id, rule_id, event_kind, status, error_code, \
             amount, attributes) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            self.table
        )
    }
}

fn attributes_json(event: &HistoricalEvent) -> Result<serde_json::Value> {
    serde_json::to_value(&event.attributes)
        .map_err(|e| RuntimeError::AggregateQuery(format!("Cannot encode attributes: {}", e)))
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn insert(&self, event: HistoricalEvent) -> Result<()> {
        self.insert_batch(vec![event]).await
    }

    async fn insert_batch(&self, events: Vec<HistoricalEvent>) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {}", e);
            RuntimeError::AggregateQuery(format!("Failed to begin transaction: {}", e))
        })?;

        let sql = self.insert_sql();
        for event in &events {
            sqlx::query(&sql)
                .bind(event.id)
                .bind(event.timestamp)
                .bind(&event.template_id)
                .bind(event.rule_id.as_deref())
                .bind(event.kind.as_str())
                .bind(event.status.as_str())
                .bind(event.error_code.as_deref())
                .bind(event.amount)
                .bind(attributes_json(event)?)
                .execute(&mut *tx)
                .await
                .map_err(|e| RuntimeError::AggregateQuery(format!("Insert failed: {}", e)))?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit {} events: {}", events.len(), e);
            RuntimeError::AggregateQuery(format!("Failed to commit transaction: {}", e))
        })?;

        tracing::debug!("Inserted {} events into {}", events.len(), self.table);
        Ok(())
    }

    async fn aggregate(&self, query: AggregateQuery) -> Result<i64> {
        let (sql, params) = query.to_sql(&self.table);
        tracing::debug!("Generated SQL: {}", sql);

        let mut statement = sqlx::query_scalar::<_, i64>(&sql);
        for param in params {
            statement = match param {
                SqlParam::Text(text) => statement.bind(text),
                SqlParam::Int(value) => statement.bind(value),
            };
        }

        statement
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RuntimeError::AggregateQuery(e.to_string()))
    }
}
