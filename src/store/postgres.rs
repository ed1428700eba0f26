//! PostgreSQL template store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use super::{StoreError, TemplateKey, TemplateRecord, TemplateStore};
use crate::templating::FormSchema;

const TEMPLATE_COLUMNS: &str =
    "id, slug, title, content, price, form_schema, created_at, updated_at";

#[derive(Clone)]
pub struct PgTemplateStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    slug: String,
    title: String,
    content: String,
    price: i64,
    form_schema: Option<Json<Value>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TemplateRow> for TemplateRecord {
    type Error = StoreError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let form_schema = row
            .form_schema
            .map(|Json(value)| serde_json::from_value::<FormSchema>(value))
            .transpose()
            .map_err(StoreError::Serialization)?;

        Ok(TemplateRecord {
            id: row.id,
            slug: row.slug,
            title: row.title,
            content: row.content,
            price: row.price,
            form_schema,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn query_error(e: sqlx::Error, slug: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Conflict(slug.to_string());
        }
    }
    StoreError::Query(e)
}

fn schema_json(schema: &FormSchema) -> Result<Json<Value>, StoreError> {
    serde_json::to_value(schema)
        .map(Json)
        .map_err(StoreError::Serialization)
}

impl PgTemplateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await
            .map_err(StoreError::Connection)?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, StoreError> {
        let rows: Vec<TemplateRow> = sqlx::query_as(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates ORDER BY title"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        rows.into_iter().map(TemplateRecord::try_from).collect()
    }

    async fn get_template(&self, key: &TemplateKey) -> Result<Option<TemplateRecord>, StoreError> {
        let row: Option<TemplateRow> = match key {
            TemplateKey::Id(id) => {
                sqlx::query_as(&format!(
                    "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = $1"
                ))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
            }
            TemplateKey::Slug(slug) => {
                sqlx::query_as(&format!(
                    "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE slug = $1"
                ))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(StoreError::Query)?;

        row.map(TemplateRecord::try_from).transpose()
    }

    async fn insert_template(&self, record: &TemplateRecord) -> Result<(), StoreError> {
        let form_schema = record.form_schema.as_ref().map(schema_json).transpose()?;

        sqlx::query(
            r#"
            INSERT INTO templates (id, slug, title, content, price, form_schema, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(&record.slug)
        .bind(&record.title)
        .bind(&record.content)
        .bind(record.price)
        .bind(form_schema)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| query_error(e, &record.slug))?;

        Ok(())
    }

    async fn update_template(&self, record: &TemplateRecord) -> Result<bool, StoreError> {
        let form_schema = record.form_schema.as_ref().map(schema_json).transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE templates
            SET slug = $2, title = $3, content = $4, price = $5, form_schema = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.slug)
        .bind(&record.title)
        .bind(&record.content)
        .bind(record.price)
        .bind(form_schema)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| query_error(e, &record.slug))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_form_schema(
        &self,
        key: &TemplateKey,
        schema: &FormSchema,
    ) -> Result<bool, StoreError> {
        let form_schema = schema_json(schema)?;

        let result = match key {
            TemplateKey::Id(id) => {
                sqlx::query(
                    "UPDATE templates SET form_schema = $1, updated_at = NOW() WHERE id = $2",
                )
                .bind(form_schema)
                .bind(id)
                .execute(&self.pool)
                .await
            }
            TemplateKey::Slug(slug) => {
                sqlx::query(
                    "UPDATE templates SET form_schema = $1, updated_at = NOW() WHERE slug = $2",
                )
                .bind(form_schema)
                .bind(slug)
                .execute(&self.pool)
                .await
            }
        }
        .map_err(StoreError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_template(&self, id: &Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templating::{synthesize_from_template, SchemaRules};

    fn row(form_schema: Option<Value>) -> TemplateRow {
        let now = Utc::now();
        TemplateRow {
            id: Uuid::new_v4(),
            slug: "carta".to_string(),
            title: "Carta".to_string(),
            content: "{{nome}}".to_string(),
            price: 5000,
            form_schema: form_schema.map(Json),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_conversion_decodes_schema() {
        let schema =
            synthesize_from_template("{{nome}} {{motivo}}", "carta", &SchemaRules::default())
                .unwrap();
        let record =
            TemplateRecord::try_from(row(Some(serde_json::to_value(&schema).unwrap()))).unwrap();
        assert_eq!(record.form_schema, Some(schema));
        assert_eq!(record.price, 5000);
    }

    #[test]
    fn test_row_conversion_rejects_malformed_schema() {
        let result = TemplateRecord::try_from(row(Some(serde_json::json!({"sections": 3}))));
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    #[ignore = "requires database connection"]
    async fn test_connect_and_list() {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PgTemplateStore::connect(&url, 2).await.unwrap();
        store.list_templates().await.unwrap();
    }
}
