//! Template store - where template records live.
//!
//! - `postgres` - sqlx-backed store used in production
//! - `memory` - in-process store for tests and local development

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTemplateStore;
pub use postgres::PgTemplateStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::templating::FormSchema;

/// A document template as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateRecord {
    #[schema(example = "a1b2c3d4-e5f6-7890-1234-567890abcdef")]
    pub id: Uuid,
    #[schema(example = "declaracao-de-residencia")]
    pub slug: String,
    #[schema(example = "Declaração de Residência")]
    pub title: String,
    #[schema(example = "Eu, {{nome}}, portador do BI n.º {{numero_bi}}, declaro...")]
    pub content: String,
    /// Price in the smallest currency unit (centavos).
    #[schema(example = 15000)]
    pub price: i64,
    pub form_schema: Option<FormSchema>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lookup key accepted wherever a template is addressed from the outside.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    Id(Uuid),
    Slug(String),
}

impl TemplateKey {
    /// A string that parses as a UUID is an id, anything else is a slug.
    pub fn parse(value: &str) -> Self {
        match Uuid::parse_str(value.trim()) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Slug(value.trim().to_string()),
        }
    }

    pub fn matches(&self, record: &TemplateRecord) -> bool {
        match self {
            Self::Id(id) => record.id == *id,
            Self::Slug(slug) => record.slug == *slug,
        }
    }
}

impl std::fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Slug(slug) => write!(f, "{}", slug),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to connect to template store: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("template store query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("template '{0}' not found")]
    NotFound(String),
    #[error("template slug '{0}' already exists")]
    Conflict(String),
    #[error("stored form schema is not valid JSON: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Persistence operations the application needs for templates.
#[async_trait]
pub trait TemplateStore {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, StoreError>;

    async fn get_template(&self, key: &TemplateKey) -> Result<Option<TemplateRecord>, StoreError>;

    /// Fails with `Conflict` when the slug is taken.
    async fn insert_template(&self, record: &TemplateRecord) -> Result<(), StoreError>;

    /// Replace the record with the same id. Returns false when it doesn't exist.
    async fn update_template(&self, record: &TemplateRecord) -> Result<bool, StoreError>;

    /// Store a generated form schema. Returns false when the template doesn't exist.
    async fn update_form_schema(
        &self,
        key: &TemplateKey,
        schema: &FormSchema,
    ) -> Result<bool, StoreError>;

    async fn delete_template(&self, id: &Uuid) -> Result<bool, StoreError>;
}
