use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::TemplateRecord;
use crate::templating::FormSchema;

/// Catalogue entry shown to users choosing a document.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct TemplateSummary {
    pub id: Uuid,
    #[schema(example = "declaracao-de-residencia")]
    pub slug: String,
    #[schema(example = "Declaração de Residência")]
    pub title: String,
    #[schema(example = 15000)]
    pub price: i64,
}

impl From<&TemplateRecord> for TemplateSummary {
    fn from(record: &TemplateRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug.clone(),
            title: record.title.clone(),
            price: record.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTemplateRequest {
    #[schema(example = "declaracao-de-residencia")]
    pub slug: String,
    #[schema(example = "Declaração de Residência")]
    pub title: String,
    #[schema(example = "Eu, {{nome}}, residente no bairro {{bairro}}, declaro...")]
    pub content: String,
    #[serde(default)]
    pub price: i64,
}

#[derive(Debug, Serialize, Deserialize, Default, ToSchema)]
pub struct UpdateTemplateRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub price: Option<i64>,
}

/// User data for preview and generation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PreviewRequest {
    /// Identifier to value map, e.g. `{"nome": "Ana Mabunda"}`.
    #[schema(value_type = Object)]
    pub data: Value,
    /// Also mark placeholders that have no key in `data` as `[KEY]`.
    #[serde(default)]
    pub flag_missing: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PreviewResponse {
    pub content: String,
    /// Placeholders rendered as `[KEY]`.
    pub fallbacks: Vec<String>,
    /// Placeholders left in the text because `data` has no such key.
    pub untouched: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Respond with the PDF bytes as an attachment.
    #[default]
    Download,
    /// Respond with JSON carrying the PDF as base64, for mailers.
    Inline,
}

impl Delivery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delivery::Download => "download",
            Delivery::Inline => "inline",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[schema(value_type = Object)]
    pub data: Value,
    #[serde(default)]
    pub flag_missing: bool,
    #[serde(default)]
    pub delivery: Delivery,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneratedDocumentResponse {
    #[schema(example = "declaracao-de-residencia-ana-mabunda.pdf")]
    pub filename: String,
    #[schema(example = "application/pdf")]
    pub mime_type: String,
    pub size_bytes: usize,
    /// Base64-encoded PDF
    pub data: String,
    #[schema(example = "5 de Março de 2026")]
    pub issued_on: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SchemaPreviewRequest {
    /// Template name or slug, used to pick the layout.
    #[schema(example = "carta-de-demissao")]
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SchemaPreviewResponse {
    pub placeholders: Vec<String>,
    pub form_schema: FormSchema,
}
