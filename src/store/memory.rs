//! In-memory template store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TemplateKey, TemplateRecord, TemplateStore};
use crate::templating::FormSchema;

#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<Uuid, TemplateRecord>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: Vec<TemplateRecord>) -> Self {
        Self {
            templates: RwLock::new(templates.into_iter().map(|t| (t.id, t)).collect()),
        }
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, StoreError> {
        let templates = self.templates.read().await;
        let mut all: Vec<TemplateRecord> = templates.values().cloned().collect();
        all.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(all)
    }

    async fn get_template(&self, key: &TemplateKey) -> Result<Option<TemplateRecord>, StoreError> {
        let templates = self.templates.read().await;
        Ok(templates.values().find(|t| key.matches(t)).cloned())
    }

    async fn insert_template(&self, record: &TemplateRecord) -> Result<(), StoreError> {
        let mut templates = self.templates.write().await;
        if templates
            .values()
            .any(|t| t.slug == record.slug && t.id != record.id)
        {
            return Err(StoreError::Conflict(record.slug.clone()));
        }
        templates.insert(record.id, record.clone());
        Ok(())
    }

    async fn update_template(&self, record: &TemplateRecord) -> Result<bool, StoreError> {
        let mut templates = self.templates.write().await;
        if !templates.contains_key(&record.id) {
            return Ok(false);
        }
        if templates
            .values()
            .any(|t| t.slug == record.slug && t.id != record.id)
        {
            return Err(StoreError::Conflict(record.slug.clone()));
        }
        templates.insert(record.id, record.clone());
        Ok(true)
    }

    async fn update_form_schema(
        &self,
        key: &TemplateKey,
        schema: &FormSchema,
    ) -> Result<bool, StoreError> {
        let mut templates = self.templates.write().await;
        match templates.values_mut().find(|t| key.matches(t)) {
            Some(record) => {
                record.form_schema = Some(schema.clone());
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_template(&self, id: &Uuid) -> Result<bool, StoreError> {
        let mut templates = self.templates.write().await;
        Ok(templates.remove(id).is_some())
    }
}
