//! Cached template lookups.

use super::AppState;
use crate::store::{StoreError, TemplateKey, TemplateRecord};

fn cache_keys(record: &TemplateRecord) -> [String; 2] {
    [record.id.to_string(), record.slug.clone()]
}

impl AppState {
    /// Look a template up by id or slug, going through the cache.
    pub async fn find_template(
        &self,
        key: &TemplateKey,
    ) -> Result<Option<TemplateRecord>, StoreError> {
        if let Some(record) = self.template_cache.get(&key.to_string()).await {
            log::debug!("Template cache hit for {}", key);
            return Ok(Some(record));
        }

        let record = self.store.get_template(key).await?;
        if let Some(record) = &record {
            self.cache_template(record).await;
        }
        Ok(record)
    }

    pub async fn cache_template(&self, record: &TemplateRecord) {
        for cache_key in cache_keys(record) {
            self.template_cache.insert(cache_key, record.clone()).await;
        }
    }

    /// Drop every cache entry for `record`, by id and by slug.
    pub async fn invalidate_template(&self, record: &TemplateRecord) {
        for cache_key in cache_keys(record) {
            self.template_cache.invalidate(&cache_key).await;
        }
    }
}
