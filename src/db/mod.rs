//! Application state shared by the HTTP handlers.
//!
//! - `template` - cached template lookups on top of the template store

mod template;

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::generator::{PdfRenderer, TypstRenderEngine};
use crate::store::{
    InMemoryTemplateStore, PgTemplateStore, StoreError, TemplateRecord, TemplateStore,
};
use crate::templating::SchemaRules;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TemplateStore + Send + Sync>,
    pub template_cache: Cache<String, TemplateRecord>,
    pub pdf_renderer: Arc<dyn PdfRenderer + Send + Sync>,
    pub schema_rules: SchemaRules,
}

impl AppState {
    pub async fn new_with_config(config: &ServerConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn TemplateStore + Send + Sync> = match &config.database_url {
            Some(database_url) => {
                Arc::new(PgTemplateStore::connect(database_url, config.max_connections).await?)
            }
            None => {
                log::warn!("DATABASE_URL not set, templates are kept in memory only");
                Arc::new(InMemoryTemplateStore::new())
            }
        };

        let pdf_renderer = Arc::new(TypstRenderEngine::new(config.typst_bin.clone()));

        Ok(Self::with_cache_ttl(
            store,
            pdf_renderer,
            config.template_cache_ttl,
        ))
    }

    pub fn new_with_store_and_renderer(
        store: Arc<dyn TemplateStore + Send + Sync>,
        pdf_renderer: Arc<dyn PdfRenderer + Send + Sync>,
    ) -> Self {
        Self::with_cache_ttl(store, pdf_renderer, Duration::from_secs(10 * 60))
    }

    fn with_cache_ttl(
        store: Arc<dyn TemplateStore + Send + Sync>,
        pdf_renderer: Arc<dyn PdfRenderer + Send + Sync>,
        ttl: Duration,
    ) -> Self {
        let template_cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(500)
            .build();

        AppState {
            store,
            template_cache,
            pdf_renderer,
            schema_rules: SchemaRules::default(),
        }
    }
}
