#![allow(dead_code)]

use actix_web::web;
use chrono::Utc;
use minuta_server::generator::{DocumentSource, GeneratorError, PdfRenderer};
use minuta_server::store::{InMemoryTemplateStore, TemplateRecord};
use minuta_server::AppState;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const DECLARACAO_CONTENT: &str = "Eu, {{nome}}, portador do BI n.º {{numero_bi}}, \
residente no bairro {{bairro}}, declaro para os devidos efeitos que {{motivo}}. \
Assinado por {{nome}} em {{data_assinatura}}.";

/// PDF renderer that records what it was asked to render.
#[derive(Default)]
pub struct FakePdfRenderer {
    pub rendered: Mutex<Vec<DocumentSource>>,
    pub fail: bool,
}

impl FakePdfRenderer {
    pub fn failing() -> Self {
        Self {
            rendered: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn last(&self) -> Option<DocumentSource> {
        self.rendered.lock().unwrap().last().cloned()
    }
}

impl PdfRenderer for FakePdfRenderer {
    fn render_pdf(&self, document: &DocumentSource) -> Result<Vec<u8>, GeneratorError> {
        if self.fail {
            return Err(GeneratorError::TypstExit(1));
        }
        self.rendered.lock().unwrap().push(document.clone());
        Ok(format!("%PDF-1.7\n{}", document.body).into_bytes())
    }
}

pub fn template(slug: &str, title: &str, content: &str) -> TemplateRecord {
    let now = Utc::now();
    TemplateRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        price: 15000,
        form_schema: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn declaracao() -> TemplateRecord {
    template(
        "declaracao-de-residencia",
        "Declaração de Residência",
        DECLARACAO_CONTENT,
    )
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub store: Arc<InMemoryTemplateStore>,
    pub renderer: Arc<FakePdfRenderer>,
}

pub fn setup_test_context(templates: Vec<TemplateRecord>) -> TestContext {
    setup_with_renderer(templates, FakePdfRenderer::default())
}

pub fn setup_with_renderer(
    templates: Vec<TemplateRecord>,
    renderer: FakePdfRenderer,
) -> TestContext {
    let store = Arc::new(InMemoryTemplateStore::with_templates(templates));
    let renderer = Arc::new(renderer);
    let state = AppState::new_with_store_and_renderer(store.clone(), renderer.clone());

    TestContext {
        state: web::Data::new(state),
        store,
        renderer,
    }
}
