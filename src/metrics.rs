//! Application counters, served from `/metrics/app` as Prometheus text.
//!
//! Request metrics stay with the middleware at `/metrics`.

use actix_web::{HttpResponse, Responder};
use lazy_static::lazy_static;
use prometheus::{IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref DOCUMENTS_GENERATED: IntCounterVec = IntCounterVec::new(
        Opts::new("documents_generated_total", "PDF documents generated"),
        &["template", "delivery"]
    )
    .expect("valid documents_generated_total metric");
    pub static ref RENDER_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("document_render_failures_total", "PDF renders that failed"),
        &["template"]
    )
    .expect("valid document_render_failures_total metric");
    static ref REGISTRY: Registry = {
        let registry = Registry::new();
        registry
            .register(Box::new(DOCUMENTS_GENERATED.clone()))
            .expect("documents_generated_total registered once");
        registry
            .register(Box::new(RENDER_FAILURES.clone()))
            .expect("document_render_failures_total registered once");
        registry
    };
}

pub fn encode_metrics() -> Result<String, prometheus::Error> {
    TextEncoder::new().encode_to_string(&REGISTRY.gather())
}

pub async fn app_metrics() -> impl Responder {
    match encode_metrics() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
