use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod cli;
pub mod config;
pub mod db;
pub mod generator;
pub mod metrics;
pub mod store;
pub mod template;
pub mod templating;

pub use crate::db::AppState;

use crate::config::ServerConfig;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::template::routes::list_templates,
        crate::template::routes::get_template,
        crate::template::routes::get_form_schema,
        crate::template::routes::preview_document,
        crate::template::routes::generate_document,
        crate::template::routes::create_template,
        crate::template::routes::update_template,
        crate::template::routes::delete_template,
        crate::template::routes::regenerate_schema,
        crate::template::routes::preview_schema
    ),
    components(
        schemas(
            store::TemplateRecord,
            template::model::TemplateSummary,
            template::model::CreateTemplateRequest,
            template::model::UpdateTemplateRequest,
            template::model::PreviewRequest,
            template::model::PreviewResponse,
            template::model::Delivery,
            template::model::GenerateRequest,
            template::model::GeneratedDocumentResponse,
            template::model::SchemaPreviewRequest,
            template::model::SchemaPreviewResponse,
            templating::FormSchema,
            templating::FormSection,
            templating::FieldDescriptor,
            templating::FieldType,
            templating::FieldSource,
            templating::LayoutType,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Templates", description = "Template catalogue, forms and document generation."),
        (name = "Template Administration", description = "Template CRUD and form schema maintenance.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
pub struct ApiDoc;

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;

    let app_state = web::Data::new(AppState::new_with_config(&config).await.context(
        "failed to connect to database, check DATABASE_URL in .env and that the database is running",
    )?);

    let prometheus = PrometheusMetricsBuilder::new("minuta_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::resource("/metrics/app").route(web::get().to(metrics::app_metrics)))
            .service(web::scope("/api").configure(template::routes::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
