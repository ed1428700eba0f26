use actix_web::{http::header, web, HttpResponse, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use uuid::Uuid;

use crate::generator::common::{generated_filename, today_portuguese};
use crate::generator::{generate, DocumentSource};
use crate::metrics::{DOCUMENTS_GENERATED, RENDER_FAILURES};
use crate::store::{StoreError, TemplateKey, TemplateRecord};
use crate::template::model::{
    CreateTemplateRequest, Delivery, GenerateRequest, GeneratedDocumentResponse, PreviewRequest,
    PreviewResponse, SchemaPreviewRequest, SchemaPreviewResponse, TemplateSummary,
    UpdateTemplateRequest,
};
use crate::templating::schema::layout_for;
use crate::templating::validation::{
    validate_price, validate_required, validate_schema, validate_slug, ValidationErrors,
};
use crate::templating::{
    data_map_from_json, extract, render_with_report, synthesize_from_template, FormSchema,
    MissingPolicy, SchemaRules, TemplatingError,
};
use crate::{AppState, ErrorResponse};

const PDF_MIME: &str = "application/pdf";

fn store_error_response(e: &StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(key) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
                "Template '{}' not found",
                key
            )))
        }
        StoreError::Conflict(slug) => HttpResponse::Conflict().json(ErrorResponse::conflict(
            &format!("Template slug '{}' already exists", slug),
        )),
        other => {
            log::error!("Template store error: {}", other);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Template store unavailable"))
        }
    }
}

fn templating_error_response(e: &TemplatingError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()))
}

fn template_not_found(key: &TemplateKey) -> HttpResponse {
    store_error_response(&StoreError::NotFound(key.to_string()))
}

fn missing_policy(flag_missing: bool) -> MissingPolicy {
    if flag_missing {
        MissingPolicy::Flag
    } else {
        MissingPolicy::LeaveUntouched
    }
}

/// Synthesize the schema for a record's content and check its field ids.
fn schema_for(
    content: &str,
    slug: &str,
    rules: &SchemaRules,
) -> Result<FormSchema, HttpResponse> {
    let schema =
        synthesize_from_template(content, slug, rules).map_err(|e| templating_error_response(&e))?;

    let mut errors = ValidationErrors::new();
    validate_schema(&schema, "form_schema", &mut errors);
    errors
        .into_result()
        .map_err(|message| HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)))?;

    Ok(schema)
}

fn validate_record(record: &TemplateRecord) -> Result<(), String> {
    let mut errors = ValidationErrors::new();
    validate_slug(&record.slug, "slug", &mut errors);
    validate_required(&record.title, "title", "Título", &mut errors);
    validate_required(&record.content, "content", "Conteúdo", &mut errors);
    validate_price(record.price, "price", &mut errors);
    errors.into_result()
}

#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "Templates",
    responses(
        (status = 200, description = "Template catalogue", body = Vec<TemplateSummary>)
    )
)]
pub async fn list_templates(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_templates().await {
        Ok(templates) => {
            let summaries: Vec<TemplateSummary> =
                templates.iter().map(TemplateSummary::from).collect();
            HttpResponse::Ok().json(summaries)
        }
        Err(e) => store_error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/templates/{key}",
    tag = "Templates",
    params(
        ("key" = String, Path, description = "Template id or slug")
    ),
    responses(
        (status = 200, description = "Template found", body = TemplateRecord),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn get_template(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let key = TemplateKey::parse(&path.into_inner());
    match state.find_template(&key).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => template_not_found(&key),
        Err(e) => store_error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/templates/{key}/form",
    tag = "Templates",
    params(
        ("key" = String, Path, description = "Template id or slug")
    ),
    responses(
        (status = 200, description = "Form schema for the template", body = FormSchema),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn get_form_schema(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let key = TemplateKey::parse(&path.into_inner());
    let record = match state.find_template(&key).await {
        Ok(Some(record)) => record,
        Ok(None) => return template_not_found(&key),
        Err(e) => return store_error_response(&e),
    };

    if let Some(schema) = record.form_schema {
        return HttpResponse::Ok().json(schema);
    }

    log::debug!("Template {} has no stored form schema, synthesizing", record.slug);
    match schema_for(&record.content, &record.slug, &state.schema_rules) {
        Ok(schema) => HttpResponse::Ok().json(schema),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/api/templates/{key}/preview",
    tag = "Templates",
    params(
        ("key" = String, Path, description = "Template id or slug")
    ),
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Rendered document text", body = PreviewResponse),
        (status = 400, description = "Invalid data", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn preview_document(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PreviewRequest>,
) -> impl Responder {
    let key = TemplateKey::parse(&path.into_inner());
    let record = match state.find_template(&key).await {
        Ok(Some(record)) => record,
        Ok(None) => return template_not_found(&key),
        Err(e) => return store_error_response(&e),
    };

    let data = match data_map_from_json(&body.data) {
        Ok(data) => data,
        Err(e) => return templating_error_response(&e),
    };

    let report = render_with_report(&record.content, &data, missing_policy(body.flag_missing));
    HttpResponse::Ok().json(PreviewResponse {
        content: report.content,
        fallbacks: report.fallbacks,
        untouched: report.untouched,
    })
}

#[utoipa::path(
    post,
    path = "/api/templates/{key}/generate",
    tag = "Templates",
    params(
        ("key" = String, Path, description = "Template id or slug")
    ),
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "PDF attachment, or JSON with base64 PDF when delivery is inline", body = GeneratedDocumentResponse),
        (status = 400, description = "Invalid data", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse),
        (status = 500, description = "PDF rendering failed", body = ErrorResponse)
    )
)]
pub async fn generate_document(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<GenerateRequest>,
) -> impl Responder {
    let key = TemplateKey::parse(&path.into_inner());
    let record = match state.find_template(&key).await {
        Ok(Some(record)) => record,
        Ok(None) => return template_not_found(&key),
        Err(e) => return store_error_response(&e),
    };

    // Reject bad input before any rendering happens.
    let data = match data_map_from_json(&body.data) {
        Ok(data) => data,
        Err(e) => return templating_error_response(&e),
    };

    let report = render_with_report(&record.content, &data, missing_policy(body.flag_missing));
    if !report.fallbacks.is_empty() {
        log::info!(
            "Generating {} with missing values: {}",
            record.slug,
            report.fallbacks.join(", ")
        );
    }

    let layout = record
        .form_schema
        .as_ref()
        .map(|schema| schema.layout_type)
        .unwrap_or_else(|| layout_for(&record.slug, &state.schema_rules));

    let source = DocumentSource {
        title: record.title.clone(),
        layout,
        body: report.content,
        issued_on: today_portuguese(),
    };
    let filename = generated_filename(&record.slug, &data);

    let renderer = state.pdf_renderer.clone();
    let document = match web::block(move || generate(renderer.as_ref(), &source, filename)).await
    {
        Ok(Ok(document)) => document,
        Ok(Err(e)) => {
            log::error!("PDF rendering failed for {}: {}", record.slug, e);
            RENDER_FAILURES.with_label_values(&[record.slug.as_str()]).inc();
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to render PDF"));
        }
        Err(e) => {
            log::error!("PDF rendering task failed for {}: {}", record.slug, e);
            RENDER_FAILURES.with_label_values(&[record.slug.as_str()]).inc();
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to render PDF"));
        }
    };

    log::info!(
        "Generated {} ({} bytes)",
        document.filename,
        document.pdf.len()
    );

    DOCUMENTS_GENERATED
        .with_label_values(&[record.slug.as_str(), body.delivery.as_str()])
        .inc();

    match body.delivery {
        Delivery::Download => HttpResponse::Ok()
            .content_type(PDF_MIME)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ))
            .body(document.pdf),
        Delivery::Inline => HttpResponse::Ok().json(GeneratedDocumentResponse {
            size_bytes: document.pdf.len(),
            data: BASE64.encode(&document.pdf),
            filename: document.filename,
            mime_type: PDF_MIME.to_string(),
            issued_on: document.issued_on,
        }),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/templates",
    tag = "Template Administration",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created with a generated form schema", body = TemplateRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Slug already in use", body = ErrorResponse)
    )
)]
pub async fn create_template(
    state: web::Data<AppState>,
    body: web::Json<CreateTemplateRequest>,
) -> impl Responder {
    let request = body.into_inner();
    let now = Utc::now();
    let mut record = TemplateRecord {
        id: Uuid::new_v4(),
        slug: request.slug.trim().to_string(),
        title: request.title.trim().to_string(),
        content: request.content,
        price: request.price,
        form_schema: None,
        created_at: now,
        updated_at: now,
    };

    if let Err(message) = validate_record(&record) {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    }

    record.form_schema = match schema_for(&record.content, &record.slug, &state.schema_rules) {
        Ok(schema) => Some(schema),
        Err(response) => return response,
    };

    if let Err(e) = state.store.insert_template(&record).await {
        return store_error_response(&e);
    }

    log::info!("Template {} created ({})", record.slug, record.id);
    state.cache_template(&record).await;
    HttpResponse::Created().json(record)
}

#[utoipa::path(
    put,
    path = "/api/admin/templates/{id}",
    tag = "Template Administration",
    params(
        ("id" = Uuid, Path, description = "Template id")
    ),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = TemplateRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse),
        (status = 409, description = "Slug already in use", body = ErrorResponse)
    )
)]
pub async fn update_template(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTemplateRequest>,
) -> impl Responder {
    let key = TemplateKey::Id(path.into_inner());
    let existing = match state.store.get_template(&key).await {
        Ok(Some(record)) => record,
        Ok(None) => return template_not_found(&key),
        Err(e) => return store_error_response(&e),
    };

    let request = body.into_inner();
    let mut record = existing.clone();
    if let Some(slug) = request.slug {
        record.slug = slug.trim().to_string();
    }
    if let Some(title) = request.title {
        record.title = title.trim().to_string();
    }
    if let Some(content) = request.content {
        record.content = content;
    }
    if let Some(price) = request.price {
        record.price = price;
    }

    if let Err(message) = validate_record(&record) {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    }

    if record.content != existing.content
        || record.slug != existing.slug
        || record.title != existing.title
    {
        record.form_schema = match schema_for(&record.content, &record.slug, &state.schema_rules)
        {
            Ok(schema) => Some(schema),
            Err(response) => return response,
        };
    }
    record.updated_at = Utc::now();

    match state.store.update_template(&record).await {
        Ok(true) => {
            state.invalidate_template(&existing).await;
            state.cache_template(&record).await;
            HttpResponse::Ok().json(record)
        }
        Ok(false) => template_not_found(&key),
        Err(e) => store_error_response(&e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/templates/{id}",
    tag = "Template Administration",
    params(
        ("id" = Uuid, Path, description = "Template id")
    ),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn delete_template(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    let key = TemplateKey::Id(id);
    let existing = match state.store.get_template(&key).await {
        Ok(Some(record)) => record,
        Ok(None) => return template_not_found(&key),
        Err(e) => return store_error_response(&e),
    };

    match state.store.delete_template(&id).await {
        Ok(true) => {
            state.invalidate_template(&existing).await;
            log::info!("Template {} deleted", existing.slug);
            HttpResponse::NoContent().finish()
        }
        Ok(false) => template_not_found(&key),
        Err(e) => store_error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/templates/{key}/schema",
    tag = "Template Administration",
    params(
        ("key" = String, Path, description = "Template id or slug")
    ),
    responses(
        (status = 200, description = "Form schema regenerated and stored", body = FormSchema),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn regenerate_schema(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let key = TemplateKey::parse(&path.into_inner());
    let record = match state.store.get_template(&key).await {
        Ok(Some(record)) => record,
        Ok(None) => return template_not_found(&key),
        Err(e) => return store_error_response(&e),
    };

    let schema = match schema_for(&record.content, &record.slug, &state.schema_rules) {
        Ok(schema) => schema,
        Err(response) => return response,
    };

    match state.store.update_form_schema(&key, &schema).await {
        Ok(true) => {
            state.invalidate_template(&record).await;
            log::info!(
                "Form schema for {} regenerated ({} fields)",
                record.slug,
                schema.fields().count()
            );
            HttpResponse::Ok().json(schema)
        }
        Ok(false) => template_not_found(&key),
        Err(e) => store_error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/schema/preview",
    tag = "Template Administration",
    request_body = SchemaPreviewRequest,
    responses(
        (status = 200, description = "Placeholders and form schema for the given content", body = SchemaPreviewResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn preview_schema(
    state: web::Data<AppState>,
    body: web::Json<SchemaPreviewRequest>,
) -> impl Responder {
    match schema_for(&body.content, &body.name, &state.schema_rules) {
        Ok(form_schema) => HttpResponse::Ok().json(SchemaPreviewResponse {
            placeholders: extract(&body.content),
            form_schema,
        }),
        Err(response) => response,
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/templates").route(web::get().to(list_templates)))
        .service(web::resource("/templates/{key}").route(web::get().to(get_template)))
        .service(web::resource("/templates/{key}/form").route(web::get().to(get_form_schema)))
        .service(
            web::resource("/templates/{key}/preview").route(web::post().to(preview_document)),
        )
        .service(
            web::resource("/templates/{key}/generate").route(web::post().to(generate_document)),
        )
        .service(web::resource("/admin/templates").route(web::post().to(create_template)))
        .service(
            web::resource("/admin/templates/{id}")
                .route(web::put().to(update_template))
                .route(web::delete().to(delete_template)),
        )
        .service(
            web::resource("/admin/templates/{key}/schema")
                .route(web::post().to(regenerate_schema)),
        )
        .service(web::resource("/admin/schema/preview").route(web::post().to(preview_schema)));
}
