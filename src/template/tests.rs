use crate::store::TemplateRecord;
use crate::template::model::{
    CreateTemplateRequest, Delivery, GenerateRequest, PreviewRequest, TemplateSummary,
    UpdateTemplateRequest,
};
use chrono::Utc;
use uuid::Uuid;

#[test]
fn test_create_template_request_defaults_price() {
    let json = r#"{
        "slug": "carta-de-demissao",
        "title": "Carta de Demissão",
        "content": "Eu, {{nome}}, venho por este meio..."
    }"#;

    let request: CreateTemplateRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.slug, "carta-de-demissao");
    assert_eq!(request.price, 0);
}

#[test]
fn test_update_template_request_partial() {
    let json = r#"{ "price": 2500 }"#;

    let request: UpdateTemplateRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.price, Some(2500));
    assert_eq!(request.slug, None);
    assert_eq!(request.content, None);
}

#[test]
fn test_generate_request_delivery() {
    let request: GenerateRequest = serde_json::from_str(r#"{ "data": {} }"#).unwrap();
    assert_eq!(request.delivery, Delivery::Download);
    assert!(!request.flag_missing);

    let request: GenerateRequest =
        serde_json::from_str(r#"{ "data": {"nome": "Ana"}, "delivery": "inline" }"#).unwrap();
    assert_eq!(request.delivery, Delivery::Inline);
}

#[test]
fn test_preview_request_flag_missing() {
    let request: PreviewRequest =
        serde_json::from_str(r#"{ "data": {"nome": null}, "flag_missing": true }"#).unwrap();
    assert!(request.flag_missing);
    assert!(request.data["nome"].is_null());
}

#[test]
fn test_template_summary_from_record() {
    let now = Utc::now();
    let record = TemplateRecord {
        id: Uuid::new_v4(),
        slug: "declaracao-de-residencia".to_string(),
        title: "Declaração de Residência".to_string(),
        content: "Eu, {{nome}}".to_string(),
        price: 15000,
        form_schema: None,
        created_at: now,
        updated_at: now,
    };

    let summary = TemplateSummary::from(&record);
    assert_eq!(summary.id, record.id);
    assert_eq!(summary.slug, record.slug);
    assert_eq!(summary.price, 15000);

    let json = serde_json::to_value(&summary).unwrap();
    assert!(json.get("content").is_none());
}
