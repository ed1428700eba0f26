use minuta_server::templating::rules::{OTHER_SECTION_NAME, PERSONAL_SECTION_NAME};
use minuta_server::templating::{
    extract, markers_template, render, render_with_policy, render_with_report, synthesize,
    synthesize_from_template, DataMap, FieldSource, FieldType, LayoutType, MissingPolicy,
    SchemaRules,
};

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn data(entries: &[(&str, Option<&str>)]) -> DataMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}

#[test]
fn test_extraction_round_trip() {
    let identifiers = ids(&["nome", "numero_bi", "motivo", "data_pedido"]);
    let template = markers_template(&identifiers);

    assert_eq!(extract(&template), identifiers);
}

#[test]
fn test_every_marker_with_a_value_is_substituted() {
    let template = "{{nome}} ({{nuit}}) pede {{servico}}";
    let values = data(&[
        ("nome", Some("Ana Mabunda")),
        ("nuit", Some("123456789")),
        ("servico", Some("uma certidão")),
    ]);

    let rendered = render(template, &values);
    assert_eq!(rendered, "Ana Mabunda (123456789) pede uma certidão");
    assert!(extract(&rendered).is_empty());
}

#[test]
fn test_missing_value_renders_fallback() {
    let rendered = render("Eu, {{nome}}.", &data(&[("nome", None)]));
    assert_eq!(rendered, "Eu, [NOME].");

    let rendered = render("Eu, {{nome}}.", &data(&[("nome", Some(""))]));
    assert_eq!(rendered, "Eu, [NOME].");
}

#[test]
fn test_absent_key_keeps_marker_by_default() {
    let rendered = render("Eu, {{nome}}.", &DataMap::new());
    assert_eq!(rendered, "Eu, {{nome}}.");
}

#[test]
fn test_absent_key_flagged_under_flag_policy() {
    let rendered = render_with_policy("Eu, {{nome}}.", &DataMap::new(), MissingPolicy::Flag);
    assert_eq!(rendered, "Eu, [NOME].");
}

#[test]
fn test_multi_occurrence_replacement() {
    let rendered = render(
        "{{nome}} declara. Assinado: {{nome}}. Testemunha de {{nome}}.",
        &data(&[("nome", Some("Rui"))]),
    );
    assert_eq!(rendered, "Rui declara. Assinado: Rui. Testemunha de Rui.");
}

#[test]
fn test_first_seen_order_preserved() {
    let template = "{{motivo}} {{nome}} {{data}} {{nome}} {{bairro}} {{motivo}}";
    assert_eq!(extract(template), ids(&["motivo", "nome", "data", "bairro"]));
}

#[test]
fn test_empty_sections_are_omitted() {
    let rules = SchemaRules::default();

    let only_personal = synthesize(&ids(&["nome", "numero_bi"]), "atestado", &rules).unwrap();
    assert_eq!(only_personal.sections.len(), 1);
    assert_eq!(only_personal.sections[0].section_name, PERSONAL_SECTION_NAME);

    let only_other = synthesize(&ids(&["motivo"]), "atestado", &rules).unwrap();
    assert_eq!(only_other.sections.len(), 1);
    assert_eq!(only_other.sections[0].section_name, OTHER_SECTION_NAME);

    let empty = synthesize(&[], "atestado", &rules).unwrap();
    assert!(empty.sections.is_empty());
}

#[test]
fn test_unknown_placeholders_untouched_by_default() {
    let template = "{{nome}} mora em {{bairro}}";
    let values = data(&[("nome", Some("Ana"))]);

    assert_eq!(render(template, &values), "Ana mora em {{bairro}}");
    assert_eq!(
        render_with_policy(template, &values, MissingPolicy::Flag),
        "Ana mora em [BAIRRO]"
    );

    let report = render_with_report(template, &values, MissingPolicy::LeaveUntouched);
    assert_eq!(report.untouched, ids(&["bairro"]));
    assert!(report.fallbacks.is_empty());
}

#[test]
fn test_determinism() {
    let rules = SchemaRules::default();
    let values = data(&[("nome", Some("Ana")), ("motivo", None)]);

    let first = synthesize_from_template(common_template(), "declaracao", &rules).unwrap();
    let second = synthesize_from_template(common_template(), "declaracao", &rules).unwrap();
    assert_eq!(first, second);

    assert_eq!(
        render(common_template(), &values),
        render(common_template(), &values)
    );
}

fn common_template() -> &'static str {
    "Eu, {{nome}}, venho requerer {{motivo}} em {{data_pedido}}. {{detalhes_adicionais}}"
}

#[test]
fn test_schema_classification_end_to_end() {
    let schema = synthesize_from_template(
        common_template(),
        "Requerimento de Licença",
        &SchemaRules::default(),
    )
    .unwrap();

    assert_eq!(schema.layout_type, LayoutType::Letter);

    let personal = schema.section(PERSONAL_SECTION_NAME).unwrap();
    assert_eq!(personal.fields[0].id, "nome");
    assert_eq!(personal.fields[0].source, FieldSource::Profile);

    let other = schema.section(OTHER_SECTION_NAME).unwrap();
    let types: Vec<FieldType> = other.fields.iter().map(|f| f.field_type).collect();
    assert_eq!(
        types,
        vec![FieldType::Text, FieldType::Date, FieldType::Textarea]
    );
    assert!(other
        .fields
        .iter()
        .all(|f| f.source == FieldSource::UserInput));
}

#[test]
fn test_values_are_not_rescanned() {
    let rendered = render(
        "{{nome}} e {{bairro}}",
        &data(&[("nome", Some("{{bairro}}")), ("bairro", Some("Polana"))]),
    );
    assert_eq!(rendered, "{{bairro}} e Polana");
}
