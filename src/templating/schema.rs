//! Form schema synthesis.
//!
//! Turns the identifiers found in a template into field descriptors grouped
//! into sections, plus a layout type derived from the template name.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::placeholder::extract;
use super::rules::SchemaRules;
use super::text::fold_accents;
use super::TemplatingError;

/// Input widget used by the form UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Date,
    Textarea,
}

/// Where the form UI should take the value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Profile,
    UserInput,
}

/// Document layout family, chosen from the template name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    Declaration,
    Letter,
    Official,
    Standard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldDescriptor {
    #[schema(example = "nome_completo")]
    pub id: String,
    #[schema(example = "Nome Completo")]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub source: FieldSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormSection {
    #[schema(example = "Dados Pessoais")]
    pub section_name: String,
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormSchema {
    pub layout_type: LayoutType,
    pub sections: Vec<FormSection>,
}

impl FormSchema {
    /// All fields in display order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field_ids(&self) -> Vec<&str> {
        self.fields().map(|field| field.id.as_str()).collect()
    }

    pub fn section(&self, name: &str) -> Option<&FormSection> {
        self.sections.iter().find(|section| section.section_name == name)
    }
}

impl FieldDescriptor {
    pub fn classify(identifier: &str, rules: &SchemaRules) -> Self {
        Self {
            id: identifier.to_string(),
            label: humanize_label(identifier),
            field_type: classify_type(identifier, rules),
            source: if rules.is_profile_field(identifier) {
                FieldSource::Profile
            } else {
                FieldSource::UserInput
            },
        }
    }
}

/// `nome_completo` -> `Nome Completo`, `data-de-emissao` -> `Data De Emissao`.
pub fn humanize_label(identifier: &str) -> String {
    identifier
        .replace(['_', '-'], " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn classify_type(identifier: &str, rules: &SchemaRules) -> FieldType {
    let lowered = identifier.to_lowercase();
    let is_date = rules.date_keywords.iter().any(|kw| lowered.contains(kw))
        || lowered
            .split(['_', '-'])
            .any(|token| rules.date_tokens.contains(&token));
    if is_date {
        FieldType::Date
    } else if rules.textarea_keywords.iter().any(|kw| lowered.contains(kw)) {
        FieldType::Textarea
    } else {
        FieldType::Text
    }
}

/// Pick the layout for a template name or slug; first matching rule wins.
pub fn layout_for(template_name: &str, rules: &SchemaRules) -> LayoutType {
    let normalized = fold_accents(&template_name.to_lowercase());
    rules
        .layout_rules
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .map(|(_, layout)| *layout)
        .unwrap_or(rules.default_layout)
}

fn check_identifiers(identifiers: &[String]) -> Result<(), TemplatingError> {
    for (index, identifier) in identifiers.iter().enumerate() {
        if identifier.is_empty() {
            return Err(TemplatingError::invalid_input(format!(
                "identifier at position {index} is empty"
            )));
        }
        if identifier
            .chars()
            .any(|c| c.is_whitespace() || c == '{' || c == '}')
        {
            return Err(TemplatingError::invalid_input(format!(
                "identifier '{identifier}' contains whitespace or braces"
            )));
        }
        if identifiers[..index].contains(identifier) {
            return Err(TemplatingError::invalid_input(format!(
                "identifier '{identifier}' appears more than once"
            )));
        }
    }
    Ok(())
}

/// Build the form schema for an ordered, de-duplicated identifier set.
///
/// Fields keep the input order inside each section and empty sections are
/// omitted. Fails with `InvalidInput` for a blank template name or for
/// identifiers the extractor could never have produced.
pub fn synthesize(
    identifiers: &[String],
    template_name: &str,
    rules: &SchemaRules,
) -> Result<FormSchema, TemplatingError> {
    if template_name.trim().is_empty() {
        return Err(TemplatingError::invalid_input("template name is empty"));
    }
    check_identifiers(identifiers)?;

    let (personal, other): (Vec<_>, Vec<_>) = identifiers
        .iter()
        .map(|identifier| FieldDescriptor::classify(identifier, rules))
        .partition(|field| rules.is_personal_section_field(&field.id));

    let sections = [
        (rules.personal_section_name, personal),
        (rules.other_section_name, other),
    ]
    .into_iter()
    .filter(|(_, fields)| !fields.is_empty())
    .map(|(name, fields)| FormSection {
        section_name: name.to_string(),
        fields,
    })
    .collect();

    Ok(FormSchema {
        layout_type: layout_for(template_name, rules),
        sections,
    })
}

/// Extract the placeholders of `template` and synthesize their schema.
pub fn synthesize_from_template(
    template: &str,
    template_name: &str,
    rules: &SchemaRules,
) -> Result<FormSchema, TemplatingError> {
    synthesize(&extract(template), template_name, rules)
}
