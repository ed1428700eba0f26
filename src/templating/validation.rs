//! Input validation for template administration.
//!
//! Every check appends to a `ValidationErrors` so one response can list all
//! problems in a payload.

use std::fmt;
use uuid::Uuid;

use super::schema::FormSchema;

/// A single problem found in an admin payload, tagged with the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: String, label: String },
    InvalidSlug { field: String, value: String },
    /// Would be read back as a template id instead of a slug.
    UuidSlug { field: String, value: String },
    NegativePrice { field: String },
    DuplicateFieldId { field: String, id: String },
}

impl ValidationError {
    fn field(&self) -> &str {
        match self {
            Self::Empty { field, .. }
            | Self::InvalidSlug { field, .. }
            | Self::UuidSlug { field, .. }
            | Self::NegativePrice { field }
            | Self::DuplicateFieldId { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.field())?;
        match self {
            Self::Empty { label, .. } => write!(f, "{} não pode estar vazio", label),
            Self::InvalidSlug { value, .. } => write!(
                f,
                "Slug '{}' inválido. Use apenas letras minúsculas, números e hífens, ex: declaracao-de-residencia",
                value
            ),
            Self::UuidSlug { value, .. } => write!(
                f,
                "Slug '{}' tem o formato de um identificador (UUID). Escolha um nome descritivo",
                value
            ),
            Self::NegativePrice { .. } => write!(
                f,
                "O preço não pode ser negativo. Indique-o em centavos, ex: 15000 para 150,00 MT"
            ),
            Self::DuplicateFieldId { id, .. } => {
                write!(f, "O campo '{}' aparece mais de uma vez", id)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    /// `Err` with a numbered summary of every problem, for API responses.
    pub fn into_result(self) -> Result<(), String> {
        if self.0.is_empty() {
            return Ok(());
        }

        let mut message = format!("Validação falhou: {} erro(s) encontrado(s)\n", self.0.len());
        for (i, error) in self.0.iter().enumerate() {
            message.push_str(&format!("\n{}. {}", i + 1, error));
        }
        Err(message)
    }
}

pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: field.to_string(),
            label: label.to_string(),
        });
    }
}

/// Slugs are lowercase ASCII words joined by single hyphens and must not
/// look like a UUID, since lookups parse UUID-shaped keys as ids.
pub fn validate_slug(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        validate_required(trimmed, field, "Slug", errors);
        return;
    }

    let well_formed = trimmed.split('-').all(|part| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    });

    if !well_formed {
        errors.push(ValidationError::InvalidSlug {
            field: field.to_string(),
            value: trimmed.to_string(),
        });
    } else if Uuid::parse_str(trimmed).is_ok() {
        errors.push(ValidationError::UuidSlug {
            field: field.to_string(),
            value: trimmed.to_string(),
        });
    }
}

pub fn validate_price(value: i64, field: &str, errors: &mut ValidationErrors) {
    if value < 0 {
        errors.push(ValidationError::NegativePrice {
            field: field.to_string(),
        });
    }
}

/// Every field id must be non-empty and unique across all sections.
pub fn validate_schema(schema: &FormSchema, field: &str, errors: &mut ValidationErrors) {
    let mut seen: Vec<&str> = Vec::new();
    for descriptor in schema.fields() {
        if descriptor.id.trim().is_empty() {
            validate_required(&descriptor.id, field, "Identificador do campo", errors);
        } else if seen.contains(&descriptor.id.as_str()) {
            errors.push(ValidationError::DuplicateFieldId {
                field: field.to_string(),
                id: descriptor.id.clone(),
            });
        } else {
            seen.push(&descriptor.id);
        }
    }
}
