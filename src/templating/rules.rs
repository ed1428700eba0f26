//! Static classification tables for the schema synthesizer.

use super::schema::LayoutType;

/// Identifiers that map to reusable personal data from the user's profile.
pub const PROFILE_FIELDS: &[&str] = &[
    "nome",
    "nome_completo",
    "apelido",
    "numero_bi",
    "bi",
    "nuit",
    "numero_passaporte",
    "passaporte",
    "data_nascimento",
    "naturalidade",
    "nacionalidade",
    "estado_civil",
    "profissao",
    "nome_pai",
    "nome_mae",
    "morada",
    "endereco",
    "bairro",
    "quarteirao",
    "casa_numero",
    "cidade",
    "distrito",
    "provincia",
    "telefone",
    "email",
];

/// Profile fields grouped under the "Dados Pessoais" section of a form.
pub const PERSONAL_SECTION_FIELDS: &[&str] = &[
    "nome",
    "nome_completo",
    "apelido",
    "numero_bi",
    "bi",
    "nuit",
    "data_nascimento",
    "naturalidade",
    "nacionalidade",
    "estado_civil",
    "profissao",
    "nome_pai",
    "nome_mae",
    "morada",
    "endereco",
    "bairro",
    "distrito",
    "provincia",
];

/// Keyword rules matched against the template name; first match wins.
pub const LAYOUT_RULES: &[(&str, LayoutType)] = &[
    ("declaracao", LayoutType::Declaration),
    ("declaration", LayoutType::Declaration),
    ("atestado", LayoutType::Declaration),
    ("carta", LayoutType::Letter),
    ("letter", LayoutType::Letter),
    ("requerimento", LayoutType::Letter),
    ("procuracao", LayoutType::Official),
    ("oficio", LayoutType::Official),
    ("certidao", LayoutType::Official),
    ("contrato", LayoutType::Official),
];

/// Identifier fragments that make a field a date input.
pub const DATE_KEYWORDS: &[&str] = &["date"];

/// Whole `_`/`-` separated words that make a field a date input, so
/// `data_nascimento` is a date but `nome_candidata` is not.
pub const DATE_TOKENS: &[&str] = &["data"];

/// Identifier fragments that make a field a multi-line input.
pub const TEXTAREA_KEYWORDS: &[&str] = &["details", "detalhes"];

pub const PERSONAL_SECTION_NAME: &str = "Dados Pessoais";
pub const OTHER_SECTION_NAME: &str = "Outras Informações";

/// Classification tables handed to the synthesizer.
///
/// The tables are plain `'static` data so a custom rule set for tests or a
/// different locale is just another value of this struct.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRules {
    pub profile_fields: &'static [&'static str],
    pub personal_section_fields: &'static [&'static str],
    pub layout_rules: &'static [(&'static str, LayoutType)],
    pub default_layout: LayoutType,
    pub date_keywords: &'static [&'static str],
    pub date_tokens: &'static [&'static str],
    pub textarea_keywords: &'static [&'static str],
    pub personal_section_name: &'static str,
    pub other_section_name: &'static str,
}

impl Default for SchemaRules {
    fn default() -> Self {
        Self {
            profile_fields: PROFILE_FIELDS,
            personal_section_fields: PERSONAL_SECTION_FIELDS,
            layout_rules: LAYOUT_RULES,
            default_layout: LayoutType::Standard,
            date_keywords: DATE_KEYWORDS,
            date_tokens: DATE_TOKENS,
            textarea_keywords: TEXTAREA_KEYWORDS,
            personal_section_name: PERSONAL_SECTION_NAME,
            other_section_name: OTHER_SECTION_NAME,
        }
    }
}

impl SchemaRules {
    pub fn is_profile_field(&self, identifier: &str) -> bool {
        self.profile_fields.contains(&identifier)
    }

    pub fn is_personal_section_field(&self, identifier: &str) -> bool {
        self.is_profile_field(identifier) && self.personal_section_fields.contains(&identifier)
    }
}
