//! Common utilities for document generation.

use chrono::{Datelike, Local, NaiveDate};

use crate::templating::text::sanitize_filename;
use crate::templating::DataMap;

const MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Format a date the way Portuguese documents print it (e.g. "5 de Março de 2026").
pub fn format_portuguese_date(date: NaiveDate) -> String {
    let month = MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)];
    format!("{} de {} de {}", date.day(), month, date.year())
}

/// Today's date in Portuguese format.
pub fn today_portuguese() -> String {
    format_portuguese_date(Local::now().date_naive())
}

/// Data keys checked, in order, for the name printed in the output filename.
const HOLDER_NAME_KEYS: [&str; 2] = ["nome_completo", "nome"];

/// `{slug}-{holder}.pdf`, e.g. `declaracao-de-residencia-ana-mabunda.pdf`.
pub fn generated_filename(slug: &str, data: &DataMap) -> String {
    let holder = HOLDER_NAME_KEYS
        .iter()
        .filter_map(|key| data.get(*key).cloned().flatten())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default();

    format!(
        "{}-{}.pdf",
        sanitize_filename(slug, "documento"),
        sanitize_filename(&holder, "requerente")
    )
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\r', "")
        .replace('\n', r"\n")
}
