//! Templating module - placeholder extraction, form schema synthesis and
//! document rendering.
//!
//! Everything in here is pure: no I/O, no logging, no shared mutable state.
//! - `placeholder` - scans a template for `{{identifier}}` markers
//! - `schema` - turns identifiers into a sectioned form schema
//! - `rules` - static classification tables used by `schema`
//! - `render` - substitutes markers with user data

pub mod placeholder;
pub mod render;
pub mod rules;
pub mod schema;
pub mod text;
pub mod validation;

pub use placeholder::{extract, markers_template, placeholder_marker};
pub use render::{
    data_map_from_json, fallback_marker, render, render_with_policy, render_with_report, DataMap,
    MissingPolicy, RenderReport,
};
pub use rules::SchemaRules;
pub use schema::{
    synthesize, synthesize_from_template, FieldDescriptor, FieldSource, FieldType, FormSchema,
    FormSection, LayoutType,
};

use thiserror::Error;

/// Errors raised by the templating core.
///
/// A missing value is never an error: it renders as a `[KEY]` marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplatingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TemplatingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
