//! `minuta-schema` command-line definitions.
//!
//! Reads a template file, prints the form schema derived from it and, with
//! `--apply`, stores that schema on the matching template record.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::store::{StoreError, TemplateKey, TemplateStore};
use crate::templating::validation::{validate_schema, ValidationErrors};
use crate::templating::{synthesize_from_template, FormSchema, SchemaRules, TemplatingError};

/// Generate the form schema for a document template.
#[derive(Debug, Parser)]
#[command(name = "minuta-schema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Template id or slug
    pub template: String,

    /// Template content file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Name used to pick the layout (defaults to TEMPLATE)
    #[arg(short, long)]
    pub name: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Store the schema on the template record
    #[arg(long)]
    pub apply: bool,

    /// Print the schema on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Templating(#[from] TemplatingError),
    #[error("{0}")]
    Validation(String),
    #[error("--apply needs a database URL (--database-url or DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("failed to encode schema: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CliError {
    /// Process exit status for this error. Usage errors (2) are reported by clap.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ReadFile { .. }
            | CliError::Templating(_)
            | CliError::Validation(_)
            | CliError::MissingDatabaseUrl
            | CliError::Encode(_) => 1,
            CliError::Store(StoreError::Connection(_)) => 3,
            CliError::Store(StoreError::NotFound(_)) => 4,
            CliError::Store(_) => 5,
        }
    }
}

impl Cli {
    pub fn layout_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.template)
    }

    pub fn template_key(&self) -> TemplateKey {
        TemplateKey::parse(&self.template)
    }
}

/// Read the template file and synthesize its form schema.
pub fn build_schema(cli: &Cli, rules: &SchemaRules) -> Result<FormSchema, CliError> {
    let content = fs::read_to_string(&cli.file).map_err(|source| CliError::ReadFile {
        path: cli.file.clone(),
        source,
    })?;

    let schema = synthesize_from_template(&content, cli.layout_name(), rules)?;

    let mut errors = ValidationErrors::new();
    validate_schema(&schema, "form_schema", &mut errors);
    errors.into_result().map_err(CliError::Validation)?;

    Ok(schema)
}

pub fn format_schema(schema: &FormSchema, compact: bool) -> Result<String, CliError> {
    let json = if compact {
        serde_json::to_string(schema)?
    } else {
        serde_json::to_string_pretty(schema)?
    };
    Ok(json)
}

/// Store `schema` on the template addressed by `key`.
pub async fn persist_schema(
    store: &dyn TemplateStore,
    key: &TemplateKey,
    schema: &FormSchema,
) -> Result<(), CliError> {
    if store.update_form_schema(key, schema).await? {
        log::info!("Form schema stored on template {}", key);
        Ok(())
    } else {
        Err(StoreError::NotFound(key.to_string()).into())
    }
}
