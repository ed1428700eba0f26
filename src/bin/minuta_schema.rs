//! minuta-schema - print (and optionally store) the form schema of a template.

use clap::Parser;
use minuta_server::cli::{build_schema, format_schema, persist_schema, Cli, CliError};
use minuta_server::store::PgTemplateStore;
use minuta_server::templating::SchemaRules;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let schema = build_schema(cli, &SchemaRules::default())?;
    println!("{}", format_schema(&schema, cli.compact)?);

    if !cli.apply {
        return Ok(());
    }

    let database_url = cli
        .database_url
        .as_deref()
        .ok_or(CliError::MissingDatabaseUrl)?;
    let store = PgTemplateStore::connect(database_url, 1).await?;
    persist_schema(&store, &cli.template_key(), &schema).await
}
