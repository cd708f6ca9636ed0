use anyhow::{Context, Result};
use clap::Parser;
use rsql_filter::{CompilerSettings, FilterEngine, Schema};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "rsql-filter")]
#[command(about = "Compile RSQL filters into MongoDB queries", long_about = None)]
struct Args {
    /// Schema document (JSON)
    #[arg(long, env = "RSQL_FILTER_SCHEMA")]
    schema: PathBuf,

    /// Entity the query filters
    #[arg(long, env = "RSQL_FILTER_ENTITY")]
    entity: String,

    /// Compiler settings document (JSON)
    #[arg(long, env = "RSQL_FILTER_SETTINGS")]
    settings: Option<PathBuf>,

    /// Offset in seconds east of UTC for dates without a zone
    #[arg(long, allow_hyphen_values = true)]
    local_offset: Option<i32>,

    /// Path suffix addressing the id inside references
    #[arg(long)]
    reference_suffix: Option<String>,

    /// Pretty-print the rendered query
    #[arg(long)]
    pretty: bool,

    /// RSQL filter expression
    query: String,
}

fn load_settings(args: &Args) -> Result<CompilerSettings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings {}", path.display()))?;
            CompilerSettings::from_json(&json)?
        }
        None => CompilerSettings::default(),
    };

    if let Some(offset) = args.local_offset {
        settings = settings.with_local_offset_seconds(offset);
    }
    if let Some(suffix) = &args.reference_suffix {
        settings = settings.with_reference_id_suffix(suffix.clone());
    }
    settings.validate()?;
    Ok(settings)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    let schema = Schema::from_path(&args.schema)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;
    let settings = load_settings(&args)?;
    info!(
        "rsql-filter v{}: {} entities loaded",
        rsql_filter::VERSION,
        schema.entity_names().len()
    );

    let engine = FilterEngine::new(Arc::new(schema), settings)?;
    let query = engine.create_query(&args.query, &args.entity)?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&query)?
    } else {
        serde_json::to_string(&query)?
    };
    println!("{}", rendered);

    Ok(())
}
