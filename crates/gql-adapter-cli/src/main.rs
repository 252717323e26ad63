use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};
use unrelated_gql_engine_adapter::EngineAdapter;
use unrelated_gql_engine_adapter::config::ApiDefinition;
use unrelated_gql_engine_adapter::schema::normalize;

#[derive(Debug, Parser)]
#[command(
    name = "unrelated-gql-adapter",
    version,
    about = "Turn GraphQL API definitions into execution engine configuration"
)]
struct Cli {
    /// Log level (or full `EnvFilter` directive).
    #[arg(long, env = "GQL_ADAPTER_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[arg(
        long,
        env = "GQL_ADAPTER_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        global = true
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the engine configuration and print it as JSON.
    Generate {
        /// API definition file (YAML, or JSON when the extension is `.json`).
        #[arg(long, short = 'd', env = "GQL_ADAPTER_DEFINITION")]
        definition: PathBuf,

        #[arg(long)]
        pretty: bool,
    },
    /// Validate the definition's schema and print the normalized SDL.
    Schema {
        #[arg(long, short = 'd', env = "GQL_ADAPTER_DEFINITION")]
        definition: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;

    match cli.command {
        Command::Generate { definition, pretty } => {
            let def = load(&definition)?;
            let cfg = EngineAdapter::new(&def)
                .build()
                .with_context(|| format!("build engine config for '{}'", def.name))?;
            let out = if pretty {
                serde_json::to_string_pretty(&cfg)
            } else {
                serde_json::to_string(&cfg)
            }
            .context("serialize engine config as json")?;
            println!("{out}");
        }
        Command::Schema { definition } => {
            let def = load(&definition)?;
            let schema = normalize(&def.graphql.schema)
                .with_context(|| format!("normalize schema for '{}'", def.name))?;
            print!("{}", schema.sdl());
        }
    }
    Ok(())
}

fn load(path: &std::path::Path) -> anyhow::Result<ApiDefinition> {
    tracing::info!(path = %path.display(), "loading API definition");
    ApiDefinition::from_path(path).with_context(|| format!("load definition {}", path.display()))
}

fn init_tracing(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?;
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
    .context("install tracing subscriber")
}
