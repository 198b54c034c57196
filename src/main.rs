use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url_shortener::config::{Config, StorageMode};
use url_shortener::server;

/// Deterministic URL shortener.
#[derive(Parser)]
#[command(name = "url-shortener")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend; overrides the STORAGE environment variable
    #[arg(long, value_enum)]
    storage: Option<StorageMode>,
}

impl Cli {
    /// Applies command-line overrides on top of the environment configuration.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(storage) = self.storage {
            config.storage = storage;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = cli.apply(Config::from_env()?);

    init_tracing(&config)?;

    config.validate()?;
    config.print_summary();

    server::run(config).await
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.log_format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }

    Ok(())
}
