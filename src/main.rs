use anyhow::Result;
use clap::{Parser, Subcommand};
use quickticket::config::Config;

/// quickticket - Support ticket desk
#[derive(Parser)]
#[command(name = "quickticket")]
#[command(about = "Submit and follow support tickets", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    quickticket::observability::init_tracing(
        &config.observability.log_level,
        config.environment,
    )?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.to_owned());
            let port = port.unwrap_or(config.server.port);

            quickticket::server::serve(config, host, port).await
        }
        Commands::Migrate => quickticket::migrate::migrate(&config).await,
        Commands::Reset => quickticket::migrate::reset(&config).await,
    }
}
