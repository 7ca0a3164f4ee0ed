//! pagecarbon — entry point.

use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use pagecarbon_server::cli;
use pagecarbon_server::config::ServerConfig;

#[derive(Parser)]
#[command(
    name = "pagecarbon",
    about = "pagecarbon — estimate page weight, CO2 and data cost of a web page",
    version,
    after_help = "Run 'pagecarbon <command> --help' for details on each command.\nRun 'pagecarbon' with no command to start the API server."
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server (default).
    Serve {
        /// Address to bind (overrides PAGECARBON_HOST).
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides PORT).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Audit a single page and print the report
    Audit {
        /// Page URL (http or https)
        url: String,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
        /// Maximum number of asset probes in flight
        #[arg(long)]
        concurrency: Option<usize>,
        /// Timeout for each network request in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ServerConfig::from_env();

    let result = match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            cli::serve_cmd::run(config).await
        }
        Commands::Audit {
            url,
            json,
            concurrency,
            timeout_ms,
        } => {
            if let Some(n) = concurrency {
                config.audit.concurrency = n.max(1);
            }
            if let Some(ms) = timeout_ms {
                config.audit.timeout = Duration::from_millis(ms);
            }
            cli::audit_cmd::run(&url, &config, json).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pagecarbon", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
