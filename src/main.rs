//! Osprey CLI entry point.

use clap::Parser;
use osprey::cli::{self, Cli, Commands, EXIT_ERROR};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli::log_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    osprey::register_analyzers();

    let result = match &cli.command {
        Commands::Routes(args) => cli::run_routes(&cli, args).await,
        Commands::Inspect(args) => cli::run_inspect(&cli, args),
        Commands::Payload(args) => cli::run_payload(&cli, args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
