use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod facts;
mod verifier;

use commands::audit::AuditArgs;

#[derive(Parser)]
#[command(name = "tenken")]
#[command(about = "Version-aware security audit of Android manifest metadata")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a manifest fact bundle against a declared SDK range
    Audit(AuditArgs),

    /// List the registered policy rules
    Rules,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Audit(args) => {
            let status = commands::audit::execute(args)?;
            std::process::exit(status);
        }
        Commands::Rules => commands::rules::execute(),
    }

    Ok(())
}
