use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod util;

#[derive(Parser)]
#[command(name = "schemata", version, about = "JSON Schema draft-04 validation")]
struct Cli {
    /// Log schema loading and reference resolution
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate JSON instances against a schema
    Validate(commands::validate::Args),
    /// Check schemas against the draft-04 meta-schema and compile them
    Check(commands::check::Args),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let success = match cli.command {
        Commands::Validate(args) => commands::validate::run(args)?,
        Commands::Check(args) => commands::check::run(args)?,
    };
    if !success {
        std::process::exit(1);
    }
    Ok(())
}
