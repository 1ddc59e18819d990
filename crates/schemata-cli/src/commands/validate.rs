//! Validate command - checks JSON instances against a schema.

use nu_ansi_term::Color;
use schemata::DataError;
use tracing::debug;

use crate::args::RemoteArgs;
use crate::util::{display_path, indent, read_document, read_input, schema_id};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the schema file ('-' for stdin)
    #[arg(short, long)]
    pub schema: String,

    /// Validate against the subschema at this JSON Pointer instead of the root
    #[arg(short, long)]
    pub pointer: Option<String>,

    /// Quiet mode: only report invalid instances
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Instance files to validate ('-' for stdin)
    #[arg(required = true)]
    pub instances: Vec<String>,
}

/// Returns whether every instance is valid.
pub fn run(args: Args) -> anyhow::Result<bool> {
    let mut env = args.remote.environment()?;
    let document = read_document(&args.schema)?;
    let mut schema = env
        .build_value(&schema_id(&args.schema, &document)?, &document)
        .map_err(|e| anyhow::anyhow!("Error building {}: {e}", display_path(&args.schema)))?;
    if let Some(pointer) = &args.pointer {
        schema = schema
            .subschema(pointer)
            .ok_or_else(|| anyhow::anyhow!("No schema at '{pointer}'"))?;
    }

    debug!(schema = schema.id(), instances = args.instances.len(), "validating");
    let mut failed = 0usize;
    for instance in &args.instances {
        let path = display_path(instance);
        let data = read_input(instance)?;
        match schema.validate_data(&data) {
            Ok(()) => {
                if !args.quiet {
                    println!("{} {path}", Color::Green.paint("valid"));
                }
            }
            Err(DataError::Invalid(error)) => {
                failed += 1;
                println!("{} {path}", Color::Red.paint("invalid"));
                println!("  {}", indent(&error.to_string()));
            }
            Err(error @ DataError::Decode(_)) => {
                failed += 1;
                eprintln!("{}", Color::Red.paint(format!("Error in {path}: {error}")));
            }
        }
    }

    if failed > 0 {
        eprintln!(
            "{}",
            Color::Red.paint(format!("{failed} of {} instances failed", args.instances.len()))
        );
    }
    Ok(failed == 0)
}
