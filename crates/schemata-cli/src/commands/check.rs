//! Check command - validates schemas against the meta-schema and compiles them.

use nu_ansi_term::Color;

use crate::args::RemoteArgs;
use crate::util::{display_path, indent, read_document, schema_id};

#[derive(clap::Args)]
pub struct Args {
    /// Schema files to check ('-' for stdin)
    #[arg(required = true)]
    pub schemas: Vec<String>,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

/// Returns whether every schema is well-formed.
pub fn run(args: Args) -> anyhow::Result<bool> {
    let env = args.remote.environment()?;
    let meta = env
        .meta_schema()
        .ok_or_else(|| anyhow::anyhow!("The draft-04 meta-schema is not registered"))?;

    let mut success = true;
    for file in &args.schemas {
        let path = display_path(file);
        let document = match read_document(file) {
            Ok(document) => document,
            Err(error) => {
                success = false;
                println!("{} {path}", Color::Red.paint("error"));
                println!("  {}", indent(&format!("{error:#}")));
                continue;
            }
        };

        if let Err(error) = meta.validate(&document) {
            success = false;
            println!("{} {path}", Color::Red.paint("invalid"));
            println!("  {}", indent(&error.to_string()));
            continue;
        }
        // Each schema builds in its own sandbox so one cannot satisfy
        // another's references.
        match env.clone().build_value(&schema_id(file, &document)?, &document) {
            Ok(_) => println!("{} {path}", Color::Green.paint("ok")),
            Err(error) => {
                success = false;
                println!("{} {path}", Color::Red.paint("error"));
                println!("  {}", indent(&error.to_string()));
            }
        }
    }
    Ok(success)
}
