//! Shared argument definitions.

use std::path::PathBuf;

use schemata::{
    Environment, FileTransport, HttpOptions, HttpTransport, Transport, TransportError,
};

/// How referenced schema documents are loaded.
///
/// Can be embedded in other command Args using `#[command(flatten)]`.
/// `file:` URLs are always read from disk.
#[derive(clap::Args, Clone, Default)]
pub struct RemoteArgs {
    /// Serve remote references from this directory, using only the URL path
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// Fetch remote references over the network
    #[arg(long)]
    pub allow_remote: bool,

    /// Allow plain HTTP when fetching remote references
    #[arg(long, requires = "allow_remote")]
    pub allow_http: bool,
}

impl RemoteArgs {
    /// A draft-04 environment loading documents as configured.
    pub fn environment(&self) -> anyhow::Result<Environment> {
        let local = FileTransport::new("/");
        let mirror = self.schema_dir.clone().map(FileTransport::new);
        let http = if self.allow_remote {
            Some(HttpTransport::new(HttpOptions {
                allow_http: self.allow_http,
                ..Default::default()
            })?)
        } else {
            None
        };

        let transport = move |url: &str| -> Result<Vec<u8>, TransportError> {
            if url.starts_with("file:") {
                return local.get(url);
            }
            match (&mirror, &http) {
                (Some(mirror), Some(http)) => mirror.get(url).or_else(|_| http.get(url)),
                (Some(mirror), None) => mirror.get(url),
                (None, Some(http)) => http.get(url),
                (None, None) => Err(TransportError::UnsupportedUrl(format!(
                    "{url} (use --schema-dir or --allow-remote)"
                ))),
            }
        };
        Ok(Environment::draft4().with_transport(transport))
    }
}
