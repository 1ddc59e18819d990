//! Loading remote schema documents.
//!
//! The environment never fetches anything unless a [`Transport`] is set.

use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported URL: {0}")]
    UnsupportedUrl(String),

    /// URL is not HTTPS and plain HTTP was not allowed
    #[error("HTTPS required: {0}")]
    HttpsRequired(String),

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("document size exceeds limit: {size} > {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fetches the raw bytes of a schema document.
pub trait Transport: Send + Sync {
    /// `url` is absolute and carries no fragment.
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&str) -> Result<Vec<u8>, TransportError> + Send + Sync,
{
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self(url)
    }
}

// =============================================================================
// FileTransport
// =============================================================================

/// Serves every URL from a local directory, using only the URL's path.
///
/// `http://localhost:1234/folder/a.json` is read from `<root>/folder/a.json`
/// regardless of scheme and host.
#[derive(Debug, Clone)]
pub struct FileTransport {
    root: PathBuf,
}

impl FileTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, url: &str) -> Result<PathBuf, TransportError> {
        let unsupported = || TransportError::UnsupportedUrl(url.to_string());
        let parsed = Url::parse(url).map_err(|_| unsupported())?;
        let segments = parsed.path_segments().ok_or_else(unsupported)?;

        let mut path = self.root.clone();
        for segment in segments {
            let segment = percent_decode_str(segment)
                .decode_utf8()
                .map_err(|_| unsupported())?;
            match segment.as_ref() {
                "" | "." => {}
                ".." => return Err(unsupported()),
                segment if segment.contains(['/', '\\']) => return Err(unsupported()),
                segment => path.push(segment),
            }
        }
        if path == self.root {
            return Err(unsupported());
        }
        Ok(path)
    }
}

impl Transport for FileTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let path = self.path_of(url)?;
        Ok(std::fs::read(path)?)
    }
}

// =============================================================================
// HttpTransport
// =============================================================================

#[cfg(feature = "http")]
pub use http::{HttpOptions, HttpTransport};

#[cfg(feature = "http")]
mod http {
    use std::io::Read;
    use std::time::Duration;

    use reqwest::blocking::Client;

    use super::{Transport, TransportError};

    /// Options for [`HttpTransport`].
    #[derive(Debug, Clone)]
    pub struct HttpOptions {
        /// Whole-request timeout.
        pub timeout: Duration,
        pub connect_timeout: Duration,
        /// Allow plain `http://` URLs.
        pub allow_http: bool,
        /// Maximum document size in bytes.
        pub max_document_size: u64,
        pub user_agent: String,
    }

    impl Default for HttpOptions {
        fn default() -> Self {
            Self {
                timeout: Duration::from_secs(30),
                connect_timeout: Duration::from_secs(10),
                allow_http: false,
                max_document_size: 8 * 1024 * 1024,
                user_agent: format!("schemata@{}", env!("CARGO_PKG_VERSION")),
            }
        }
    }

    /// Fetches documents over HTTP(S) with a blocking client.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: Client,
        allow_http: bool,
        max_document_size: u64,
    }

    impl HttpTransport {
        pub fn new(options: HttpOptions) -> Result<Self, TransportError> {
            let client = Client::builder()
                .connect_timeout(options.connect_timeout)
                .timeout(options.timeout)
                .redirect(reqwest::redirect::Policy::limited(5))
                .user_agent(options.user_agent)
                .build()?;
            Ok(Self {
                client,
                allow_http: options.allow_http,
                max_document_size: options.max_document_size,
            })
        }
    }

    impl Transport for HttpTransport {
        fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
            match url.split_once("://").map(|(scheme, _)| scheme) {
                Some("https") => {}
                Some("http") if self.allow_http => {}
                Some("http") => return Err(TransportError::HttpsRequired(url.to_string())),
                _ => return Err(TransportError::UnsupportedUrl(url.to_string())),
            }

            let response = self.client.get(url).send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let limit = self.max_document_size;
            if let Some(size) = response.content_length()
                && size > limit
            {
                return Err(TransportError::TooLarge { size, limit });
            }

            // Content-Length may be absent or wrong; read one byte past the limit.
            let mut data = Vec::new();
            response.take(limit + 1).read_to_end(&mut data)?;
            let size = data.len() as u64;
            if size > limit {
                return Err(TransportError::TooLarge { size, limit });
            }
            Ok(data)
        }
    }

}
