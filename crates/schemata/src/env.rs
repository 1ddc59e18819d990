//! The environment: keyword and format registries plus the schema cache.

use core::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use schemata_value::Value;
use tracing::{debug, warn};

use crate::builder::Builder;
use crate::draft4;
use crate::error::BuildError;
use crate::keyword::{self, Setup, SetupFn};
use crate::resolve;
use crate::schema::{Document, Schema};
use crate::transport::Transport;
use crate::uri::Location;

/// A `format` predicate.
pub type FormatPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// One registered keyword validator.
pub(crate) struct KeywordDescriptor {
    pub priority: u32,
    pub names: Vec<String>,
    pub setup: SetupFn,
}

impl fmt::Debug for KeywordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordDescriptor")
            .field("priority", &self.priority)
            .field("names", &self.names)
            .finish()
    }
}

/// Registries and cache used to build schemas.
///
/// Keyword and format tables are shared between clones; each clone has its
/// own schema cache. Build into a clone rather than into a shared value:
/// validation through finished schemas needs no environment at all.
#[derive(Clone, Default)]
pub struct Environment {
    keywords: Arc<AHashMap<String, Arc<KeywordDescriptor>>>,
    formats: Arc<AHashMap<String, FormatPredicate>>,
    schemas: AHashMap<String, Arc<Document>>,
    transport: Option<Arc<dyn Transport>>,
}

impl Environment {
    /// An environment without keywords, formats or schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every draft-04 keyword and format, with the draft-04 meta-schema
    /// registered. Remote loading is disabled until a transport is set.
    pub fn draft4() -> Self {
        draft4::environment()
    }

    /// Registers keyword validator `K` under one or more keyword names.
    ///
    /// Validators run in ascending `priority` within a schema.
    ///
    /// # Panics
    ///
    /// Panics if a name or the priority is already registered.
    pub fn register_keyword<K: Setup>(&mut self, priority: u32, names: &[&str]) {
        let keywords = Arc::make_mut(&mut self.keywords);
        for name in names {
            if keywords.contains_key(*name) {
                panic!("keyword '{name}' is already registered");
            }
        }
        if keywords.values().any(|d| d.priority == priority) {
            panic!("keyword priority {priority} is already registered");
        }
        let descriptor = Arc::new(KeywordDescriptor {
            priority,
            names: names.iter().map(|name| name.to_string()).collect(),
            setup: keyword::boxed::<K>,
        });
        for name in names {
            keywords.insert(name.to_string(), Arc::clone(&descriptor));
        }
    }

    /// Registers a `format` predicate.
    ///
    /// # Panics
    ///
    /// Panics if the format is already registered.
    pub fn register_format<F>(&mut self, name: &str, predicate: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let formats = Arc::make_mut(&mut self.formats);
        if formats.contains_key(name) {
            panic!("format '{name}' is already registered");
        }
        formats.insert(name.to_string(), Arc::new(predicate));
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.set_transport(transport);
        self
    }

    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.transport = Some(Arc::new(transport));
    }

    pub fn without_transport(mut self) -> Self {
        self.transport = None;
        self
    }

    /// Builds, links and caches the document `data` under `id`.
    ///
    /// A document without its own `id` takes `id` as its base URI. A
    /// declared `id` naming another document is an error.
    pub fn register_schema(&mut self, id: &str, data: &[u8]) -> Result<Schema, BuildError> {
        let value = schemata_value::from_slice(data)?;
        self.register_value(id, &value)
    }

    pub fn register_value(&mut self, id: &str, value: &Value) -> Result<Schema, BuildError> {
        self.compile(id, value, true)
    }

    /// Like [`Environment::register_schema`], without caching the document.
    pub fn build_schema(&mut self, id: &str, data: &[u8]) -> Result<Schema, BuildError> {
        let value = schemata_value::from_slice(data)?;
        self.build_value(id, &value)
    }

    pub fn build_value(&mut self, id: &str, value: &Value) -> Result<Schema, BuildError> {
        self.compile(id, value, false)
    }

    /// Validates `data` against the meta-schema, then builds it.
    pub fn check_schema(&mut self, data: &[u8]) -> Result<Schema, BuildError> {
        let value = schemata_value::from_slice(data)?;
        if let Some(meta) = self.meta_schema() {
            meta.validate(&value)
                .map_err(|error| BuildError::MetaSchema(Box::new(error)))?;
        }
        self.build_value("", &value)
    }

    /// The draft-04 meta-schema, if registered.
    pub fn meta_schema(&self) -> Option<Schema> {
        self.schema(draft4::META_SCHEMA_ID)
    }

    /// A cached document by URI.
    pub fn schema(&self, id: &str) -> Option<Schema> {
        let key = Location::parse(id, None).ok()?.root_key();
        self.cached(&key).map(Schema::new)
    }

    pub(crate) fn keyword(&self, name: &str) -> Option<&Arc<KeywordDescriptor>> {
        self.keywords.get(name)
    }

    pub(crate) fn format(&self, name: &str) -> Option<FormatPredicate> {
        self.formats.get(name).cloned()
    }

    pub(crate) fn cached(&self, uri: &str) -> Option<Arc<Document>> {
        self.schemas.get(uri).cloned()
    }

    /// Fetches and registers the document at `uri` (a key ending with `#`).
    pub(crate) fn fetch(&mut self, uri: &str) -> Result<Arc<Document>, BuildError> {
        let url = uri.strip_suffix('#').unwrap_or(uri).to_string();
        let Some(transport) = self.transport.clone() else {
            return Err(BuildError::RemoteLoadingDisabled { url });
        };
        debug!(%url, "fetching remote schema");
        let data = match transport.get(&url) {
            Ok(data) => data,
            Err(source) => {
                warn!(%url, error = %source, "remote schema rejected");
                return Err(BuildError::Transport { url, source });
            }
        };
        let schema = self.register_schema(&url, &data)?;
        Ok(Arc::clone(schema.document()))
    }

    fn compile(&mut self, id: &str, value: &Value, cache: bool) -> Result<Schema, BuildError> {
        let definition = value.as_object().ok_or(BuildError::NotAnObject)?;
        let base = match id {
            "" => None,
            id => Some(Location::parse(id, None)?),
        };
        if let Some(base) = &base
            && let Some(declared) = definition.get("id").and_then(Value::as_str)
            && !declared.is_empty()
            && Location::parse(declared, Some(base))?.root_key() != base.root_key()
        {
            return Err(BuildError::IdMismatch {
                expected: base.key(),
                declared: declared.to_string(),
            });
        }

        let unresolved = Builder::new(self, base).compile(definition)?;
        let document = Arc::clone(&unresolved.document);
        let uri = document.uri().to_string();

        // Cached before linking so that cyclic references between documents
        // find this one instead of fetching it again.
        let previous = if cache {
            debug!(%uri, "registering schema document");
            self.schemas.insert(uri.clone(), Arc::clone(&document))
        } else {
            None
        };

        match resolve::link(self, unresolved) {
            Ok(()) => Ok(Schema::new(document)),
            Err(error) => {
                if cache {
                    match previous {
                        Some(previous) => self.schemas.insert(uri, previous),
                        None => self.schemas.remove(&uri),
                    };
                }
                Err(error)
            }
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut schemas: Vec<_> = self.schemas.keys().collect();
        schemas.sort();
        f.debug_struct("Environment")
            .field("keywords", &self.keywords.len())
            .field("formats", &self.formats.len())
            .field("schemas", &schemas)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}
