//! Compiled schema graph.

use core::fmt;
use std::sync::{Arc, OnceLock, Weak};

use ahash::AHashMap;
use schemata_value::{Map, Value};

use crate::context::Context;
use crate::error::{DataError, ValidationError};
use crate::keyword::Keyword;
use crate::uri;

/// Maximum number of `$ref` hops followed before giving up.
const MAX_REFERENCE_HOPS: usize = 100;

// =============================================================================
// SchemaNode
// =============================================================================

/// One compiled schema object, or a `$ref` indirection.
pub struct SchemaNode {
    identifier: String,
    reference: Option<String>,
    target: OnceLock<Weak<SchemaNode>>,
    keywords: Vec<Box<dyn Keyword>>,
    definition: Map,
}

impl SchemaNode {
    pub(crate) fn new(
        identifier: String,
        reference: Option<String>,
        keywords: Vec<Box<dyn Keyword>>,
        definition: Map,
    ) -> Self {
        Self {
            identifier,
            reference,
            target: OnceLock::new(),
            keywords,
            definition,
        }
    }

    /// Canonical identifier, always containing `#`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Normalized `$ref` this node redirects to.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// The node a `$ref` points at, once linked.
    pub fn target(&self) -> Option<Arc<SchemaNode>> {
        self.target.get().and_then(Weak::upgrade)
    }

    /// Compiled keywords in ascending priority. Empty for `$ref` nodes.
    pub fn keywords(&self) -> &[Box<dyn Keyword>] {
        &self.keywords
    }

    /// The raw schema object this node was compiled from.
    pub fn definition(&self) -> &Map {
        &self.definition
    }

    pub(crate) fn link(&self, target: &Arc<SchemaNode>) {
        let _ = self.target.set(Arc::downgrade(target));
    }

    /// Follows `$ref` links until a node with keywords is reached.
    pub(crate) fn follow(node: &Arc<SchemaNode>) -> Result<Arc<SchemaNode>, ValidationError> {
        let mut current = Arc::clone(node);
        for _ in 0..MAX_REFERENCE_HOPS {
            let Some(reference) = current.reference.clone() else {
                return Ok(current);
            };
            current = current
                .target()
                .ok_or(ValidationError::UnresolvedReference { reference })?;
        }
        Err(ValidationError::ValidationLoop {
            schema: node.identifier.clone(),
        })
    }
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaNode")
            .field("identifier", &self.identifier)
            .field("reference", &self.reference)
            .field("keywords", &self.keywords.len())
            .finish()
    }
}

// =============================================================================
// Document
// =============================================================================

/// A compiled root document with an index of every schema inside it.
pub(crate) struct Document {
    uri: String,
    root: Arc<SchemaNode>,
    /// Keyed by decoded fragment: the JSON Pointer of each location, plus
    /// plain-name fragments declared through `id`.
    subschemas: AHashMap<String, Arc<SchemaNode>>,
    /// Documents holding targets of cross-document references.
    links: OnceLock<Vec<Arc<Document>>>,
}

impl Document {
    pub fn new(
        uri: String,
        root: Arc<SchemaNode>,
        subschemas: AHashMap<String, Arc<SchemaNode>>,
    ) -> Self {
        Self {
            uri,
            root,
            subschemas,
            links: OnceLock::new(),
        }
    }

    /// Document key, ending with `#`.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn root(&self) -> &Arc<SchemaNode> {
        &self.root
    }

    pub fn subschema(&self, fragment: &str) -> Option<&Arc<SchemaNode>> {
        self.subschemas.get(fragment)
    }

    pub fn set_links(&self, links: Vec<Arc<Document>>) {
        let _ = self.links.set(links);
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("uri", &self.uri)
            .field("subschemas", &self.subschemas.len())
            .field("links", &self.links.get().map_or(0, Vec::len))
            .finish()
    }
}

// =============================================================================
// Schema
// =============================================================================

/// A linked schema, ready for validation.
///
/// Cloning is cheap; clones share the compiled graph, which is immutable and
/// can be used from many threads at once.
#[derive(Clone)]
pub struct Schema {
    document: Arc<Document>,
    node: Arc<SchemaNode>,
}

impl Schema {
    pub(crate) fn new(document: Arc<Document>) -> Self {
        let node = Arc::clone(document.root());
        Self { document, node }
    }

    pub(crate) fn document(&self) -> &Arc<Document> {
        &self.document
    }

    /// Identifier of the node this schema validates with.
    pub fn id(&self) -> &str {
        self.node.identifier()
    }

    pub fn node(&self) -> &Arc<SchemaNode> {
        &self.node
    }

    /// The schema at `fragment` inside the same document.
    ///
    /// Accepts a JSON Pointer (`/definitions/a`) or a fragment with or
    /// without a leading `#`, percent-encoded or not.
    pub fn subschema(&self, fragment: &str) -> Option<Schema> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let key = uri::normalize(&format!("#{fragment}"));
        let node = self.document.subschema(uri::split(&key).1)?;
        Some(Self {
            document: Arc::clone(&self.document),
            node: Arc::clone(node),
        })
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        Context::new().validate_value_with(value, &self.node)
    }

    /// Decodes `data` as JSON, keeping integers exact, and validates it.
    pub fn validate_data(&self, data: &[u8]) -> Result<(), DataError> {
        let value = schemata_value::from_slice(data)?;
        self.validate(&value)?;
        Ok(())
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("document", &self.document.uri())
            .field("node", &self.node.identifier())
            .finish()
    }
}
