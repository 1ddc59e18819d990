//! Schema compilation.
//!
//! The builder walks a raw document depth first. Every schema location gets
//! a node with two identifiers: the inline one, derived from its position
//! under the nearest enclosing identifier, and the declared one from its own
//! `id`. Both go into the reference table, so a `$ref` can use either form.
//! References are only recorded here; linking happens afterwards in
//! [`crate::resolve`], once every node of the document exists.

use std::sync::Arc;

use ahash::AHashMap;
use schemata_value::pointer::escape;
use schemata_value::{Map, Value};
use tracing::trace;

use crate::env::{Environment, FormatPredicate};
use crate::error::BuildError;
use crate::keyword::Keyword;
use crate::resolve::Unresolved;
use crate::schema::{Document, SchemaNode};
use crate::uri::{self, Location};

struct Frame<'doc> {
    id: Location,
    /// JSON Pointer of this location from the document root.
    pointer: String,
    definition: &'doc Map,
    consumed: Vec<&'doc str>,
}

pub struct Builder<'env, 'doc> {
    env: &'env Environment,
    base: Option<Location>,
    /// Key of the document being built, known once the root id is.
    document: Option<String>,
    stack: Vec<Frame<'doc>>,
    references: AHashMap<String, Arc<SchemaNode>>,
    subschemas: AHashMap<String, Arc<SchemaNode>>,
    pending: Vec<Arc<SchemaNode>>,
}

impl<'env, 'doc> Builder<'env, 'doc> {
    pub(crate) fn new(env: &'env Environment, base: Option<Location>) -> Self {
        Self {
            env,
            base,
            document: None,
            stack: Vec::new(),
            references: AHashMap::new(),
            subschemas: AHashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Compiles a whole document. Its references are left unlinked.
    pub(crate) fn compile(mut self, root: &'doc Map) -> Result<Unresolved, BuildError> {
        let root = self.build(&[], root)?;
        let uri = match self.document.take() {
            Some(uri) => uri,
            None => uri::split(root.identifier()).0.to_string(),
        };
        let document = Arc::new(Document::new(uri, root, self.subschemas));
        Ok(Unresolved {
            document,
            references: self.references,
            pending: self.pending,
        })
    }

    /// Compiles the schema at `path` (unescaped tokens) below the schema
    /// currently being built. The empty path builds the document root.
    pub fn build(
        &mut self,
        path: &[&str],
        definition: &'doc Map,
    ) -> Result<Arc<SchemaNode>, BuildError> {
        let (base, mut pointer) = match self.stack.last() {
            Some(frame) => (Some(frame.id.clone()), frame.pointer.clone()),
            None => (self.base.clone(), String::new()),
        };
        let mut segment = String::new();
        for token in path {
            pointer.push('/');
            pointer.push_str(&escape(token));
            segment.push('/');
            segment.push_str(&uri::encode_token(token));
        }

        let inline = match &base {
            Some(base) => base.with_fragment(&format!("{}{segment}", base.fragment())),
            None => Location::Relative(format!("#{segment}")),
        };
        let declared = match definition.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => Some(Location::parse(id, base.as_ref())?),
            _ => None,
        };
        let id = declared.clone().unwrap_or_else(|| inline.clone());
        if self.stack.is_empty() && self.document.is_none() {
            self.document = Some(id.root_key());
        }

        let reference = match definition.get("$ref").and_then(Value::as_str) {
            Some(reference) => Some(Location::parse(reference, base.as_ref())?),
            None => None,
        };

        self.stack.push(Frame {
            id: id.clone(),
            pointer: pointer.clone(),
            definition,
            consumed: Vec::new(),
        });
        let compiled = match &reference {
            // A `$ref` node has no keywords. Object siblings are still built
            // so that schemas nested in them stay addressable.
            Some(_) => self.index_siblings().map(|()| Vec::new()),
            None => self.compile_keywords(),
        };
        self.stack.pop();
        let keywords = compiled?;

        let node = Arc::new(SchemaNode::new(
            id.key(),
            reference.map(|reference| reference.key()),
            keywords,
            definition.clone(),
        ));
        trace!(identifier = node.identifier(), "compiled schema node");

        self.references.insert(id.key(), Arc::clone(&node));
        self.references.insert(inline.key(), Arc::clone(&node));
        if let Some(declared) = &declared {
            let key = declared.key();
            let (document, fragment) = uri::split(&key);
            if self.document.as_deref() == Some(document) && !fragment.is_empty() {
                self.subschemas
                    .entry(fragment.to_string())
                    .or_insert_with(|| Arc::clone(&node));
            }
        }
        self.subschemas.insert(pointer, Arc::clone(&node));
        if node.reference().is_some() {
            self.pending.push(Arc::clone(&node));
        }
        Ok(node)
    }

    /// Like [`Builder::build`] for a value that must be a schema object.
    pub fn build_value(
        &mut self,
        path: &[&str],
        value: &'doc Value,
    ) -> Result<Arc<SchemaNode>, BuildError> {
        match value {
            Value::Object(definition) => self.build(path, definition),
            _ => {
                let mut pointer = self
                    .stack
                    .last()
                    .map(|frame| frame.pointer.clone())
                    .unwrap_or_default();
                for token in path {
                    pointer.push('/');
                    pointer.push_str(&escape(token));
                }
                Err(BuildError::InvalidSchema { pointer })
            }
        }
    }

    /// Looks up a keyword of the schema being built and marks it consumed.
    pub fn keyword(&mut self, name: &str) -> Option<&'doc Value> {
        let frame = self.stack.last_mut()?;
        let definition: &'doc Map = frame.definition;
        let (key, value) = definition.get_key_value(name)?;
        frame.consumed.push(key.as_str());
        Some(value)
    }

    /// A format predicate registered in the environment.
    pub fn format(&self, name: &str) -> Option<FormatPredicate> {
        self.env.format(name)
    }

    fn index_siblings(&mut self) -> Result<(), BuildError> {
        let Some(definition) = self.stack.last().map(|frame| frame.definition) else {
            return Ok(());
        };
        for (name, value) in definition {
            let Value::Object(nested) = value else {
                continue;
            };
            if name != "definitions" {
                self.build(&[name.as_str()], nested)?;
                continue;
            }
            for (key, entry) in nested {
                if let Value::Object(entry) = entry {
                    self.build(&["definitions", key.as_str()], entry)?;
                }
            }
        }
        Ok(())
    }

    fn compile_keywords(&mut self) -> Result<Vec<Box<dyn Keyword>>, BuildError> {
        let env = self.env;
        let Some(definition) = self.stack.last().map(|frame| frame.definition) else {
            return Ok(Vec::new());
        };

        let mut compiled: Vec<(u32, Box<dyn Keyword>)> = Vec::new();
        for name in definition.keys() {
            let Some(descriptor) = env.keyword(name) else {
                continue;
            };
            if compiled.iter().any(|(priority, _)| *priority == descriptor.priority) {
                continue;
            }
            let keyword = (descriptor.setup)(self)?;
            for name in &descriptor.names {
                self.keyword(name);
            }
            compiled.push((descriptor.priority, keyword));
        }

        // Unknown keywords may still nest schemas that a `$ref` points at.
        for (name, value) in definition {
            let consumed = self
                .stack
                .last()
                .is_some_and(|frame| frame.consumed.contains(&name.as_str()));
            if consumed {
                continue;
            }
            if let Value::Object(nested) = value {
                self.build(&[name.as_str()], nested)?;
            }
        }

        compiled.sort_by_key(|(priority, _)| *priority);
        Ok(compiled.into_iter().map(|(_, keyword)| keyword).collect())
    }
}
