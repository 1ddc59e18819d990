//! Second build phase: linking `$ref` nodes to their targets.
//!
//! A reference is looked up, in order, in the reference table of the
//! document being linked, in the document's own fragment index, in the
//! environment's cache and finally through the transport. Targets in other
//! documents keep those documents alive through [`Document::set_links`].

use std::sync::Arc;

use ahash::AHashMap;
use tracing::debug;

use crate::env::Environment;
use crate::error::BuildError;
use crate::schema::{Document, SchemaNode};
use crate::uri;

/// A compiled document whose `$ref` nodes are not linked yet.
pub(crate) struct Unresolved {
    pub document: Arc<Document>,
    /// Every inline and declared identifier of the document.
    pub references: AHashMap<String, Arc<SchemaNode>>,
    /// Nodes carrying a `$ref`.
    pub pending: Vec<Arc<SchemaNode>>,
}

pub(crate) fn link(env: &mut Environment, unresolved: Unresolved) -> Result<(), BuildError> {
    let Unresolved {
        document,
        references,
        pending,
    } = unresolved;

    let mut links: Vec<Arc<Document>> = Vec::new();
    for node in &pending {
        let Some(reference) = node.reference() else {
            continue;
        };
        let target = match references.get(reference) {
            Some(target) => Arc::clone(target),
            None => {
                let (root, fragment) = uri::split(reference);
                if root == document.uri() {
                    document
                        .subschema(fragment)
                        .cloned()
                        .ok_or_else(|| unknown(reference))?
                } else {
                    let other = match env.cached(root) {
                        Some(other) => other,
                        None => env.fetch(root)?,
                    };
                    let target = other
                        .subschema(fragment)
                        .cloned()
                        .ok_or_else(|| unknown(reference))?;
                    debug!(
                        from = node.identifier(),
                        to = reference,
                        "linked reference across documents"
                    );
                    if !links.iter().any(|linked| Arc::ptr_eq(linked, &other)) {
                        links.push(other);
                    }
                    target
                }
            }
        };
        node.link(&target);
    }

    if !links.is_empty() {
        document.set_links(links);
    }
    Ok(())
}

fn unknown(reference: &str) -> BuildError {
    BuildError::UnknownReference {
        reference: reference.to_string(),
    }
}
