//! Validation context
//!
//! `Context` drives one top-level validation:
//! - A stack of frames, each applying one schema to one instance
//! - Errors reported by keywords of the current frame
//! - Signals keywords of the current frame leave for each other
//!
//! Every frame carries an instance ordinal. Descending into a child value
//! allocates a new ordinal; applying another schema to the same value reuses
//! the parent's, which is what the loop check looks at.

use std::mem;
use std::sync::Arc;

use schemata_value::{Kind, Value};

use crate::error::{InvalidInstance, ValidationError};
use crate::schema::SchemaNode;

/// Cross-keyword state of one frame.
///
/// | field | written by | read by |
/// |---|---|---|
/// | `inferred_type` | `type` | `multipleOf`, `maximum`, `minimum` through [`Context::kind_of`] |
///
/// Signals start empty for every frame and are dropped when it is popped.
#[derive(Debug, Default)]
pub struct Signals {
    pub inferred_type: Option<Kind>,
}

struct Frame<'v> {
    instance: usize,
    value: &'v Value,
    schema: Arc<SchemaNode>,
    /// The parent frame's errors and signals while this frame is active.
    parked: (Vec<ValidationError>, Signals),
}

pub struct Context<'v> {
    stack: Vec<Frame<'v>>,
    errors: Vec<ValidationError>,
    signals: Signals,
    next_instance: usize,
}

impl<'v> Context<'v> {
    pub(crate) fn new() -> Self {
        Self {
            stack: Vec::with_capacity(16),
            errors: Vec::new(),
            signals: Signals::default(),
            next_instance: 0,
        }
    }

    /// Record an error for the current frame (validation continues).
    pub fn report(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut Signals {
        &mut self.signals
    }

    /// Kind of the current instance, as inferred by `type` when it ran.
    pub fn kind_of(&self, value: &Value) -> Kind {
        self.signals.inferred_type.unwrap_or_else(|| value.kind())
    }

    /// Applies `schema` to `value` as a new instance.
    pub fn validate_value_with(
        &mut self,
        value: &'v Value,
        schema: &Arc<SchemaNode>,
    ) -> Result<(), ValidationError> {
        let schema = SchemaNode::follow(schema)?;
        let instance = self.next_instance;
        self.next_instance += 1;
        self.run(instance, value, schema)
    }

    /// Applies `schema` to the instance of the current frame.
    ///
    /// Fails with [`ValidationError::ValidationLoop`] when `schema` is
    /// already being applied to this instance further up the stack.
    pub fn validate_self_with(&mut self, schema: &Arc<SchemaNode>) -> Result<(), ValidationError> {
        let Some(parent) = self.stack.last() else {
            return Err(ValidationError::RootFrame);
        };
        let (instance, value) = (parent.instance, parent.value);
        let schema = SchemaNode::follow(schema)?;

        let looping = self
            .stack
            .iter()
            .rev()
            .take_while(|frame| frame.instance == instance)
            .any(|frame| Arc::ptr_eq(&frame.schema, &schema));
        if looping {
            return Err(ValidationError::ValidationLoop {
                schema: schema.identifier().to_string(),
            });
        }

        self.run(instance, value, schema)
    }

    fn run(
        &mut self,
        instance: usize,
        value: &'v Value,
        schema: Arc<SchemaNode>,
    ) -> Result<(), ValidationError> {
        let parked = (mem::take(&mut self.errors), mem::take(&mut self.signals));
        self.stack.push(Frame {
            instance,
            value,
            schema: Arc::clone(&schema),
            parked,
        });

        for keyword in schema.keywords() {
            keyword.validate(value, self);
        }

        let errors = match self.stack.pop() {
            Some(Frame {
                parked: (errors, signals),
                ..
            }) => {
                self.signals = signals;
                mem::replace(&mut self.errors, errors)
            }
            None => mem::take(&mut self.errors),
        };

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(InvalidInstance {
                schema: schema.identifier().to_string(),
                errors,
            }))
        }
    }
}
