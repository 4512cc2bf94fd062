//! Execution.
//!
//! Each input record carries the container value, the selector and the
//! fallback. The first record pins the selector for the lifetime of the node.
//! Results are only sent when they differ from the previous one.

use crossbeam::channel::select;
use weft_types::{StructValue, Value};

use super::{Compiled, ARG_FIELD, ARG_OPTIONAL, ARG_STRUCT, STRUCT_LOOKUP_OPTIONAL};
use crate::{Exit, Init, Node, StreamError};

/// State private to one running node.
#[derive(Debug, Default)]
struct ExecState {
    /// Last record received.
    last: Option<Value>,
    /// Selector pinned by the first record.
    field: Option<String>,
    /// Last result sent.
    result: Option<Value>,
}

pub(super) struct StructLookupOptionalNode {
    compiled: Compiled,
    init: Init,
    state: ExecState,
}

impl StructLookupOptionalNode {
    pub(super) fn new(compiled: Compiled, init: Init) -> Self {
        StructLookupOptionalNode {
            compiled,
            init,
            state: ExecState::default(),
        }
    }

    fn run(&mut self) -> Result<Exit, StreamError> {
        loop {
            let input = select! {
                recv(self.init.input) -> msg => match msg {
                    Ok(input) => input,
                    Err(_) => return Ok(Exit::Closed),
                },
                recv(self.init.cancel.rx) -> _ => return Ok(Exit::Cancelled),
            };

            let Some(result) = self.step(input)? else {
                continue;
            };
            tracing::debug!(%result, "sending result");

            select! {
                send(self.init.output, result) -> sent => {
                    if sent.is_err() {
                        return Ok(Exit::Detached);
                    }
                },
                recv(self.init.cancel.rx) -> _ => return Ok(Exit::Cancelled),
            }
        }
    }

    /// Process one record. Returns the result to send, if there is a new one.
    pub(super) fn step(&mut self, input: Value) -> Result<Option<Value>, StreamError> {
        if self.state.last.as_ref() == Some(&input) {
            tracing::trace!("input unchanged");
            return Ok(None);
        }

        let result = {
            let (container, field, fallback) = unpack(&input)?;
            if field.is_empty() {
                return Err(StreamError::EmptySelector);
            }
            match &self.state.field {
                Some(pinned) if pinned != field => {
                    return Err(StreamError::SelectorChanged {
                        from: pinned.clone(),
                        to: field.to_owned(),
                    });
                }
                Some(_) => {}
                None => {
                    tracing::debug!(field, "pinned selector");
                    self.state.field = Some(field.to_owned());
                }
            }
            container.lookup(field).unwrap_or(fallback).clone()
        };
        self.state.last = Some(input);

        self.compiled
            .out
            .compare(&result.ty())
            .map_err(StreamError::ResultType)?;

        if self.state.result.as_ref() == Some(&result) {
            tracing::trace!("result unchanged");
            return Ok(None);
        }
        self.state.result = Some(result.clone());
        Ok(Some(result))
    }
}

impl Node for StructLookupOptionalNode {
    fn stream(mut self: Box<Self>) -> Result<Exit, StreamError> {
        let span = tracing::debug_span!("stream", func = STRUCT_LOOKUP_OPTIONAL);
        let _guard = span.enter();

        let exit = self.run();
        match &exit {
            Ok(exit) => tracing::debug!(?exit, "stream exited"),
            Err(err) => tracing::debug!(%err, "stream failed"),
        }
        exit
    }
}

/// Split an input record into container, selector and fallback.
fn unpack(input: &Value) -> Result<(&StructValue, &str, &Value), StreamError> {
    let args = input.as_struct().ok_or_else(|| StreamError::WrongKind {
        name: "input",
        expected: "struct",
        found: input.ty(),
    })?;

    let container = arg(args, ARG_STRUCT)?;
    let container = container
        .as_struct()
        .ok_or_else(|| StreamError::WrongKind {
            name: ARG_STRUCT,
            expected: "struct",
            found: container.ty(),
        })?;

    let field = arg(args, ARG_FIELD)?;
    let field = field.as_str().ok_or_else(|| StreamError::WrongKind {
        name: ARG_FIELD,
        expected: "str",
        found: field.ty(),
    })?;

    Ok((container, field, arg(args, ARG_OPTIONAL)?))
}

fn arg<'a>(args: &'a StructValue, name: &'static str) -> Result<&'a Value, StreamError> {
    args.lookup(name).ok_or(StreamError::MissingArg { name })
}
