//! Scripted event source.
//!
//! [`ReplaySource`] plays a prerecorded item list into a visitor, one item
//! per `parse` call. It stands in for a wire-format reader wherever one is
//! inconvenient: tests script exact event sequences (aggregates and
//! mid-stream failures included), and [`value_events`] turns an existing
//! tree back into a script for round-trip checks.

use std::borrow::Cow;

use crate::cursor::EventSource;
use crate::error::DecodeError;
use crate::event::{Event, SemanticTag};
use crate::expand::TypedArrayView;
use crate::span::{Location, Span};
use crate::value::Value;
use crate::visitor::{send_event, Visitor};

/// One scripted notification.
#[derive(Debug, Clone)]
pub enum ReplayItem<'a> {
    Event(Event<'a>),
    TypedArray(TypedArrayView<'a>, SemanticTag),
    BeginMultiDim(&'a [usize], SemanticTag),
    EndMultiDim,
}

/// Event source that replays a fixed script.
#[derive(Debug)]
pub struct ReplaySource<'a> {
    items: Vec<ReplayItem<'a>>,
    index: usize,
    /// Error delivered after the last item, simulating a mid-stream fault.
    trailing_error: Option<DecodeError>,
    failed: bool,
    /// A visitor answered `Flow::Stop`; no further items are delivered.
    halted: bool,
}

impl<'a> ReplaySource<'a> {
    pub fn new(items: Vec<ReplayItem<'a>>) -> Self {
        Self {
            items,
            index: 0,
            trailing_error: None,
            failed: false,
            halted: false,
        }
    }

    /// Fail with `code` once the script runs out, instead of ending cleanly.
    pub fn failing_with(mut self, code: DecodeError) -> Self {
        self.trailing_error = Some(code);
        self
    }
}

impl<'a> EventSource<'a> for ReplaySource<'a> {
    fn restart(&mut self) {
        self.index = 0;
        self.failed = false;
        self.halted = false;
    }

    fn parse(&mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), DecodeError> {
        if self.stopped() {
            return Ok(());
        }
        let Some(item) = self.items.get(self.index) else {
            self.failed = true;
            // stopped() is false here only when a trailing error is set.
            return Err(self.trailing_error.unwrap_or(DecodeError::UnexpectedEof));
        };
        self.index += 1;
        let span = Span::at(self.index - 1);
        let flow = match item {
            ReplayItem::Event(event) => send_event(event, span, visitor)?,
            ReplayItem::TypedArray(view, tag) => visitor.typed_array(*view, *tag, span)?,
            ReplayItem::BeginMultiDim(shape, tag) => visitor.begin_multi_dim(shape, *tag, span)?,
            ReplayItem::EndMultiDim => visitor.end_multi_dim(span)?,
        };
        if flow.is_stop() {
            self.halted = true;
        }
        Ok(())
    }

    fn stopped(&self) -> bool {
        self.failed
            || self.halted
            || (self.index >= self.items.len() && self.trailing_error.is_none())
    }

    fn location(&self) -> Location {
        Location {
            line: 1,
            column: self.index + 1,
            offset: self.index,
        }
    }
}

/// Flatten a tree into the event script that would rebuild it.
///
/// Iterative walk with an explicit agenda, so depth is bounded by heap.
pub fn value_events(root: &Value) -> Vec<ReplayItem<'static>> {
    enum Task<'v> {
        Open(&'v Value),
        Member(&'v str, &'v Value),
        Close(Event<'static>),
    }

    let mut script = Vec::new();
    let mut agenda = vec![Task::Open(root)];
    let tag = SemanticTag::None;
    while let Some(task) = agenda.pop() {
        match task {
            Task::Member(name, value) => {
                script.push(ReplayItem::Event(Event::Key(Cow::Owned(name.to_string()))));
                agenda.push(Task::Open(value));
            }
            Task::Close(event) => script.push(ReplayItem::Event(event)),
            Task::Open(value) => match value {
                Value::Null => script.push(ReplayItem::Event(Event::Null { tag })),
                Value::Bool(b) => script.push(ReplayItem::Event(Event::Bool { value: *b, tag })),
                Value::Int(i) => script.push(ReplayItem::Event(Event::Int64 { value: *i, tag })),
                Value::Uint(u) => script.push(ReplayItem::Event(Event::Uint64 { value: *u, tag })),
                Value::Double(d) => {
                    script.push(ReplayItem::Event(Event::Double { value: *d, tag }));
                }
                Value::String(s) => script.push(ReplayItem::Event(Event::String {
                    value: Cow::Owned(s.clone()),
                    tag,
                })),
                Value::Bytes(b) => script.push(ReplayItem::Event(Event::ByteString {
                    value: Cow::Owned(b.clone()),
                    tag,
                    ext_tag: None,
                })),
                Value::Array(items) => {
                    script.push(ReplayItem::Event(Event::BeginArray {
                        length: Some(items.len()),
                        tag,
                    }));
                    agenda.push(Task::Close(Event::EndArray));
                    for item in items.iter().rev() {
                        agenda.push(Task::Open(item));
                    }
                }
                Value::Object(members) => {
                    script.push(ReplayItem::Event(Event::BeginObject {
                        length: Some(members.len()),
                        tag,
                    }));
                    agenda.push(Task::Close(Event::EndObject));
                    for (name, member) in members.iter().rev() {
                        agenda.push(Task::Member(name, member));
                    }
                }
            },
        }
    }
    script
}
