//! Resumable expansion of aggregate binary payloads.
//!
//! Binary formats encode a whole numeric buffer or tensor shape as one
//! opaque item. Scalar-only consumers need it decomposed incrementally -
//! one scalar per cursor step - without eagerly materializing the
//! expansion. [`Expander`] is the visitor the cursor drives its reader
//! into: it records the most recent event, intercepts `typed_array` and
//! `begin_multi_dim`, and replays the intercepted payload through the
//! [`ExpansionState`] machine, one event per [`Expander::replay_step`].
//!
//! The bulk fast path lives in [`Expander::drain_to`]: when the whole
//! aggregate is still buffered, the destination visitor is offered the
//! buffer wholesale and its own `typed_array` capability decides whether
//! to expand.

use std::borrow::Cow;

use crate::event::{Event, SemanticTag};
use crate::span::Span;
use crate::visitor::{send_event, Flow, VisitResult, Visitor};

/// Borrowed view over one contiguous homogeneous numeric buffer.
///
/// The variant is the element type; the slice is the data. Nothing is
/// owned - the buffer belongs to whoever produced it (usually the
/// reader's input) and must outlive the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedArrayView<'a> {
    Uint8(&'a [u8]),
    Uint16(&'a [u16]),
    Uint32(&'a [u32]),
    Uint64(&'a [u64]),
    Int8(&'a [i8]),
    Int16(&'a [i16]),
    Int32(&'a [i32]),
    Int64(&'a [i64]),
    /// Half-precision elements as raw bit patterns.
    Half(&'a [u16]),
    Float(&'a [f32]),
    Double(&'a [f64]),
}

impl<'a> TypedArrayView<'a> {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Uint8(d) => d.len(),
            Self::Uint16(d) => d.len(),
            Self::Uint32(d) => d.len(),
            Self::Uint64(d) => d.len(),
            Self::Int8(d) => d.len(),
            Self::Int16(d) => d.len(),
            Self::Int32(d) => d.len(),
            Self::Int64(d) => d.len(),
            Self::Half(d) => d.len(),
            Self::Float(d) => d.len(),
            Self::Double(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalar event for the element at `index`.
    ///
    /// Unsigned elements widen to `Uint64`, signed to `Int64`, floats to
    /// `Double`; half stays `Half`. Deterministic in `index`, so the
    /// expansion can be suspended and resumed at any point.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds, like slice indexing.
    pub fn scalar(&self, index: usize) -> Event<'a> {
        let tag = SemanticTag::None;
        match self {
            Self::Uint8(d) => Event::Uint64 { value: u64::from(d[index]), tag },
            Self::Uint16(d) => Event::Uint64 { value: u64::from(d[index]), tag },
            Self::Uint32(d) => Event::Uint64 { value: u64::from(d[index]), tag },
            Self::Uint64(d) => Event::Uint64 { value: d[index], tag },
            Self::Int8(d) => Event::Int64 { value: i64::from(d[index]), tag },
            Self::Int16(d) => Event::Int64 { value: i64::from(d[index]), tag },
            Self::Int32(d) => Event::Int64 { value: i64::from(d[index]), tag },
            Self::Int64(d) => Event::Int64 { value: d[index], tag },
            Self::Half(d) => Event::Half { value: d[index], tag },
            Self::Float(d) => Event::Double { value: f64::from(d[index]), tag },
            Self::Double(d) => Event::Double { value: d[index], tag },
        }
    }
}

/// Where the expansion machine stands for the current aggregate.
///
/// `Idle` means the current event is a plain reader event; anything else
/// means one underlying item must still be replayed as N scalar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionState {
    #[default]
    Idle,
    /// Replaying a typed array; `index` is the next element to emit.
    TypedArray { index: usize },
    /// A multi-dim header was intercepted; the shape vector opener is next.
    MultiDimHeader,
    /// Replaying the shape vector; `index` is the next dimension to emit.
    Shape { index: usize },
}

/// Visitor that buffers the most recent event and expands aggregates.
///
/// Owned by a cursor for the cursor's lifetime. The recorded event is
/// overwritten on every reader notification and every replay step.
#[derive(Debug)]
pub struct Expander<'a> {
    event: Event<'a>,
    span: Span,
    state: ExpansionState,
    data: Option<(TypedArrayView<'a>, SemanticTag)>,
    shape: &'a [usize],
    fresh: bool,
}

impl<'a> Expander<'a> {
    pub fn new() -> Self {
        Self {
            event: Event::Null { tag: SemanticTag::None },
            span: Span::default(),
            state: ExpansionState::Idle,
            data: None,
            shape: &[],
            fresh: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The most recently produced event.
    pub fn event(&self) -> &Event<'a> {
        &self.event
    }

    /// Span of the most recently produced event.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn state(&self) -> ExpansionState {
        self.state
    }

    /// True if a buffered aggregate still has events to replay.
    pub fn pending(&self) -> bool {
        self.state != ExpansionState::Idle
    }

    /// True if the reader produced an event since the last `clear_fresh`.
    pub fn fresh(&self) -> bool {
        self.fresh
    }

    pub fn clear_fresh(&mut self) {
        self.fresh = false;
    }

    /// Advance the expansion machine by exactly one event.
    ///
    /// Caller must check [`Expander::pending`] first; a step in `Idle`
    /// leaves the current event unchanged.
    pub fn replay_step(&mut self) {
        match self.state {
            ExpansionState::Idle => {}
            ExpansionState::TypedArray { index } => match self.data {
                Some((view, _)) if index < view.len() => {
                    self.event = view.scalar(index);
                    self.state = ExpansionState::TypedArray { index: index + 1 };
                }
                _ => {
                    self.event = Event::EndArray;
                    self.state = ExpansionState::Idle;
                    self.data = None;
                }
            },
            ExpansionState::MultiDimHeader => {
                self.event = Event::BeginArray {
                    length: Some(self.shape.len()),
                    tag: SemanticTag::None,
                };
                self.state = ExpansionState::Shape { index: 0 };
            }
            ExpansionState::Shape { index } => {
                if index < self.shape.len() {
                    self.event = Event::Uint64 {
                        value: self.shape[index] as u64,
                        tag: SemanticTag::None,
                    };
                    self.state = ExpansionState::Shape { index: index + 1 };
                } else {
                    self.event = Event::EndArray;
                    self.state = ExpansionState::Idle;
                    self.shape = &[];
                }
            }
        }
        self.fresh = true;
    }

    /// Send the current event to `visitor`, bulk path included.
    ///
    /// If a typed array is buffered and untouched, the destination gets it
    /// wholesale - its own `typed_array` capability decides between native
    /// consumption and scalar expansion. If expansion already started, the
    /// remaining scalars and the closing `end_array` are sent one by one
    /// so the destination still sees a well-nested stream.
    pub fn drain_to(&mut self, visitor: &mut (impl Visitor<'a> + ?Sized)) -> VisitResult {
        if let ExpansionState::TypedArray { index } = self.state {
            if let Some((view, tag)) = self.data.take() {
                self.state = ExpansionState::Idle;
                if index == 0 {
                    return visitor.typed_array(view, tag, self.span);
                }
                if send_event(&self.event, self.span, visitor)?.is_stop() {
                    return Ok(Flow::Stop);
                }
                for i in index..view.len() {
                    if send_event(&view.scalar(i), self.span, visitor)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
                return visitor.end_array(self.span);
            }
        }
        send_event(&self.event, self.span, visitor)
    }

    fn record(&mut self, event: Event<'a>, span: Span) {
        self.event = event;
        self.span = span;
        self.fresh = true;
    }
}

impl<'a> Default for Expander<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Visitor<'a> for Expander<'a> {
    fn begin_object(&mut self, length: Option<usize>, tag: SemanticTag, span: Span) -> VisitResult {
        self.record(Event::BeginObject { length, tag }, span);
        Ok(Flow::Continue)
    }

    fn end_object(&mut self, span: Span) -> VisitResult {
        self.record(Event::EndObject, span);
        Ok(Flow::Continue)
    }

    fn begin_array(&mut self, length: Option<usize>, tag: SemanticTag, span: Span) -> VisitResult {
        self.record(Event::BeginArray { length, tag }, span);
        Ok(Flow::Continue)
    }

    fn end_array(&mut self, span: Span) -> VisitResult {
        self.record(Event::EndArray, span);
        Ok(Flow::Continue)
    }

    fn key(&mut self, name: Cow<'a, str>, span: Span) -> VisitResult {
        self.record(Event::Key(name), span);
        Ok(Flow::Continue)
    }

    fn null_value(&mut self, tag: SemanticTag, span: Span) -> VisitResult {
        self.record(Event::Null { tag }, span);
        Ok(Flow::Continue)
    }

    fn bool_value(&mut self, value: bool, tag: SemanticTag, span: Span) -> VisitResult {
        self.record(Event::Bool { value, tag }, span);
        Ok(Flow::Continue)
    }

    fn string_value(&mut self, value: Cow<'a, str>, tag: SemanticTag, span: Span) -> VisitResult {
        self.record(Event::String { value, tag }, span);
        Ok(Flow::Continue)
    }

    fn byte_string_value(
        &mut self,
        value: Cow<'a, [u8]>,
        tag: SemanticTag,
        ext_tag: Option<u64>,
        span: Span,
    ) -> VisitResult {
        self.record(Event::ByteString { value, tag, ext_tag }, span);
        Ok(Flow::Continue)
    }

    fn int64_value(&mut self, value: i64, tag: SemanticTag, span: Span) -> VisitResult {
        self.record(Event::Int64 { value, tag }, span);
        Ok(Flow::Continue)
    }

    fn uint64_value(&mut self, value: u64, tag: SemanticTag, span: Span) -> VisitResult {
        self.record(Event::Uint64 { value, tag }, span);
        Ok(Flow::Continue)
    }

    fn half_value(&mut self, value: u16, tag: SemanticTag, span: Span) -> VisitResult {
        self.record(Event::Half { value, tag }, span);
        Ok(Flow::Continue)
    }

    fn double_value(&mut self, value: f64, tag: SemanticTag, span: Span) -> VisitResult {
        self.record(Event::Double { value, tag }, span);
        Ok(Flow::Continue)
    }

    /// Intercept: record the array opener, buffer the view for replay.
    fn typed_array(&mut self, view: TypedArrayView<'a>, tag: SemanticTag, span: Span) -> VisitResult {
        self.state = ExpansionState::TypedArray { index: 0 };
        self.data = Some((view, tag));
        self.record(Event::BeginArray { length: Some(view.len()), tag }, span);
        Ok(Flow::Continue)
    }

    /// Intercept: record the outer pair opener, buffer the shape.
    fn begin_multi_dim(&mut self, shape: &'a [usize], tag: SemanticTag, span: Span) -> VisitResult {
        self.state = ExpansionState::MultiDimHeader;
        self.shape = shape;
        self.record(Event::BeginArray { length: Some(2), tag }, span);
        Ok(Flow::Continue)
    }

    fn end_multi_dim(&mut self, span: Span) -> VisitResult {
        self.record(Event::EndArray, span);
        Ok(Flow::Continue)
    }
}
