//! Push-style consumer protocol.
//!
//! A format reader drives a [`Visitor`] with one method call per event. The
//! reader never knows what sits behind the trait - a tree builder, a
//! re-encoder, or the cursor's event buffer - and the visitor can abort the
//! parse by returning [`Flow::Stop`] or an error. Errors travel through
//! `Result`, never through panics.
//!
//! The aggregate methods (`typed_array`, `begin_multi_dim`) have default
//! bodies that decompose the payload into plain container/scalar events, so
//! a scalar-only visitor works against any reader unchanged. A visitor that
//! overrides `typed_array` receives the whole buffer in one call - this is
//! the capability negotiation behind the bulk fast path: the choice happens
//! once per aggregate, not per element.

use std::borrow::Cow;

use crate::error::DecodeError;
use crate::event::{Event, SemanticTag};
use crate::expand::TypedArrayView;
use crate::span::Span;

/// Continue/stop signal returned by every visitor method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

impl Flow {
    #[inline]
    pub fn is_stop(self) -> bool {
        matches!(self, Flow::Stop)
    }
}

/// Result of one visitor notification.
pub type VisitResult = Result<Flow, DecodeError>;

/// Push-style event consumer.
///
/// `span` is the byte range of the originating token; synthetic events
/// (typed-array expansion) reuse the span of the aggregate they came from.
pub trait Visitor<'a> {
    fn begin_object(&mut self, length: Option<usize>, tag: SemanticTag, span: Span) -> VisitResult;

    fn end_object(&mut self, span: Span) -> VisitResult;

    fn begin_array(&mut self, length: Option<usize>, tag: SemanticTag, span: Span) -> VisitResult;

    fn end_array(&mut self, span: Span) -> VisitResult;

    fn key(&mut self, name: Cow<'a, str>, span: Span) -> VisitResult;

    fn null_value(&mut self, tag: SemanticTag, span: Span) -> VisitResult;

    fn bool_value(&mut self, value: bool, tag: SemanticTag, span: Span) -> VisitResult;

    fn string_value(&mut self, value: Cow<'a, str>, tag: SemanticTag, span: Span) -> VisitResult;

    fn byte_string_value(
        &mut self,
        value: Cow<'a, [u8]>,
        tag: SemanticTag,
        ext_tag: Option<u64>,
        span: Span,
    ) -> VisitResult;

    fn int64_value(&mut self, value: i64, tag: SemanticTag, span: Span) -> VisitResult;

    fn uint64_value(&mut self, value: u64, tag: SemanticTag, span: Span) -> VisitResult;

    /// Half-precision value as its raw bit pattern.
    fn half_value(&mut self, value: u16, tag: SemanticTag, span: Span) -> VisitResult;

    fn double_value(&mut self, value: f64, tag: SemanticTag, span: Span) -> VisitResult;

    /// One contiguous homogeneous numeric buffer.
    ///
    /// The default decomposes it into `begin_array`, one scalar per
    /// element in order, `end_array`. Override to take the buffer
    /// wholesale.
    fn typed_array(&mut self, view: TypedArrayView<'a>, tag: SemanticTag, span: Span) -> VisitResult {
        if self.begin_array(Some(view.len()), tag, span)?.is_stop() {
            return Ok(Flow::Stop);
        }
        let element_tag = SemanticTag::None;
        match view {
            TypedArrayView::Uint8(data) => {
                for &v in data {
                    if self.uint64_value(u64::from(v), element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Uint16(data) => {
                for &v in data {
                    if self.uint64_value(u64::from(v), element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Uint32(data) => {
                for &v in data {
                    if self.uint64_value(u64::from(v), element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Uint64(data) => {
                for &v in data {
                    if self.uint64_value(v, element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Int8(data) => {
                for &v in data {
                    if self.int64_value(i64::from(v), element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Int16(data) => {
                for &v in data {
                    if self.int64_value(i64::from(v), element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Int32(data) => {
                for &v in data {
                    if self.int64_value(i64::from(v), element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Int64(data) => {
                for &v in data {
                    if self.int64_value(v, element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Half(data) => {
                for &v in data {
                    if self.half_value(v, element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Float(data) => {
                for &v in data {
                    if self.double_value(f64::from(v), element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
            TypedArrayView::Double(data) => {
                for &v in data {
                    if self.double_value(v, element_tag, span)?.is_stop() {
                        return Ok(Flow::Stop);
                    }
                }
            }
        }
        self.end_array(span)
    }

    /// Header of a multi-dimensional array: an outer pair holding the shape
    /// vector and the data vector. The default emits the pair opener plus
    /// the shape vector; the reader follows with the data and a matching
    /// `end_multi_dim`.
    fn begin_multi_dim(&mut self, shape: &'a [usize], tag: SemanticTag, span: Span) -> VisitResult {
        if self.begin_array(Some(2), tag, span)?.is_stop() {
            return Ok(Flow::Stop);
        }
        if self.begin_array(Some(shape.len()), SemanticTag::None, span)?.is_stop() {
            return Ok(Flow::Stop);
        }
        for &dim in shape {
            if self.uint64_value(dim as u64, SemanticTag::None, span)?.is_stop() {
                return Ok(Flow::Stop);
            }
        }
        self.end_array(span)
    }

    /// Closes the outer pair opened by `begin_multi_dim`.
    fn end_multi_dim(&mut self, span: Span) -> VisitResult {
        self.end_array(span)
    }

    /// End-of-stream notification. No-op by default.
    fn flush(&mut self) {}
}

/// Replay an already-materialized [`Event`] into a visitor.
///
/// Borrowed payloads are re-borrowed cheaply; owned ones are cloned.
pub fn send_event<'a>(
    event: &Event<'a>,
    span: Span,
    visitor: &mut (impl Visitor<'a> + ?Sized),
) -> VisitResult {
    match event {
        Event::BeginObject { length, tag } => visitor.begin_object(*length, *tag, span),
        Event::EndObject => visitor.end_object(span),
        Event::BeginArray { length, tag } => visitor.begin_array(*length, *tag, span),
        Event::EndArray => visitor.end_array(span),
        Event::Key(name) => visitor.key(name.clone(), span),
        Event::String { value, tag } => visitor.string_value(value.clone(), *tag, span),
        Event::ByteString { value, tag, ext_tag } => {
            visitor.byte_string_value(value.clone(), *tag, *ext_tag, span)
        }
        Event::Null { tag } => visitor.null_value(*tag, span),
        Event::Bool { value, tag } => visitor.bool_value(*value, *tag, span),
        Event::Int64 { value, tag } => visitor.int64_value(*value, *tag, span),
        Event::Uint64 { value, tag } => visitor.uint64_value(*value, *tag, span),
        Event::Half { value, tag } => visitor.half_value(*value, *tag, span),
        Event::Double { value, tag } => visitor.double_value(*value, *tag, span),
    }
}
