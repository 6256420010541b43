//! Predicate-skipping cursor decorator.
//!
//! Wraps any [`StreamCursor`] and advances the underlying cursor past
//! events that fail the predicate, both at construction and after every
//! `advance`. Underlying errors halt the skip loop immediately. Filters
//! compose: chaining two is observably equivalent to one filter over the
//! conjunction of both predicates (for pure predicates).

use crate::cursor::StreamCursor;
use crate::error::DecodeError;
use crate::event::Event;
use crate::span::{Location, Span};
use crate::visitor::{VisitResult, Visitor};

/// A cursor showing only events matching a predicate.
///
/// Built via [`StreamCursor::filter`]. Borrowing flavors come for free:
/// `(&mut cursor).filter(pred)` decorates without consuming.
#[derive(Debug)]
pub struct FilteredCursor<C, P> {
    inner: C,
    pred: P,
}

impl<'a, C, P> FilteredCursor<C, P>
where
    C: StreamCursor<'a>,
    P: FnMut(&Event<'a>, Location) -> bool,
{
    pub fn new(inner: C, pred: P) -> Result<Self, DecodeError> {
        let mut filtered = Self { inner, pred };
        filtered.skip_unmatched()?;
        Ok(filtered)
    }

    /// Unwrap the decorator, returning the underlying cursor.
    pub fn into_inner(self) -> C {
        self.inner
    }

    fn skip_unmatched(&mut self) -> Result<(), DecodeError> {
        while !self.inner.done() && !(self.pred)(self.inner.current(), self.inner.context()) {
            self.inner.advance()?;
        }
        Ok(())
    }
}

impl<'a, C, P> StreamCursor<'a> for FilteredCursor<C, P>
where
    C: StreamCursor<'a>,
    P: FnMut(&Event<'a>, Location) -> bool,
{
    fn done(&self) -> bool {
        self.inner.done()
    }

    fn current(&self) -> &Event<'a> {
        self.inner.current()
    }

    fn advance(&mut self) -> Result<(), DecodeError> {
        self.inner.advance()?;
        self.skip_unmatched()
    }

    fn context(&self) -> Location {
        self.inner.context()
    }

    fn span(&self) -> Span {
        self.inner.span()
    }

    fn read_to(&mut self, visitor: &mut dyn Visitor<'a>) -> VisitResult {
        self.inner.read_to(visitor)
    }
}
