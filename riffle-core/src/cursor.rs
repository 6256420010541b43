//! Pull-style access over any event source.
//!
//! [`EventSource`] is the contract a format reader implements: a bounded,
//! re-entrant state machine that drives at most one new event into the
//! supplied visitor per `parse` call and halts. [`Cursor`] owns a source
//! plus an [`Expander`] and turns the push protocol into pull: `current()`
//! and a one-step `advance()`. [`StreamCursor`] is the trait the filter,
//! materializer and iterators consume, so they work over a plain cursor,
//! a filtered one, or a mutable borrow of either.
//!
//! Backpressure is structural: nothing is produced more than one event
//! ahead of what was requested, except the opt-in bulk typed-array path
//! behind [`StreamCursor::read_to`].

use crate::error::DecodeError;
use crate::event::Event;
use crate::expand::Expander;
use crate::filter::FilteredCursor;
use crate::span::{Location, Span};
use crate::visitor::{VisitResult, Visitor};

/// Contract for a format reader.
///
/// `parse` must drive at most one new top-level event into `visitor` and
/// return; on malformed input it must return the error and report
/// `stopped()` from then on. A visitor answering [`Flow::Stop`] likewise
/// stops the source: later `parse` calls deliver nothing. `stopped()` is
/// true once the input is exhausted, the visitor stopped the stream, or a
/// fatal error occurred.
///
/// [`Flow::Stop`]: crate::visitor::Flow::Stop
pub trait EventSource<'a> {
    /// Rewind to the beginning of the input.
    fn restart(&mut self);

    /// Parse forward until exactly one event has been delivered, the input
    /// ends, or an error occurs.
    fn parse(&mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), DecodeError>;

    /// True once no further events can be produced.
    fn stopped(&self) -> bool;

    /// Current read position, for diagnostics.
    fn location(&self) -> Location;
}

/// Pull-style event stream.
///
/// `current()` is defined iff `done()` is false; once `done()` turns true
/// it never reverts. `advance()` must not be called after `done()`.
pub trait StreamCursor<'a> {
    fn done(&self) -> bool;

    /// The event produced by the most recent successful advance.
    fn current(&self) -> &Event<'a>;

    /// Move exactly one event forward.
    fn advance(&mut self) -> Result<(), DecodeError>;

    /// Source position of the current event, 1-based line/column.
    fn context(&self) -> Location;

    /// Byte range of the current event's originating token.
    fn span(&self) -> Span;

    /// Send the current event to `visitor`, taking the bulk typed-array
    /// fast path when the destination supports it.
    fn read_to(&mut self, visitor: &mut dyn Visitor<'a>) -> VisitResult;

    /// Decorate with a skip predicate; events failing `pred` are never
    /// observed. Predicates are assumed pure - composition of filters is
    /// only guaranteed equivalent to a conjoined predicate when they are.
    fn filter<P>(self, pred: P) -> Result<FilteredCursor<Self, P>, DecodeError>
    where
        Self: Sized,
        P: FnMut(&Event<'a>, Location) -> bool,
    {
        FilteredCursor::new(self, pred)
    }
}

impl<'a, C: StreamCursor<'a> + ?Sized> StreamCursor<'a> for &mut C {
    fn done(&self) -> bool {
        (**self).done()
    }

    fn current(&self) -> &Event<'a> {
        (**self).current()
    }

    fn advance(&mut self) -> Result<(), DecodeError> {
        (**self).advance()
    }

    fn context(&self) -> Location {
        (**self).context()
    }

    fn span(&self) -> Span {
        (**self).span()
    }

    fn read_to(&mut self, visitor: &mut dyn Visitor<'a>) -> VisitResult {
        (**self).read_to(visitor)
    }
}

/// Pull cursor over an owned [`EventSource`].
///
/// Construction primes the first event, so `current()` is available
/// immediately. A priming failure is recorded rather than raised:
/// `done()` reports true, [`Cursor::error`] exposes the code, and
/// `current()` is a safe null event.
#[derive(Debug)]
pub struct Cursor<'a, R: EventSource<'a>> {
    source: R,
    expander: Expander<'a>,
    done: bool,
    error: Option<DecodeError>,
}

impl<'a, R: EventSource<'a>> Cursor<'a, R> {
    pub fn new(source: R) -> Self {
        let mut cursor = Self {
            source,
            expander: Expander::new(),
            done: false,
            error: None,
        };
        let _ = cursor.step();
        cursor
    }

    /// The error that stopped this cursor, if any.
    pub fn error(&self) -> Option<DecodeError> {
        self.error
    }

    /// Rewind the source and prime the first event again.
    pub fn restart(&mut self) {
        self.source.restart();
        self.expander.reset();
        self.done = false;
        self.error = None;
        let _ = self.step();
    }

    /// Consume the cursor, returning the source.
    pub fn into_source(self) -> R {
        self.source
    }

    fn step(&mut self) -> Result<(), DecodeError> {
        if self.expander.pending() {
            self.expander.replay_step();
            return Ok(());
        }
        if self.source.stopped() {
            self.done = true;
            return Ok(());
        }
        self.expander.clear_fresh();
        match self.source.parse(&mut self.expander) {
            Ok(()) => {
                if !self.expander.fresh() {
                    // End of input with no further event.
                    self.done = true;
                }
                Ok(())
            }
            Err(code) => {
                self.done = true;
                self.error = Some(code);
                Err(code)
            }
        }
    }
}

impl<'a, R: EventSource<'a>> StreamCursor<'a> for Cursor<'a, R> {
    fn done(&self) -> bool {
        self.done
    }

    fn current(&self) -> &Event<'a> {
        self.expander.event()
    }

    fn advance(&mut self) -> Result<(), DecodeError> {
        debug_assert!(!self.done, "advance called on a finished cursor");
        if self.done {
            return Ok(());
        }
        self.step()
    }

    fn context(&self) -> Location {
        self.source.location()
    }

    fn span(&self) -> Span {
        self.expander.span()
    }

    fn read_to(&mut self, visitor: &mut dyn Visitor<'a>) -> VisitResult {
        self.expander.drain_to(visitor)
    }
}
