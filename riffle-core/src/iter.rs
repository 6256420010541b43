//! Typed iteration over a container's direct children.
//!
//! Both iterators take the cursor positioned on the container's begin
//! event, consume it, and yield one decoded item per `next`. Nested
//! containers inside an element are consumed whole by the element's
//! [`Decode`] impl, so iteration stays at one level. The first error ends
//! the iteration; both iterators are fused after it.

use std::marker::PhantomData;

use crate::cursor::StreamCursor;
use crate::de::Decode;
use crate::error::DecodeError;
use crate::event::Event;

/// Iterator over the elements of the array the cursor is positioned on.
#[derive(Debug)]
pub struct ArrayIter<'a, C, T> {
    cursor: C,
    finished: bool,
    /// Advance error held back until the already-decoded item is yielded.
    pending: Option<DecodeError>,
    _marker: PhantomData<(&'a (), fn() -> T)>,
}

impl<'a, C, T> ArrayIter<'a, C, T>
where
    C: StreamCursor<'a>,
    T: Decode<'a>,
{
    /// Fails with [`DecodeError::NotAnArray`] when the cursor is not on an
    /// array opener.
    pub fn new(mut cursor: C) -> Result<Self, DecodeError> {
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        if !matches!(cursor.current(), Event::BeginArray { .. }) {
            return Err(DecodeError::NotAnArray);
        }
        cursor.advance()?;
        Ok(Self { cursor, finished: false, pending: None, _marker: PhantomData })
    }

    /// The underlying cursor, positioned on the array's end event if the
    /// iteration ran to completion.
    pub fn into_cursor(self) -> C {
        self.cursor
    }
}

impl<'a, C, T> Iterator for ArrayIter<'a, C, T>
where
    C: StreamCursor<'a>,
    T: Decode<'a>,
{
    type Item = Result<T, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(code) = self.pending.take() {
            self.finished = true;
            return Some(Err(code));
        }
        if self.cursor.done() {
            self.finished = true;
            return Some(Err(DecodeError::UnexpectedEof));
        }
        if matches!(self.cursor.current(), Event::EndArray) {
            self.finished = true;
            return None;
        }
        let item = match T::decode(&mut self.cursor) {
            Ok(item) => item,
            Err(code) => {
                self.finished = true;
                return Some(Err(code));
            }
        };
        if let Err(code) = self.cursor.advance() {
            self.pending = Some(code);
        }
        Some(Ok(item))
    }
}

/// Iterator over the members of the object the cursor is positioned on.
///
/// Yields `(name, value)` pairs in document order, duplicates included;
/// last-wins de-duplication is a tree-materialization policy, not a
/// streaming one.
#[derive(Debug)]
pub struct ObjectIter<'a, C, T> {
    cursor: C,
    finished: bool,
    pending: Option<DecodeError>,
    _marker: PhantomData<(&'a (), fn() -> T)>,
}

impl<'a, C, T> ObjectIter<'a, C, T>
where
    C: StreamCursor<'a>,
    T: Decode<'a>,
{
    /// Fails with [`DecodeError::NotAnObject`] when the cursor is not on an
    /// object opener.
    pub fn new(mut cursor: C) -> Result<Self, DecodeError> {
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        if !matches!(cursor.current(), Event::BeginObject { .. }) {
            return Err(DecodeError::NotAnObject);
        }
        cursor.advance()?;
        Ok(Self { cursor, finished: false, pending: None, _marker: PhantomData })
    }

    pub fn into_cursor(self) -> C {
        self.cursor
    }

    fn step(&mut self) -> Result<Option<(String, T)>, DecodeError> {
        if self.cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        let name = match self.cursor.current() {
            Event::EndObject => return Ok(None),
            Event::Key(name) => name.clone().into_owned(),
            _ => return Err(DecodeError::TypeMismatch),
        };
        self.cursor.advance()?;
        if self.cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        let value = T::decode(&mut self.cursor)?;
        if let Err(code) = self.cursor.advance() {
            self.pending = Some(code);
        }
        Ok(Some((name, value)))
    }
}

impl<'a, C, T> Iterator for ObjectIter<'a, C, T>
where
    C: StreamCursor<'a>,
    T: Decode<'a>,
{
    type Item = Result<(String, T), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(code) = self.pending.take() {
            self.finished = true;
            return Some(Err(code));
        }
        match self.step() {
            Ok(Some(member)) => Some(Ok(member)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(code) => {
                self.finished = true;
                Some(Err(code))
            }
        }
    }
}
