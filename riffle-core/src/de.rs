//! Typed extraction from a cursor.
//!
//! [`Decode`] pulls one value of a concrete Rust type off a cursor
//! positioned at the value's first event, leaving the cursor on the
//! value's final event. Conversions are strict where information could be
//! lost ([`DecodeError::IntegerOverflow`]) and lenient where it cannot
//! (integers widen to `f64`).

use crate::cursor::{Cursor, EventSource, StreamCursor};
use crate::error::{DecodeError, DecodeFailure};
use crate::event::{half_to_f64, Event};
use crate::tree::materialize;
use crate::value::Value;

/// A type that can be pulled off an event stream.
pub trait Decode<'a>: Sized {
    fn decode<C: StreamCursor<'a>>(cursor: &mut C) -> Result<Self, DecodeError>;
}

impl<'a> Decode<'a> for Value {
    fn decode<C: StreamCursor<'a>>(cursor: &mut C) -> Result<Self, DecodeError> {
        materialize(cursor)
    }
}

impl<'a> Decode<'a> for bool {
    fn decode<C: StreamCursor<'a>>(cursor: &mut C) -> Result<Self, DecodeError> {
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        match cursor.current() {
            Event::Bool { value, .. } => Ok(*value),
            _ => Err(DecodeError::TypeMismatch),
        }
    }
}

impl<'a> Decode<'a> for i64 {
    fn decode<C: StreamCursor<'a>>(cursor: &mut C) -> Result<Self, DecodeError> {
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        match cursor.current() {
            Event::Int64 { value, .. } => Ok(*value),
            Event::Uint64 { value, .. } => {
                i64::try_from(*value).map_err(|_| DecodeError::IntegerOverflow)
            }
            _ => Err(DecodeError::TypeMismatch),
        }
    }
}

impl<'a> Decode<'a> for u64 {
    fn decode<C: StreamCursor<'a>>(cursor: &mut C) -> Result<Self, DecodeError> {
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        match cursor.current() {
            Event::Uint64 { value, .. } => Ok(*value),
            Event::Int64 { value, .. } => {
                u64::try_from(*value).map_err(|_| DecodeError::IntegerOverflow)
            }
            _ => Err(DecodeError::TypeMismatch),
        }
    }
}

impl<'a> Decode<'a> for f64 {
    fn decode<C: StreamCursor<'a>>(cursor: &mut C) -> Result<Self, DecodeError> {
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        match cursor.current() {
            Event::Double { value, .. } => Ok(*value),
            Event::Int64 { value, .. } => Ok(*value as f64),
            Event::Uint64 { value, .. } => Ok(*value as f64),
            Event::Half { value, .. } => Ok(half_to_f64(*value)),
            _ => Err(DecodeError::TypeMismatch),
        }
    }
}

impl<'a> Decode<'a> for String {
    fn decode<C: StreamCursor<'a>>(cursor: &mut C) -> Result<Self, DecodeError> {
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        match cursor.current() {
            Event::String { value, .. } => Ok(value.clone().into_owned()),
            _ => Err(DecodeError::TypeMismatch),
        }
    }
}

impl<'a, T: Decode<'a>> Decode<'a> for Option<T> {
    fn decode<C: StreamCursor<'a>>(cursor: &mut C) -> Result<Self, DecodeError> {
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        match cursor.current() {
            Event::Null { .. } => Ok(None),
            _ => T::decode(cursor).map(Some),
        }
    }
}

impl<'a, T: Decode<'a>> Decode<'a> for Vec<T> {
    fn decode<C: StreamCursor<'a>>(cursor: &mut C) -> Result<Self, DecodeError> {
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        if !matches!(cursor.current(), Event::BeginArray { .. }) {
            return Err(DecodeError::NotAnArray);
        }
        let mut items = match cursor.current().declared_length() {
            Some(n) => Vec::with_capacity(n),
            None => Vec::new(),
        };
        loop {
            cursor.advance()?;
            if cursor.done() {
                return Err(DecodeError::UnexpectedEof);
            }
            if matches!(cursor.current(), Event::EndArray) {
                return Ok(items);
            }
            items.push(T::decode(cursor)?);
        }
    }
}

/// Decode one complete `T` from a source, consuming the whole stream.
///
/// The returned error carries the source position where decoding stopped.
pub fn decode_source<'a, R, T>(source: R) -> Result<T, DecodeFailure>
where
    R: EventSource<'a>,
    T: Decode<'a>,
{
    let mut cursor = Cursor::new(source);
    if let Some(code) = cursor.error() {
        return Err(DecodeFailure::new(code, cursor.context()));
    }
    if cursor.done() {
        return Err(DecodeFailure::new(DecodeError::UnexpectedEof, cursor.context()));
    }
    let value = match T::decode(&mut cursor) {
        Ok(value) => value,
        Err(code) => return Err(DecodeFailure::new(code, cursor.context())),
    };
    // Drain the tail so trailing garbage surfaces as an error.
    while !cursor.done() {
        if let Err(code) = cursor.advance() {
            return Err(DecodeFailure::new(code, cursor.context()));
        }
    }
    Ok(value)
}
