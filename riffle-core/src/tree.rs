//! Event-to-tree materialization.
//!
//! [`materialize`] assembles one complete value from a cursor positioned on
//! the value's first event, using an explicit frame stack rather than
//! recursion so arbitrarily deep input cannot overflow the call stack. On
//! return the cursor still sits on the value's final event; the caller
//! advances past it (or stops there).
//!
//! The tree type is pluggable through [`TreeValue`], so the same walk can
//! target the crate's [`Value`](crate::value::Value) or a caller's own
//! document type.

use crate::cursor::StreamCursor;
use crate::error::DecodeError;
use crate::event::{Event, EventKind};
use crate::value::ValueKind;

/// A tree type the materializer can assemble.
pub trait TreeValue: Sized {
    fn new_object() -> Self;

    fn new_array() -> Self;

    fn kind(&self) -> ValueKind;

    /// Attach a member. Duplicate keys overwrite, last wins.
    fn insert(&mut self, key: &str, child: Self);

    /// Append an array element.
    fn push(&mut self, child: Self);

    /// Build a leaf from a scalar event.
    fn from_scalar(event: &Event<'_>) -> Result<Self, DecodeError>;
}

struct Frame<T> {
    value: T,
    pending_key: Option<String>,
}

/// Assemble one complete value from `cursor`.
///
/// The cursor must be positioned on the first event of the value. Scalars
/// return in one shot without advancing; containers consume events through
/// the matching close. A stream that ends mid-container yields
/// [`DecodeError::UnexpectedEof`].
pub fn materialize<'a, C, T>(cursor: &mut C) -> Result<T, DecodeError>
where
    C: StreamCursor<'a>,
    T: TreeValue,
{
    if cursor.done() {
        return Err(DecodeError::UnexpectedEof);
    }

    // One-shot scalar path.
    let opener = match cursor.current().kind() {
        EventKind::BeginObject => T::new_object(),
        EventKind::BeginArray => T::new_array(),
        EventKind::EndObject | EventKind::EndArray | EventKind::Key => {
            return Err(DecodeError::ConversionFailed);
        }
        _ => return T::from_scalar(cursor.current()),
    };

    let mut stack: Vec<Frame<T>> = vec![Frame { value: opener, pending_key: None }];

    loop {
        cursor.advance()?;
        if cursor.done() {
            return Err(DecodeError::UnexpectedEof);
        }
        let completed = match cursor.current() {
            Event::Key(name) => {
                let top = stack.last_mut().ok_or(DecodeError::ConversionFailed)?;
                if top.value.kind() != ValueKind::Object {
                    return Err(DecodeError::ConversionFailed);
                }
                top.pending_key = Some(name.clone().into_owned());
                continue;
            }
            Event::BeginObject { .. } => {
                stack.push(Frame { value: T::new_object(), pending_key: None });
                continue;
            }
            Event::BeginArray { .. } => {
                stack.push(Frame { value: T::new_array(), pending_key: None });
                continue;
            }
            Event::EndObject => {
                let frame = stack.pop().ok_or(DecodeError::ConversionFailed)?;
                if frame.value.kind() != ValueKind::Object {
                    return Err(DecodeError::ConversionFailed);
                }
                frame.value
            }
            Event::EndArray => {
                let frame = stack.pop().ok_or(DecodeError::ConversionFailed)?;
                if frame.value.kind() != ValueKind::Array {
                    return Err(DecodeError::ConversionFailed);
                }
                frame.value
            }
            scalar => T::from_scalar(scalar)?,
        };

        match stack.last_mut() {
            Some(parent) => {
                if parent.value.kind() == ValueKind::Object {
                    let key = parent
                        .pending_key
                        .take()
                        .ok_or(DecodeError::ConversionFailed)?;
                    parent.value.insert(&key, completed);
                } else {
                    parent.value.push(completed);
                }
            }
            None => return Ok(completed),
        }
    }
}
