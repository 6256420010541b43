//! Parse events - the unit of exchange between readers and consumers.
//!
//! This is a StAX-style event model: a reader produces one event per parse
//! notification, with structure represented by begin/end pairs. Events are
//! format-agnostic - a text reader and a binary reader for the same document
//! drive the same sequence.
//!
//! An object `{"a":[1,2,3]}` is the sequence:
//! ```text
//! BeginObject
//! Key("a")
//! BeginArray
//! Int64(1) Int64(2) Int64(3)
//! EndArray
//! EndObject
//! ```
//!
//! String and byte-string payloads borrow from the source buffer (`Cow` -
//! owned only where a text reader had to unescape) and are valid until the
//! next advance of the owning cursor; retain beyond that by copying.

use std::borrow::Cow;

/// Interpretation hint refining a scalar beyond its raw kind.
///
/// Tags never change the event kind; a consumer that ignores them still
/// sees a well-formed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SemanticTag {
    #[default]
    None,
    /// Arbitrary-precision integer carried as a string or byte string.
    BigInt,
    /// Arbitrary-precision decimal carried as a string.
    BigDecimal,
    /// RFC 3339 date-time string.
    DateTime,
    /// Numeric seconds since the epoch.
    EpochSeconds,
    /// Byte string whose text form is base16.
    Base16,
    /// Byte string whose text form is base64.
    Base64,
    /// Byte string whose text form is base64url.
    Base64Url,
    /// URI string.
    Uri,
    /// Typed-array values are clamped rather than wrapped.
    Clamped,
    /// String is an identifier rather than free text.
    Identifier,
}

/// Discriminant of an [`Event`], for filtering and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Key,
    String,
    ByteString,
    Null,
    Bool,
    Int64,
    Uint64,
    Half,
    Double,
}

impl EventKind {
    /// Opens a container (has a matching end event).
    #[inline]
    pub fn is_begin_container(self) -> bool {
        matches!(self, Self::BeginObject | Self::BeginArray)
    }

    /// Closes a container.
    #[inline]
    pub fn is_end_container(self) -> bool {
        matches!(self, Self::EndObject | Self::EndArray)
    }
}

/// One parse notification.
///
/// The lifetime `'a` refers to the source buffer. `length` on the begin
/// events is the declared element count when the wire format carries one
/// (binary formats usually do, text usually does not).
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    BeginObject {
        length: Option<usize>,
        tag: SemanticTag,
    },
    EndObject,
    BeginArray {
        length: Option<usize>,
        tag: SemanticTag,
    },
    EndArray,
    /// Object member name. Occurs only directly inside an object.
    Key(Cow<'a, str>),
    String {
        value: Cow<'a, str>,
        tag: SemanticTag,
    },
    ByteString {
        value: Cow<'a, [u8]>,
        tag: SemanticTag,
        /// Format-specific extension tag (e.g. a binary type marker).
        ext_tag: Option<u64>,
    },
    Null {
        tag: SemanticTag,
    },
    Bool {
        value: bool,
        tag: SemanticTag,
    },
    Int64 {
        value: i64,
        tag: SemanticTag,
    },
    Uint64 {
        value: u64,
        tag: SemanticTag,
    },
    /// IEEE 754 half-precision value, carried as its bit pattern.
    Half {
        value: u16,
        tag: SemanticTag,
    },
    Double {
        value: f64,
        tag: SemanticTag,
    },
}

impl<'a> Event<'a> {
    /// Get the kind discriminant for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BeginObject { .. } => EventKind::BeginObject,
            Event::EndObject => EventKind::EndObject,
            Event::BeginArray { .. } => EventKind::BeginArray,
            Event::EndArray => EventKind::EndArray,
            Event::Key(_) => EventKind::Key,
            Event::String { .. } => EventKind::String,
            Event::ByteString { .. } => EventKind::ByteString,
            Event::Null { .. } => EventKind::Null,
            Event::Bool { .. } => EventKind::Bool,
            Event::Int64 { .. } => EventKind::Int64,
            Event::Uint64 { .. } => EventKind::Uint64,
            Event::Half { .. } => EventKind::Half,
            Event::Double { .. } => EventKind::Double,
        }
    }

    /// Get the semantic tag, if the event kind carries one.
    pub fn tag(&self) -> SemanticTag {
        match self {
            Event::BeginObject { tag, .. }
            | Event::BeginArray { tag, .. }
            | Event::String { tag, .. }
            | Event::ByteString { tag, .. }
            | Event::Null { tag }
            | Event::Bool { tag, .. }
            | Event::Int64 { tag, .. }
            | Event::Uint64 { tag, .. }
            | Event::Half { tag, .. }
            | Event::Double { tag, .. } => *tag,
            Event::EndObject | Event::EndArray | Event::Key(_) => SemanticTag::None,
        }
    }

    /// Declared length for begin events, when the format carries one.
    pub fn declared_length(&self) -> Option<usize> {
        match self {
            Event::BeginObject { length, .. } | Event::BeginArray { length, .. } => *length,
            _ => None,
        }
    }

    /// True for scalar value events (everything except structure and keys).
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Event::BeginObject { .. }
                | Event::EndObject
                | Event::BeginArray { .. }
                | Event::EndArray
                | Event::Key(_)
        )
    }

    /// Copy the event, converting any borrowed payloads to owned.
    ///
    /// The escape hatch for retaining an event past the next advance.
    pub fn into_owned(self) -> Event<'static> {
        match self {
            Event::BeginObject { length, tag } => Event::BeginObject { length, tag },
            Event::EndObject => Event::EndObject,
            Event::BeginArray { length, tag } => Event::BeginArray { length, tag },
            Event::EndArray => Event::EndArray,
            Event::Key(name) => Event::Key(Cow::Owned(name.into_owned())),
            Event::String { value, tag } => Event::String {
                value: Cow::Owned(value.into_owned()),
                tag,
            },
            Event::ByteString { value, tag, ext_tag } => Event::ByteString {
                value: Cow::Owned(value.into_owned()),
                tag,
                ext_tag,
            },
            Event::Null { tag } => Event::Null { tag },
            Event::Bool { value, tag } => Event::Bool { value, tag },
            Event::Int64 { value, tag } => Event::Int64 { value, tag },
            Event::Uint64 { value, tag } => Event::Uint64 { value, tag },
            Event::Half { value, tag } => Event::Half { value, tag },
            Event::Double { value, tag } => Event::Double { value, tag },
        }
    }
}

/// Widen an IEEE 754 binary16 bit pattern to f64.
///
/// Subnormals, infinities and NaN all map to their f64 counterparts.
pub fn half_to_f64(bits: u16) -> f64 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = (bits >> 10) & 0x1f;
    let fraction = (bits & 0x03ff) as f64;
    match exponent {
        0 => sign * fraction * (-24f64).exp2(),
        0x1f => {
            if fraction == 0.0 {
                sign * f64::INFINITY
            } else {
                f64::NAN
            }
        }
        e => sign * (1.0 + fraction / 1024.0) * f64::from(e as i32 - 15).exp2(),
    }
}
