//! Riffle Core
//!
//! Streaming, pull-based event model for structured documents. A format
//! reader pushes one event per parse step into a visitor; a cursor turns
//! that into pull access with `current()`/`advance()`, filters, typed
//! iterators and on-demand tree materialization.
//!
//! # Architecture
//!
//! - **event.rs** - Event enum, semantic tags, half-float widening
//! - **visitor.rs** - Push-side consumer protocol with aggregate defaults
//! - **expand.rs** - Resumable typed-array / multi-dim expansion
//! - **cursor.rs** - EventSource contract, StreamCursor trait, Cursor
//! - **filter.rs** - Predicate-skipping cursor decorator
//! - **tree.rs / value.rs** - Materialization into a pluggable tree type
//! - **de.rs** - Typed extraction (Decode) and the one-shot entry point
//! - **iter.rs** - ArrayIter/ObjectIter over a container's children
//! - **text.rs** - Re-entrant JSON reader, one event per parse call
//! - **replay.rs** - Scripted event source for tests and round trips

pub mod cursor;
pub mod de;
pub mod error;
pub mod event;
pub mod expand;
pub mod filter;
pub mod iter;
pub mod replay;
pub mod span;
pub mod text;
pub mod tree;
pub mod value;
pub mod visitor;

pub use cursor::{Cursor, EventSource, StreamCursor};
pub use de::{decode_source, Decode};
pub use error::{DecodeError, DecodeFailure};
pub use event::{half_to_f64, Event, EventKind, SemanticTag};
pub use expand::{Expander, ExpansionState, TypedArrayView};
pub use filter::FilteredCursor;
pub use iter::{ArrayIter, ObjectIter};
pub use replay::{value_events, ReplayItem, ReplaySource};
pub use span::{Location, Span};
pub use text::{from_str as decode_json, json_cursor, JsonSource};
pub use tree::{materialize, TreeValue};
pub use value::{Value, ValueKind};
pub use visitor::{send_event, Flow, VisitResult, Visitor};
