//! Aggregate expansion as seen through a cursor.

use pretty_assertions::assert_eq;
use riffle_core::{
    Cursor, Event, Flow, ReplayItem, ReplaySource, SemanticTag, Span, StreamCursor,
    TypedArrayView, VisitResult, Visitor,
};

fn collect<'a>(mut cursor: Cursor<'a, ReplaySource<'a>>) -> Vec<Event<'static>> {
    let mut events = Vec::new();
    while !cursor.done() {
        events.push(cursor.current().clone().into_owned());
        cursor.advance().expect("scripted input");
    }
    events
}

#[test]
fn typed_doubles_expand_to_scalar_events() {
    let data = [1.5f64, 2.5];
    let source = ReplaySource::new(vec![ReplayItem::TypedArray(
        TypedArrayView::Double(&data),
        SemanticTag::None,
    )]);
    let tag = SemanticTag::None;
    assert_eq!(
        collect(Cursor::new(source)),
        vec![
            Event::BeginArray { length: Some(2), tag },
            Event::Double { value: 1.5, tag },
            Event::Double { value: 2.5, tag },
            Event::EndArray,
        ]
    );
}

#[test]
fn typed_floats_widen_to_double() {
    let data = [0.5f32, 1.25];
    let source = ReplaySource::new(vec![ReplayItem::TypedArray(
        TypedArrayView::Float(&data),
        SemanticTag::None,
    )]);
    let tag = SemanticTag::None;
    assert_eq!(
        collect(Cursor::new(source)),
        vec![
            Event::BeginArray { length: Some(2), tag },
            Event::Double { value: 0.5, tag },
            Event::Double { value: 1.25, tag },
            Event::EndArray,
        ]
    );
}

#[test]
fn typed_array_inside_object() {
    let data = [7u32, 8];
    let tag = SemanticTag::None;
    let source = ReplaySource::new(vec![
        ReplayItem::Event(Event::BeginObject { length: Some(1), tag }),
        ReplayItem::Event(Event::Key("xs".into())),
        ReplayItem::TypedArray(TypedArrayView::Uint32(&data), tag),
        ReplayItem::Event(Event::EndObject),
    ]);
    assert_eq!(
        collect(Cursor::new(source)),
        vec![
            Event::BeginObject { length: Some(1), tag },
            Event::Key("xs".into()),
            Event::BeginArray { length: Some(2), tag },
            Event::Uint64 { value: 7, tag },
            Event::Uint64 { value: 8, tag },
            Event::EndArray,
            Event::EndObject,
        ]
    );
}

#[test]
fn multi_dim_replays_shape_then_data() {
    let shape = [2usize, 2];
    let data = [1i32, 2, 3, 4];
    let tag = SemanticTag::None;
    let source = ReplaySource::new(vec![
        ReplayItem::BeginMultiDim(&shape, tag),
        ReplayItem::TypedArray(TypedArrayView::Int32(&data), tag),
        ReplayItem::EndMultiDim,
    ]);
    assert_eq!(
        collect(Cursor::new(source)),
        vec![
            Event::BeginArray { length: Some(2), tag },
            Event::BeginArray { length: Some(2), tag },
            Event::Uint64 { value: 2, tag },
            Event::Uint64 { value: 2, tag },
            Event::EndArray,
            Event::BeginArray { length: Some(4), tag },
            Event::Int64 { value: 1, tag },
            Event::Int64 { value: 2, tag },
            Event::Int64 { value: 3, tag },
            Event::Int64 { value: 4, tag },
            Event::EndArray,
            Event::EndArray,
        ]
    );
}

/// Visitor that takes typed arrays wholesale instead of expanded.
#[derive(Default)]
struct BulkSink {
    buffers: Vec<Vec<f64>>,
    scalar_events: usize,
}

impl<'a> Visitor<'a> for BulkSink {
    fn begin_object(&mut self, _: Option<usize>, _: SemanticTag, _: Span) -> VisitResult {
        Ok(Flow::Continue)
    }
    fn end_object(&mut self, _: Span) -> VisitResult {
        Ok(Flow::Continue)
    }
    fn begin_array(&mut self, _: Option<usize>, _: SemanticTag, _: Span) -> VisitResult {
        Ok(Flow::Continue)
    }
    fn end_array(&mut self, _: Span) -> VisitResult {
        Ok(Flow::Continue)
    }
    fn key(&mut self, _: std::borrow::Cow<'a, str>, _: Span) -> VisitResult {
        Ok(Flow::Continue)
    }
    fn null_value(&mut self, _: SemanticTag, _: Span) -> VisitResult {
        Ok(Flow::Continue)
    }
    fn bool_value(&mut self, _: bool, _: SemanticTag, _: Span) -> VisitResult {
        Ok(Flow::Continue)
    }
    fn string_value(&mut self, _: std::borrow::Cow<'a, str>, _: SemanticTag, _: Span) -> VisitResult {
        Ok(Flow::Continue)
    }
    fn byte_string_value(
        &mut self,
        _: std::borrow::Cow<'a, [u8]>,
        _: SemanticTag,
        _: Option<u64>,
        _: Span,
    ) -> VisitResult {
        Ok(Flow::Continue)
    }
    fn int64_value(&mut self, _: i64, _: SemanticTag, _: Span) -> VisitResult {
        self.scalar_events += 1;
        Ok(Flow::Continue)
    }
    fn uint64_value(&mut self, _: u64, _: SemanticTag, _: Span) -> VisitResult {
        self.scalar_events += 1;
        Ok(Flow::Continue)
    }
    fn half_value(&mut self, _: u16, _: SemanticTag, _: Span) -> VisitResult {
        self.scalar_events += 1;
        Ok(Flow::Continue)
    }
    fn double_value(&mut self, _: f64, _: SemanticTag, _: Span) -> VisitResult {
        self.scalar_events += 1;
        Ok(Flow::Continue)
    }
    fn typed_array(&mut self, view: TypedArrayView<'a>, _: SemanticTag, _: Span) -> VisitResult {
        if let TypedArrayView::Double(data) = view {
            self.buffers.push(data.to_vec());
        }
        Ok(Flow::Continue)
    }
}

#[test]
fn read_to_offers_whole_buffer_before_expansion() {
    let data = [1.0f64, 2.0, 3.0];
    let source = ReplaySource::new(vec![ReplayItem::TypedArray(
        TypedArrayView::Double(&data),
        SemanticTag::None,
    )]);
    let mut cursor = Cursor::new(source);
    // Cursor sits on the array opener; the buffer is untouched.
    let mut sink = BulkSink::default();
    cursor.read_to(&mut sink).expect("bulk path");
    assert_eq!(sink.buffers, vec![vec![1.0, 2.0, 3.0]]);
    assert_eq!(sink.scalar_events, 0);
}

#[test]
fn read_to_mid_expansion_stays_well_nested() {
    let data = [1.0f64, 2.0, 3.0];
    let source = ReplaySource::new(vec![ReplayItem::TypedArray(
        TypedArrayView::Double(&data),
        SemanticTag::None,
    )]);
    let mut cursor = Cursor::new(source);
    cursor.advance().expect("first element");
    // One element already surfaced as a scalar; the bulk path is gone.
    let mut sink = BulkSink::default();
    cursor.read_to(&mut sink).expect("scalar completion");
    assert!(sink.buffers.is_empty());
    // Current element plus the two remaining, all as scalars.
    assert_eq!(sink.scalar_events, 3);
}
