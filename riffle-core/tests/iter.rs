//! Typed container iteration.

use pretty_assertions::assert_eq;
use riffle_core::{json_cursor, ArrayIter, DecodeError, ObjectIter, StreamCursor, Value};

#[test]
fn array_of_integers() {
    let cursor = json_cursor("[1,2,3]");
    let items: Result<Vec<i64>, _> = ArrayIter::new(cursor).expect("array opener").collect();
    assert_eq!(items, Ok(vec![1, 2, 3]));
}

#[test]
fn empty_array() {
    let cursor = json_cursor("[]");
    let mut iter: ArrayIter<'_, _, i64> = ArrayIter::new(cursor).expect("array opener");
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn elements_may_be_whole_trees() {
    let cursor = json_cursor(r#"[{"n":1},{"n":2}]"#);
    let items: Vec<Value> = ArrayIter::new(cursor)
        .expect("array opener")
        .collect::<Result<_, _>>()
        .expect("well-formed elements");
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].get("n"), Some(&Value::Uint(2)));
}

#[test]
fn not_an_array() {
    let cursor = json_cursor(r#"{"a":1}"#);
    let result = ArrayIter::<_, i64>::new(cursor);
    assert!(matches!(result, Err(DecodeError::NotAnArray)));
}

#[test]
fn iteration_fuses_after_an_error() {
    let cursor = json_cursor(r#"[1,"two",3]"#);
    let mut iter: ArrayIter<'_, _, i64> = ArrayIter::new(cursor).expect("array opener");
    assert_eq!(iter.next(), Some(Ok(1)));
    assert_eq!(iter.next(), Some(Err(DecodeError::TypeMismatch)));
    assert!(iter.next().is_none());
}

#[test]
fn truncated_array_yields_eof() {
    let cursor = json_cursor("[1,");
    let mut iter: ArrayIter<'_, _, i64> = ArrayIter::new(cursor).expect("array opener");
    assert_eq!(iter.next(), Some(Ok(1)));
    assert_eq!(iter.next(), Some(Err(DecodeError::UnexpectedEof)));
    assert!(iter.next().is_none());
}

#[test]
fn cursor_comes_back_on_the_end_event() {
    let cursor = json_cursor("[1,2]");
    let mut iter: ArrayIter<'_, _, u64> = ArrayIter::new(cursor).expect("array opener");
    while iter.next().is_some() {}
    let cursor = iter.into_cursor();
    assert_eq!(cursor.current().kind(), riffle_core::EventKind::EndArray);
}

#[test]
fn iterator_matches_manual_drain() {
    let doc = "[10,20,30]";

    let iterated: Vec<u64> = ArrayIter::new(json_cursor(doc))
        .expect("array opener")
        .collect::<Result<_, _>>()
        .expect("well-formed elements");

    let mut manual = Vec::new();
    let mut cursor = json_cursor(doc);
    cursor.advance().expect("past opener");
    while !cursor.done() {
        match cursor.current() {
            riffle_core::Event::Uint64 { value, .. } => manual.push(*value),
            riffle_core::Event::EndArray => break,
            other => panic!("unexpected event {other:?}"),
        }
        cursor.advance().expect("well-formed input");
    }

    assert_eq!(iterated, manual);
}

#[test]
fn object_members_in_document_order() {
    let cursor = json_cursor(r#"{"a":1,"b":2}"#);
    let members: Vec<(String, u64)> = ObjectIter::new(cursor)
        .expect("object opener")
        .collect::<Result<_, _>>()
        .expect("well-formed members");
    assert_eq!(members, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
}

#[test]
fn object_iteration_keeps_duplicates() {
    let cursor = json_cursor(r#"{"k":1,"k":2}"#);
    let members: Vec<(String, u64)> = ObjectIter::new(cursor)
        .expect("object opener")
        .collect::<Result<_, _>>()
        .expect("well-formed members");
    assert_eq!(members.len(), 2);
}

#[test]
fn not_an_object() {
    let cursor = json_cursor("[1]");
    let result = ObjectIter::<_, u64>::new(cursor);
    assert!(matches!(result, Err(DecodeError::NotAnObject)));
}

#[test]
fn nested_iteration() {
    // An outer object whose members are arrays, iterated level by level.
    let mut cursor = json_cursor(r#"{"xs":[1,2],"ys":[3]}"#);
    let mut totals = Vec::new();
    let members: ObjectIter<'_, _, Value> =
        ObjectIter::new(&mut cursor).expect("object opener");
    for member in members {
        let (name, value) = member.expect("well-formed member");
        let sum: u64 = value
            .as_array()
            .expect("array member")
            .iter()
            .filter_map(Value::as_u64)
            .sum();
        totals.push((name, sum));
    }
    assert_eq!(totals, vec![("xs".to_string(), 3), ("ys".to_string(), 3)]);
}
