//! JSON text reader.
//!
//! A re-entrant [`EventSource`] over an in-memory JSON document. Each
//! `parse` call consumes exactly one token-worth of input and delivers one
//! event, so a cursor over it pulls with no lookahead buffering. String
//! payloads borrow from the input; only strings containing escapes are
//! copied out.
//!
//! The quote/backslash scan uses `memchr2`, so long escape-free strings
//! cost one vectorized search rather than a byte loop.

use std::borrow::Cow;

use memchr::memchr2;

use crate::cursor::{Cursor, EventSource};
use crate::error::DecodeError;
use crate::event::SemanticTag;
use crate::span::{Location, Span};
use crate::visitor::{Flow, Visitor};

/// Convenience: a primed cursor over a JSON document.
pub fn json_cursor(input: &str) -> Cursor<'_, JsonSource<'_>> {
    Cursor::new(JsonSource::new(input))
}

/// Decode one complete `T` from a JSON document, consuming all of it.
pub fn from_str<'a, T: crate::de::Decode<'a>>(
    input: &'a str,
) -> Result<T, crate::error::DecodeFailure> {
    crate::de::decode_source(JsonSource::new(input))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting the root value.
    Start,
    /// Just after `{`: a key or the closing brace.
    FirstKey,
    /// Just after a key: a colon then the member value.
    MemberValue,
    /// Just after `[`: an element or the closing bracket.
    FirstElement,
    /// Just after a complete value inside a container: `,` or the close.
    AfterValue,
    /// Root value complete: only whitespace may remain.
    Trailing,
}

/// Streaming reader over a JSON document held in memory.
///
/// Reported columns are 1-based byte offsets within the line.
#[derive(Debug)]
pub struct JsonSource<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    stack: Vec<Frame>,
    state: State,
    done: bool,
    failed: bool,
}

impl<'a> JsonSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
            stack: Vec::new(),
            state: State::Start,
            done: false,
            failed: false,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    /// Consume `n` bytes known not to contain a newline.
    fn eat(&mut self, n: usize) {
        self.pos += n;
        self.column += n;
    }

    /// A visitor that answered [`Flow::Stop`] halts the reader: no further
    /// events are produced until `restart`.
    fn observe(&mut self, flow: Flow) {
        if flow.is_stop() {
            self.done = true;
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' => self.eat(1),
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.column = 1;
                }
                _ => break,
            }
        }
    }

    fn unexpected(&self) -> DecodeError {
        match self.text[self.pos..].chars().next() {
            Some(c) => DecodeError::UnexpectedCharacter(c),
            None => DecodeError::UnexpectedEof,
        }
    }

    /// Scan a string starting at the opening quote. Returns the decoded
    /// payload and the span of the whole literal, quotes included.
    fn scan_string(&mut self) -> Result<(Cow<'a, str>, Span), DecodeError> {
        let start = self.pos;
        self.eat(1); // opening quote
        let content_start = self.pos;
        let mut owned: Option<String> = None;
        let mut segment_start = self.pos;
        loop {
            let rest = &self.bytes()[self.pos..];
            let hit = memchr2(b'"', b'\\', rest).ok_or(DecodeError::UnclosedString)?;
            // Unescaped control characters are not valid string content.
            if let Some(ctl) = rest[..hit].iter().position(|&b| b < 0x20) {
                self.eat(ctl);
                return Err(self.unexpected());
            }
            self.eat(hit);
            if self.bytes()[self.pos] == b'"' {
                let payload = match owned {
                    Some(mut buf) => {
                        buf.push_str(&self.text[segment_start..self.pos]);
                        Cow::Owned(buf)
                    }
                    None => Cow::Borrowed(&self.text[content_start..self.pos]),
                };
                self.eat(1); // closing quote
                return Ok((payload, Span::new(start, self.pos)));
            }
            // Backslash: flush the borrowed segment and decode the escape.
            let buf = owned.get_or_insert_with(String::new);
            buf.push_str(&self.text[segment_start..self.pos]);
            self.eat(1);
            let escape = self.peek().ok_or(DecodeError::UnclosedString)?;
            self.eat(1);
            match escape {
                b'"' => buf.push('"'),
                b'\\' => buf.push('\\'),
                b'/' => buf.push('/'),
                b'b' => buf.push('\u{0008}'),
                b'f' => buf.push('\u{000c}'),
                b'n' => buf.push('\n'),
                b'r' => buf.push('\r'),
                b't' => buf.push('\t'),
                b'u' => buf.push(self.unicode_escape()?),
                _ => return Err(DecodeError::InvalidEscape),
            }
            segment_start = self.pos;
        }
    }

    /// Decode the hex digits of a `\u` escape, pairing surrogates.
    fn unicode_escape(&mut self) -> Result<char, DecodeError> {
        let high = self.hex4()?;
        let code = if (0xd800..0xdc00).contains(&high) {
            if self.bytes().get(self.pos..self.pos + 2) != Some(b"\\u") {
                return Err(DecodeError::InvalidEscape);
            }
            self.eat(2);
            let low = self.hex4()?;
            if !(0xdc00..0xe000).contains(&low) {
                return Err(DecodeError::InvalidEscape);
            }
            0x10000 + ((high - 0xd800) << 10) + (low - 0xdc00)
        } else {
            high
        };
        char::from_u32(code).ok_or(DecodeError::InvalidEscape)
    }

    fn hex4(&mut self) -> Result<u32, DecodeError> {
        let digits = self
            .bytes()
            .get(self.pos..self.pos + 4)
            .ok_or(DecodeError::InvalidEscape)?;
        let mut code = 0u32;
        for &d in digits {
            let nibble = match d {
                b'0'..=b'9' => u32::from(d - b'0'),
                b'a'..=b'f' => u32::from(d - b'a') + 10,
                b'A'..=b'F' => u32::from(d - b'A') + 10,
                _ => return Err(DecodeError::InvalidEscape),
            };
            code = code << 4 | nibble;
        }
        self.eat(4);
        Ok(code)
    }

    fn digits(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.eat(1);
            count += 1;
        }
        count
    }

    /// Scan a number and deliver it. Integers that fit stay integers;
    /// fractions, exponents and out-of-range magnitudes become doubles.
    fn scan_number(&mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), DecodeError> {
        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.eat(1);
        }
        let integral_start = self.pos;
        if self.digits() == 0 {
            return Err(DecodeError::InvalidNumber);
        }
        // "0" and "0.x" are fine, "01" is not.
        if self.bytes()[integral_start] == b'0' && self.pos - integral_start > 1 {
            return Err(DecodeError::InvalidNumber);
        }
        let mut integral = true;
        if self.peek() == Some(b'.') {
            integral = false;
            self.eat(1);
            if self.digits() == 0 {
                return Err(DecodeError::InvalidNumber);
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            integral = false;
            self.eat(1);
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.eat(1);
            }
            if self.digits() == 0 {
                return Err(DecodeError::InvalidNumber);
            }
        }
        let literal = &self.text[start..self.pos];
        let span = Span::new(start, self.pos);
        let tag = SemanticTag::None;
        if integral {
            if negative {
                if let Ok(value) = literal.parse::<i64>() {
                    let flow = visitor.int64_value(value, tag, span)?;
                    self.observe(flow);
                    return Ok(());
                }
            } else if let Ok(value) = literal.parse::<u64>() {
                let flow = visitor.uint64_value(value, tag, span)?;
                self.observe(flow);
                return Ok(());
            }
            // Magnitude exceeds 64 bits; fall through to double.
        }
        let value = literal.parse::<f64>().map_err(|_| DecodeError::InvalidNumber)?;
        let flow = visitor.double_value(value, tag, span)?;
        self.observe(flow);
        Ok(())
    }

    fn literal(&mut self, word: &str) -> Result<Span, DecodeError> {
        let start = self.pos;
        if !self.text[self.pos..].starts_with(word) {
            return Err(self.unexpected());
        }
        self.eat(word.len());
        Ok(Span::new(start, self.pos))
    }

    /// Record the state that follows a complete value.
    fn after_value(&mut self) {
        self.state = if self.stack.is_empty() {
            State::Trailing
        } else {
            State::AfterValue
        };
    }

    /// Parse one value token and deliver its event.
    fn value(&mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), DecodeError> {
        match self.peek().ok_or(DecodeError::UnexpectedEof)? {
            b'{' => {
                let span = Span::at(self.pos);
                self.eat(1);
                self.stack.push(Frame::Object);
                self.state = State::FirstKey;
                let flow = visitor.begin_object(None, SemanticTag::None, span)?;
                self.observe(flow);
                Ok(())
            }
            b'[' => {
                let span = Span::at(self.pos);
                self.eat(1);
                self.stack.push(Frame::Array);
                self.state = State::FirstElement;
                let flow = visitor.begin_array(None, SemanticTag::None, span)?;
                self.observe(flow);
                Ok(())
            }
            b'"' => {
                let (payload, span) = self.scan_string()?;
                self.after_value();
                let flow = visitor.string_value(payload, SemanticTag::None, span)?;
                self.observe(flow);
                Ok(())
            }
            b't' => {
                let span = self.literal("true")?;
                self.after_value();
                let flow = visitor.bool_value(true, SemanticTag::None, span)?;
                self.observe(flow);
                Ok(())
            }
            b'f' => {
                let span = self.literal("false")?;
                self.after_value();
                let flow = visitor.bool_value(false, SemanticTag::None, span)?;
                self.observe(flow);
                Ok(())
            }
            b'n' => {
                let span = self.literal("null")?;
                self.after_value();
                let flow = visitor.null_value(SemanticTag::None, span)?;
                self.observe(flow);
                Ok(())
            }
            b'-' | b'0'..=b'9' => {
                self.scan_number(visitor)?;
                self.after_value();
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parse a member key and deliver it.
    fn member_key(&mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), DecodeError> {
        if self.peek() != Some(b'"') {
            return Err(self.unexpected());
        }
        let (name, span) = self.scan_string()?;
        self.state = State::MemberValue;
        let flow = visitor.key(name, span)?;
        self.observe(flow);
        Ok(())
    }

    /// Close the innermost container and deliver its end event.
    fn close(&mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), DecodeError> {
        let span = Span::at(self.pos);
        self.eat(1);
        let frame = self.stack.pop();
        self.after_value();
        let flow = match frame {
            Some(Frame::Object) => visitor.end_object(span)?,
            Some(Frame::Array) => visitor.end_array(span)?,
            None => return Err(DecodeError::TrailingContent),
        };
        self.observe(flow);
        Ok(())
    }

    fn parse_inner(&mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), DecodeError> {
        self.skip_whitespace();
        match self.state {
            State::Start => self.value(visitor),
            State::FirstKey => match self.peek().ok_or(DecodeError::UnexpectedEof)? {
                b'}' => self.close(visitor),
                _ => self.member_key(visitor),
            },
            State::MemberValue => {
                if self.peek() != Some(b':') {
                    return Err(self.unexpected());
                }
                self.eat(1);
                self.skip_whitespace();
                self.value(visitor)
            }
            State::FirstElement => match self.peek().ok_or(DecodeError::UnexpectedEof)? {
                b']' => self.close(visitor),
                _ => self.value(visitor),
            },
            State::AfterValue => {
                let top = *self.stack.last().ok_or(DecodeError::UnexpectedEof)?;
                match (top, self.peek().ok_or(DecodeError::UnexpectedEof)?) {
                    (Frame::Object, b'}') | (Frame::Array, b']') => self.close(visitor),
                    (Frame::Object, b',') => {
                        self.eat(1);
                        self.skip_whitespace();
                        self.member_key(visitor)
                    }
                    (Frame::Array, b',') => {
                        self.eat(1);
                        self.skip_whitespace();
                        self.value(visitor)
                    }
                    _ => Err(self.unexpected()),
                }
            }
            State::Trailing => {
                if self.pos < self.text.len() {
                    return Err(DecodeError::TrailingContent);
                }
                // Exhausted cleanly: no event this call.
                self.done = true;
                visitor.flush();
                Ok(())
            }
        }
    }
}

impl<'a> EventSource<'a> for JsonSource<'a> {
    fn restart(&mut self) {
        *self = Self::new(self.text);
    }

    fn parse(&mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), DecodeError> {
        if self.done || self.failed {
            return Ok(());
        }
        let outcome = self.parse_inner(visitor);
        if outcome.is_err() {
            self.failed = true;
        }
        outcome
    }

    fn stopped(&self) -> bool {
        self.done || self.failed
    }

    fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::StreamCursor;
    use crate::event::Event;

    fn events(input: &str) -> Vec<Event<'_>> {
        let mut cursor = json_cursor(input);
        let mut collected = Vec::new();
        while !cursor.done() {
            collected.push(cursor.current().clone());
            cursor.advance().unwrap();
        }
        collected
    }

    #[test]
    fn object_with_array_member() {
        let got = events(r#"{"a":[1,2,3]}"#);
        let tag = SemanticTag::None;
        assert_eq!(
            got,
            vec![
                Event::BeginObject { length: None, tag },
                Event::Key(Cow::Borrowed("a")),
                Event::BeginArray { length: None, tag },
                Event::Uint64 { value: 1, tag },
                Event::Uint64 { value: 2, tag },
                Event::Uint64 { value: 3, tag },
                Event::EndArray,
                Event::EndObject,
            ]
        );
    }

    #[test]
    fn scalars_and_signs() {
        let got = events(r#"[true,false,null,-7,2.5,1e3,"s"]"#);
        let tag = SemanticTag::None;
        assert_eq!(
            got,
            vec![
                Event::BeginArray { length: None, tag },
                Event::Bool { value: true, tag },
                Event::Bool { value: false, tag },
                Event::Null { tag },
                Event::Int64 { value: -7, tag },
                Event::Double { value: 2.5, tag },
                Event::Double { value: 1000.0, tag },
                Event::String { value: Cow::Borrowed("s"), tag },
                Event::EndArray,
            ]
        );
    }

    #[test]
    fn escape_free_strings_borrow() {
        let input = r#""plain""#;
        let mut cursor = json_cursor(input);
        match cursor.current() {
            Event::String { value: Cow::Borrowed(s), .. } => assert_eq!(*s, "plain"),
            other => panic!("expected borrowed string, got {other:?}"),
        }
        assert_eq!(cursor.span(), Span::new(0, input.len()));
    }

    #[test]
    fn escapes_copy_out() {
        let mut cursor = json_cursor(r#""a\nbé😀""#);
        match cursor.current() {
            Event::String { value, .. } => {
                assert!(matches!(value, Cow::Owned(_)));
                assert_eq!(value.as_ref(), "a\nb\u{e9}\u{1f600}");
            }
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn oversized_integer_becomes_double() {
        let got = events("18446744073709551616");
        assert_eq!(
            got,
            vec![Event::Double { value: 18446744073709551616.0, tag: SemanticTag::None }]
        );
    }

    #[test]
    fn truncated_document_reports_eof() {
        let mut cursor = json_cursor(r#"{"a":"#);
        // BeginObject, Key("a") parse fine.
        assert_eq!(cursor.current().kind(), crate::event::EventKind::BeginObject);
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), &Event::Key(Cow::Borrowed("a")));
        assert_eq!(cursor.advance(), Err(DecodeError::UnexpectedEof));
        assert!(cursor.done());
        assert_eq!(cursor.error(), Some(DecodeError::UnexpectedEof));
        // Last good event is retained.
        assert_eq!(cursor.current(), &Event::Key(Cow::Borrowed("a")));
    }

    #[test]
    fn trailing_content_is_an_error() {
        let mut cursor = json_cursor("1 2");
        assert_eq!(cursor.current(), &Event::Uint64 { value: 1, tag: SemanticTag::None });
        assert_eq!(cursor.advance(), Err(DecodeError::TrailingContent));
    }

    #[test]
    fn location_tracks_lines() {
        let mut cursor = json_cursor("[\n  1,\n  bad\n]");
        cursor.advance().unwrap(); // onto 1
        let result = cursor.advance();
        assert_eq!(result, Err(DecodeError::UnexpectedCharacter('b')));
        let loc = cursor.context();
        assert_eq!(loc.line, 3);
        assert_eq!(loc.column, 3);
    }

    #[test]
    fn comma_separated_members() {
        let got = events(r#"{ "a" : 1 , "b" : 2 }"#);
        let tag = SemanticTag::None;
        assert_eq!(
            got,
            vec![
                Event::BeginObject { length: None, tag },
                Event::Key(Cow::Borrowed("a")),
                Event::Uint64 { value: 1, tag },
                Event::Key(Cow::Borrowed("b")),
                Event::Uint64 { value: 2, tag },
                Event::EndObject,
            ]
        );
    }

    #[test]
    fn leading_zeros_rejected() {
        let cursor = json_cursor("01");
        assert_eq!(cursor.error(), Some(DecodeError::InvalidNumber));
        let cursor = json_cursor("-07");
        assert_eq!(cursor.error(), Some(DecodeError::InvalidNumber));
        // Lone and fractional zeros are fine.
        let tag = SemanticTag::None;
        assert_eq!(events("0"), vec![Event::Uint64 { value: 0, tag }]);
        assert_eq!(events("0.5"), vec![Event::Double { value: 0.5, tag }]);
        assert_eq!(events("-0"), vec![Event::Int64 { value: 0, tag }]);
    }

    #[test]
    fn raw_control_characters_rejected() {
        let cursor = json_cursor("\"a\u{0007}b\"");
        assert_eq!(
            cursor.error(),
            Some(DecodeError::UnexpectedCharacter('\u{0007}'))
        );
        let cursor = json_cursor("\"line\nbreak\"");
        assert_eq!(cursor.error(), Some(DecodeError::UnexpectedCharacter('\n')));
        // The escaped forms still work.
        let tag = SemanticTag::None;
        assert_eq!(
            events(r#""a\u0007b""#),
            vec![Event::String { value: Cow::Owned("a\u{0007}b".to_string()), tag }]
        );
    }

    #[test]
    fn restart_rewinds() {
        let mut cursor = json_cursor("[1]");
        while !cursor.done() {
            cursor.advance().unwrap();
        }
        cursor.restart();
        assert!(!cursor.done());
        assert_eq!(
            cursor.current(),
            &Event::BeginArray { length: None, tag: SemanticTag::None }
        );
    }
}
