use memchr::memchr;

use crate::arena::{Arena, BlockList};
use crate::constants::{starts_number, FALSE_LITERAL, NULL_LITERAL, TRUE_LITERAL};
use crate::error::SyntaxKind;
use crate::types::Value;
use crate::{ParseOptions, Result};

use super::cursor::Cursor;

type Step<'a> = Result<(Value, Cursor<'a>)>;

/// Recursive-descent parser. Each rule takes the cursor by value and returns
/// the value it produced along with the cursor just past the consumed bytes.
pub(crate) struct Parser<'o, 'r> {
    arena: &'r mut Arena,
    options: &'o ParseOptions,
}

impl<'o, 'r> Parser<'o, 'r> {
    pub(crate) fn new(arena: &'r mut Arena, options: &'o ParseOptions) -> Self {
        Self { arena, options }
    }

    pub(crate) fn parse_value<'a>(&mut self, cursor: Cursor<'a>, depth: usize) -> Step<'a> {
        let cursor = self.skip(cursor);
        let Some(byte) = cursor.peek() else {
            return Err(cursor.error_at_end());
        };
        match byte {
            b't' | b'f' => self.parse_bool(cursor),
            b'n' => self.parse_null(cursor),
            b'+' if !self.options.allow_plus_sign => Err(cursor.error(SyntaxKind::UnexpectedByte)),
            byte if starts_number(byte) => self.parse_number(cursor),
            b'"' => self.parse_string(cursor),
            b'[' => self.parse_array(cursor, depth),
            b'{' => self.parse_object(cursor, depth),
            _ => Err(cursor.error(SyntaxKind::UnexpectedByte)),
        }
    }

    pub(crate) fn skip<'a>(&self, cursor: Cursor<'a>) -> Cursor<'a> {
        cursor.skip_whitespace(self.options.whitespace)
    }

    fn parse_bool<'a>(&mut self, cursor: Cursor<'a>) -> Step<'a> {
        if cursor.starts_with(TRUE_LITERAL) {
            return Ok((Value::Bool(true), cursor.drop_first_n(TRUE_LITERAL.len())?));
        }
        if cursor.starts_with(FALSE_LITERAL) {
            return Ok((Value::Bool(false), cursor.drop_first_n(FALSE_LITERAL.len())?));
        }
        Err(cursor.error(SyntaxKind::InvalidLiteral))
    }

    fn parse_null<'a>(&mut self, cursor: Cursor<'a>) -> Step<'a> {
        if cursor.starts_with(NULL_LITERAL) {
            return Ok((Value::Null, cursor.drop_first_n(NULL_LITERAL.len())?));
        }
        Err(cursor.error(SyntaxKind::InvalidLiteral))
    }

    // Digits accumulate as `n * 10 + d`; the fraction accumulates the same way
    // beside a power-of-ten divisor. No exponent, no leading-zero check, and
    // overflow just loses precision.
    fn parse_number<'a>(&mut self, cursor: Cursor<'a>) -> Step<'a> {
        let bytes = cursor.remaining();
        let mut idx = 0;
        let mut negative = false;
        match bytes.first() {
            Some(b'-') => {
                negative = true;
                idx += 1;
            }
            Some(b'+') => idx += 1,
            _ => {}
        }

        let integer_start = idx;
        let mut integer = 0.0_f64;
        while let Some(&byte) = bytes.get(idx).filter(|byte| byte.is_ascii_digit()) {
            integer = integer * 10.0 + f64::from(byte - b'0');
            idx += 1;
        }
        if idx == integer_start {
            return Err(match bytes.get(idx) {
                Some(_) => cursor.error_at(SyntaxKind::UnexpectedByte, cursor.offset() + idx),
                None => cursor.error_at_end(),
            });
        }

        let mut fraction = 0.0_f64;
        let mut divisor = 1.0_f64;
        if bytes.get(idx) == Some(&b'.') {
            idx += 1;
            while let Some(&byte) = bytes.get(idx).filter(|byte| byte.is_ascii_digit()) {
                fraction = fraction * 10.0 + f64::from(byte - b'0');
                divisor *= 10.0;
                idx += 1;
            }
        }

        let magnitude = integer + fraction / divisor;
        let value = if negative { -magnitude } else { magnitude };
        Ok((Value::Number(value), cursor.drop_first_n(idx)?))
    }

    // Escapes are not interpreted: the first `"` after the opening quote ends
    // the string, even when preceded by a backslash.
    fn parse_string<'a>(&mut self, cursor: Cursor<'a>) -> Step<'a> {
        let body = cursor.drop_first_n(1)?;
        let Some(len) = memchr(b'"', body.remaining()) else {
            return Err(body.error_at_end());
        };
        let span = self
            .arena
            .alloc_bytes(&body.remaining()[..len])
            .map_err(|err| body.locate(err))?;
        Ok((Value::String(span), body.drop_first_n(len + 1)?))
    }

    fn parse_array<'a>(&mut self, cursor: Cursor<'a>, depth: usize) -> Step<'a> {
        self.check_depth(&cursor, depth)?;
        let mut cursor = self.skip(cursor.drop_first_n(1)?);
        let mut list = BlockList::new();
        if cursor.peek() == Some(b']') {
            return Ok((Value::Array(list), cursor.drop_first_n(1)?));
        }

        loop {
            let (value, next) = self.parse_value(cursor, depth + 1)?;
            list.append(self.arena, value)
                .map_err(|err| next.locate(err))?;
            cursor = self.skip(next);
            match cursor.peek() {
                Some(b',') => cursor = cursor.drop_first_n(1)?,
                Some(b']') => return Ok((Value::Array(list), cursor.drop_first_n(1)?)),
                Some(_) => return Err(cursor.error(SyntaxKind::UnexpectedByte)),
                None => return Err(cursor.error_at_end()),
            }
        }
    }

    fn parse_object<'a>(&mut self, cursor: Cursor<'a>, depth: usize) -> Step<'a> {
        self.check_depth(&cursor, depth)?;
        let mut cursor = self.skip(cursor.drop_first_n(1)?);
        let mut list = BlockList::new();
        if cursor.peek() == Some(b'}') {
            return Ok((Value::Object(list), cursor.drop_first_n(1)?));
        }

        loop {
            match cursor.peek() {
                Some(b'"') => {}
                Some(_) => return Err(cursor.error(SyntaxKind::ExpectedKeyString)),
                None => return Err(cursor.error_at_end()),
            }
            let (key, next) = self.parse_string(cursor)?;
            list.append(self.arena, key)
                .map_err(|err| next.locate(err))?;

            cursor = self.skip(next);
            match cursor.peek() {
                Some(b':') => cursor = cursor.drop_first_n(1)?,
                Some(_) => return Err(cursor.error(SyntaxKind::ExpectedColon)),
                None => return Err(cursor.error_at_end()),
            }

            let (value, next) = self.parse_value(cursor, depth + 1)?;
            list.append(self.arena, value)
                .map_err(|err| next.locate(err))?;

            cursor = self.skip(next);
            match cursor.peek() {
                Some(b',') => cursor = self.skip(cursor.drop_first_n(1)?),
                Some(b'}') => return Ok((Value::Object(list), cursor.drop_first_n(1)?)),
                Some(_) => return Err(cursor.error(SyntaxKind::UnexpectedByte)),
                None => return Err(cursor.error_at_end()),
            }
        }
    }

    fn check_depth(&self, cursor: &Cursor<'_>, depth: usize) -> Result<()> {
        if depth >= self.options.max_depth {
            return Err(cursor.error(SyntaxKind::DepthLimitExceeded));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ErrorKind;

    fn run(input: &[u8]) -> Result<(Value, usize)> {
        let mut arena = Arena::new(1 << 20, 1 << 16).unwrap();
        let options = ParseOptions::default();
        let mut parser = Parser::new(&mut arena, &options);
        parser
            .parse_value(Cursor::new(input), 0)
            .map(|(value, cursor)| (value, cursor.offset()))
    }

    #[rstest::rstest]
    #[case(b"true, ", Value::Bool(true), 4)]
    #[case(b"false]", Value::Bool(false), 5)]
    #[case(b"null", Value::Null, 4)]
    #[case(b"  null  ", Value::Null, 6)]
    #[case(b"0", Value::Number(0.0), 1)]
    #[case(b"42,", Value::Number(42.0), 2)]
    #[case(b"-17", Value::Number(-17.0), 3)]
    #[case(b"+5", Value::Number(5.0), 2)]
    #[case(b"3.25x", Value::Number(3.25), 4)]
    #[case(b"-0.5", Value::Number(-0.5), 4)]
    #[case(b"7.", Value::Number(7.0), 2)]
    #[case(b"007", Value::Number(7.0), 3)]
    #[case(b"1e5", Value::Number(1.0), 1)]
    fn test_scalars(#[case] input: &[u8], #[case] expected: Value, #[case] consumed: usize) {
        let (value, offset) = run(input).unwrap();
        assert_eq!(value, expected);
        assert_eq!(offset, consumed);
    }

    #[rstest::rstest]
    #[case(b"", SyntaxKind::UnexpectedEnd, 0)]
    #[case(b"   ", SyntaxKind::UnexpectedEnd, 3)]
    #[case(b"tru", SyntaxKind::InvalidLiteral, 0)]
    #[case(b"nul", SyntaxKind::InvalidLiteral, 0)]
    #[case(b"fals3", SyntaxKind::InvalidLiteral, 0)]
    #[case(b"-", SyntaxKind::UnexpectedEnd, 1)]
    #[case(b"-x", SyntaxKind::UnexpectedByte, 1)]
    #[case(b".5", SyntaxKind::UnexpectedByte, 0)]
    #[case(b"\"open", SyntaxKind::UnexpectedEnd, 5)]
    #[case(b"[1,2", SyntaxKind::UnexpectedEnd, 4)]
    #[case(b"[1;2]", SyntaxKind::UnexpectedByte, 2)]
    #[case(b"[1,]", SyntaxKind::UnexpectedByte, 3)]
    #[case(b"{\"a\":}", SyntaxKind::UnexpectedByte, 5)]
    #[case(b"{\"a\" 1}", SyntaxKind::ExpectedColon, 5)]
    #[case(b"{1:2}", SyntaxKind::ExpectedKeyString, 1)]
    #[case(b"{\"a\":1,}", SyntaxKind::ExpectedKeyString, 7)]
    #[case(b"{\"a\":1", SyntaxKind::UnexpectedEnd, 6)]
    #[case(b"\tnull", SyntaxKind::UnexpectedByte, 0)]
    fn test_malformed(#[case] input: &[u8], #[case] kind: SyntaxKind, #[case] offset: usize) {
        let err = run(input).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedInput(kind));
        assert_eq!(err.offset(), Some(offset));
    }

    #[rstest::rstest]
    fn test_plus_sign_can_be_disabled() {
        let mut arena = Arena::new(1 << 20, 1 << 16).unwrap();
        let options = ParseOptions::default().with_plus_sign(false);
        let mut parser = Parser::new(&mut arena, &options);
        let err = parser.parse_value(Cursor::new(b"+1"), 0).unwrap_err();
        assert_eq!(err.syntax_kind(), Some(SyntaxKind::UnexpectedByte));
    }

    #[rstest::rstest]
    fn test_string_copies_bytes_into_arena() {
        let mut arena = Arena::new(1 << 20, 1 << 16).unwrap();
        let options = ParseOptions::default();
        let mut parser = Parser::new(&mut arena, &options);
        let (value, cursor) = parser
            .parse_value(Cursor::new(br#""hi \"there" "#), 0)
            .unwrap();
        assert_eq!(cursor.remaining(), br#"there" "#);
        let span = value.as_span().unwrap();
        assert_eq!(arena.bytes(span), Some(&br"hi \"[..]));
    }

    #[rstest::rstest]
    fn test_object_key_takes_a_block_before_nested_value() {
        let mut arena = Arena::new(1 << 20, 1 << 16).unwrap();
        let options = ParseOptions::default();
        let mut parser = Parser::new(&mut arena, &options);
        let (value, _) = parser
            .parse_value(Cursor::new(br#"{ "a" : [1] , "b":{}}"#), 0)
            .unwrap();

        let object = value.as_list().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(object.head().map(|id| id.index()), Some(0));
        let nested = object.get(&arena, 1).and_then(|v| v.as_list()).unwrap();
        assert_eq!(nested.head().map(|id| id.index()), Some(1));
        assert_eq!(arena.block_count(), 2);
    }

    #[rstest::rstest]
    fn test_empty_containers_consume_two_bytes() {
        for input in [&b"[]"[..], &b"{}"[..], &b"[ ]"[..]] {
            let (value, offset) = run(input).unwrap();
            assert_eq!(value.as_list().map(|list| list.len()), Some(0));
            assert_eq!(offset, input.len());
        }
    }
}
