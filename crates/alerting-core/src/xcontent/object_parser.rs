//! ObjectParser - フィールド名 → デコード関数の宣言的テーブル
//!
//! # 学習ポイント
//! - `fn` ポインタを値として持つ（const テーブルにできる）
//! - 許可リスト外のフィールドは 1 箇所の分岐でまとめて拒否する
//! - 同じオブジェクト内で同じフィールドが2回現れたら拒否（後勝ちで黙って上書きしない）

use tracing::debug;

use super::error::XContentError;
use super::parser::{XContentParser, ensure_expected_token};
use super::token::{Token, describe};

/// Decodes the value of one field into the partially built state `S`.
///
/// Called with the cursor on the field's value token.
pub type FieldParser<S> = fn(&mut S, &mut dyn XContentParser) -> Result<(), XContentError>;

/// Strict allow-list parser for one object shape.
pub struct ObjectParser<S: 'static> {
    entity: &'static str,
    fields: &'static [(&'static str, FieldParser<S>)],
}

impl<S: 'static> ObjectParser<S> {
    pub const fn new(
        entity: &'static str,
        fields: &'static [(&'static str, FieldParser<S>)],
    ) -> Self {
        Self { entity, fields }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Consumes one object, cursor on its `StartObject`, and leaves the
    /// cursor on the matching `EndObject`.
    ///
    /// Each declared field may appear at most once.
    pub fn parse(
        &self,
        parser: &mut dyn XContentParser,
        state: &mut S,
    ) -> Result<(), XContentError> {
        ensure_expected_token(Token::StartObject, parser.current_token(), || {
            parser.token_location()
        })?;

        let mut seen: Vec<&'static str> = Vec::with_capacity(self.fields.len());
        loop {
            match parser.next_token()? {
                Some(Token::EndObject) => return Ok(()),
                Some(Token::FieldName) => {}
                other => {
                    return Err(XContentError::UnexpectedToken {
                        expected: Token::FieldName,
                        actual: describe(other),
                        location: parser.token_location(),
                    });
                }
            }

            let field = parser.current_name().unwrap_or_default().to_string();
            let location = parser.token_location();
            parser.next_token()?;

            let Some((declared, decode)) = self.fields.iter().find(|(name, _)| *name == field) else {
                debug!(entity = self.entity, field = %field, at = %location, "rejecting unexpected field");
                return Err(XContentError::UnexpectedField {
                    field,
                    entity: self.entity,
                    location,
                });
            };
            if seen.contains(declared) {
                debug!(entity = self.entity, field = %field, at = %location, "rejecting repeated field");
                return Err(XContentError::DuplicateField {
                    field,
                    entity: self.entity,
                    location,
                });
            }
            seen.push(*declared);
            decode(state, parser)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xcontent::JsonXContentParser;
    use serde_json::json;

    #[derive(Default)]
    struct Pair {
        left: Option<String>,
        right: Option<i32>,
    }

    fn parse_left(s: &mut Pair, p: &mut dyn XContentParser) -> Result<(), XContentError> {
        s.left = Some(p.text()?);
        Ok(())
    }

    fn parse_right(s: &mut Pair, p: &mut dyn XContentParser) -> Result<(), XContentError> {
        s.right = Some(p.int_value()?);
        Ok(())
    }

    const PAIR: ObjectParser<Pair> =
        ObjectParser::new("pair", &[("left", parse_left), ("right", parse_right)]);

    fn run(value: serde_json::Value) -> Result<Pair, XContentError> {
        let mut parser = JsonXContentParser::from_value(value);
        parser.next_token()?;
        let mut pair = Pair::default();
        PAIR.parse(&mut parser, &mut pair)?;
        Ok(pair)
    }

    #[test]
    fn dispatches_declared_fields() {
        let pair = run(json!({ "right": 2, "left": "l" })).unwrap();
        assert_eq!(pair.left.as_deref(), Some("l"));
        assert_eq!(pair.right, Some(2));
    }

    #[test]
    fn rejects_undeclared_field_with_entity_name() {
        let err = run(json!({ "left": "l", "middle": 1 })).err().unwrap();
        match err {
            XContentError::UnexpectedField { field, entity, .. } => {
                assert_eq!(field, "middle");
                assert_eq!(entity, "pair");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_repeated_field() {
        let mut parser = JsonXContentParser::from_str(r#"{"left": "a", "right": 1, "left": "b"}"#).unwrap();
        parser.next_token().unwrap();
        let mut pair = Pair::default();
        let err = PAIR.parse(&mut parser, &mut pair).unwrap_err();
        match err {
            XContentError::DuplicateField { field, entity, location } => {
                assert_eq!(field, "left");
                assert_eq!(entity, "pair");
                assert_eq!(location.path, "/left");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // the first occurrence was decoded before the repeat was seen
        assert_eq!(pair.left.as_deref(), Some("a"));
    }

    #[test]
    fn requires_start_object() {
        let err = run(json!(["left"])).err().unwrap();
        assert!(matches!(
            err,
            XContentError::UnexpectedToken { expected: Token::StartObject, .. }
        ));
    }

    #[test]
    fn empty_object_is_fine() {
        let pair = run(json!({})).unwrap();
        assert!(pair.left.is_none());
        assert_eq!(PAIR.entity(), "pair");
    }
}
