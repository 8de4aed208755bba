//! JSON アダプタ
//!
//! テキストは `serde::de::Visitor` で直接 Token 列に落とします（`Value` を経由すると
//! 重複キーが黙って1つにまとまるため）。逆方向は [`XContentBuilder`] の呼び出しから
//! `Value` を組み立てます。codec 側のコードはこのファイル以外で serde_json に触れません。

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};

use super::builder::XContentBuilder;
use super::error::XContentError;
use super::parser::XContentParser;
use super::token::{Token, XContentLocation};

#[derive(Debug)]
struct Entry {
    token: Token,
    name: Option<String>,
    scalar: Option<Value>,
    path: String,
}

/// [`XContentParser`] over a JSON document.
///
/// Every key of an object becomes its own `FieldName` token, repeated keys
/// included; rejecting them is up to the consumer.
#[derive(Debug)]
pub struct JsonXContentParser {
    entries: Vec<Entry>,
    /// `None` until the first `next_token()`.
    pos: Option<usize>,
}

impl JsonXContentParser {
    /// Tokenizes an already built value. A `Value` cannot hold repeated keys.
    pub fn from_value(value: Value) -> Self {
        let mut entries = Vec::new();
        flatten(value, None, "/".to_string(), &mut entries);
        Self { entries, pos: None }
    }

    pub fn from_str(json: &str) -> Result<Self, XContentError> {
        Self::tokenize(&mut serde_json::Deserializer::from_str(json))
    }

    pub fn from_slice(json: &[u8]) -> Result<Self, XContentError> {
        Self::tokenize(&mut serde_json::Deserializer::from_slice(json))
    }

    fn tokenize<'de, R: serde_json::de::Read<'de>>(
        de: &mut serde_json::Deserializer<R>,
    ) -> Result<Self, XContentError> {
        let mut entries = Vec::new();
        TokenSeed {
            out: &mut entries,
            name: None,
            path: "/".to_string(),
        }
        .deserialize(&mut *de)?;
        de.end()?;
        Ok(Self { entries, pos: None })
    }

    fn current(&self) -> Option<&Entry> {
        self.pos.and_then(|i| self.entries.get(i))
    }

    fn value_type_error(&self, expected: &'static str) -> XContentError {
        XContentError::ValueType {
            expected,
            token: super::token::describe(self.current_token()),
            location: self.token_location(),
        }
    }
}

fn child_path(parent: &str, segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    if parent == "/" {
        format!("/{escaped}")
    } else {
        format!("{parent}/{escaped}")
    }
}

fn flatten(value: Value, name: Option<String>, path: String, out: &mut Vec<Entry>) {
    let push = |out: &mut Vec<Entry>, token, scalar| {
        out.push(Entry {
            token,
            name: name.clone(),
            scalar,
            path: path.clone(),
        })
    };
    match value {
        Value::Object(map) => {
            push(out, Token::StartObject, None);
            for (key, child) in map {
                let child_at = child_path(&path, &key);
                out.push(Entry {
                    token: Token::FieldName,
                    name: Some(key.clone()),
                    scalar: None,
                    path: child_at.clone(),
                });
                flatten(child, Some(key), child_at, out);
            }
            push(out, Token::EndObject, None);
        }
        Value::Array(items) => {
            push(out, Token::StartArray, None);
            for (i, child) in items.into_iter().enumerate() {
                flatten(child, name.clone(), child_path(&path, &i.to_string()), out);
            }
            push(out, Token::EndArray, None);
        }
        Value::String(_) => push(out, Token::ValueString, Some(value)),
        Value::Number(_) => push(out, Token::ValueNumber, Some(value)),
        Value::Bool(_) => push(out, Token::ValueBoolean, Some(value)),
        Value::Null => push(out, Token::ValueNull, None),
    }
}

/// Appends the tokens of one JSON value straight from the deserializer.
struct TokenSeed<'a> {
    out: &'a mut Vec<Entry>,
    name: Option<String>,
    path: String,
}

impl TokenSeed<'_> {
    fn push(&mut self, token: Token, scalar: Option<Value>) {
        self.out.push(Entry {
            token,
            name: self.name.clone(),
            scalar,
            path: self.path.clone(),
        });
    }

    fn scalar<E>(mut self, token: Token, value: Value) -> Result<(), E> {
        self.push(token, Some(value));
        Ok(())
    }
}

impl<'de> DeserializeSeed<'de> for TokenSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for TokenSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<(), E> {
        self.scalar(Token::ValueBoolean, Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<(), E> {
        self.scalar(Token::ValueNumber, Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<(), E> {
        self.scalar(Token::ValueNumber, Value::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<(), E> {
        let n = Number::from_f64(v).ok_or_else(|| E::custom(format!("non-finite number {v}")))?;
        self.scalar(Token::ValueNumber, Value::Number(n))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<(), E> {
        self.scalar(Token::ValueString, Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<(), E> {
        self.scalar(Token::ValueString, Value::String(v))
    }

    fn visit_unit<E: de::Error>(mut self) -> Result<(), E> {
        self.push(Token::ValueNull, None);
        Ok(())
    }

    fn visit_seq<A: SeqAccess<'de>>(mut self, mut seq: A) -> Result<(), A::Error> {
        self.push(Token::StartArray, None);
        let mut index = 0usize;
        loop {
            let item = TokenSeed {
                out: &mut *self.out,
                name: self.name.clone(),
                path: child_path(&self.path, &index.to_string()),
            };
            if seq.next_element_seed(item)?.is_none() {
                break;
            }
            index += 1;
        }
        self.push(Token::EndArray, None);
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(mut self, mut map: A) -> Result<(), A::Error> {
        self.push(Token::StartObject, None);
        while let Some(key) = map.next_key::<String>()? {
            let child_at = child_path(&self.path, &key);
            self.out.push(Entry {
                token: Token::FieldName,
                name: Some(key.clone()),
                scalar: None,
                path: child_at.clone(),
            });
            map.next_value_seed(TokenSeed {
                out: &mut *self.out,
                name: Some(key),
                path: child_at,
            })?;
        }
        self.push(Token::EndObject, None);
        Ok(())
    }
}

impl XContentParser for JsonXContentParser {
    fn current_token(&self) -> Option<Token> {
        self.current().map(|e| e.token)
    }

    fn next_token(&mut self) -> Result<Option<Token>, XContentError> {
        let next = match self.pos {
            None => 0,
            Some(i) => (i + 1).min(self.entries.len()),
        };
        self.pos = Some(next);
        Ok(self.current_token())
    }

    fn current_name(&self) -> Option<&str> {
        self.current().and_then(|e| e.name.as_deref())
    }

    fn text(&self) -> Result<String, XContentError> {
        match self.current().and_then(|e| e.scalar.as_ref()) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            _ => Err(self.value_type_error("string")),
        }
    }

    /// Integers, floats and numeric strings are accepted; a fractional part
    /// is truncated (`1.9` reads as `1`). Values outside `i32` are errors.
    fn int_value(&self) -> Result<i32, XContentError> {
        let parsed = match self.current().and_then(|e| e.scalar.as_ref()) {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) => i32::try_from(v).ok(),
                None => n.as_f64().and_then(truncate_to_i32),
            },
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i32>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate_to_i32))
            }
            _ => None,
        };
        parsed.ok_or_else(|| self.value_type_error("int"))
    }

    fn token_location(&self) -> XContentLocation {
        let index = self.pos.unwrap_or(0);
        let path = self
            .current()
            .map(|e| e.path.clone())
            .unwrap_or_else(|| "/".to_string());
        XContentLocation::new(index, path)
    }
}

fn truncate_to_i32(v: f64) -> Option<i32> {
    let t = v.trunc();
    (t.is_finite() && t >= f64::from(i32::MIN) && t <= f64::from(i32::MAX)).then_some(t as i32)
}

enum Frame {
    Object {
        map: Map<String, Value>,
        pending: Option<String>,
    },
    Array(Vec<Value>),
}

/// [`XContentBuilder`] producing a `serde_json::Value`.
#[derive(Default)]
pub struct JsonXContentBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl JsonXContentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished document. Fails if containers are still open or nothing was written.
    pub fn into_value(self) -> Result<Value, XContentError> {
        if !self.stack.is_empty() {
            return Err(XContentError::Builder(format!(
                "{} unclosed container(s)",
                self.stack.len()
            )));
        }
        self.root
            .ok_or_else(|| XContentError::Builder("empty document".to_string()))
    }

    pub fn into_string(self) -> Result<String, XContentError> {
        Ok(serde_json::to_string(&self.into_value()?)?)
    }

    pub fn into_pretty_string(self) -> Result<String, XContentError> {
        Ok(serde_json::to_string_pretty(&self.into_value()?)?)
    }

    fn insert(&mut self, value: Value) -> Result<(), XContentError> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(XContentError::Builder(
                        "document already has a root value".to_string(),
                    ));
                }
                self.root = Some(value);
            }
            Some(Frame::Object { map, pending }) => {
                let key = pending.take().ok_or_else(|| {
                    XContentError::Builder("value written inside object without a field name".to_string())
                })?;
                map.insert(key, value);
            }
            Some(Frame::Array(items)) => items.push(value),
        }
        Ok(())
    }

    fn start(&mut self, frame: Frame) -> Result<(), XContentError> {
        if let Some(Frame::Object { pending: None, .. }) = self.stack.last() {
            return Err(XContentError::Builder(
                "container started inside object without a field name".to_string(),
            ));
        }
        if self.stack.is_empty() && self.root.is_some() {
            return Err(XContentError::Builder(
                "document already has a root value".to_string(),
            ));
        }
        self.stack.push(frame);
        Ok(())
    }
}

impl XContentBuilder for JsonXContentBuilder {
    fn start_object(&mut self) -> Result<(), XContentError> {
        self.start(Frame::Object {
            map: Map::new(),
            pending: None,
        })
    }

    fn end_object(&mut self) -> Result<(), XContentError> {
        match self.stack.pop() {
            Some(Frame::Object { map, pending: None }) => self.insert(Value::Object(map)),
            Some(Frame::Object {
                pending: Some(key), ..
            }) => Err(XContentError::Builder(format!(
                "field [{key}] has no value"
            ))),
            Some(Frame::Array(_)) => Err(XContentError::Builder(
                "end_object called while an array is open".to_string(),
            )),
            None => Err(XContentError::Builder("end_object without start_object".to_string())),
        }
    }

    fn start_array(&mut self) -> Result<(), XContentError> {
        self.start(Frame::Array(Vec::new()))
    }

    fn end_array(&mut self) -> Result<(), XContentError> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.insert(Value::Array(items)),
            Some(Frame::Object { .. }) => Err(XContentError::Builder(
                "end_array called while an object is open".to_string(),
            )),
            None => Err(XContentError::Builder("end_array without start_array".to_string())),
        }
    }

    fn field_name(&mut self, name: &str) -> Result<(), XContentError> {
        match self.stack.last_mut() {
            Some(Frame::Object { pending, .. }) if pending.is_none() => {
                *pending = Some(name.to_string());
                Ok(())
            }
            Some(Frame::Object { .. }) => Err(XContentError::Builder(format!(
                "field [{name}] written while previous field has no value"
            ))),
            _ => Err(XContentError::Builder(format!(
                "field [{name}] written outside an object"
            ))),
        }
    }

    fn value_str(&mut self, value: &str) -> Result<(), XContentError> {
        self.insert(Value::String(value.to_string()))
    }

    fn value_i32(&mut self, value: i32) -> Result<(), XContentError> {
        self.insert(Value::Number(Number::from(value)))
    }

    fn value_i64(&mut self, value: i64) -> Result<(), XContentError> {
        self.insert(Value::Number(Number::from(value)))
    }

    fn value_bool(&mut self, value: bool) -> Result<(), XContentError> {
        self.insert(Value::Bool(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn drain(parser: &mut JsonXContentParser) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(t) = parser.next_token().unwrap() {
            tokens.push(t);
        }
        tokens
    }

    #[test]
    fn parser_starts_before_first_token() {
        let parser = JsonXContentParser::from_value(json!({}));
        assert_eq!(parser.current_token(), None);
    }

    #[test]
    fn parser_emits_tokens_in_document_order() {
        let mut parser =
            JsonXContentParser::from_str(r#"{"b": 1, "a": [true, null], "c": "x"}"#).unwrap();
        assert_eq!(
            drain(&mut parser),
            vec![
                Token::StartObject,
                Token::FieldName,
                Token::ValueNumber,
                Token::FieldName,
                Token::StartArray,
                Token::ValueBoolean,
                Token::ValueNull,
                Token::EndArray,
                Token::FieldName,
                Token::ValueString,
                Token::EndObject,
            ]
        );
        // stays at end
        assert_eq!(parser.next_token().unwrap(), None);
    }

    #[test]
    fn current_name_follows_field_into_value() {
        let mut parser = JsonXContentParser::from_value(json!({ "name": "ops" }));
        parser.next_token().unwrap();
        parser.next_token().unwrap();
        assert_eq!(parser.current_name(), Some("name"));
        parser.next_token().unwrap();
        assert_eq!(parser.current_name(), Some("name"));
        assert_eq!(parser.text().unwrap(), "ops");
        assert_eq!(parser.token_location().path, "/name");
    }

    #[rstest]
    #[case(json!(7), 7)]
    #[case(json!("8"), 8)]
    #[case(json!(1.0), 1)]
    #[case(json!(1.9), 1)]
    #[case(json!(-2.5), -2)]
    #[case(json!(" 1.5 "), 1)]
    #[case(json!(2147483647), i32::MAX)]
    fn int_value_coerces_numbers_and_numeric_strings(#[case] value: Value, #[case] expected: i32) {
        let mut parser = JsonXContentParser::from_value(value);
        parser.next_token().unwrap();
        assert_eq!(parser.int_value().unwrap(), expected);
    }

    #[rstest]
    #[case(json!(4294967296_i64))]
    #[case(json!(3.0e10))]
    #[case(json!("one"))]
    #[case(json!(true))]
    #[case(json!(null))]
    fn int_value_rejects_non_numeric_or_out_of_range(#[case] value: Value) {
        let mut parser = JsonXContentParser::from_value(value);
        parser.next_token().unwrap();
        assert!(matches!(parser.int_value(), Err(XContentError::ValueType { .. })));
    }

    #[test]
    fn text_on_container_is_a_type_error() {
        let mut parser = JsonXContentParser::from_value(json!({}));
        parser.next_token().unwrap();
        let err = parser.text().unwrap_err();
        assert!(err.to_string().contains("START_OBJECT"));
    }

    #[test]
    fn text_keeps_repeated_keys_as_separate_fields() {
        let mut parser = JsonXContentParser::from_str(r#"{"a": 1, "b": [2], "a": 3}"#).unwrap();
        let mut names = Vec::new();
        while let Some(t) = parser.next_token().unwrap() {
            if t == Token::FieldName {
                names.push(parser.current_name().unwrap().to_string());
            }
        }
        assert_eq!(names, vec!["a", "b", "a"]);
    }

    #[test]
    fn text_and_value_produce_the_same_tokens() {
        let text = r#"{"n": -1, "f": 0.5, "s": "x", "xs": [true, null, {"k": 2}], "o": {}}"#;
        let mut from_text = JsonXContentParser::from_str(text).unwrap();
        let mut from_value =
            JsonXContentParser::from_value(serde_json::from_str::<Value>(text).unwrap());
        loop {
            let a = from_text.next_token().unwrap();
            let b = from_value.next_token().unwrap();
            assert_eq!(a, b);
            assert_eq!(from_text.current_name(), from_value.current_name());
            assert_eq!(from_text.token_location(), from_value.token_location());
            if a.is_none() {
                break;
            }
        }
    }

    #[test]
    fn trailing_characters_are_rejected() {
        let err = JsonXContentParser::from_str("{} {}").unwrap_err();
        assert!(matches!(err, XContentError::Json(_)));
    }

    #[test]
    fn array_paths_are_indexed() {
        let mut parser = JsonXContentParser::from_value(json!({ "emails": [{ "email": "a@x.com" }] }));
        let mut paths = Vec::new();
        while parser.next_token().unwrap().is_some() {
            paths.push(parser.token_location().path);
        }
        assert!(paths.contains(&"/emails/0/email".to_string()));
    }

    #[test]
    fn malformed_json_surfaces_serde_error() {
        let err = JsonXContentParser::from_str("{ \"name\": ").unwrap_err();
        assert!(matches!(err, XContentError::Json(_)));
    }

    #[test]
    fn builder_produces_nested_document() {
        let mut b = JsonXContentBuilder::new();
        b.start_object().unwrap();
        b.field_i32("n", 1).unwrap();
        b.start_array_named("xs").unwrap();
        b.value_str("a").unwrap();
        b.value_bool(false).unwrap();
        b.end_array().unwrap();
        b.start_object_named("o").unwrap();
        b.end_object().unwrap();
        b.end_object().unwrap();

        assert_eq!(
            b.into_value().unwrap(),
            json!({ "n": 1, "xs": ["a", false], "o": {} })
        );
    }

    #[test]
    fn builder_keeps_insertion_order() {
        let mut b = JsonXContentBuilder::new();
        b.start_object().unwrap();
        b.field_str("z", "1").unwrap();
        b.field_str("a", "2").unwrap();
        b.end_object().unwrap();
        assert_eq!(b.into_string().unwrap(), r#"{"z":"1","a":"2"}"#);
    }

    #[test]
    fn builder_rejects_value_without_field_name() {
        let mut b = JsonXContentBuilder::new();
        b.start_object().unwrap();
        assert!(matches!(b.value_str("x"), Err(XContentError::Builder(_))));
    }

    #[test]
    fn builder_rejects_unbalanced_end() {
        let mut b = JsonXContentBuilder::new();
        assert!(b.end_object().is_err());

        let mut b = JsonXContentBuilder::new();
        b.start_array().unwrap();
        assert!(b.end_object().is_err());
    }

    #[test]
    fn unclosed_builder_is_not_a_document() {
        let mut b = JsonXContentBuilder::new();
        b.start_object().unwrap();
        assert!(b.into_value().is_err());
        assert!(JsonXContentBuilder::new().into_value().is_err());
    }
}
