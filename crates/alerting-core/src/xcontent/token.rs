//! Token - トークンストリームの構成要素
//!
//! ドキュメントを具体的なフォーマットに依存しない「構造トークン」の列として扱います。
//! JSON 以外のフォーマットもアダプタを足すだけで同じ Token 列に落とせます。

use std::fmt;

/// A structural token produced by an [`XContentParser`](super::XContentParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    FieldName,
    ValueString,
    ValueNumber,
    ValueBoolean,
    ValueNull,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::StartObject => "START_OBJECT",
            Token::EndObject => "END_OBJECT",
            Token::StartArray => "START_ARRAY",
            Token::EndArray => "END_ARRAY",
            Token::FieldName => "FIELD_NAME",
            Token::ValueString => "VALUE_STRING",
            Token::ValueNumber => "VALUE_NUMBER",
            Token::ValueBoolean => "VALUE_BOOLEAN",
            Token::ValueNull => "VALUE_NULL",
        };
        f.write_str(s)
    }
}

/// Where the cursor was when something went wrong.
///
/// `path` is a JSON-pointer style path (`/emails/1/email`); the root is `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XContentLocation {
    pub token_index: usize,
    pub path: String,
}

impl XContentLocation {
    pub fn new(token_index: usize, path: impl Into<String>) -> Self {
        Self {
            token_index,
            path: path.into(),
        }
    }
}

impl fmt::Display for XContentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (token {})", self.path, self.token_index)
    }
}

/// Display helper for an optional token (`None` means the stream is exhausted).
pub(crate) fn describe(token: Option<Token>) -> String {
    match token {
        Some(t) => t.to_string(),
        None => "EOF".to_string(),
    }
}
