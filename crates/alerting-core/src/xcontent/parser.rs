//! XContentParser - フォーマット非依存のトークンカーソル
//!
//! # 学習ポイント
//! - Object-safe trait（`&mut dyn XContentParser` で受け渡す）
//! - 具体フォーマット（JSON など）はアダプタ側に閉じ込める

use super::error::XContentError;
use super::token::{Token, XContentLocation, describe};

/// A pull cursor over a structured document.
///
/// The cursor starts *before* the first token; callers advance with
/// [`next_token`](Self::next_token) and then inspect the current token.
/// After a `FieldName` token, `current_name()` returns the name; after a
/// value token, `text()` / `int_value()` read it.
pub trait XContentParser {
    fn current_token(&self) -> Option<Token>;

    /// Advances and returns the new current token (`None` at end of stream).
    fn next_token(&mut self) -> Result<Option<Token>, XContentError>;

    /// Name of the field the cursor is on, or of the field owning the current value.
    fn current_name(&self) -> Option<&str>;

    fn text(&self) -> Result<String, XContentError>;

    fn int_value(&self) -> Result<i32, XContentError>;

    fn token_location(&self) -> XContentLocation;
}

/// Fails with a structural error unless `actual` is `expected`.
pub fn ensure_expected_token(
    expected: Token,
    actual: Option<Token>,
    location: impl FnOnce() -> XContentLocation,
) -> Result<(), XContentError> {
    if actual == Some(expected) {
        return Ok(());
    }
    Err(XContentError::UnexpectedToken {
        expected,
        actual: describe(actual),
        location: location(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_expected_token_accepts_match() {
        let r = ensure_expected_token(Token::StartArray, Some(Token::StartArray), || {
            XContentLocation::new(0, "/")
        });
        assert!(r.is_ok());
    }

    #[test]
    fn ensure_expected_token_reports_actual_and_location() {
        let err = ensure_expected_token(Token::StartObject, Some(Token::ValueString), || {
            XContentLocation::new(2, "/name")
        })
        .unwrap_err();

        match err {
            XContentError::UnexpectedToken {
                expected,
                actual,
                location,
            } => {
                assert_eq!(expected, Token::StartObject);
                assert_eq!(actual, "VALUE_STRING");
                assert_eq!(location.path, "/name");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ensure_expected_token_reports_eof() {
        let err = ensure_expected_token(Token::StartObject, None, || XContentLocation::new(0, "/"))
            .unwrap_err();
        assert!(err.to_string().contains("[EOF]"));
    }
}
