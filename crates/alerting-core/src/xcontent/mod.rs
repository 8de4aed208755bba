//! XContent - フォーマット非依存のドキュメント読み書き
//!
//! # 構成
//! - **token**: Token 種別とエラー位置（XContentLocation）
//! - **parser**: 読み取りカーソル `XContentParser`
//! - **builder**: 書き込みシンク `XContentBuilder`
//! - **object_parser**: 許可リスト方式のフィールドディスパッチ
//! - **json**: JSON アダプタ（唯一 serde_json に依存する場所）
//! - **params**: エンコードオプション

pub mod token;
pub mod parser;
pub mod builder;
pub mod object_parser;
pub mod json;
pub mod params;
pub mod error;

pub use self::token::{Token, XContentLocation};
pub use self::parser::{XContentParser, ensure_expected_token};
pub use self::builder::XContentBuilder;
pub use self::object_parser::{FieldParser, ObjectParser};
pub use self::json::{JsonXContentBuilder, JsonXContentParser};
pub use self::params::{ToXContentParams, WITH_TYPE};
pub use self::error::XContentError;

/// Something that can describe itself to an [`XContentBuilder`].
pub trait ToXContent {
    fn to_xcontent(
        &self,
        builder: &mut dyn XContentBuilder,
        params: &ToXContentParams,
    ) -> Result<(), XContentError>;
}
