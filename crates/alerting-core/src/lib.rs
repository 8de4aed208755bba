//! alerting-core
//!
//! Typed documents and node-to-node contracts for the alerting runtime.
//!
//! # モジュール構成
//! - **xcontent**: フォーマット非依存のトークンカーソル / ドキュメントシンク（JSON アダプタ付き）
//! - **model**: ドメインドキュメント（EmailGroup, EmailEntry）
//! - **transport**: バイナリストリーム、ActionType、ActionRegistry
//! - **node**: ScheduledJobsStatsAction とそのリクエスト / レスポンス

pub mod xcontent;
pub mod model;
pub mod transport;
pub mod node;
