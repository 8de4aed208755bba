//! ActionType - 名前付きリモートアクションとレスポンスリーダー
//!
//! # 学習ポイント
//! - Associated Constants (`const NAME`) をルーティングキーにする
//! - リーダーは `fn` ポインタ（継承ではなく値として渡す）
//! - Type erasure パターン (TypedAction<A> → DynAction)

use std::any::Any;

use super::stream::{StreamError, StreamInput};
use super::writeable::Writeable;

/// Turns a raw response stream into a typed response.
pub type Reader<T> = fn(&mut dyn StreamInput) -> Result<T, StreamError>;

/// A routable cluster action paired with its response type.
///
/// # 命名規約
/// - `cluster:{scope}/{plugin}/{action}`
/// - 例: `cluster:admin/opendistro/_scheduled_jobs/stats`
pub trait ActionType: Send + Sync + 'static {
    /// Routing key. Must not collide with any other action's name.
    const NAME: &'static str;

    type Response: Writeable + Send + 'static;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn response_reader(&self) -> Reader<Self::Response>;
}

/// Object-safe view of an [`ActionType`] so actions of different response
/// types can live in one registry.
pub trait DynAction: Send + Sync {
    fn name(&self) -> &'static str;

    fn read_response_dyn(
        &self,
        input: &mut dyn StreamInput,
    ) -> Result<Box<dyn Any + Send>, StreamError>;
}

pub struct TypedAction<A: ActionType> {
    action: A,
}

impl<A: ActionType> TypedAction<A> {
    pub fn new(action: A) -> Self {
        Self { action }
    }
}

impl<A: ActionType> DynAction for TypedAction<A> {
    fn name(&self) -> &'static str {
        self.action.name()
    }

    fn read_response_dyn(
        &self,
        input: &mut dyn StreamInput,
    ) -> Result<Box<dyn Any + Send>, StreamError> {
        let reader = self.action.response_reader();
        let response = reader(input)?;
        Ok(Box::new(response))
    }
}
