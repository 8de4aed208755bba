//! ActionRegistry - アクション名 → レスポンスリーダーの登録と管理
//!
//! # 学習ポイント
//! - HashMap での型消去された trait object の管理
//! - Generic methods での登録と、`downcast` による型の復元
//! - 同じ名前の二重登録は拒否（ルーティングキーの一意性）

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::action::{ActionType, DynAction, TypedAction};
use super::stream::{StreamError, StreamInput};

/// Registered actions, keyed by [`ActionType::NAME`].
///
/// Built once during start-up and then only read.
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<&'static str, Arc<dyn DynAction>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("action '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("action '{0}' is not registered")]
    NotRegistered(String),

    /// The name is registered, but by an action with another response type.
    #[error("action '{0}' produced a response of a different type")]
    ResponseTypeMismatch(String),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A: ActionType>(&mut self, action: A) -> Result<(), RegistryError> {
        let name = action.name();
        if self.actions.contains_key(name) {
            warn!(action = name, "duplicate action registration rejected");
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        self.actions.insert(name, Arc::new(TypedAction::new(action)));
        info!(action = name, "registered action");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DynAction>> {
        self.actions.get(name).cloned()
    }

    /// Names in lexical order.
    pub fn registered_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.actions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Reads a response for `A` through the reader registered under `A::NAME`.
    pub fn read_response<A: ActionType>(
        &self,
        input: &mut dyn StreamInput,
    ) -> Result<A::Response, RegistryError> {
        let action = self
            .get(A::NAME)
            .ok_or_else(|| RegistryError::NotRegistered(A::NAME.to_string()))?;
        let response = action.read_response_dyn(input)?;
        response
            .downcast::<A::Response>()
            .map(|r| *r)
            .map_err(|_| RegistryError::ResponseTypeMismatch(A::NAME.to_string()))
    }
}
