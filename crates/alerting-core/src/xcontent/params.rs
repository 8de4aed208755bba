//! Encode options passed to `ToXContent::to_xcontent`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Key that wraps an entity under its type name when set to `true`.
pub const WITH_TYPE: &str = "with_type";

/// String-keyed encode options.
///
/// Values are kept as strings so the same map can come from a config file,
/// query parameters or code. Lookups parse on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToXContentParams {
    params: HashMap<String, String>,
}

impl ToXContentParams {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Params with `with_type=true`.
    pub fn with_type() -> Self {
        Self::empty().set(WITH_TYPE, "true")
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// `"true"` / `"false"` (case-insensitive); anything else falls back to `default`.
    pub fn param_as_bool(&self, key: &str, default: bool) -> bool {
        match self.param(key) {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }
}
