//! Shared document constants.

/// Schema version carried by documents written before versioning existed.
pub const NO_SCHEMA_VERSION: i32 = 0;

/// Id of a document that has not been stored yet.
pub const NO_ID: &str = "";
