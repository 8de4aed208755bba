//! XContentBuilder - エンコード側のドキュメントシンク

use super::error::XContentError;

/// The write-side counterpart of [`XContentParser`](super::XContentParser).
///
/// Implementations decide the concrete wire format; entities only describe
/// structure through these calls.
pub trait XContentBuilder {
    fn start_object(&mut self) -> Result<(), XContentError>;

    fn end_object(&mut self) -> Result<(), XContentError>;

    fn start_array(&mut self) -> Result<(), XContentError>;

    fn end_array(&mut self) -> Result<(), XContentError>;

    /// Sets the key for the next value written inside an object.
    fn field_name(&mut self, name: &str) -> Result<(), XContentError>;

    fn value_str(&mut self, value: &str) -> Result<(), XContentError>;

    fn value_i32(&mut self, value: i32) -> Result<(), XContentError>;

    fn value_i64(&mut self, value: i64) -> Result<(), XContentError>;

    fn value_bool(&mut self, value: bool) -> Result<(), XContentError>;

    fn start_object_named(&mut self, name: &str) -> Result<(), XContentError> {
        self.field_name(name)?;
        self.start_object()
    }

    fn start_array_named(&mut self, name: &str) -> Result<(), XContentError> {
        self.field_name(name)?;
        self.start_array()
    }

    fn field_str(&mut self, name: &str, value: &str) -> Result<(), XContentError> {
        self.field_name(name)?;
        self.value_str(value)
    }

    fn field_i32(&mut self, name: &str, value: i32) -> Result<(), XContentError> {
        self.field_name(name)?;
        self.value_i32(value)
    }
}
