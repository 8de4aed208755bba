use crate::xcontent::{
    ObjectParser, ToXContent, ToXContentParams, XContentBuilder, XContentError, XContentParser,
};

use super::validation::ValidationError;

pub const EMAIL_FIELD: &str = "email";

/// A single recipient address inside an [`EmailGroup`](super::EmailGroup).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailEntry {
    email: String,
}

impl EmailEntry {
    /// Fails if `email` is empty or whitespace-only.
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        Ok(Self { email })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Decodes `{ "email": ... }`; cursor must be on the `StartObject`.
    pub fn parse(parser: &mut dyn XContentParser) -> Result<Self, XContentError> {
        let mut fields = EntryFields::default();
        ENTRY_PARSER.parse(parser, &mut fields)?;
        let email = fields.email.ok_or(XContentError::MissingField {
            field: EMAIL_FIELD,
            entity: ENTRY_PARSER.entity(),
        })?;
        Ok(Self::new(email)?)
    }
}

impl ToXContent for EmailEntry {
    fn to_xcontent(
        &self,
        builder: &mut dyn XContentBuilder,
        _params: &ToXContentParams,
    ) -> Result<(), XContentError> {
        builder.start_object()?;
        builder.field_str(EMAIL_FIELD, &self.email)?;
        builder.end_object()
    }
}

#[derive(Default)]
struct EntryFields {
    email: Option<String>,
}

fn parse_email(fields: &mut EntryFields, p: &mut dyn XContentParser) -> Result<(), XContentError> {
    fields.email = Some(p.text()?);
    Ok(())
}

const ENTRY_PARSER: ObjectParser<EntryFields> =
    ObjectParser::new("email entry", &[(EMAIL_FIELD, parse_email)]);
