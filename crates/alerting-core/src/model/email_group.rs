//! EmailGroup - 宛先メールアドレスのグループ
//!
//! 永続化されたドキュメントを後で読み直すため、未知フィールドは黙って捨てずに
//! デコード時点でエラーにします。`schema_version` は運ぶだけで解釈しません。

use tracing::debug;

use crate::xcontent::{
    ObjectParser, ToXContent, ToXContentParams, Token, WITH_TYPE, XContentBuilder, XContentError,
    XContentParser, ensure_expected_token,
};

use super::email_entry::EmailEntry;
use super::schema::{NO_ID, NO_SCHEMA_VERSION};
use super::validation::ValidationError;

/// Wrapper key used when encoding with `with_type=true`.
pub const EMAIL_GROUP: &str = "email_group";
pub const SCHEMA_VERSION_FIELD: &str = "schema_version";
pub const NAME_FIELD: &str = "name";
pub const EMAILS_FIELD: &str = "emails";

/// A named group of recipient emails.
///
/// Values are immutable; the `with_*` methods consume the group and return
/// an updated copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailGroup {
    id: String,
    schema_version: i32,
    name: String,
    emails: Vec<EmailEntry>,
}

impl EmailGroup {
    pub fn new(
        id: impl Into<String>,
        schema_version: i32,
        name: impl Into<String>,
        emails: Vec<EmailEntry>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyGroupName);
        }
        Ok(Self {
            id: id.into(),
            schema_version,
            name,
            emails,
        })
    }

    /// A group that has no id and no recorded schema version yet.
    pub fn unsaved(name: impl Into<String>, emails: Vec<EmailEntry>) -> Result<Self, ValidationError> {
        Self::new(NO_ID, NO_SCHEMA_VERSION, name, emails)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn schema_version(&self) -> i32 {
        self.schema_version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emails(&self) -> &[EmailEntry] {
        &self.emails
    }

    /// Plain addresses in group order.
    pub fn emails_as_strings(&self) -> Vec<String> {
        self.emails.iter().map(|e| e.email().to_string()).collect()
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self { id: id.into(), ..self }
    }

    pub fn with_schema_version(self, schema_version: i32) -> Self {
        Self {
            schema_version,
            ..self
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(self.id, self.schema_version, name, self.emails)
    }

    pub fn with_emails(self, emails: Vec<EmailEntry>) -> Self {
        Self { emails, ..self }
    }

    /// Encodes with empty params.
    pub fn to_xcontent_default(&self, builder: &mut dyn XContentBuilder) -> Result<(), XContentError> {
        self.to_xcontent(builder, &ToXContentParams::empty())
    }

    /// Decodes a group; cursor must be on the `StartObject`.
    ///
    /// `id` is not part of the document body and is supplied by the caller
    /// (pass [`NO_ID`] when there is none).
    pub fn parse(parser: &mut dyn XContentParser, id: &str) -> Result<Self, XContentError> {
        let mut fields = GroupFields {
            schema_version: NO_SCHEMA_VERSION,
            name: None,
            emails: Vec::new(),
        };
        GROUP_PARSER.parse(parser, &mut fields)?;

        let name = fields.name.ok_or(XContentError::MissingField {
            field: NAME_FIELD,
            entity: GROUP_PARSER.entity(),
        })?;
        let group = Self::new(id, fields.schema_version, name, fields.emails)?;
        debug!(
            id = group.id(),
            name = group.name(),
            schema_version = group.schema_version(),
            emails = group.emails().len(),
            "parsed email group"
        );
        Ok(group)
    }
}

impl ToXContent for EmailGroup {
    fn to_xcontent(
        &self,
        builder: &mut dyn XContentBuilder,
        params: &ToXContentParams,
    ) -> Result<(), XContentError> {
        let with_type = params.param_as_bool(WITH_TYPE, false);

        builder.start_object()?;
        if with_type {
            builder.start_object_named(EMAIL_GROUP)?;
        }
        builder.field_i32(SCHEMA_VERSION_FIELD, self.schema_version)?;
        builder.field_str(NAME_FIELD, &self.name)?;
        builder.start_array_named(EMAILS_FIELD)?;
        for entry in &self.emails {
            entry.to_xcontent(builder, params)?;
        }
        builder.end_array()?;
        if with_type {
            builder.end_object()?;
        }
        builder.end_object()
    }
}

struct GroupFields {
    schema_version: i32,
    name: Option<String>,
    emails: Vec<EmailEntry>,
}

fn parse_schema_version(
    fields: &mut GroupFields,
    p: &mut dyn XContentParser,
) -> Result<(), XContentError> {
    fields.schema_version = p.int_value()?;
    Ok(())
}

fn parse_name(fields: &mut GroupFields, p: &mut dyn XContentParser) -> Result<(), XContentError> {
    fields.name = Some(p.text()?);
    Ok(())
}

fn parse_emails(fields: &mut GroupFields, p: &mut dyn XContentParser) -> Result<(), XContentError> {
    ensure_expected_token(Token::StartArray, p.current_token(), || p.token_location())?;
    while p.next_token()? != Some(Token::EndArray) {
        fields.emails.push(EmailEntry::parse(p)?);
    }
    Ok(())
}

const GROUP_PARSER: ObjectParser<GroupFields> = ObjectParser::new(
    "email group",
    &[
        (SCHEMA_VERSION_FIELD, parse_schema_version),
        (NAME_FIELD, parse_name),
        (EMAILS_FIELD, parse_emails),
    ],
);
