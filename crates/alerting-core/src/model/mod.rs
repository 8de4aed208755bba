//! Domain documents (email groups and their entries).

pub mod schema;
pub mod validation;
pub mod email_entry;
pub mod email_group;

pub use self::schema::{NO_ID, NO_SCHEMA_VERSION};
pub use self::validation::ValidationError;
pub use self::email_entry::EmailEntry;
pub use self::email_group::{EMAIL_GROUP, EmailGroup};
