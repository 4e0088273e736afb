//! Lead domain for the leadbot Slack integration: configuration, the lead
//! form definition, submission state, and the field mapping that turns a
//! submitted modal into a Salesforce lead.

pub mod config;
pub mod domain;
pub mod errors;
pub mod form;
pub mod mapping;

pub use domain::contact::{ContactMatch, SubmitterIdentity};
pub use domain::lead::{LeadRecord, RequiredLeadFields};
pub use domain::submission::{BlockValues, FieldState, FlatFields, FormSubmission};
pub use errors::SubmissionError;
pub use form::{FieldKind, FieldOption, LeadField, LEAD_FORM_SECTIONS};
pub use mapping::{lead_from_fields, MappingError};
