use thiserror::Error;

use crate::mapping::MappingError;

pub const LEAD_SAVED_MESSAGE: &str = "Lead Data Added to SalesForce Successfully.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went Wrong. Unable to Save Lead Data.";
pub const CRM_UNREACHABLE_MESSAGE: &str = "Unable to reach SalesForce. Lead Data was not saved.";

/// Failure of one lead submission, tagged with the pipeline stage it came from.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("submitter identity lookup failed: {0}")]
    Identity(String),
    #[error("crm authentication failed: {0}")]
    Authentication(String),
    #[error("crm contact lookup failed: {0}")]
    ContactLookup(String),
    #[error("crm lead upload failed: {detail}")]
    Upload { detail: String, user_message: String },
}

impl SubmissionError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Identity(_) => "identity",
            Self::Authentication(_) => "authentication",
            Self::ContactLookup(_) => "contact_lookup",
            Self::Upload { .. } => "upload",
        }
    }

    /// Text shown to the submitter; never includes internal error detail
    /// except the CRM's own rejection message on upload.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Mapping(_) => GENERIC_FAILURE_MESSAGE,
            Self::Identity(_) | Self::Authentication(_) | Self::ContactLookup(_) => {
                CRM_UNREACHABLE_MESSAGE
            }
            Self::Upload { user_message, .. } => user_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SubmissionError, CRM_UNREACHABLE_MESSAGE, GENERIC_FAILURE_MESSAGE};
    use crate::mapping::MappingError;

    #[test]
    fn upload_error_surfaces_crm_message() {
        let error = SubmissionError::Upload {
            detail: "400 Bad Request".to_owned(),
            user_message: "Invalid Email Address".to_owned(),
        };

        assert_eq!(error.stage(), "upload");
        assert_eq!(error.user_message(), "Invalid Email Address");
    }

    #[test]
    fn pre_upload_failures_use_fixed_messages() {
        let auth = SubmissionError::Authentication("token endpoint returned 400".to_owned());
        assert_eq!(auth.user_message(), CRM_UNREACHABLE_MESSAGE);
        assert!(!auth.user_message().contains("400"));

        let mapping = SubmissionError::from(MappingError::MissingField("email".to_owned()));
        assert_eq!(mapping.stage(), "mapping");
        assert_eq!(mapping.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
