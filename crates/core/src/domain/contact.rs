use serde::Deserialize;

/// A CRM contact that matched the submitting user's email or Slack member id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ContactMatch {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "AccountId", default)]
    pub account_id: Option<String>,
}

/// The Slack member who submitted the form, as resolved through `users.info`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitterIdentity {
    pub user_id: String,
    pub email: Option<String>,
}
