use leadbot_core::errors::GENERIC_FAILURE_MESSAGE;
use leadbot_core::LeadRecord;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::CrmError;
use crate::token::AccessToken;

const LEAD_ENDPOINT: &str = "sobjects/Lead";

/// Friendlier wording for rejection messages, matched by substring.
pub const REJECTION_MESSAGES: &[(&str, &str)] =
    &[("Email: invalid email address", "Invalid Email Address")];

/// One entry of the error array Salesforce returns on a rejected write.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "errorCode")]
    pub error_code: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LeadCreated {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "created")]
    pub success: bool,
}

fn created() -> bool {
    true
}

pub(crate) async fn create_lead(
    http: &Client,
    data_url: &str,
    token: &AccessToken,
    lead: &LeadRecord,
) -> Result<LeadCreated, CrmError> {
    let response = http
        .post(format!("{data_url}/sobjects/Lead/"))
        .bearer_auth(token.expose())
        .json(lead)
        .send()
        .await
        .map_err(|source| CrmError::Transport { endpoint: LEAD_ENDPOINT, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let errors = serde_json::from_str::<Vec<ApiError>>(&body).unwrap_or_default();
        warn!(
            event_name = "crm.salesforce.lead_rejected",
            status = status.as_u16(),
            error_count = errors.len(),
            "salesforce rejected lead"
        );
        return Err(CrmError::Rejected { status: status.as_u16(), errors, body });
    }

    // A 2xx means the lead exists; the body only adds the id.
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<LeadCreated>(&body) {
        Ok(created) => Ok(created),
        Err(error) => {
            debug!(
                event_name = "crm.salesforce.lead_body_unreadable",
                status = status.as_u16(),
                error = %error,
                "lead created but response body could not be decoded"
            );
            Ok(LeadCreated { id: None, success: true })
        }
    }
}

/// Picks the text shown to the submitter for a failed lead write.
///
/// The first error entry carrying both a code and a message decides: a
/// known message is translated, any other message is shown as Salesforce
/// wrote it. Malformed bodies and non-rejection failures get the generic
/// failure text.
pub fn user_message_for(error: &CrmError) -> String {
    let CrmError::Rejected { errors, .. } = error else {
        return GENERIC_FAILURE_MESSAGE.to_owned();
    };

    errors
        .iter()
        .find_map(|entry| match (&entry.error_code, &entry.message) {
            (Some(_), Some(message)) => Some(message.as_str()),
            _ => None,
        })
        .map(|message| {
            REJECTION_MESSAGES
                .iter()
                .find(|(known, _)| message.contains(known))
                .map_or_else(|| message.to_owned(), |(_, friendly)| (*friendly).to_owned())
        })
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned())
}
