use std::sync::Arc;

use leadbot_core::{lead_from_fields, FormSubmission, SubmissionError};
use leadbot_crm::{user_message_for, CrmGateway, LeadCreated};
use leadbot_slack::notifier::{notify_result, LeadOutcome};
use leadbot_slack::{EventContext, SlackApi};
use tracing::{info, warn};

struct SavedLead {
    created: LeadCreated,
    referral: bool,
}

/// Takes one submitted lead modal through mapping, identity lookup, CRM
/// authentication, referral enrichment and upload, then tells the submitter
/// how it went.
pub struct SubmissionPipeline {
    crm: Arc<dyn CrmGateway>,
    slack: Arc<dyn SlackApi>,
}

impl SubmissionPipeline {
    pub fn new(crm: Arc<dyn CrmGateway>, slack: Arc<dyn SlackApi>) -> Self {
        Self { crm, slack }
    }

    /// Never fails: every error ends up logged and turned into a failure
    /// notification.
    pub async fn run(&self, submission: &FormSubmission, ctx: &EventContext) -> LeadOutcome {
        let outcome = match self.process(submission).await {
            Ok(saved) => {
                info!(
                    event_name = "pipeline.lead.saved",
                    correlation_id = %ctx.correlation_id,
                    user_id = %submission.user_id,
                    lead_id = saved.created.id.as_deref().unwrap_or("unknown"),
                    referral = saved.referral,
                    "lead uploaded to salesforce"
                );
                LeadOutcome::Saved
            }
            Err(error) => {
                warn!(
                    event_name = "pipeline.lead.failed",
                    correlation_id = %ctx.correlation_id,
                    user_id = %submission.user_id,
                    stage = error.stage(),
                    error = %error,
                    "lead submission failed"
                );
                LeadOutcome::Failed { message: error.user_message().to_owned() }
            }
        };

        notify_result(self.slack.as_ref(), &submission.channel_id, &submission.user_id, &outcome)
            .await;
        outcome
    }

    async fn process(&self, submission: &FormSubmission) -> Result<SavedLead, SubmissionError> {
        let lead = lead_from_fields(&submission.flatten())?;

        let email = self
            .slack
            .user_email(&submission.user_id)
            .await
            .map_err(|error| SubmissionError::Identity(error.to_string()))?;

        let token = self
            .crm
            .access_token()
            .await
            .map_err(|error| SubmissionError::Authentication(error.to_string()))?;

        let contact = self
            .crm
            .find_contact(&token, &submission.user_id, email.as_deref())
            .await
            .map_err(|error| SubmissionError::ContactLookup(error.to_string()))?;
        let lead = match contact {
            Some(contact) => lead.with_referral(&contact),
            None => lead,
        };

        let created =
            self.crm.create_lead(&token, &lead).await.map_err(|error| SubmissionError::Upload {
                user_message: user_message_for(&error),
                detail: error.to_string(),
            })?;
        Ok(SavedLead { created, referral: lead.has_referral() })
    }
}
