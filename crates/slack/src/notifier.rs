use leadbot_core::errors::LEAD_SAVED_MESSAGE;
use tracing::{info, warn};

use crate::api::SlackApi;
use crate::blocks::{MessageBuilder, MessageTemplate};

pub const SUCCESS_COLOR: &str = "#198754";
pub const FAILURE_COLOR: &str = "#dc3545";
pub const SUCCESS_HEADER: &str = "Lead Data Upload Successful";
pub const FAILURE_HEADER: &str = "Lead Data Upload Unsuccessful";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeadOutcome {
    Saved,
    Failed { message: String },
}

impl LeadOutcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Saved => LEAD_SAVED_MESSAGE,
            Self::Failed { message } => message,
        }
    }
}

pub fn result_message(outcome: &LeadOutcome) -> MessageTemplate {
    let (color, header) = match outcome {
        LeadOutcome::Saved => (SUCCESS_COLOR, SUCCESS_HEADER),
        LeadOutcome::Failed { .. } => (FAILURE_COLOR, FAILURE_HEADER),
    };
    let text = outcome.message();

    MessageBuilder::new(text)
        .attachment(color, |attachment| {
            attachment.header(header).context_mrkdwn(format!("*{text}*"));
        })
        .build()
}

/// Ephemeral messages in a direct message conversation are addressed to the
/// user rather than the `D` channel id.
pub fn ephemeral_channel<'a>(channel_id: &'a str, user_id: &'a str) -> &'a str {
    if channel_id.starts_with('D') {
        user_id
    } else {
        channel_id
    }
}

/// Sends an ephemeral message, logging delivery failures instead of
/// returning them.
pub async fn deliver_ephemeral<A>(
    api: &A,
    channel_id: &str,
    user_id: &str,
    message: &MessageTemplate,
) where
    A: SlackApi + ?Sized,
{
    let channel = ephemeral_channel(channel_id, user_id);
    match api.post_ephemeral(channel, user_id, message).await {
        Ok(()) => info!(
            event_name = "slack.ephemeral.delivered",
            channel = channel,
            user_id = user_id,
            "ephemeral message delivered"
        ),
        Err(error) => warn!(
            event_name = "slack.ephemeral.failed",
            channel = channel,
            user_id = user_id,
            error = %error,
            "ephemeral message could not be delivered"
        ),
    }
}

pub async fn notify_result<A>(api: &A, channel_id: &str, user_id: &str, outcome: &LeadOutcome)
where
    A: SlackApi + ?Sized,
{
    deliver_ephemeral(api, channel_id, user_id, &result_message(outcome)).await;
}
