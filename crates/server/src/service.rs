use std::sync::Arc;

use async_trait::async_trait;
use leadbot_core::FormSubmission;
use leadbot_slack::events::{
    AppMentionEvent, LeadModalService, LeadSubmissionService, MentionService,
};
use leadbot_slack::modal::{lead_modal, mention_prompt};
use leadbot_slack::notifier::deliver_ephemeral;
use leadbot_slack::{EventContext, EventHandlerError, SlackApi};
use tracing::info;

use crate::pipeline::SubmissionPipeline;

/// Backs every lead handler: opening the modal, answering mentions and
/// running submitted forms through the pipeline.
pub struct LeadService {
    slack: Arc<dyn SlackApi>,
    pipeline: SubmissionPipeline,
}

impl LeadService {
    pub fn new(slack: Arc<dyn SlackApi>, pipeline: SubmissionPipeline) -> Self {
        Self { slack, pipeline }
    }
}

#[async_trait]
impl LeadModalService for LeadService {
    async fn open_lead_modal(
        &self,
        trigger_id: &str,
        channel_id: &str,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        self.slack.open_view(trigger_id, &lead_modal(channel_id)).await?;
        info!(
            event_name = "slack.modal.opened",
            correlation_id = %ctx.correlation_id,
            channel_id = channel_id,
            "lead modal opened"
        );
        Ok(())
    }
}

#[async_trait]
impl MentionService for LeadService {
    async fn prompt_for_lead(
        &self,
        event: &AppMentionEvent,
        _ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        deliver_ephemeral(self.slack.as_ref(), &event.channel_id, &event.user_id, &mention_prompt())
            .await;
        Ok(())
    }
}

#[async_trait]
impl LeadSubmissionService for LeadService {
    async fn submit_lead(
        &self,
        submission: &FormSubmission,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        self.pipeline.run(submission, ctx).await;
        Ok(())
    }
}
