use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use leadbot_core::form::{LEAD_MODAL_CALLBACK_ID, OPEN_LEAD_MODAL_ACTION_ID};
use leadbot_core::FormSubmission;
use thiserror::Error;

use crate::api::SlackApiError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlackEnvelope {
    pub envelope_id: String,
    pub event: SlackEvent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlackEvent {
    SlashCommand(SlashCommandPayload),
    AppMention(AppMentionEvent),
    BlockAction(BlockActionEvent),
    ViewSubmission(ViewSubmissionEvent),
    Unsupported { event_type: String },
}

impl SlackEvent {
    pub fn event_type(&self) -> SlackEventType {
        match self {
            Self::SlashCommand(_) => SlackEventType::SlashCommand,
            Self::AppMention(_) => SlackEventType::AppMention,
            Self::BlockAction(_) => SlackEventType::BlockAction,
            Self::ViewSubmission(_) => SlackEventType::ViewSubmission,
            Self::Unsupported { .. } => SlackEventType::Unsupported,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlackEventType {
    SlashCommand,
    AppMention,
    BlockAction,
    ViewSubmission,
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashCommandPayload {
    pub command: String,
    pub text: String,
    pub channel_id: String,
    pub user_id: String,
    pub trigger_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppMentionEvent {
    pub channel_id: String,
    pub user_id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockActionEvent {
    pub action_id: String,
    pub user_id: String,
    pub channel_id: Option<String>,
    pub trigger_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSubmissionEvent {
    pub callback_id: String,
    pub submission: FormSubmission,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Processed,
    Ignored,
}

#[derive(Debug, Error)]
pub enum EventHandlerError {
    #[error(transparent)]
    Slack(#[from] SlackApiError),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] EventHandlerError),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn event_type(&self) -> SlackEventType;
    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError>;
}

#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<SlackEventType, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(handler.event_type(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, DispatchError> {
        let Some(handler) = self.handlers.get(&envelope.event.event_type()) else {
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(envelope, ctx).await.map_err(DispatchError::from)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Wires the four lead handlers to one service implementing every seam.
pub fn lead_dispatcher<S>(service: Arc<S>, lead_command: &str) -> EventDispatcher
where
    S: LeadModalService + MentionService + LeadSubmissionService + 'static,
{
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(SlashCommandHandler::new(service.clone(), lead_command));
    dispatcher.register(BlockActionHandler::new(service.clone()));
    dispatcher.register(AppMentionHandler::new(service.clone()));
    dispatcher.register(ViewSubmissionHandler::new(service));
    dispatcher
}

#[async_trait]
pub trait LeadModalService: Send + Sync {
    async fn open_lead_modal(
        &self,
        trigger_id: &str,
        channel_id: &str,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError>;
}

#[async_trait]
pub trait MentionService: Send + Sync {
    async fn prompt_for_lead(
        &self,
        event: &AppMentionEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError>;
}

#[async_trait]
pub trait LeadSubmissionService: Send + Sync {
    async fn submit_lead(
        &self,
        submission: &FormSubmission,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError>;
}

pub struct SlashCommandHandler<S> {
    service: Arc<S>,
    command: String,
}

impl<S> SlashCommandHandler<S>
where
    S: LeadModalService,
{
    pub fn new(service: Arc<S>, command: impl Into<String>) -> Self {
        Self { service, command: command.into() }
    }
}

#[async_trait]
impl<S> EventHandler for SlashCommandHandler<S>
where
    S: LeadModalService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::SlashCommand
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::SlashCommand(payload) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };
        if payload.command.trim() != self.command {
            return Ok(HandlerResult::Ignored);
        }

        self.service.open_lead_modal(&payload.trigger_id, &payload.channel_id, ctx).await?;
        Ok(HandlerResult::Processed)
    }
}

pub struct BlockActionHandler<S> {
    service: Arc<S>,
}

impl<S> BlockActionHandler<S>
where
    S: LeadModalService,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for BlockActionHandler<S>
where
    S: LeadModalService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::BlockAction
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::BlockAction(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };
        if event.action_id != OPEN_LEAD_MODAL_ACTION_ID {
            return Ok(HandlerResult::Ignored);
        }

        // Buttons in app home or a DM surface may come without a channel.
        let channel_id = event.channel_id.as_deref().unwrap_or(&event.user_id);
        self.service.open_lead_modal(&event.trigger_id, channel_id, ctx).await?;
        Ok(HandlerResult::Processed)
    }
}

pub struct AppMentionHandler<S> {
    service: Arc<S>,
}

impl<S> AppMentionHandler<S>
where
    S: MentionService,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for AppMentionHandler<S>
where
    S: MentionService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::AppMention
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::AppMention(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        self.service.prompt_for_lead(event, ctx).await?;
        Ok(HandlerResult::Processed)
    }
}

pub struct ViewSubmissionHandler<S> {
    service: Arc<S>,
}

impl<S> ViewSubmissionHandler<S>
where
    S: LeadSubmissionService,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for ViewSubmissionHandler<S>
where
    S: LeadSubmissionService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::ViewSubmission
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::ViewSubmission(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };
        if event.callback_id != LEAD_MODAL_CALLBACK_ID {
            return Ok(HandlerResult::Ignored);
        }

        self.service.submit_lead(&event.submission, ctx).await?;
        Ok(HandlerResult::Processed)
    }
}
