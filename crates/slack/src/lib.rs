//! Slack surface of leadbot.
//!
//! Slack posts every interaction to one HTTP endpoint. This crate covers the
//! pieces around that endpoint:
//! - **Signatures** (`signature`) - `X-Slack-Signature` verification
//! - **Payloads** (`payload`) - Events API JSON, interactive and slash command forms
//! - **Events** (`events`) - `EventDispatcher` routing to the lead handlers
//! - **Block Kit** (`blocks`, `modal`) - the lead modal and the mention prompt
//! - **Web API** (`api`) - `users.info`, `views.open` and `chat.postEphemeral`
//! - **Notifier** (`notifier`) - the upload result message and its routing
//!
//! # Architecture
//!
//! ```text
//! POST /slack/events → verify → parse → EventDispatcher → Lead services
//!                                                            ↓
//!                            chat.postEphemeral ← result message
//! ```

pub mod api;
pub mod blocks;
pub mod events;
pub mod modal;
pub mod notifier;
pub mod payload;
pub mod signature;

pub use api::{SlackApi, SlackApiError, SlackWebClient};
pub use events::{
    lead_dispatcher, EventContext, EventDispatcher, EventHandlerError, SlackEnvelope, SlackEvent,
};
pub use payload::{parse_request, InboundRequest, PayloadError};
pub use signature::{SignatureError, SignatureVerifier};
