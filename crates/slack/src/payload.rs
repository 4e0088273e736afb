//! Decoding of the three body shapes Slack posts to the events endpoint:
//! Events API JSON, interactive `payload=` forms and slash command forms.

use leadbot_core::{BlockValues, FormSubmission};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::events::{
    AppMentionEvent, BlockActionEvent, SlackEnvelope, SlackEvent, SlashCommandPayload,
    ViewSubmissionEvent,
};
use crate::modal::ModalMetadata;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundRequest {
    UrlVerification { challenge: String },
    Envelope(SlackEnvelope),
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("request body is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("form body is missing `{0}`")]
    MissingFormField(&'static str),
    #[error("interactive payload has no actions")]
    NoActions,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum EventsApiBody {
    #[serde(rename = "url_verification")]
    UrlVerification { challenge: String },
    #[serde(rename = "event_callback")]
    EventCallback {
        #[serde(default)]
        event_id: Option<String>,
        event: CallbackEvent,
    },
    #[serde(other)]
    Other,
}

// `user` and `channel` are objects on some event types, e.g. `channel_created`.
#[derive(Debug, Deserialize)]
struct CallbackEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    user: Value,
    #[serde(default)]
    channel: Value,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    event_ts: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum InteractivePayload {
    #[serde(rename = "block_actions")]
    BlockActions {
        user: PayloadUser,
        #[serde(default)]
        channel: Option<PayloadChannel>,
        trigger_id: String,
        #[serde(default)]
        actions: Vec<PayloadAction>,
    },
    #[serde(rename = "view_submission")]
    ViewSubmission { user: PayloadUser, view: PayloadView },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct PayloadUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PayloadChannel {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PayloadAction {
    action_id: String,
}

#[derive(Debug, Deserialize)]
struct PayloadView {
    #[serde(default)]
    id: Option<String>,
    callback_id: String,
    #[serde(default)]
    private_metadata: String,
    #[serde(default)]
    state: PayloadState,
}

#[derive(Debug, Default, Deserialize)]
struct PayloadState {
    #[serde(default)]
    values: BlockValues,
}

/// Chooses the decoder from the request content type.
pub fn parse_request(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<InboundRequest, PayloadError> {
    let is_json = content_type
        .map(|value| value.trim_start().starts_with("application/json"))
        .unwrap_or(false);
    if is_json {
        parse_events_api(body)
    } else {
        parse_form(body)
    }
}

pub fn parse_events_api(body: &[u8]) -> Result<InboundRequest, PayloadError> {
    match serde_json::from_slice::<EventsApiBody>(body)? {
        EventsApiBody::UrlVerification { challenge } => {
            Ok(InboundRequest::UrlVerification { challenge })
        }
        EventsApiBody::EventCallback { event_id, event } => {
            let envelope_id = event_id
                .or_else(|| event.event_ts.clone())
                .unwrap_or_else(|| "unknown-event".to_owned());
            Ok(InboundRequest::Envelope(SlackEnvelope {
                envelope_id,
                event: callback_event(event),
            }))
        }
        EventsApiBody::Other => Ok(InboundRequest::Envelope(SlackEnvelope {
            envelope_id: "unknown-event".to_owned(),
            event: SlackEvent::Unsupported { event_type: "events_api".to_owned() },
        })),
    }
}

fn callback_event(event: CallbackEvent) -> SlackEvent {
    let CallbackEvent { kind, user, channel, text, .. } = event;
    if kind == "app_mention" {
        if let (Some(user_id), Some(channel_id)) = (user.as_str(), channel.as_str()) {
            return SlackEvent::AppMention(AppMentionEvent {
                channel_id: channel_id.to_owned(),
                user_id: user_id.to_owned(),
                text: text.unwrap_or_default(),
            });
        }
    }
    SlackEvent::Unsupported { event_type: kind }
}

pub fn parse_form(body: &[u8]) -> Result<InboundRequest, PayloadError> {
    let fields: Vec<(String, String)> = url::form_urlencoded::parse(body).into_owned().collect();
    let field =
        |name: &str| fields.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str());

    if let Some(payload) = field("payload") {
        return parse_interactive(payload).map(InboundRequest::Envelope);
    }

    let required = |name: &'static str| {
        field(name).map(str::to_owned).ok_or(PayloadError::MissingFormField(name))
    };
    let trigger_id = required("trigger_id")?;
    Ok(InboundRequest::Envelope(SlackEnvelope {
        envelope_id: trigger_id.clone(),
        event: SlackEvent::SlashCommand(SlashCommandPayload {
            command: required("command")?,
            text: field("text").unwrap_or_default().to_owned(),
            channel_id: required("channel_id")?,
            user_id: required("user_id")?,
            trigger_id,
        }),
    }))
}

pub fn parse_interactive(payload: &str) -> Result<SlackEnvelope, PayloadError> {
    match serde_json::from_str::<InteractivePayload>(payload)? {
        InteractivePayload::BlockActions { user, channel, trigger_id, actions } => {
            let action = actions.into_iter().next().ok_or(PayloadError::NoActions)?;
            Ok(SlackEnvelope {
                envelope_id: trigger_id.clone(),
                event: SlackEvent::BlockAction(BlockActionEvent {
                    action_id: action.action_id,
                    user_id: user.id,
                    channel_id: channel.map(|channel| channel.id),
                    trigger_id,
                }),
            })
        }
        InteractivePayload::ViewSubmission { user, view } => {
            // Without the originating channel the result goes to the submitter directly.
            let channel_id = ModalMetadata::decode(&view.private_metadata)
                .map(|metadata| metadata.channel)
                .unwrap_or_else(|| user.id.clone());
            Ok(SlackEnvelope {
                envelope_id: view.id.unwrap_or_else(|| "unknown-view".to_owned()),
                event: SlackEvent::ViewSubmission(ViewSubmissionEvent {
                    callback_id: view.callback_id,
                    submission: FormSubmission {
                        user_id: user.id,
                        channel_id,
                        values: view.state.values,
                    },
                }),
            })
        }
        InteractivePayload::Other => Ok(SlackEnvelope {
            envelope_id: "unknown-interaction".to_owned(),
            event: SlackEvent::Unsupported { event_type: "interactive".to_owned() },
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_request, InboundRequest, PayloadError};
    use crate::events::SlackEvent;

    fn form(pairs: &[(&str, &str)]) -> Vec<u8> {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
            .into_bytes()
    }

    fn envelope_event(request: InboundRequest) -> SlackEvent {
        match request {
            InboundRequest::Envelope(envelope) => envelope.event,
            other => panic!("expected envelope, got {other:?}"),
        }
    }

    #[test]
    fn url_verification_echoes_challenge() {
        let body = json!({"type": "url_verification", "token": "t", "challenge": "3eZbrw1a"});
        let request = parse_request(Some("application/json"), body.to_string().as_bytes())
            .expect("should parse");

        assert_eq!(request, InboundRequest::UrlVerification { challenge: "3eZbrw1a".to_owned() });
    }

    #[test]
    fn app_mention_callback_becomes_mention_event() {
        let body = json!({
            "type": "event_callback",
            "event_id": "Ev123",
            "event": {
                "type": "app_mention",
                "user": "U1",
                "channel": "C1",
                "text": "<@B> lead",
                "event_ts": "1.2"
            }
        });
        let request =
            parse_request(Some("application/json; charset=utf-8"), body.to_string().as_bytes())
                .expect("should parse");

        let InboundRequest::Envelope(envelope) = request else {
            panic!("expected envelope");
        };
        assert_eq!(envelope.envelope_id, "Ev123");
        assert!(matches!(
            envelope.event,
            SlackEvent::AppMention(ref event) if event.channel_id == "C1" && event.user_id == "U1"
        ));
    }

    #[test]
    fn other_callbacks_are_unsupported() {
        let body = json!({
            "type": "event_callback",
            "event": {"type": "reaction_added", "user": "U1"}
        });
        let request = parse_request(Some("application/json"), body.to_string().as_bytes());
        let event = envelope_event(request.expect("parse"));

        assert_eq!(event, SlackEvent::Unsupported { event_type: "reaction_added".to_owned() });
    }

    #[test]
    fn callbacks_with_object_channel_are_unsupported() {
        let body = json!({
            "type": "event_callback",
            "event_id": "Ev9",
            "event": {
                "type": "channel_created",
                "channel": {"id": "C024BE91L", "name": "fun", "created": 1360782804, "creator": "U1"}
            }
        });
        let request = parse_request(Some("application/json"), body.to_string().as_bytes());
        let event = envelope_event(request.expect("object channel should still parse"));

        assert_eq!(event, SlackEvent::Unsupported { event_type: "channel_created".to_owned() });
    }

    #[test]
    fn slash_command_form_is_decoded() {
        let body = form(&[
            ("command", "/lead"),
            ("text", ""),
            ("channel_id", "C2"),
            ("user_id", "U2"),
            ("trigger_id", "13345224609.738474920.8088930838d88f008e0"),
        ]);
        let request = parse_request(Some("application/x-www-form-urlencoded"), &body);
        let event = envelope_event(request.expect("parse"));

        let SlackEvent::SlashCommand(command) = event else {
            panic!("expected slash command");
        };
        assert_eq!(command.command, "/lead");
        assert_eq!(command.channel_id, "C2");
        assert_eq!(command.trigger_id, "13345224609.738474920.8088930838d88f008e0");
    }

    #[test]
    fn slash_command_without_trigger_is_rejected() {
        let body = form(&[("command", "/lead"), ("channel_id", "C2"), ("user_id", "U2")]);
        assert!(matches!(
            parse_request(None, &body),
            Err(PayloadError::MissingFormField("trigger_id"))
        ));
    }

    #[test]
    fn open_button_action_is_decoded() {
        let payload = json!({
            "type": "block_actions",
            "user": {"id": "U3"},
            "channel": {"id": "D3"},
            "trigger_id": "trig-3",
            "actions": [{"action_id": "lead_modal", "type": "button"}]
        });
        let body = form(&[("payload", payload.to_string().as_str())]);
        let event = envelope_event(parse_request(None, &body).expect("parse"));

        let SlackEvent::BlockAction(action) = event else {
            panic!("expected block action");
        };
        assert_eq!(action.action_id, "lead_modal");
        assert_eq!(action.channel_id.as_deref(), Some("D3"));
    }

    #[test]
    fn view_submission_carries_state_and_metadata_channel() {
        let payload = json!({
            "type": "view_submission",
            "user": {"id": "U4"},
            "view": {
                "id": "V1",
                "callback_id": "lead_modal",
                "private_metadata": "{\"channel\":\"C9\"}",
                "state": {"values": {
                    "b1": {"first_name": {"type": "plain_text_input", "value": "Jane"}},
                    "b2": {"state/province": {"type": "static_select", "selected_option": null}}
                }}
            }
        });
        let body = form(&[("payload", payload.to_string().as_str())]);
        let event = envelope_event(parse_request(None, &body).expect("parse"));

        let SlackEvent::ViewSubmission(view) = event else {
            panic!("expected view submission");
        };
        assert_eq!(view.callback_id, "lead_modal");
        assert_eq!(view.submission.channel_id, "C9");
        assert_eq!(view.submission.user_id, "U4");
        let fields = view.submission.flatten();
        assert_eq!(fields.get("first_name").and_then(|field| field.value.as_deref()), Some("Jane"));
        assert_eq!(fields.get("state/province").and_then(|field| field.selected_value()), None);
    }

    #[test]
    fn view_submission_without_metadata_routes_to_user() {
        let payload = json!({
            "type": "view_submission",
            "user": {"id": "U4"},
            "view": {"callback_id": "lead_modal", "state": {"values": {}}}
        });
        let body = form(&[("payload", payload.to_string().as_str())]);
        let event = envelope_event(parse_request(None, &body).expect("parse"));
        let SlackEvent::ViewSubmission(view) = event else {
            panic!("expected view submission");
        };

        assert_eq!(view.submission.channel_id, "U4");
    }

    #[test]
    fn garbage_payload_is_a_json_error() {
        let body = form(&[("payload", "{not json")]);
        assert!(matches!(parse_request(None, &body), Err(PayloadError::Json(_))));
    }
}
