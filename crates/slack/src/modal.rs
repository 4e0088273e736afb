//! Lead modal and the mention prompt that opens it.

use leadbot_core::form::{
    FieldKind, LeadField, LEAD_FORM_SECTIONS, LEAD_MODAL_CALLBACK_ID, LEAD_MODAL_INTRO,
    LEAD_MODAL_SUBMIT_LABEL, LEAD_MODAL_TITLE, OPEN_LEAD_MODAL_ACTION_ID, SELECT_PLACEHOLDER,
};
use serde::{Deserialize, Serialize};

use crate::blocks::{
    Block, ButtonElement, ButtonStyle, InputElement, MessageBuilder, MessageTemplate, ModalView,
    OptionObject, TextObject,
};

pub const MENTION_PROMPT_TEXT: &str = "Please click on the button below to open lead modal.";
pub const OPEN_LEAD_MODAL_LABEL: &str = "Open Lead Modal";

/// Round-trips the originating channel through the modal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalMetadata {
    pub channel: String,
}

impl ModalMetadata {
    pub fn encode(&self) -> String {
        serde_json::json!({ "channel": self.channel }).to_string()
    }

    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

pub fn lead_modal(channel_id: &str) -> ModalView {
    let mut blocks =
        vec![Block::Section { block_id: None, text: TextObject::plain(LEAD_MODAL_INTRO) }];
    for section in LEAD_FORM_SECTIONS {
        if let Some(header) = section.header {
            blocks.push(Block::Header { text: TextObject::plain(header) });
        }
        blocks.extend(section.fields.iter().map(|field| input_block(*field)));
    }

    ModalView {
        callback_id: LEAD_MODAL_CALLBACK_ID.to_owned(),
        title: TextObject::plain(LEAD_MODAL_TITLE),
        submit: TextObject::plain(LEAD_MODAL_SUBMIT_LABEL),
        private_metadata: ModalMetadata { channel: channel_id.to_owned() }.encode(),
        blocks,
    }
}

fn input_block(field: LeadField) -> Block {
    let action_id = field.action_id();
    let options = || -> Vec<OptionObject> {
        field.options().iter().map(|option| OptionObject::new(option.text, option.value)).collect()
    };
    let element = match field.kind() {
        FieldKind::Text => InputElement::PlainTextInput {
            action_id,
            placeholder: Some(TextObject::plain(field.label())),
        },
        FieldKind::StaticSelect => InputElement::StaticSelect {
            action_id,
            placeholder: TextObject::plain(SELECT_PLACEHOLDER),
            options: options(),
        },
        FieldKind::Radio => InputElement::RadioButtons { action_id, options: options() },
    };

    Block::Input {
        label: TextObject::plain(field.label()),
        element,
        optional: field.is_optional(),
        hint: field.hint().map(TextObject::plain),
    }
}

pub fn mention_prompt() -> MessageTemplate {
    MessageBuilder::new(MENTION_PROMPT_TEXT)
        .section(|section| {
            section.mrkdwn(MENTION_PROMPT_TEXT);
        })
        .actions(|actions| {
            actions.button(
                ButtonElement::new(OPEN_LEAD_MODAL_ACTION_ID, OPEN_LEAD_MODAL_LABEL)
                    .style(ButtonStyle::Primary),
            );
        })
        .build()
}
