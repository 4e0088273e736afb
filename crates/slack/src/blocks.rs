use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TextObject {
    #[serde(rename = "plain_text")]
    Plain { text: String, emoji: bool },
    #[serde(rename = "mrkdwn")]
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into(), emoji: true }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Plain { text, .. } | Self::Mrkdwn { text } => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "button")]
pub struct ButtonElement {
    pub action_id: String,
    pub text: TextObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ButtonElement {
    pub fn new(action_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            text: TextObject::plain(label),
            style: None,
            value: None,
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionObject {
    pub text: TextObject,
    pub value: String,
}

impl OptionObject {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self { text: TextObject::plain(text), value: value.into() }
    }
}

/// Interactive element hosted by an input block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputElement {
    PlainTextInput {
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
    },
    StaticSelect {
        action_id: String,
        placeholder: TextObject,
        options: Vec<OptionObject>,
    },
    RadioButtons {
        action_id: String,
        options: Vec<OptionObject>,
    },
}

impl InputElement {
    pub fn action_id(&self) -> &str {
        match self {
            Self::PlainTextInput { action_id, .. }
            | Self::StaticSelect { action_id, .. }
            | Self::RadioButtons { action_id, .. } => action_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        text: TextObject,
    },
    Actions {
        #[serde(skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        elements: Vec<ButtonElement>,
    },
    Context {
        elements: Vec<TextObject>,
    },
    Input {
        label: TextObject,
        element: InputElement,
        optional: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<TextObject>,
    },
}

/// A colored sidebar attachment carrying its own blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub color: String,
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    #[serde(rename = "text")]
    pub fallback_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "modal")]
pub struct ModalView {
    pub callback_id: String,
    pub title: TextObject,
    pub submit: TextObject,
    pub private_metadata: String,
    pub blocks: Vec<Block>,
}

pub struct MessageBuilder {
    fallback_text: String,
    blocks: Vec<Block>,
    attachments: Vec<Attachment>,
}

impl MessageBuilder {
    pub fn new(fallback_text: impl Into<String>) -> Self {
        Self { fallback_text: fallback_text.into(), blocks: Vec::new(), attachments: Vec::new() }
    }

    pub fn section<F>(mut self, build: F) -> Self
    where
        F: FnOnce(&mut SectionBuilder),
    {
        let mut builder = SectionBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Section { block_id: None, text: builder.build() });
        self
    }

    pub fn actions<F>(mut self, build: F) -> Self
    where
        F: FnOnce(&mut ActionsBuilder),
    {
        let mut builder = ActionsBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Actions { block_id: None, elements: builder.build() });
        self
    }

    pub fn attachment<F>(mut self, color: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut AttachmentBuilder),
    {
        let mut builder = AttachmentBuilder::default();
        build(&mut builder);
        self.attachments.push(Attachment { color: color.into(), blocks: builder.blocks });
        self
    }

    pub fn build(self) -> MessageTemplate {
        MessageTemplate {
            fallback_text: self.fallback_text,
            blocks: self.blocks,
            attachments: self.attachments,
        }
    }
}

#[derive(Default)]
pub struct SectionBuilder {
    text: Option<TextObject>,
}

impl SectionBuilder {
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::plain(text));
        self
    }

    pub fn mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::mrkdwn(text));
        self
    }

    fn build(self) -> TextObject {
        self.text.unwrap_or_else(|| TextObject::plain(""))
    }
}

#[derive(Default)]
pub struct ActionsBuilder {
    elements: Vec<ButtonElement>,
}

impl ActionsBuilder {
    pub fn button(&mut self, button: ButtonElement) -> &mut Self {
        self.elements.push(button);
        self
    }

    fn build(self) -> Vec<ButtonElement> {
        self.elements
    }
}

#[derive(Default)]
pub struct AttachmentBuilder {
    blocks: Vec<Block>,
}

impl AttachmentBuilder {
    pub fn header(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Header { text: TextObject::plain(text) });
        self
    }

    pub fn context_mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Context { elements: vec![TextObject::mrkdwn(text)] });
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        Block, ButtonElement, ButtonStyle, InputElement, MessageBuilder, OptionObject, TextObject,
    };

    #[test]
    fn plain_text_serializes_with_slack_type_name() {
        let value = serde_json::to_value(TextObject::plain("Hi")).expect("serialize");
        assert_eq!(value, json!({"type": "plain_text", "text": "Hi", "emoji": true}));
    }

    #[test]
    fn message_builder_emits_section_and_primary_button() {
        let message = MessageBuilder::new("fallback")
            .section(|section| {
                section.mrkdwn("Pick one");
            })
            .actions(|actions| {
                actions.button(ButtonElement::new("go", "Go").style(ButtonStyle::Primary));
            })
            .build();

        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(value["text"], "fallback");
        assert_eq!(value["blocks"][0]["type"], "section");
        assert_eq!(value["blocks"][1]["elements"][0]["type"], "button");
        assert_eq!(value["blocks"][1]["elements"][0]["style"], "primary");
        assert!(value.get("attachments").is_none());
    }

    #[test]
    fn attachment_carries_color_and_blocks() {
        let message = MessageBuilder::new("done")
            .attachment("#198754", |attachment| {
                attachment.header("Title").context_mrkdwn("*body*");
            })
            .build();

        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(value["attachments"][0]["color"], "#198754");
        assert_eq!(value["attachments"][0]["blocks"][0]["type"], "header");
        assert_eq!(value["attachments"][0]["blocks"][1]["elements"][0]["text"], "*body*");
        assert!(value.get("blocks").is_none());
    }

    #[test]
    fn static_select_input_serializes_options() {
        let block = Block::Input {
            label: TextObject::plain("State"),
            element: InputElement::StaticSelect {
                action_id: "state".to_owned(),
                placeholder: TextObject::plain("Select an item"),
                options: vec![OptionObject::new("Victoria", "Victoria")],
            },
            optional: true,
            hint: None,
        };

        let value = serde_json::to_value(&block).expect("serialize");
        assert_eq!(value["type"], "input");
        assert_eq!(value["element"]["type"], "static_select");
        assert_eq!(value["element"]["options"][0]["value"], "Victoria");
        assert_eq!(value["optional"], true);
        assert!(value.get("hint").is_none());
    }
}
