use std::collections::BTreeMap;

use serde::Deserialize;

/// Captured state of one modal input, as Slack reports it in `view.state.values`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FieldState {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SelectedOption {
    #[serde(default)]
    pub text: Option<OptionText>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OptionText {
    #[serde(default)]
    pub text: String,
}

impl FieldState {
    pub fn text(value: impl Into<String>) -> Self {
        Self { kind: Some("plain_text_input".to_owned()), value: Some(value.into()), ..Self::default() }
    }

    pub fn selected(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            kind: Some("static_select".to_owned()),
            selected_option: Some(SelectedOption {
                text: Some(OptionText { text: value.clone() }),
                value: Some(value),
            }),
            ..Self::default()
        }
    }

    pub fn unselected() -> Self {
        Self { kind: Some("static_select".to_owned()), ..Self::default() }
    }

    /// The free-text value, if one was entered.
    pub fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|value| !value.is_empty())
    }

    /// The value of the selected option, if an option with a value is selected.
    pub fn selected_value(&self) -> Option<&str> {
        self.selected_option.as_ref().and_then(|option| option.value.as_deref())
    }
}

/// Block id → action id → field state.
pub type BlockValues = BTreeMap<String, BTreeMap<String, FieldState>>;

/// One submitted lead modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSubmission {
    pub user_id: String,
    pub channel_id: String,
    pub values: BlockValues,
}

impl FormSubmission {
    /// Merges every block's fields into a single map keyed by action id.
    pub fn flatten(&self) -> FlatFields {
        let mut fields = BTreeMap::new();
        for block in self.values.values() {
            for (action_id, state) in block {
                fields.insert(action_id.clone(), state.clone());
            }
        }
        FlatFields(fields)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatFields(BTreeMap<String, FieldState>);

impl FlatFields {
    pub fn get(&self, action_id: &str) -> Option<&FieldState> {
        self.0.get(action_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FieldState)> for FlatFields {
    fn from_iter<T: IntoIterator<Item = (String, FieldState)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
