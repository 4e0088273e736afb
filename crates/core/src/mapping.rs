use thiserror::Error;

use crate::domain::lead::{LeadRecord, RequiredLeadFields};
use crate::domain::submission::{FieldState, FlatFields};
use crate::form::LeadField;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("required field `{0}` is missing from the submission")]
    MissingField(String),
    #[error("required field `{0}` has no value")]
    MissingValue(String),
    #[error("required select `{0}` has no selected option value")]
    MissingSelection(String),
}

/// Builds a lead from a flattened submission.
///
/// Required text fields and the two required selects must be present;
/// optional text fields are kept only when non-empty and optional selects
/// only when an option with a value is selected.
pub fn lead_from_fields(fields: &FlatFields) -> Result<LeadRecord, MappingError> {
    let required = RequiredLeadFields {
        first_name: required_text(fields, LeadField::FirstName)?,
        last_name: required_text(fields, LeadField::LastName)?,
        title: required_text(fields, LeadField::Title)?,
        email: required_text(fields, LeadField::Email)?,
        company: required_text(fields, LeadField::Company)?,
        opportunity_type: required_selection(fields, LeadField::OpportunityType)?,
        added_to_notes: required_selection(fields, LeadField::AddedToNotes)?,
    };

    let mut lead = LeadRecord::new(required);
    lead.phone = optional_text(fields, LeadField::OfficePhone);
    lead.mobile_phone = optional_text(fields, LeadField::MobilePhone);
    lead.account_vertical = optional_selection(fields, LeadField::AccountVertical);
    lead.employee_count_band = optional_selection(fields, LeadField::EmployeeCount);
    lead.street = optional_text(fields, LeadField::Street);
    lead.city = optional_text(fields, LeadField::City);
    lead.state_province = optional_selection(fields, LeadField::StateProvince);
    lead.postal_code = optional_text(fields, LeadField::Postcode);

    Ok(lead)
}

fn field(fields: &FlatFields, field: LeadField) -> Result<&FieldState, MappingError> {
    let action_id = field.action_id();
    fields.get(&action_id).ok_or(MappingError::MissingField(action_id))
}

fn required_text(fields: &FlatFields, lead_field: LeadField) -> Result<String, MappingError> {
    field(fields, lead_field)?
        .value
        .clone()
        .ok_or_else(|| MappingError::MissingValue(lead_field.action_id()))
}

fn required_selection(fields: &FlatFields, lead_field: LeadField) -> Result<String, MappingError> {
    field(fields, lead_field)?
        .selected_value()
        .map(str::to_owned)
        .ok_or_else(|| MappingError::MissingSelection(lead_field.action_id()))
}

fn optional_text(fields: &FlatFields, lead_field: LeadField) -> Option<String> {
    fields.get(&lead_field.action_id()).and_then(FieldState::non_empty_value).map(str::to_owned)
}

fn optional_selection(fields: &FlatFields, lead_field: LeadField) -> Option<String> {
    fields.get(&lead_field.action_id()).and_then(FieldState::selected_value).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{lead_from_fields, MappingError};
    use crate::domain::submission::{FieldState, FlatFields, SelectedOption};

    fn required_fields() -> Vec<(String, FieldState)> {
        vec![
            ("first_name".to_owned(), FieldState::text("Jane")),
            ("last_name".to_owned(), FieldState::text("Doe")),
            ("title".to_owned(), FieldState::text("Head of IT")),
            ("email".to_owned(), FieldState::text("jane@x.com")),
            ("company".to_owned(), FieldState::text("Acme")),
            ("opportunity_type".to_owned(), FieldState::selected("Implementation")),
            ("notes_radio".to_owned(), FieldState::selected("true")),
        ]
    }

    fn with(extra: Vec<(&str, FieldState)>) -> FlatFields {
        required_fields()
            .into_iter()
            .chain(extra.into_iter().map(|(key, state)| (key.to_owned(), state)))
            .collect()
    }

    #[test]
    fn required_only_submission_produces_minimal_lead() {
        let lead = lead_from_fields(&with(vec![])).expect("mapping should succeed");

        assert_eq!(
            serde_json::to_value(&lead).expect("serialize"),
            json!({
                "Country": "Australia",
                "LeadSource": "Partner Referral",
                "FirstName": "Jane",
                "LastName": "Doe",
                "Title": "Head of IT",
                "Email": "jane@x.com",
                "Company": "Acme",
                "Opportunity_Type__c": "Implementation",
                "Added_to_QUIP_Notes__c": "true"
            })
        );
    }

    #[test]
    fn filled_optional_fields_map_to_crm_names() {
        let fields = with(vec![
            ("office_phone", FieldState::text("02 9999 0000")),
            ("mobile_phone", FieldState::text("0400 000 000")),
            ("salesforce_account_vertical", FieldState::selected("High Tech")),
            ("how_many_fte's_do_they_have?", FieldState::selected("11-50 employees")),
            ("street", FieldState::text("1 George St")),
            ("city", FieldState::text("Sydney")),
            ("state/province", FieldState::selected("New South Wales")),
            ("postcode", FieldState::text("2000")),
        ]);

        let value = serde_json::to_value(lead_from_fields(&fields).expect("map")).expect("json");

        assert_eq!(value["Phone"], "02 9999 0000");
        assert_eq!(value["MobilePhone"], "0400 000 000");
        assert_eq!(value["Salesforce_Account_Vertical__c"], "High Tech");
        assert_eq!(value["How_many_FTE_s_do_they_have__c"], "11-50 employees");
        assert_eq!(value["Street"], "1 George St");
        assert_eq!(value["City"], "Sydney");
        assert_eq!(value["State"], "New South Wales");
        assert_eq!(value["Postalcode"], "2000");
    }

    #[test]
    fn empty_text_and_unselected_options_are_omitted() {
        let fields = with(vec![
            ("office_phone", FieldState::text("")),
            ("city", FieldState { value: None, ..FieldState::default() }),
            ("state/province", FieldState::unselected()),
            (
                "salesforce_account_vertical",
                FieldState {
                    selected_option: Some(SelectedOption { text: None, value: None }),
                    ..FieldState::default()
                },
            ),
        ]);

        let value = serde_json::to_value(lead_from_fields(&fields).expect("map")).expect("json");
        let object = value.as_object().expect("object");

        for key in ["Phone", "City", "State", "Salesforce_Account_Vertical__c"] {
            assert!(!object.contains_key(key), "`{key}` should be omitted");
        }
        assert_eq!(object.len(), 9);
    }

    #[test]
    fn missing_required_text_is_a_mapping_defect() {
        let fields: FlatFields =
            required_fields().into_iter().filter(|(key, _)| key != "email").collect();

        assert_eq!(
            lead_from_fields(&fields),
            Err(MappingError::MissingField("email".to_owned()))
        );
    }

    #[test]
    fn unselected_opportunity_type_is_not_silently_dropped() {
        let fields: FlatFields = required_fields()
            .into_iter()
            .map(|(key, state)| {
                if key == "opportunity_type" {
                    (key, FieldState::unselected())
                } else {
                    (key, state)
                }
            })
            .collect();

        assert_eq!(
            lead_from_fields(&fields),
            Err(MappingError::MissingSelection("opportunity_type".to_owned()))
        );
    }
}
