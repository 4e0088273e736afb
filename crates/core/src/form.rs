//! Static definition of the lead form.
//!
//! The modal builder renders these fields and the submission mapper reads
//! them back by action id, so both sides agree on identifiers without
//! repeating string literals.

pub const LEAD_MODAL_CALLBACK_ID: &str = "lead_modal";
pub const OPEN_LEAD_MODAL_ACTION_ID: &str = "lead_modal";
pub const LEAD_MODAL_TITLE: &str = "SOL Business Lead";
pub const LEAD_MODAL_SUBMIT_LABEL: &str = "Submit";
pub const LEAD_MODAL_INTRO: &str = "Please use this form to submit a new lead to SOL Business Solutions. To ensure we are best prepared for every customer meeting - No meeting invites will be locked in unless this form is submitted.";
pub const SELECT_PLACEHOLDER: &str = "Select an item";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    StaticSelect,
    Radio,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldOption {
    pub text: &'static str,
    pub value: &'static str,
}

const fn same(label: &'static str) -> FieldOption {
    FieldOption { text: label, value: label }
}

const ACCOUNT_VERTICAL_OPTIONS: &[FieldOption] = &[
    same("Agriculture & Mining"),
    same("Communications & Media"),
    same("Engineering, Construction & Real Estate"),
    same("Healthcare & Life Sciences"),
    same("High Tech"),
    same("Manufacturing"),
    same("Professional Services"),
    same("Retail & CG"),
];

const EMPLOYEE_COUNT_OPTIONS: &[FieldOption] = &[
    same("Self-employed"),
    same("1-10 employees"),
    same("11-50 employees"),
    same("51-200 employees"),
    same("201-500 employees"),
    same("501-1000 employees"),
    same("1001-5000 employees"),
    same("5001-10,000 employees"),
    same("10,001+ employees"),
];

const OPPORTUNITY_TYPE_OPTIONS: &[FieldOption] =
    &[same("Implementation"), same("Health Check"), same("Consulting")];

const STATE_OPTIONS: &[FieldOption] = &[
    same("Australian Capital Territory"),
    same("New South Wales"),
    same("Northern Territory"),
    same("Queensland"),
    same("South Australia"),
    same("Tasmania"),
    same("Victoria"),
    same("Western Australia"),
];

const NOTES_OPTIONS: &[FieldOption] =
    &[FieldOption { text: "Yes", value: "true" }, FieldOption { text: "No", value: "false" }];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeadField {
    FirstName,
    LastName,
    Title,
    OfficePhone,
    MobilePhone,
    Email,
    Company,
    AccountVertical,
    EmployeeCount,
    OpportunityType,
    Street,
    City,
    StateProvince,
    Postcode,
    AddedToNotes,
}

impl LeadField {
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Title => "Title",
            Self::OfficePhone => "Office Phone",
            Self::MobilePhone => "Mobile Phone",
            Self::Email => "Email",
            Self::Company => "Company",
            Self::AccountVertical => "Salesforce Account Vertical",
            Self::EmployeeCount => "How many FTE's do they have?",
            Self::OpportunityType => "Opportunity Type",
            Self::Street => "Street",
            Self::City => "City",
            Self::StateProvince => "State/Province",
            Self::Postcode => "Postcode",
            Self::AddedToNotes => "Added Jimmy to any QUIP notes or sent through notes? ",
        }
    }

    pub fn action_id(self) -> String {
        match self {
            Self::AddedToNotes => "notes_radio".to_owned(),
            other => action_id_from_label(other.label()),
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::AccountVertical
            | Self::EmployeeCount
            | Self::OpportunityType
            | Self::StateProvince => FieldKind::StaticSelect,
            Self::AddedToNotes => FieldKind::Radio,
            _ => FieldKind::Text,
        }
    }

    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Self::OfficePhone
                | Self::MobilePhone
                | Self::AccountVertical
                | Self::EmployeeCount
                | Self::Street
                | Self::City
                | Self::StateProvince
                | Self::Postcode
        )
    }

    pub fn options(self) -> &'static [FieldOption] {
        match self {
            Self::AccountVertical => ACCOUNT_VERTICAL_OPTIONS,
            Self::EmployeeCount => EMPLOYEE_COUNT_OPTIONS,
            Self::OpportunityType => OPPORTUNITY_TYPE_OPTIONS,
            Self::StateProvince => STATE_OPTIONS,
            Self::AddedToNotes => NOTES_OPTIONS,
            _ => &[],
        }
    }

    pub fn hint(self) -> Option<&'static str> {
        match self {
            Self::Email => Some("Enter a valid email address (ex: example@example.com)"),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormSection {
    pub header: Option<&'static str>,
    pub fields: &'static [LeadField],
}

/// Sections in display order.
pub const LEAD_FORM_SECTIONS: &[FormSection] = &[
    FormSection {
        header: Some("Customer Details"),
        fields: &[
            LeadField::FirstName,
            LeadField::LastName,
            LeadField::Title,
            LeadField::OfficePhone,
            LeadField::MobilePhone,
            LeadField::Email,
        ],
    },
    FormSection {
        header: Some("Business Information"),
        fields: &[
            LeadField::Company,
            LeadField::AccountVertical,
            LeadField::EmployeeCount,
            LeadField::OpportunityType,
        ],
    },
    FormSection {
        header: Some("Location"),
        fields: &[LeadField::Street, LeadField::City, LeadField::StateProvince, LeadField::Postcode],
    },
    FormSection { header: None, fields: &[LeadField::AddedToNotes] },
];

/// Lower-cases a label and replaces spaces with underscores.
pub fn action_id_from_label(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{action_id_from_label, FieldKind, LeadField, LEAD_FORM_SECTIONS};

    #[test]
    fn action_ids_are_derived_from_labels() {
        assert_eq!(LeadField::OfficePhone.action_id(), "office_phone");
        assert_eq!(LeadField::EmployeeCount.action_id(), "how_many_fte's_do_they_have?");
        assert_eq!(LeadField::StateProvince.action_id(), "state/province");
        assert_eq!(LeadField::AccountVertical.action_id(), "salesforce_account_vertical");
        assert_eq!(action_id_from_label("Opportunity Type"), "opportunity_type");
    }

    #[test]
    fn notes_radio_keeps_its_explicit_action_id() {
        assert_eq!(LeadField::AddedToNotes.action_id(), "notes_radio");
        assert_eq!(LeadField::AddedToNotes.kind(), FieldKind::Radio);
    }

    #[test]
    fn sections_match_the_published_layout() {
        let counts: Vec<usize> =
            LEAD_FORM_SECTIONS.iter().map(|section| section.fields.len()).collect();
        assert_eq!(counts, vec![6, 4, 4, 1]);

        let customer = LEAD_FORM_SECTIONS[0].fields;
        let required_text = customer
            .iter()
            .filter(|field| field.kind() == FieldKind::Text && !field.is_optional())
            .count();
        assert_eq!(required_text, 4);

        let business = LEAD_FORM_SECTIONS[1].fields;
        let optional_selects = business
            .iter()
            .filter(|field| field.kind() == FieldKind::StaticSelect && field.is_optional())
            .count();
        assert_eq!(optional_selects, 2);
        assert!(!LeadField::OpportunityType.is_optional());
    }

    #[test]
    fn every_action_id_is_unique() {
        let ids: HashSet<String> = LEAD_FORM_SECTIONS
            .iter()
            .flat_map(|section| section.fields.iter().map(|field| field.action_id()))
            .collect();
        assert_eq!(ids.len(), 15);
    }
}
