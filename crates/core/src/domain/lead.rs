use serde::Serialize;

use crate::domain::contact::ContactMatch;

pub const LEAD_COUNTRY: &str = "Australia";
pub const LEAD_SOURCE: &str = "Partner Referral";

/// A Salesforce `Lead` as posted to the sObject endpoint.
///
/// Optional and referral fields are omitted from the JSON body when unset,
/// never sent as `null`. Referral linkage is applied through
/// [`LeadRecord::with_referral`], which consumes the record so enrichment
/// cannot happen after the record has been handed to an uploader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeadRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "LeadSource")]
    pub lead_source: String,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "MobilePhone", skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Salesforce_Account_Vertical__c", skip_serializing_if = "Option::is_none")]
    pub account_vertical: Option<String>,
    #[serde(rename = "How_many_FTE_s_do_they_have__c", skip_serializing_if = "Option::is_none")]
    pub employee_count_band: Option<String>,
    #[serde(rename = "Opportunity_Type__c")]
    pub opportunity_type: String,
    #[serde(rename = "Street", skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(rename = "City", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "State", skip_serializing_if = "Option::is_none")]
    pub state_province: Option<String>,
    #[serde(rename = "Postalcode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(rename = "Added_to_QUIP_Notes__c")]
    pub added_to_notes: String,
    #[serde(rename = "Referred_From_Business__c", skip_serializing_if = "Option::is_none")]
    pub referred_from_business: Option<String>,
    #[serde(rename = "Referral_From__c", skip_serializing_if = "Option::is_none")]
    pub referral_from: Option<String>,
    #[serde(rename = "Current_AE__c", skip_serializing_if = "Option::is_none")]
    pub current_ae: Option<String>,
}

/// Values every lead must carry; everything else starts out unset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequiredLeadFields {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub company: String,
    pub opportunity_type: String,
    pub added_to_notes: String,
}

impl LeadRecord {
    pub fn new(required: RequiredLeadFields) -> Self {
        Self {
            country: LEAD_COUNTRY.to_owned(),
            lead_source: LEAD_SOURCE.to_owned(),
            first_name: required.first_name,
            last_name: required.last_name,
            title: required.title,
            phone: None,
            mobile_phone: None,
            email: required.email,
            company: required.company,
            account_vertical: None,
            employee_count_band: None,
            opportunity_type: required.opportunity_type,
            street: None,
            city: None,
            state_province: None,
            postal_code: None,
            added_to_notes: required.added_to_notes,
            referred_from_business: None,
            referral_from: None,
            current_ae: None,
        }
    }

    /// Links the lead to the submitting partner's CRM contact.
    ///
    /// The account id becomes the referring business; the contact id is used
    /// both as the referral source and as the current account executive.
    pub fn with_referral(mut self, contact: &ContactMatch) -> Self {
        if let Some(account_id) = contact.account_id.as_deref().filter(|id| !id.is_empty()) {
            self.referred_from_business = Some(account_id.to_owned());
        }
        if let Some(contact_id) = contact.id.as_deref().filter(|id| !id.is_empty()) {
            self.referral_from = Some(contact_id.to_owned());
            self.current_ae = Some(contact_id.to_owned());
        }
        self
    }

    pub fn has_referral(&self) -> bool {
        self.referred_from_business.is_some() || self.referral_from.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{LeadRecord, RequiredLeadFields};
    use crate::domain::contact::ContactMatch;

    fn required() -> RequiredLeadFields {
        RequiredLeadFields {
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            title: "CTO".to_owned(),
            email: "jane@x.com".to_owned(),
            company: "Acme".to_owned(),
            opportunity_type: "Implementation".to_owned(),
            added_to_notes: "true".to_owned(),
        }
    }

    #[test]
    fn unset_optional_fields_are_omitted_from_json() {
        let value = serde_json::to_value(LeadRecord::new(required())).expect("serialize");

        assert_eq!(
            value,
            json!({
                "Country": "Australia",
                "LeadSource": "Partner Referral",
                "FirstName": "Jane",
                "LastName": "Doe",
                "Title": "CTO",
                "Email": "jane@x.com",
                "Company": "Acme",
                "Opportunity_Type__c": "Implementation",
                "Added_to_QUIP_Notes__c": "true"
            })
        );
    }

    #[test]
    fn referral_sets_business_referral_and_account_executive() {
        let lead = LeadRecord::new(required()).with_referral(&ContactMatch {
            id: Some("C1".to_owned()),
            account_id: Some("A1".to_owned()),
        });

        let value = serde_json::to_value(&lead).expect("serialize");
        assert_eq!(value["Referred_From_Business__c"], "A1");
        assert_eq!(value["Referral_From__c"], "C1");
        assert_eq!(value["Current_AE__c"], "C1");
        assert!(lead.has_referral());
    }

    #[test]
    fn referral_without_account_only_links_contact() {
        let lead = LeadRecord::new(required())
            .with_referral(&ContactMatch { id: Some("C9".to_owned()), account_id: None });

        assert_eq!(lead.referred_from_business, None);
        assert_eq!(lead.referral_from.as_deref(), Some("C9"));
        assert_eq!(lead.current_ae.as_deref(), Some("C9"));
    }
}
