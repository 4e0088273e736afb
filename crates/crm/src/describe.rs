use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::CrmError;
use crate::token::AccessToken;

const DESCRIBE_ENDPOINT: &str = "sobjects/Lead/describe";

#[derive(Debug, Deserialize)]
struct DescribeResponse {
    #[serde(default)]
    fields: Vec<DescribeField>,
}

#[derive(Debug, Deserialize)]
struct DescribeField {
    name: String,
    #[serde(default)]
    label: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "picklistValues", default)]
    picklist_values: Vec<DescribePicklistValue>,
}

#[derive(Debug, Deserialize)]
struct DescribePicklistValue {
    value: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

/// A Lead picklist field with its active values in CRM order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Picklist {
    pub name: String,
    pub label: String,
    pub values: Vec<PicklistValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PicklistValue {
    pub value: String,
    pub label: String,
}

pub(crate) async fn lead_picklists(
    http: &Client,
    data_url: &str,
    token: &AccessToken,
) -> Result<Vec<Picklist>, CrmError> {
    let response = http
        .get(format!("{data_url}/sobjects/Lead/describe"))
        .bearer_auth(token.expose())
        .send()
        .await
        .map_err(|source| CrmError::Transport { endpoint: DESCRIBE_ENDPOINT, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CrmError::Status { endpoint: DESCRIBE_ENDPOINT, status: status.as_u16(), body });
    }

    let describe: DescribeResponse = response
        .json()
        .await
        .map_err(|source| CrmError::Decode { endpoint: DESCRIBE_ENDPOINT, source })?;
    Ok(picklists_from(describe))
}

fn picklists_from(describe: DescribeResponse) -> Vec<Picklist> {
    describe
        .fields
        .into_iter()
        .filter(|field| field.kind == "picklist")
        .map(|field| Picklist {
            name: field.name,
            label: field.label,
            values: field
                .picklist_values
                .into_iter()
                .filter(|value| value.active)
                .map(|value| PicklistValue {
                    label: value.label.unwrap_or_else(|| value.value.clone()),
                    value: value.value,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::lead_picklists;
    use crate::token::AccessToken;

    #[tokio::test]
    async fn only_picklist_fields_and_active_values_are_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services/data/v50.0/sobjects/Lead/describe"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Lead",
                "fields": [
                    {"name": "FirstName", "label": "First Name", "type": "string"},
                    {
                        "name": "Opportunity_Type__c",
                        "label": "Opportunity Type",
                        "type": "picklist",
                        "picklistValues": [
                            {"value": "Implementation", "label": "Implementation", "active": true},
                            {"value": "Legacy", "label": "Legacy", "active": false},
                            {"value": "Consulting", "active": true}
                        ]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let data_url = format!("{}/services/data/v50.0", server.uri());
        let picklists = lead_picklists(&Client::new(), &data_url, &AccessToken::new("tok"))
            .await
            .expect("describe should succeed");

        assert_eq!(picklists.len(), 1);
        assert_eq!(picklists[0].name, "Opportunity_Type__c");
        let values: Vec<&str> =
            picklists[0].values.iter().map(|value| value.value.as_str()).collect();
        assert_eq!(values, vec!["Implementation", "Consulting"]);
        assert_eq!(picklists[0].values[1].label, "Consulting");
    }
}
