use leadbot_core::ContactMatch;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::CrmError;
use crate::token::AccessToken;

const QUERY_ENDPOINT: &str = "query";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(rename = "totalSize", default)]
    total_size: u64,
    #[serde(default)]
    records: Vec<ContactMatch>,
}

/// Escapes a value for use inside a single-quoted SOQL literal.
pub fn escape_soql(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Contact query matching either the submitter's email or their Slack member
/// id. Without an email only the member id is matched.
pub fn contact_query(user_id: &str, email: Option<&str>) -> String {
    let member = format!("Slack_Member_ID__c = '{}'", escape_soql(user_id));
    match email {
        Some(email) => format!(
            "SELECT Id, AccountId FROM Contact WHERE Email = '{}' OR {member}",
            escape_soql(email)
        ),
        None => format!("SELECT Id, AccountId FROM Contact WHERE {member}"),
    }
}

pub(crate) async fn find_contact(
    http: &Client,
    data_url: &str,
    token: &AccessToken,
    user_id: &str,
    email: Option<&str>,
) -> Result<Option<ContactMatch>, CrmError> {
    let soql = contact_query(user_id, email);
    let response = http
        .get(format!("{data_url}/query"))
        .bearer_auth(token.expose())
        .query(&[("q", soql.as_str())])
        .send()
        .await
        .map_err(|source| CrmError::Transport { endpoint: QUERY_ENDPOINT, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CrmError::Status { endpoint: QUERY_ENDPOINT, status: status.as_u16(), body });
    }

    let result: QueryResponse = response
        .json()
        .await
        .map_err(|source| CrmError::Decode { endpoint: QUERY_ENDPOINT, source })?;
    debug!(
        event_name = "crm.salesforce.contact_query",
        total_size = result.total_size,
        "contact lookup completed"
    );
    Ok(result.records.into_iter().next())
}

#[cfg(test)]
mod tests {
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{contact_query, escape_soql, find_contact};
    use crate::error::CrmError;
    use crate::token::AccessToken;

    #[test]
    fn query_matches_email_or_member_id() {
        assert_eq!(
            contact_query("U123", Some("jane@x.com")),
            "SELECT Id, AccountId FROM Contact WHERE Email = 'jane@x.com' OR Slack_Member_ID__c = 'U123'"
        );
        assert_eq!(
            contact_query("U123", None),
            "SELECT Id, AccountId FROM Contact WHERE Slack_Member_ID__c = 'U123'"
        );
    }

    #[test]
    fn crafted_email_cannot_break_out_of_literal() {
        assert_eq!(escape_soql(r"o'brien\x"), r"o\'brien\\x");
        let soql = contact_query("U1", Some("x' OR Id != '"));
        assert!(soql.contains(r"Email = 'x\' OR Id != \''"));
    }

    #[tokio::test]
    async fn first_record_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services/data/v50.0/query"))
            .and(header("authorization", "Bearer tok"))
            .and(query_param("q", contact_query("U123", Some("jane@x.com"))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalSize": 2,
                "done": true,
                "records": [
                    {"attributes": {"type": "Contact"}, "Id": "C1", "AccountId": "A1"},
                    {"attributes": {"type": "Contact"}, "Id": "C2", "AccountId": "A2"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data_url = format!("{}/services/data/v50.0", server.uri());
        let found = find_contact(
            &Client::new(),
            &data_url,
            &AccessToken::new("tok"),
            "U123",
            Some("jane@x.com"),
        )
        .await
        .expect("query should succeed")
        .expect("a contact should match");

        assert_eq!(found.id.as_deref(), Some("C1"));
        assert_eq!(found.account_id.as_deref(), Some("A1"));
    }

    #[tokio::test]
    async fn zero_records_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services/data/v50.0/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalSize": 0,
                "done": true,
                "records": []
            })))
            .mount(&server)
            .await;

        let data_url = format!("{}/services/data/v50.0", server.uri());
        let found =
            find_contact(&Client::new(), &data_url, &AccessToken::new("tok"), "U123", None)
                .await
                .expect("query should succeed");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn expired_session_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services/data/v50.0/query"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!([{
                "message": "Session expired or invalid",
                "errorCode": "INVALID_SESSION_ID"
            }])))
            .mount(&server)
            .await;

        let data_url = format!("{}/services/data/v50.0", server.uri());
        let error = find_contact(&Client::new(), &data_url, &AccessToken::new("tok"), "U1", None)
            .await
            .expect_err("401 should fail");

        assert!(matches!(error, CrmError::Status { status: 401, .. }));
    }
}
