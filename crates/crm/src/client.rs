use std::time::Duration;

use async_trait::async_trait;
use leadbot_core::config::AppConfig;
use leadbot_core::{ContactMatch, LeadRecord};
use reqwest::Client;

use crate::describe::{self, Picklist};
use crate::error::CrmError;
use crate::leads::{self, LeadCreated};
use crate::token::{AccessToken, AssertionSigner, TokenIssuer};
use crate::{contacts, CrmGateway};

/// Salesforce REST client for one org, authenticating as the configured
/// service account.
#[derive(Clone)]
pub struct SalesforceClient {
    http: Client,
    data_url: String,
    issuer: TokenIssuer,
}

impl SalesforceClient {
    /// Builds the client from loaded config and the PEM signing key bytes.
    pub fn from_config(config: &AppConfig, signing_key_pem: &[u8]) -> Result<Self, CrmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .map_err(CrmError::HttpClient)?;
        let signer = AssertionSigner::from_pem(signing_key_pem, &config.salesforce)?;
        let issuer = TokenIssuer::new(http.clone(), &config.salesforce.login_url, signer);
        Ok(Self { http, data_url: config.salesforce_data_url(), issuer })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Active values of every picklist field on the Lead object.
    pub async fn describe_picklists(&self, token: &AccessToken) -> Result<Vec<Picklist>, CrmError> {
        describe::lead_picklists(&self.http, &self.data_url, token).await
    }
}

#[async_trait]
impl CrmGateway for SalesforceClient {
    async fn access_token(&self) -> Result<AccessToken, CrmError> {
        self.issuer.issue().await
    }

    async fn find_contact(
        &self,
        token: &AccessToken,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<Option<ContactMatch>, CrmError> {
        contacts::find_contact(&self.http, &self.data_url, token, user_id, email).await
    }

    async fn create_lead(
        &self,
        token: &AccessToken,
        lead: &LeadRecord,
    ) -> Result<LeadCreated, CrmError> {
        leads::create_lead(&self.http, &self.data_url, token, lead).await
    }
}
