//! JWT bearer flow: sign an assertion with the connected app's private key
//! and trade it for an access token.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use leadbot_core::config::SalesforceConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CrmError;

pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_ENDPOINT: &str = "oauth2/token";

#[derive(Clone, Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Reads the PEM private key used to sign assertions.
pub fn load_signing_key(path: &Path) -> Result<Vec<u8>, CrmError> {
    fs::read(path).map_err(|source| CrmError::ReadKey { path: path.to_path_buf(), source })
}

#[derive(Clone)]
pub struct AssertionSigner {
    key: EncodingKey,
    issuer: String,
    subject: String,
    audience: String,
    lifetime: Duration,
}

impl AssertionSigner {
    pub fn from_pem(pem: &[u8], config: &SalesforceConfig) -> Result<Self, CrmError> {
        let key = EncodingKey::from_rsa_pem(pem).map_err(CrmError::InvalidKey)?;
        let lifetime_secs = i64::try_from(config.assertion_lifetime_secs).unwrap_or(180);
        Ok(Self {
            key,
            issuer: config.client_id.clone(),
            subject: config.username.clone(),
            audience: config.login_url.trim_end_matches('/').to_owned(),
            lifetime: Duration::seconds(lifetime_secs),
        })
    }

    pub fn claims_at(&self, now: DateTime<Utc>) -> AssertionClaims {
        AssertionClaims {
            iss: self.issuer.clone(),
            sub: self.subject.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        }
    }

    pub fn sign_at(&self, now: DateTime<Utc>) -> Result<String, CrmError> {
        encode(&Header::new(Algorithm::RS256), &self.claims_at(now), &self.key)
            .map_err(CrmError::Signing)
    }

    pub fn sign(&self) -> Result<String, CrmError> {
        self.sign_at(Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    instance_url: Option<String>,
}

#[derive(Clone)]
pub struct TokenIssuer {
    http: Client,
    token_url: String,
    signer: AssertionSigner,
}

impl TokenIssuer {
    pub fn new(http: Client, login_url: &str, signer: AssertionSigner) -> Self {
        let token_url = format!("{}/services/oauth2/token", login_url.trim_end_matches('/'));
        Self { http, token_url, signer }
    }

    pub async fn issue(&self) -> Result<AccessToken, CrmError> {
        let assertion = self.signer.sign()?;
        let response = self
            .http
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|source| CrmError::Transport { endpoint: TOKEN_ENDPOINT, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                event_name = "crm.salesforce.token_rejected",
                status = status.as_u16(),
                "salesforce token endpoint rejected the assertion"
            );
            return Err(CrmError::Status { endpoint: TOKEN_ENDPOINT, status: status.as_u16(), body });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|source| CrmError::Decode { endpoint: TOKEN_ENDPOINT, source })?;
        if token.access_token.trim().is_empty() {
            return Err(CrmError::EmptyToken);
        }

        debug!(
            event_name = "crm.salesforce.token_issued",
            instance_url = token.instance_url.as_deref().unwrap_or("unknown"),
            "salesforce access token issued"
        );
        Ok(AccessToken::new(token.access_token))
    }
}
