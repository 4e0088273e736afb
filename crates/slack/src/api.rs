//! Slack Web API calls used by the bot.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::blocks::{MessageTemplate, ModalView};

#[derive(Debug, Error)]
pub enum SlackApiError {
    #[error("http client could not be built: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("slack `{method}` request failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("slack `{method}` returned http {status}")]
    Status { method: &'static str, status: u16 },
    #[error("slack `{method}` response could not be decoded: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("slack `{method}` failed: {error}")]
    Api { method: &'static str, error: String },
}

#[async_trait]
pub trait SlackApi: Send + Sync {
    /// Profile email of a workspace member, `None` when the profile has none.
    async fn user_email(&self, user_id: &str) -> Result<Option<String>, SlackApiError>;

    async fn open_view(&self, trigger_id: &str, view: &ModalView) -> Result<(), SlackApiError>;

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        message: &MessageTemplate,
    ) -> Result<(), SlackApiError>;
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<UserInfo>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(default)]
    profile: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Clone)]
pub struct SlackWebClient {
    http: Client,
    base_url: String,
    bot_token: SecretString,
}

impl SlackWebClient {
    pub fn new(
        base_url: &str,
        bot_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, SlackApiError> {
        let http = Client::builder().timeout(timeout).build().map_err(SlackApiError::HttpClient)?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), bot_token })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn read(
        method: &'static str,
        response: reqwest::Response,
    ) -> Result<ApiEnvelope, SlackApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SlackApiError::Status { method, status: status.as_u16() });
        }
        let envelope: ApiEnvelope =
            response.json().await.map_err(|source| SlackApiError::Decode { method, source })?;
        if !envelope.ok {
            let error = envelope.error.clone().unwrap_or_else(|| "unknown_error".to_owned());
            return Err(SlackApiError::Api { method, error });
        }
        Ok(envelope)
    }

    async fn post_json(
        &self,
        method: &'static str,
        body: serde_json::Value,
    ) -> Result<ApiEnvelope, SlackApiError> {
        let response = self
            .http
            .post(self.url(method))
            .bearer_auth(self.bot_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|source| SlackApiError::Transport { method, source })?;
        Self::read(method, response).await
    }
}

#[async_trait]
impl SlackApi for SlackWebClient {
    async fn user_email(&self, user_id: &str) -> Result<Option<String>, SlackApiError> {
        const METHOD: &str = "users.info";
        let response = self
            .http
            .get(self.url(METHOD))
            .bearer_auth(self.bot_token.expose_secret())
            .query(&[("user", user_id)])
            .send()
            .await
            .map_err(|source| SlackApiError::Transport { method: METHOD, source })?;
        let envelope = Self::read(METHOD, response).await?;

        Ok(envelope
            .user
            .and_then(|user| user.profile)
            .and_then(|profile| profile.email)
            .filter(|email| !email.trim().is_empty()))
    }

    async fn open_view(&self, trigger_id: &str, view: &ModalView) -> Result<(), SlackApiError> {
        self.post_json("views.open", json!({ "trigger_id": trigger_id, "view": view })).await?;
        Ok(())
    }

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        message: &MessageTemplate,
    ) -> Result<(), SlackApiError> {
        let mut body = json!({ "channel": channel, "user": user });
        if let (Some(target), Ok(serde_json::Value::Object(fields))) =
            (body.as_object_mut(), serde_json::to_value(message))
        {
            target.extend(fields);
        }
        self.post_json("chat.postEphemeral", body).await?;
        Ok(())
    }
}
