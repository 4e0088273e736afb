use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use leadbot_core::config::{AppConfig, ConfigError, LoadOptions};
use leadbot_crm::{load_signing_key, CrmError, SalesforceClient};
use leadbot_slack::{lead_dispatcher, SignatureVerifier, SlackApiError, SlackWebClient};
use thiserror::Error;
use tracing::info;

use crate::health::{self, HealthState};
use crate::pipeline::SubmissionPipeline;
use crate::routes::{self, InFlight, SlackState};
use crate::service::LeadService;

pub struct Application {
    pub config: AppConfig,
    pub router: Router,
    pub in_flight: InFlight,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("salesforce signing key unavailable: {0}")]
    SigningKey(#[source] CrmError),
    #[error("salesforce client setup failed: {0}")]
    Crm(#[source] CrmError),
    #[error("slack client setup failed: {0}")]
    Slack(#[from] SlackApiError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let signing_key = load_signing_key(&config.salesforce.private_key_path)
        .map_err(BootstrapError::SigningKey)?;
    let salesforce =
        SalesforceClient::from_config(&config, &signing_key).map_err(BootstrapError::Crm)?;
    info!(
        event_name = "system.bootstrap.salesforce_ready",
        correlation_id = "bootstrap",
        data_url = salesforce.data_url(),
        "salesforce client configured"
    );

    let slack = Arc::new(SlackWebClient::new(
        &config.slack.api_base_url,
        config.slack.bot_token.clone(),
        Duration::from_secs(config.http.timeout_secs),
    )?);

    let pipeline = SubmissionPipeline::new(Arc::new(salesforce), slack.clone());
    let service = Arc::new(LeadService::new(slack, pipeline));
    let dispatcher = lead_dispatcher(service, &config.slack.lead_command);
    let verifier = SignatureVerifier::new(config.slack.signing_secret.clone());

    let slack_state = SlackState::new(verifier, dispatcher);
    let in_flight = slack_state.in_flight();
    let router = routes::router(slack_state).merge(health::router(
        HealthState::new(&config.slack.lead_command, &config.salesforce_data_url()),
    ));
    info!(
        event_name = "system.bootstrap.routes_ready",
        correlation_id = "bootstrap",
        lead_command = %config.slack.lead_command,
        "slack routes registered"
    );

    Ok(Application { config, router, in_flight })
}
