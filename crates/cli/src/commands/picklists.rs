use leadbot_core::config::{AppConfig, LoadOptions};
use leadbot_crm::{load_signing_key, CrmError, CrmGateway, Picklist, SalesforceClient};
use serde_json::json;
use thiserror::Error;

use crate::commands::CommandResult;

#[derive(Debug, Error)]
pub enum PicklistsError {
    #[error("salesforce client unavailable: {0}")]
    Setup(#[source] CrmError),
    #[error("salesforce authentication failed: {0}")]
    Auth(#[source] CrmError),
    #[error("lead describe failed: {0}")]
    Describe(#[source] CrmError),
}

impl PicklistsError {
    fn error_class(&self) -> &'static str {
        match self {
            Self::Setup(_) => "signing_key",
            Self::Auth(_) => "salesforce_auth",
            Self::Describe(_) => "salesforce_describe",
        }
    }

    fn exit_code(&self) -> u8 {
        match self {
            Self::Setup(_) => 3,
            Self::Auth(_) => 5,
            Self::Describe(_) => 6,
        }
    }
}

pub fn run(json_output: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "picklists",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "picklists",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                4,
            );
        }
    };

    match runtime.block_on(fetch(&config)) {
        Ok(picklists) if json_output => render_json(&picklists),
        Ok(picklists) => CommandResult::text(render_human(&picklists)),
        Err(error) => CommandResult::failure(
            "picklists",
            error.error_class(),
            error.to_string(),
            error.exit_code(),
        ),
    }
}

/// Issues a fresh access token and reads the Lead describe.
pub async fn fetch(config: &AppConfig) -> Result<Vec<Picklist>, PicklistsError> {
    let pem = load_signing_key(&config.salesforce.private_key_path).map_err(PicklistsError::Setup)?;
    let client = SalesforceClient::from_config(config, &pem).map_err(PicklistsError::Setup)?;
    let token = client.access_token().await.map_err(PicklistsError::Auth)?;
    client.describe_picklists(&token).await.map_err(PicklistsError::Describe)
}

fn render_json(picklists: &[Picklist]) -> CommandResult {
    let payload = json!({ "command": "picklists", "status": "ok", "picklists": picklists });
    match serde_json::to_string_pretty(&payload) {
        Ok(output) => CommandResult::text(output),
        Err(error) => CommandResult::failure("picklists", "serialization", error.to_string(), 7),
    }
}

fn render_human(picklists: &[Picklist]) -> String {
    if picklists.is_empty() {
        return "no picklist fields on Lead".to_string();
    }

    let mut lines = Vec::new();
    for picklist in picklists {
        lines.push(format!("{} ({})", picklist.label, picklist.name));
        for value in &picklist.values {
            if value.label == value.value {
                lines.push(format!("  - {}", value.value));
            } else {
                lines.push(format!("  - {} [{}]", value.label, value.value));
            }
        }
    }

    lines.join("\n")
}
