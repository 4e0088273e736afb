use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    lead_command: String,
    salesforce_data_url: String,
}

impl HealthState {
    pub fn new(lead_command: &str, salesforce_data_url: &str) -> Self {
        Self {
            lead_command: lead_command.to_owned(),
            salesforce_data_url: salesforce_data_url.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub salesforce: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Liveness only. Salesforce is not contacted here since every probe would
/// mint a fresh access token.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: format!("leadbot-server accepting `{}` requests", state.lead_command),
        },
        salesforce: HealthCheck {
            status: "configured",
            detail: state.salesforce_data_url.clone(),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}
