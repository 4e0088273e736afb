use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use leadbot_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};
use secrecy::ExposeSecret;
use toml::Value;

struct Field {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

impl Field {
    fn new(key: &'static str, value: impl Into<String>, env_keys: &'static [&'static str]) -> Self {
        Self { key, value: value.into(), env_keys }
    }
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    render(&config, detect_config_path().as_deref())
}

/// One line per setting, secrets redacted, each attributed to the layer that
/// supplied it.
pub fn render(config: &AppConfig, config_file: Option<&Path>) -> String {
    let config_file_doc = load_config_file_doc(config_file);

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(config) {
        let source = field_source(&field, config_file_doc.as_ref(), config_file);
        lines.push(format!("- {} = {} (source: {source})", field.key, field.value));
    }

    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let slack = &config.slack;
    let salesforce = &config.salesforce;

    vec![
        Field::new(
            "slack.bot_token",
            redact_token(slack.bot_token.expose_secret()),
            &["LEADBOT_SLACK_BOT_TOKEN"],
        ),
        Field::new(
            "slack.signing_secret",
            redact_secret(slack.signing_secret.expose_secret()),
            &["LEADBOT_SLACK_SIGNING_SECRET"],
        ),
        Field::new(
            "slack.client_id",
            slack.client_id.as_deref().unwrap_or("<unset>"),
            &["LEADBOT_SLACK_CLIENT_ID"],
        ),
        Field::new(
            "slack.client_secret",
            slack
                .client_secret
                .as_ref()
                .map(|secret| redact_secret(secret.expose_secret()))
                .unwrap_or_else(|| "<unset>".to_string()),
            &["LEADBOT_SLACK_CLIENT_SECRET"],
        ),
        Field::new(
            "slack.api_base_url",
            slack.api_base_url.as_str(),
            &["LEADBOT_SLACK_API_BASE_URL"],
        ),
        Field::new(
            "slack.lead_command",
            slack.lead_command.as_str(),
            &["LEADBOT_SLACK_LEAD_COMMAND"],
        ),
        Field::new(
            "salesforce.login_url",
            salesforce.login_url.as_str(),
            &["LEADBOT_SALESFORCE_LOGIN_URL"],
        ),
        Field::new(
            "salesforce.instance_url",
            salesforce.instance_url.as_str(),
            &["LEADBOT_SALESFORCE_INSTANCE_URL"],
        ),
        Field::new(
            "salesforce.api_version",
            salesforce.api_version.as_str(),
            &["LEADBOT_SALESFORCE_API_VERSION"],
        ),
        Field::new(
            "salesforce.client_id",
            salesforce.client_id.as_str(),
            &["LEADBOT_SALESFORCE_CLIENT_ID"],
        ),
        Field::new(
            "salesforce.username",
            salesforce.username.as_str(),
            &["LEADBOT_SALESFORCE_USERNAME"],
        ),
        Field::new(
            "salesforce.private_key_path",
            salesforce.private_key_path.display().to_string(),
            &["LEADBOT_SALESFORCE_PRIVATE_KEY_PATH"],
        ),
        Field::new(
            "salesforce.assertion_lifetime_secs",
            salesforce.assertion_lifetime_secs.to_string(),
            &["LEADBOT_SALESFORCE_ASSERTION_LIFETIME_SECS"],
        ),
        Field::new(
            "server.bind_address",
            config.server.bind_address.as_str(),
            &["LEADBOT_SERVER_BIND_ADDRESS"],
        ),
        Field::new(
            "server.port",
            config.server.port.to_string(),
            &["LEADBOT_SERVER_PORT", "PORT"],
        ),
        Field::new(
            "http.timeout_secs",
            config.http.timeout_secs.to_string(),
            &["LEADBOT_HTTP_TIMEOUT_SECS"],
        ),
        Field::new(
            "logging.level",
            config.logging.level.as_str(),
            &["LEADBOT_LOGGING_LEVEL", "LEADBOT_LOG_LEVEL"],
        ),
        Field::new(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["LEADBOT_LOGGING_FORMAT", "LEADBOT_LOG_FORMAT"],
        ),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &Field,
    config_file_doc: Option<&Value>,
    config_file: Option<&Path>,
) -> String {
    let from_env = field.env_keys.iter().copied().find(|key| env::var_os(key).is_some());
    if let Some(env_key) = from_env {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key) {
            let file_path = config_file
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}

fn redact_secret(secret: &str) -> String {
    if secret.trim().is_empty() {
        "<empty>".to_string()
    } else {
        "<redacted>".to_string()
    }
}
