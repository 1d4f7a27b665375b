//! Load configuration via `config` crate with env-override support.
//!
//! Precedence is compiled-in defaults, then the local override file, then the
//! process environment. Nothing is validated at load time: a missing credential
//! only surfaces when the integration that needs it is first used.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;
use tracing::warn;

use super::types::Res;

/// The placeholder secret key shipped with the repository.
///
/// Deployments outside `development` are expected to override this, but the
/// loader only warns; it never refuses to start.
pub const PLACEHOLDER_SECRET_KEY: &str = "temporary-secret-key-change-in-production";

fn default_string() -> String {
    String::new()
}

/// Default database connection string (`DATABASE_URL`).
fn default_database_url() -> String {
    "sqlite:///./test.db".to_string()
}

/// Default AWS region (`AWS_REGION`); always non-empty.
fn default_aws_region() -> String {
    "us-east-1".to_string()
}

fn default_secret_key() -> String {
    PLACEHOLDER_SECRET_KEY.to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

/// Default HTTP bind port (`PORT`).
fn default_port() -> u16 {
    8000
}

/// Configuration for the concierge backend.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Shared, immutable configuration record.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Flat configuration record with one field per environment variable.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ConfigInner {
    /// Supabase project URL (`SUPABASE_URL`).
    #[serde(default = "default_string", alias = "SUPABASE_URL")]
    pub supabase_url: String,
    /// Supabase service role key (`SUPABASE_SERVICE_KEY`).
    #[serde(default = "default_string", alias = "SUPABASE_SERVICE_KEY")]
    pub supabase_service_key: String,
    /// Database connection string (`DATABASE_URL`).
    #[serde(default = "default_database_url", alias = "DATABASE_URL")]
    pub database_url: String,
    /// Anthropic API key (`ANTHROPIC_API_KEY`).
    #[serde(default = "default_string", alias = "ANTHROPIC_API_KEY")]
    pub anthropic_api_key: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    #[serde(default = "default_string", alias = "SLACK_BOT_TOKEN")]
    pub slack_bot_token: String,
    /// Slack app token (`SLACK_APP_TOKEN`).
    #[serde(default = "default_string", alias = "SLACK_APP_TOKEN")]
    pub slack_app_token: String,
    /// Slack signing secret (`SLACK_SIGNING_SECRET`).
    #[serde(default = "default_string", alias = "SLACK_SIGNING_SECRET")]
    pub slack_signing_secret: String,
    /// AWS access key ID (`AWS_ACCESS_KEY_ID`).
    #[serde(default = "default_string", alias = "AWS_ACCESS_KEY_ID")]
    pub aws_access_key_id: String,
    /// AWS secret access key (`AWS_SECRET_ACCESS_KEY`).
    #[serde(default = "default_string", alias = "AWS_SECRET_ACCESS_KEY")]
    pub aws_secret_access_key: String,
    /// AWS region (`AWS_REGION`).
    #[serde(default = "default_aws_region", alias = "AWS_REGION")]
    pub aws_region: String,
    /// SES sender address for outbound email (`SES_EMAIL_ADDRESS`).
    #[serde(default = "default_string", alias = "SES_EMAIL_ADDRESS")]
    pub ses_email_address: String,
    /// Application secret key (`SECRET_KEY`).
    #[serde(default = "default_secret_key", alias = "SECRET_KEY")]
    pub secret_key: String,
    /// Deployment environment name (`ENVIRONMENT`).
    #[serde(default = "default_environment", alias = "ENVIRONMENT")]
    pub environment: String,
    /// HTTP bind port (`PORT`).
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
}

impl Config {
    /// Load the configuration once at process start.
    ///
    /// Sources, lowest precedence first: compiled-in defaults, the override
    /// file (an explicit `--config` path, or `.env` in the working directory
    /// when present), then the process environment. A malformed override file
    /// fails the load, and therefore process start.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".env").exists() {
            cfg = cfg.add_source(config::File::new(".env", config::FileFormat::Ini));
        }

        cfg = cfg.add_source(config::Environment::default());

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        if result.environment != "development" && result.secret_key == PLACEHOLDER_SECRET_KEY {
            warn!("SECRET_KEY is still the placeholder value outside of development.");
        }

        Ok(result)
    }
}
