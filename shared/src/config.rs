//! Configuration management for Lambda functions.
//!
//! Every loader takes a lookup function so cold-start parsing can be tested
//! without touching the process environment.

use std::env;

use crate::{Error, Result};

const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
const DEFAULT_GRAPH_LOGIN_URL: &str = "https://login.microsoftonline.com";

fn from_process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Read a variable, treating blank values as unset.
fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| Error::Config(format!("{} is not set", key)))
}

/// Configuration for the forwarding handler.
#[derive(Debug, Clone)]
pub struct ForwardConfig {
    /// Booking endpoint that receives the forwarded payload
    pub book_api_url: String,
}

impl ForwardConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(from_process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            book_api_url: required(&lookup, "BOOK_API_URL")?,
        })
    }
}

/// Where the Graph client secret comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientSecretSource {
    /// Secret value given directly in the environment
    Inline(String),
    /// ARN of a Secrets Manager secret holding the value
    SecretArn(String),
}

/// Configuration for the SharePoint list handler.
#[derive(Debug, Clone)]
pub struct SharePointConfig {
    /// Azure AD tenant id
    pub tenant_id: String,
    /// App registration client id
    pub client_id: String,
    pub client_secret: ClientSecretSource,
    /// e.g. contoso.sharepoint.com
    pub hostname: String,
    /// e.g. /sites/Facilities
    pub site_path: String,
    /// List id or display name
    pub list: String,
    pub graph_base_url: String,
    pub login_base_url: String,
}

impl SharePointConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(from_process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_secret = match (
            optional(&lookup, "GRAPH_CLIENT_SECRET"),
            optional(&lookup, "GRAPH_CLIENT_SECRET_ARN"),
        ) {
            (Some(secret), _) => ClientSecretSource::Inline(secret),
            (None, Some(arn)) => ClientSecretSource::SecretArn(arn),
            (None, None) => {
                return Err(Error::Config(
                    "GRAPH_CLIENT_SECRET or GRAPH_CLIENT_SECRET_ARN is not set".to_string(),
                ))
            }
        };

        let mut site_path = required(&lookup, "SHAREPOINT_SITE_PATH")?;
        if !site_path.starts_with('/') {
            site_path.insert(0, '/');
        }

        Ok(Self {
            tenant_id: required(&lookup, "GRAPH_TENANT_ID")?,
            client_id: required(&lookup, "GRAPH_CLIENT_ID")?,
            client_secret,
            hostname: required(&lookup, "SHAREPOINT_HOSTNAME")?,
            site_path,
            list: required(&lookup, "SHAREPOINT_LIST")?,
            graph_base_url: optional(&lookup, "GRAPH_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            login_base_url: optional(&lookup, "GRAPH_LOGIN_URL")
                .unwrap_or_else(|| DEFAULT_GRAPH_LOGIN_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Allowed origin for CORS responses (`ALLOWED_ORIGIN`, default `*`).
pub fn allowed_origin() -> String {
    allowed_origin_from(from_process_env)
}

pub fn allowed_origin_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    optional(&lookup, "ALLOWED_ORIGIN").unwrap_or_else(|| "*".to_string())
}
