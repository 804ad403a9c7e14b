//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::ClientSecretSource;
use crate::{Error, Result};

/// Cached secrets with lazy initialization.
static SECRETS_CACHE: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, String>> {
    SECRETS_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// App registration credentials stored as a JSON secret.
#[derive(Debug, Deserialize)]
struct GraphCredentials {
    client_secret: String,
}

/// Get a secret value from Secrets Manager with caching.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    {
        let cache = get_cache().read().await;
        if let Some(value) = cache.get(secret_arn) {
            return Ok(value.clone());
        }
    }

    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))?
        .to_string();

    {
        let mut cache = get_cache().write().await;
        cache.insert(secret_arn.to_string(), secret_string.clone());
    }

    Ok(secret_string)
}

/// Extract the Graph client secret from a stored secret string.
///
/// Accepts either `{"client_secret": "..."}` or the bare secret value.
pub fn parse_client_secret(secret_string: &str) -> Result<String> {
    let trimmed = secret_string.trim();
    if trimmed.starts_with('{') {
        let creds: GraphCredentials = serde_json::from_str(trimmed)
            .map_err(|e| Error::Aws(format!("Failed to parse Graph credentials: {}", e)))?;
        return Ok(creds.client_secret);
    }

    if trimmed.is_empty() {
        return Err(Error::Aws("Graph client secret is empty".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Resolve the configured client secret, fetching it from Secrets Manager if needed.
pub async fn resolve_client_secret(
    client: &SecretsClient,
    source: &ClientSecretSource,
) -> Result<String> {
    match source {
        ClientSecretSource::Inline(secret) => Ok(secret.clone()),
        ClientSecretSource::SecretArn(arn) => {
            let secret_string = get_secret(client, arn).await?;
            parse_client_secret(&secret_string)
        }
    }
}
