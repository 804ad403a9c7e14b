//! Submit Tour (SharePoint) Lambda - Handles POST /api/submitTour.
//!
//! Validates a facility tour request from the public form and records it as
//! an item in a SharePoint list through Microsoft Graph, authenticating with
//! app-only client credentials.

use lambda_http::{run, service_fn, Error, Request};
use shared::{
    config, resolve_client_secret, CorsPolicy, GraphClient, SharePointConfig, TourService,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Load configuration and the client secret, building the Graph client.
async fn build_client() -> shared::Result<GraphClient> {
    let config = SharePointConfig::from_env()?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);
    let client_secret = resolve_client_secret(&secrets_client, &config.client_secret).await?;

    info!(
        "Tour requests go to list '{}' on {}{}",
        config.list, config.hostname, config.site_path
    );

    Ok(GraphClient::new(reqwest::Client::new(), config, client_secret))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let sink = build_client().await;
    let service = Arc::new(TourService::new(sink, CorsPolicy::new(config::allowed_origin())));

    run(service_fn(move |event: Request| {
        let service = Arc::clone(&service);
        async move { service.handle(event).await }
    }))
    .await
}
