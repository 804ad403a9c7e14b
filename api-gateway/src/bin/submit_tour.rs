//! Submit Tour Lambda - Handles POST /api/submitTour.
//!
//! Validates a facility tour request from the public form and forwards it to
//! the booking endpoint configured in `BOOK_API_URL`.

use lambda_http::{run, service_fn, Error, Request};
use shared::{config, CorsPolicy, ForwardClient, ForwardConfig, TourService};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let http_client = reqwest::Client::new();
    let sink = ForwardConfig::from_env().map(|config| ForwardClient::new(http_client, config));
    let service = Arc::new(TourService::new(sink, CorsPolicy::new(config::allowed_origin())));

    run(service_fn(move |event: Request| {
        let service = Arc::clone(&service);
        async move { service.handle(event).await }
    }))
    .await
}
