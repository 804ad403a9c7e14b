//! Forwards validated tour requests to the booking endpoint.

use tracing::{info, warn};

use crate::config::ForwardConfig;
use crate::models::TourSubmission;
use crate::service::TourSink;
use crate::{Error, Result};

/// Client for the booking endpoint.
#[derive(Debug, Clone)]
pub struct ForwardClient {
    http_client: reqwest::Client,
    url: String,
}

impl ForwardClient {
    pub fn new(http_client: reqwest::Client, config: ForwardConfig) -> Self {
        Self {
            http_client,
            url: config.book_api_url,
        }
    }

    /// POST the submission as JSON; any 2xx counts as accepted.
    pub async fn forward(&self, submission: &TourSubmission) -> Result<()> {
        let response = self
            .http_client
            .post(&self.url)
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        // Read the body even on success so failures carry it back to the caller.
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            info!("Booking endpoint accepted request ({})", status.as_u16());
            Ok(())
        } else {
            warn!("Booking endpoint rejected request: {} {}", status.as_u16(), body);
            Err(Error::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl TourSink for ForwardClient {
    async fn submit(&self, submission: &TourSubmission) -> Result<Option<String>> {
        self.forward(submission).await?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> TourSubmission {
        TourSubmission {
            company: "Acme".to_string(),
            requester_name: "Dana".to_string(),
            requester_email: "dana@acme.example".to_string(),
            start: "2026-11-03T14:00:00.000Z".to_string(),
            end: "2026-11-03T15:00:00.000Z".to_string(),
            phone: Some("555-0100".to_string()),
            party_size: None,
            reason: None,
        }
    }

    fn client_for(server: &MockServer) -> ForwardClient {
        ForwardClient::new(
            reqwest::Client::new(),
            ForwardConfig {
                book_api_url: format!("{}/api/book", server.uri()),
            },
        )
    }

    #[tokio::test]
    async fn test_forwards_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/book"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "company": "Acme",
                "requesterName": "Dana",
                "requesterEmail": "dana@acme.example",
                "startUtc": "2026-11-03T14:00:00.000Z",
                "endUtc": "2026-11-03T15:00:00.000Z",
                "phone": "555-0100"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).forward(&submission()).await.unwrap();
    }

    #[tokio::test]
    async fn test_plain_ok_counts_as_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("queued"))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).submit(&submission()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upstream_failure_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_string("slot taken"))
            .mount(&server)
            .await;

        match client_for(&server).forward(&submission()).await {
            Err(Error::Upstream { status, body }) => {
                assert_eq!(status, 409);
                assert_eq!(body, "slot taken");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
