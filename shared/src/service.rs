//! Request pipeline shared by the tour request handlers.

use lambda_http::{Body, Request, Response};
use std::future::Future;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::http::{
    error_response, json_response, method_not_allowed, preflight_response, CorsPolicy,
    TourResponse,
};
use crate::models::{TourRequest, TourSubmission};
use crate::{Error, Result};

/// Downstream system that records a tour request.
pub trait TourSink: Send + Sync {
    /// Deliver one submission, returning the downstream record id if there is one.
    fn submit(&self, submission: &TourSubmission) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Validates incoming requests and hands them to a sink.
pub struct TourService<S> {
    /// A sink that failed to configure at cold start is reported on every request.
    sink: Result<S>,
    cors: CorsPolicy,
}

impl<S: TourSink> TourService<S> {
    pub fn new(sink: Result<S>, cors: CorsPolicy) -> Self {
        if let Err(e) = &sink {
            error!("Tour handler is not configured: {}", e);
        }
        Self { sink, cors }
    }

    pub async fn handle(&self, event: Request) -> std::result::Result<Response<Body>, lambda_http::Error> {
        let method = event.method().as_str();

        match method {
            "OPTIONS" => return preflight_response(&self.cors),
            "POST" => {}
            _ => {
                warn!("Rejected {} {}", method, event.uri().path());
                return method_not_allowed(&self.cors);
            }
        }

        let sink = match &self.sink {
            Ok(sink) => sink,
            Err(e) => return error_response(500, e.to_string(), &self.cors),
        };

        let request: TourRequest = crate::parse_body!(event.body(), &self.cors);

        let submission = match request.into_submission() {
            Ok(submission) => submission,
            Err(Error::MissingFields(fields)) => {
                info!("Missing required fields: {}", fields.join(", "));
                return json_response(400, &TourResponse::missing(fields), &self.cors);
            }
            Err(e) => return error_response(e.status_code(), e.to_string(), &self.cors),
        };

        let submission_id = Uuid::new_v4();
        let span = tracing::info_span!("tour_submission", %submission_id);

        async {
            info!("Submitting tour request for {}", submission.company);

            match sink.submit(&submission).await {
                Ok(id) => json_response(201, &TourResponse::success(id), &self.cors),
                Err(e @ Error::Upstream { .. }) => {
                    error!("Upstream rejected tour request: {}", e);
                    error_response(502, e.to_string(), &self.cors)
                }
                Err(e) => {
                    error!("Tour request failed: {}", e);
                    error_response(500, format!("Internal error: {}", e), &self.cors)
                }
            }
        }
        .instrument(span)
        .await
    }
}
