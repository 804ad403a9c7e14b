//! Shared library for the tour request Lambda functions.
//!
//! This crate provides the request models, validation, downstream clients and
//! HTTP plumbing used by every tour request handler.

pub mod config;
pub mod error;
pub mod form;
pub mod forward;
pub mod http;
pub mod models;
pub mod secrets;
pub mod service;
pub mod sharepoint;

pub use config::{ClientSecretSource, ForwardConfig, SharePointConfig};
pub use error::{Error, Result};
pub use form::{FormError, Meridiem, TimeSelect, TourForm};
pub use forward::ForwardClient;
pub use http::{CorsPolicy, TourResponse};
pub use models::{TourRequest, TourSubmission};
pub use secrets::{get_secret, resolve_client_secret};
pub use service::{TourService, TourSink};
pub use sharepoint::{GraphClient, TourListFields};
