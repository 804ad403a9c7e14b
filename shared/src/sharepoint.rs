//! SharePoint list integration through Microsoft Graph.
//!
//! Each submission runs three calls in order: a client-credentials token
//! request, a site lookup by hostname and path, and the list item create.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::SharePointConfig;
use crate::models::TourSubmission;
use crate::service::TourSink;
use crate::{Error, Result};

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Client-credentials token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Graph site resource (only the id is needed)
#[derive(Debug, Deserialize)]
struct Site {
    id: String,
}

/// Graph list item resource
#[derive(Debug, Deserialize)]
struct ListItem {
    id: String,
}

/// Column values for a tour request list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TourListFields {
    pub title: String,
    pub requester_name: String,
    pub requester_email: String,
    pub tour_start: String,
    pub tour_end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&TourSubmission> for TourListFields {
    fn from(submission: &TourSubmission) -> Self {
        Self {
            title: submission.company.clone(),
            requester_name: submission.requester_name.clone(),
            requester_email: submission.requester_email.clone(),
            tour_start: submission.start.clone(),
            tour_end: submission.end.clone(),
            phone: submission.phone.clone(),
            party_size: submission.party_size.clone(),
            reason: submission.reason.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateListItem<'a> {
    fields: &'a TourListFields,
}

/// Microsoft Graph client for the tour request list.
pub struct GraphClient {
    http_client: reqwest::Client,
    config: SharePointConfig,
    client_secret: String,
}

/// Turn a non-success response into an upstream error, logging which step failed.
async fn check(step: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!("Graph {} failed: {} {}", step, status.as_u16(), body);
    Err(Error::Upstream {
        status: status.as_u16(),
        body,
    })
}

impl GraphClient {
    /// `client_secret` is the resolved secret value, not its source.
    pub fn new(http_client: reqwest::Client, config: SharePointConfig, client_secret: String) -> Self {
        Self {
            http_client,
            config,
            client_secret,
        }
    }

    /// Exchange client credentials for an app-only access token.
    async fn fetch_token(&self) -> Result<String> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.login_base_url,
            urlencoding::encode(&self.config.tenant_id)
        );
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
        ];

        let response = self.http_client.post(url).form(&params).send().await?;
        let token: TokenResponse = check("token request", response).await?.json().await?;
        Ok(token.access_token)
    }

    /// Resolve the configured site to its Graph id.
    async fn lookup_site(&self, token: &str) -> Result<String> {
        let url = format!(
            "{}/sites/{}:{}",
            self.config.graph_base_url, self.config.hostname, self.config.site_path
        );

        let response = self.http_client.get(url).bearer_auth(token).send().await?;
        let site: Site = check("site lookup", response).await?.json().await?;
        Ok(site.id)
    }

    /// Create the list item and return its id.
    async fn create_item(&self, token: &str, site_id: &str, fields: &TourListFields) -> Result<String> {
        let url = format!(
            "{}/sites/{}/lists/{}/items",
            self.config.graph_base_url,
            site_id,
            urlencoding::encode(&self.config.list)
        );

        let response = self
            .http_client
            .post(url)
            .bearer_auth(token)
            .json(&CreateListItem { fields })
            .send()
            .await?;
        let item: ListItem = check("list item create", response).await?.json().await?;
        Ok(item.id)
    }

    /// Record a tour request as a new list item.
    pub async fn create_tour_item(&self, submission: &TourSubmission) -> Result<String> {
        let token = self.fetch_token().await?;
        let site_id = self.lookup_site(&token).await?;
        let item_id = self
            .create_item(&token, &site_id, &TourListFields::from(submission))
            .await?;

        info!("Created list item {} in {}", item_id, self.config.list);
        Ok(item_id)
    }
}

impl TourSink for GraphClient {
    async fn submit(&self, submission: &TourSubmission) -> Result<Option<String>> {
        self.create_tour_item(submission).await.map(Some)
    }
}
