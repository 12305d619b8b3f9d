use crate::models::analysis::AnalysisResponse;
use crate::models::ticket::{CreatedTicket, NewTicket, ServiceError, StatusUpdate, Ticket};
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

pub struct DeskClient {
    client: Client,
    base_url: String,
}

impl DeskClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_analysis(&self, ticket_id: &str) -> Result<AnalysisResponse> {
        let response = self.request_analysis(ticket_id).await?;

        let analysis = response
            .json::<AnalysisResponse>()
            .await
            .context("Failed to parse analysis response")?;

        Ok(analysis)
    }

    /// The analysis body exactly as the service sent it.
    pub async fn get_analysis_raw(&self, ticket_id: &str) -> Result<Value> {
        let response = self.request_analysis(ticket_id).await?;

        let body = response
            .json::<Value>()
            .await
            .context("Failed to parse analysis response")?;

        Ok(body)
    }

    async fn request_analysis(&self, ticket_id: &str) -> Result<Response> {
        let url = format!(
            "{}/analyze/{}",
            self.base_url,
            urlencoding::encode(ticket_id)
        );
        debug!(%url, "requesting ticket analysis");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to the analysis service")?;

        ensure_success(response, "Analysis service").await
    }

    pub async fn update_status(&self, ticket_id: &str, status: &str) -> Result<()> {
        let url = format!(
            "{}/ticket/{}/status",
            self.base_url,
            urlencoding::encode(ticket_id)
        );
        debug!(%url, status, "updating ticket status");

        let response = self
            .client
            .post(&url)
            .json(&StatusUpdate { status })
            .send()
            .await
            .context("Failed to send status update")?;

        ensure_success(response, "Status update").await?;

        Ok(())
    }

    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<String> {
        let url = format!("{}/create-ticket", self.base_url);
        debug!(%url, asset_id = %ticket.asset_id, "creating ticket");

        let response = self
            .client
            .post(&url)
            .json(ticket)
            .send()
            .await
            .context("Failed to send ticket creation request")?;

        let response = ensure_success(response, "Ticket creation").await?;

        let created = response
            .json::<CreatedTicket>()
            .await
            .context("Failed to parse ticket creation response")?;

        Ok(created.new_ticket_id)
    }

    pub async fn client_history(&self, client_id: &str) -> Result<Vec<Ticket>> {
        let url = format!(
            "{}/history/{}",
            self.base_url,
            urlencoding::encode(client_id)
        );
        debug!(%url, "fetching client history");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch client history")?;

        let response = ensure_success(response, "History").await?;

        let tickets = response
            .json::<Vec<Ticket>>()
            .await
            .context("Failed to parse history response")?;

        Ok(tickets)
    }

    pub fn page_url(&self, create: bool) -> String {
        if create {
            format!("{}/create", self.base_url)
        } else {
            format!("{}/", self.base_url)
        }
    }
}

/// Turns a non-2xx response into an error carrying the service's `error` text.
async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ServiceError>(&text)
        .map(|e| e.error)
        .unwrap_or(text);
    anyhow::bail!("{} failed ({}): {}", what, status, message);
}
