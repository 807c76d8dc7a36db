use crate::analytics::PortfolioSummary;
use crate::config::Settings;
use crate::domain::company::Company;
use crate::domain::holding::Holding;
use crate::domain::insight::{CompanyInsight, Comparison};
use anyhow::Context;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure or a server-side fault: the service could not answer.
    #[error("ESG service unavailable: {0}")]
    Unavailable(String),
    #[error("ESG service rejected the request (status={status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("unexpected response from ESG service: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Typed client for the ESG HTTP API.
#[derive(Debug, Clone)]
pub struct EsgApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl EsgApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.require_api_url()?;
        Self::new(base_url, Duration::from_secs(settings.api_timeout_secs))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Company>, ClientError> {
        let req = self
            .http
            .get(self.url("/api/search"))
            .query(&[("query", query)]);
        self.send(req).await
    }

    pub async fn company(&self, name: &str) -> Result<CompanyInsight, ClientError> {
        let mut url = reqwest::Url::parse(&self.url("/api/companies"))
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Unavailable(format!("invalid base url: {}", self.base_url)))?
            .push(name);
        self.send(self.http.get(url)).await
    }

    pub async fn compare(&self, names: &[String]) -> Result<Comparison, ClientError> {
        let req = self
            .http
            .get(self.url("/api/compare"))
            .query(&[("names", names.join(","))]);
        self.send(req).await
    }

    pub async fn portfolio(&self) -> Result<Vec<Holding>, ClientError> {
        self.send(self.http.get(self.url("/api/portfolio"))).await
    }

    pub async fn add_to_portfolio(&self, holding: &Holding) -> Result<Vec<Holding>, ClientError> {
        let req = self
            .http
            .request(Method::POST, self.url("/api/portfolio"))
            .json(holding);
        self.send(req).await
    }

    pub async fn remove_from_portfolio(
        &self,
        company_name: &str,
    ) -> Result<Vec<Holding>, ClientError> {
        let req = self
            .http
            .request(Method::DELETE, self.url("/api/portfolio"))
            .query(&[("companyName", company_name)]);
        self.send(req).await
    }

    pub async fn summary(&self) -> Result<PortfolioSummary, ClientError> {
        self.send(self.http.get(self.url("/api/portfolio/summary")))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let res = req
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        if status.is_server_error() {
            return Err(ClientError::Unavailable(format!("status={status}")));
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(ClientError::Api { status, message });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
