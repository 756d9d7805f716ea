//! HTTP client for the research API, the run store, and the current-casino feed.
//!
//! Every operation is a single request with no retry. The `try_*` methods
//! return the failure; the plain methods log it and hand back `None`/empty so
//! a report can always render something.

use casinolens_core::{
    CurrentCasino, DashboardConfig, HealthStatus, ResearchResult, ResearchRun, ResultsEnvelope,
};
use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// Which result the research API should answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsMode {
    /// The most recently stored run.
    Last,
    /// Run the research job now and return its output.
    Manual,
}

impl ResultsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultsMode::Last => "last",
            ResultsMode::Manual => "manual",
        }
    }
}

/// Client for all dashboard data sources.
pub struct DashboardClient {
    client: reqwest::Client,
    config: DashboardConfig,
}

impl DashboardClient {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn results_url(&self, mode: ResultsMode) -> String {
        format!(
            "{}/api/results?mode={}",
            self.config.results_base_url,
            mode.as_str()
        )
    }

    /// Fetch a research result. `Ok(None)` means the API has nothing stored yet.
    pub async fn try_fetch_results(
        &self,
        mode: ResultsMode,
    ) -> Result<Option<ResearchResult>, FetchError> {
        let url = self.results_url(mode);
        info!(url = %url, "fetching research results");
        let envelope: ResultsEnvelope = self.get_json(self.client.get(&url)).await?;
        let result = envelope.into_result();
        info!(
            mode = mode.as_str(),
            comparisons = result.as_ref().map_or(0, |r| r.offer_comparisons.len()),
            "fetched research results"
        );
        Ok(result)
    }

    /// Fetch a research result, logging and swallowing any failure.
    pub async fn fetch_results(&self, mode: ResultsMode) -> Option<ResearchResult> {
        match self.try_fetch_results(mode).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "error fetching from API");
                None
            }
        }
    }

    /// Run the research job on the API. The job's own output is discarded.
    pub async fn try_trigger_manual_run(&self) -> Result<(), FetchError> {
        let url = self.results_url(ResultsMode::Manual);
        info!(url = %url, "triggering manual research run");
        let resp = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }
        info!("manual run complete");
        Ok(())
    }

    pub async fn trigger_manual_run(&self) -> bool {
        match self.try_trigger_manual_run().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "error triggering manual run");
                false
            }
        }
    }

    /// Historical runs, newest first.
    ///
    /// Rows that do not decode (e.g. a missing `id`) are skipped.
    pub async fn try_research_runs(&self) -> Result<Vec<ResearchRun>, FetchError> {
        let store = self
            .config
            .store
            .as_ref()
            .ok_or(FetchError::NotConfigured("run store"))?;
        let url = format!(
            "{}/rest/v1/research_runs?select=*&order=created_at.desc",
            store.url
        );

        info!(url = %url, "fetching research runs");
        let request = self
            .client
            .get(&url)
            .header("apikey", &store.api_key)
            .bearer_auth(&store.api_key);
        let rows: Vec<Value> = self.get_json(request).await?;

        let total = rows.len();
        let runs: Vec<ResearchRun> = decode_rows(rows, "research run");
        info!(count = runs.len(), skipped = total - runs.len(), "fetched research runs");
        Ok(runs)
    }

    pub async fn research_runs(&self) -> Vec<ResearchRun> {
        match self.try_research_runs().await {
            Ok(runs) => runs,
            Err(e) => {
                error!(error = %e, "error fetching research runs");
                Vec::new()
            }
        }
    }

    /// Casinos currently tracked by the backing store.
    pub async fn try_current_casinos(&self) -> Result<Vec<CurrentCasino>, FetchError> {
        let url = &self.config.current_casinos_feed_url;
        info!(url = %url, "fetching current casinos");
        // A `null` body is treated as an empty feed.
        let rows: Option<Vec<Value>> = self.get_json(self.client.get(url)).await?;
        let rows = rows.unwrap_or_default();

        let total = rows.len();
        let casinos: Vec<CurrentCasino> = decode_rows(rows, "current casino");
        info!(count = casinos.len(), skipped = total - casinos.len(), "fetched current casinos");
        Ok(casinos)
    }

    pub async fn current_casinos(&self) -> Vec<CurrentCasino> {
        match self.try_current_casinos().await {
            Ok(casinos) => casinos,
            Err(e) => {
                error!(error = %e, "error fetching current casinos");
                Vec::new()
            }
        }
    }

    /// Liveness of the research API.
    pub async fn health(&self) -> Result<HealthStatus, FetchError> {
        let url = format!("{}/api/health", self.config.results_base_url);
        info!(url = %url, "checking API health");
        self.get_json(self.client.get(&url)).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FetchError> {
        let resp = request.header(CACHE_CONTROL, "no-store").send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Decode each row on its own, skipping (and logging) the ones that do not fit.
fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, what: &str) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, kind = what, "skipping undecodable row");
                None
            }
        })
        .collect()
}
