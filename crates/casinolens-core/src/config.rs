//! Endpoint configuration shared by the clients and the CLI.

/// Research API deployment used when nothing else is configured.
pub const DEFAULT_RESULTS_BASE_URL: &str = "https://casino-proof-of-concept-api.vercel.app";

/// Read-only feed of casinos currently tracked by the backing store.
pub const DEFAULT_CURRENT_CASINOS_FEED_URL: &str =
    "https://xhks-nxia-vlqr.n7c.xano.io/api:1ZwRS-f0/activeSUB";

/// Where the dashboard fetches its data from.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the research API, without trailing slash.
    pub results_base_url: String,
    pub current_casinos_feed_url: String,
    /// Hosted store holding historical runs. Run history is unavailable without it.
    pub store: Option<StoreConfig>,
}

/// PostgREST-style store holding the `research_runs` table.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            results_base_url: DEFAULT_RESULTS_BASE_URL.to_string(),
            current_casinos_feed_url: DEFAULT_CURRENT_CASINOS_FEED_URL.to_string(),
            store: None,
        }
    }
}

impl DashboardConfig {
    /// Normalise URLs (trailing slashes) and drop an incomplete store config.
    pub fn normalized(mut self) -> Self {
        self.results_base_url = trim_url(&self.results_base_url);
        self.current_casinos_feed_url = self.current_casinos_feed_url.trim().to_string();
        self.store = self.store.and_then(|s| {
            let url = trim_url(&s.url);
            let api_key = s.api_key.trim().to_string();
            (!url.is_empty() && !api_key.is_empty()).then_some(StoreConfig { url, api_key })
        });
        self
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
