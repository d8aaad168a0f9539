//! Search engine notification.
//!
//! Announces freshly published sitemaps to IndexNow endpoints and the
//! Google ping service. Outcomes are reported per endpoint and never
//! abort a generation run.

use std::{collections::HashSet, time::Duration};

use rayon::prelude::*;
use reqwest::{blocking::Client, redirect::Policy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Hosts that answer the IndexNow protocol.
pub const INDEXNOW_HOSTS: [&str; 7] = [
    "api.indexnow.org",
    "www.bing.com",
    "bing.com",
    "yandex.com",
    "searchadvisor.naver.com",
    "naver.com",
    "seznam.cz",
];

/// Google sitemap ping endpoint.
pub const GOOGLE_PING_URL: &str = "https://www.google.com/ping";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(6);
const MAX_REDIRECTS: usize = 3;
const USER_AGENT: &str = concat!("sitemark/", env!("CARGO_PKG_VERSION"));

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP client construction failure.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for notifier construction.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// How one endpoint answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PingStatus {
    /// 2xx response.
    Ok,
    /// Reachable but refused.
    Warn,
    /// Transport failure, including timeouts.
    Error,
}

/// Outcome of pinging one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingOutcome {
    /// Endpoint host or announced URL.
    pub target: String,

    /// Classified result.
    pub status: PingStatus,

    /// HTTP status line or transport error text.
    pub message: String,
}

/// Notifier that fans pings out to search engines.
#[derive(Debug)]
pub struct Notifier {
    client: Client,
    indexnow_endpoints: Vec<String>,
    google_endpoint: String,
}

impl Notifier {
    /// Create a notifier against the production endpoints.
    pub fn new() -> Result<Self> {
        Self::with_endpoints(default_indexnow_endpoints(), GOOGLE_PING_URL.to_string())
    }

    /// Create a notifier against custom endpoints.
    pub fn with_endpoints(
        indexnow_endpoints: Vec<String>,
        google_endpoint: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            indexnow_endpoints,
            google_endpoint,
        })
    }

    /// Announce `sitemap_url` to every IndexNow endpoint.
    pub fn ping_indexnow(&self, sitemap_url: &str, key: &str) -> Vec<PingOutcome> {
        let outcomes: Vec<PingOutcome> = self
            .indexnow_endpoints
            .par_iter()
            .map(|endpoint| {
                self.ping(
                    host_of(endpoint),
                    endpoint,
                    &[("url", sitemap_url), ("key", key)],
                )
            })
            .collect();

        info!(
            ok = outcomes.iter().filter(|o| o.status == PingStatus::Ok).count(),
            total = outcomes.len(),
            "notified IndexNow endpoints"
        );
        outcomes
    }

    /// Announce each target URL to the Google ping service.
    pub fn ping_google(&self, targets: &[String]) -> Vec<PingOutcome> {
        let outcomes: Vec<PingOutcome> = targets
            .par_iter()
            .map(|target| {
                self.ping(
                    target.clone(),
                    &self.google_endpoint,
                    &[("sitemap", target.as_str())],
                )
            })
            .collect();

        info!(
            ok = outcomes.iter().filter(|o| o.status == PingStatus::Ok).count(),
            total = outcomes.len(),
            "pinged Google"
        );
        outcomes
    }

    fn ping(&self, target: String, endpoint: &str, query: &[(&str, &str)]) -> PingOutcome {
        match self.client.get(endpoint).query(query).send() {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    debug!(target = %target, %status, "ping accepted");
                    PingOutcome {
                        target,
                        status: PingStatus::Ok,
                        message: format!("HTTP {status}"),
                    }
                } else {
                    warn!(target = %target, %status, "ping rejected");
                    PingOutcome {
                        target,
                        status: PingStatus::Warn,
                        message: format!("HTTP {status}"),
                    }
                }
            }
            Err(e) => {
                warn!(target = %target, error = %e, "ping failed");
                PingOutcome {
                    target,
                    status: PingStatus::Error,
                    message: e.to_string(),
                }
            }
        }
    }
}

fn default_indexnow_endpoints() -> Vec<String> {
    INDEXNOW_HOSTS
        .iter()
        .map(|host| format!("https://{host}/indexnow"))
        .collect()
}

fn host_of(endpoint: &str) -> String {
    endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or(endpoint)
        .to_string()
}

/// Drop duplicate targets while keeping first-seen order.
#[must_use]
pub fn dedup_targets(targets: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|target| seen.insert(target.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    const SITEMAP_URL: &str = "https://example.com/uploads/sitemark-sitemaps/sitemap_index.xml";

    fn start_server(runtime: &tokio::runtime::Runtime) -> MockServer {
        runtime.block_on(MockServer::start())
    }

    fn mount_indexnow(runtime: &tokio::runtime::Runtime, server: &MockServer, status: u16) {
        runtime.block_on(
            Mock::given(method("GET"))
                .and(path("/indexnow"))
                .and(query_param("url", SITEMAP_URL))
                .and(query_param("key", "testkey"))
                .respond_with(ResponseTemplate::new(status))
                .mount(server),
        );
    }

    #[test]
    fn test_indexnow_success() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let server = start_server(&runtime);
        mount_indexnow(&runtime, &server, 200);

        let endpoint = format!("{}/indexnow", server.uri());
        let notifier = Notifier::with_endpoints(vec![endpoint.clone()], GOOGLE_PING_URL.to_string())
            .expect("notifier");

        let outcomes = notifier.ping_indexnow(SITEMAP_URL, "testkey");

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, PingStatus::Ok);
        assert_eq!(outcomes[0].target, host_of(&endpoint));
        assert!(outcomes[0].message.contains("200"));
    }

    #[test]
    fn test_indexnow_rejection_is_warn() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let server = start_server(&runtime);
        mount_indexnow(&runtime, &server, 429);

        let notifier = Notifier::with_endpoints(
            vec![format!("{}/indexnow", server.uri())],
            GOOGLE_PING_URL.to_string(),
        )
        .expect("notifier");

        let outcomes = notifier.ping_indexnow(SITEMAP_URL, "testkey");

        assert_eq!(outcomes[0].status, PingStatus::Warn);
        assert!(outcomes[0].message.contains("429"));
    }

    #[test]
    fn test_unreachable_endpoint_is_error() {
        let notifier = Notifier::with_endpoints(
            vec!["http://127.0.0.1:1/indexnow".to_string()],
            GOOGLE_PING_URL.to_string(),
        )
        .expect("notifier");

        let outcomes = notifier.ping_indexnow(SITEMAP_URL, "testkey");

        assert_eq!(outcomes[0].status, PingStatus::Error);
        assert!(!outcomes[0].message.is_empty());
    }

    #[test]
    fn test_outcomes_keep_endpoint_order() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let server = start_server(&runtime);
        mount_indexnow(&runtime, &server, 200);

        let notifier = Notifier::with_endpoints(
            vec![
                format!("{}/indexnow", server.uri()),
                "http://127.0.0.1:1/indexnow".to_string(),
            ],
            GOOGLE_PING_URL.to_string(),
        )
        .expect("notifier");

        let outcomes = notifier.ping_indexnow(SITEMAP_URL, "testkey");

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].status, PingStatus::Ok);
        assert_eq!(outcomes[1].status, PingStatus::Error);
    }

    #[test]
    fn test_google_ping_per_target() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let server = start_server(&runtime);
        runtime.block_on(
            Mock::given(method("GET"))
                .and(path("/ping"))
                .and(query_param("sitemap", SITEMAP_URL))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server),
        );
        runtime.block_on(
            Mock::given(method("GET"))
                .and(path("/ping"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server),
        );

        let notifier = Notifier::with_endpoints(Vec::new(), format!("{}/ping", server.uri()))
            .expect("notifier");

        let targets = vec![
            SITEMAP_URL.to_string(),
            "https://example.com/other.xml".to_string(),
        ];
        let outcomes = notifier.ping_google(&targets);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].target, SITEMAP_URL);
        assert_eq!(outcomes[0].status, PingStatus::Ok);
        assert_eq!(outcomes[1].status, PingStatus::Warn);
    }

    #[test]
    fn test_dedup_targets() {
        let targets = vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
            "c".to_string(),
            "b".to_string(),
        ];
        assert_eq!(dedup_targets(targets), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_default_endpoints_cover_all_hosts() {
        let endpoints = default_indexnow_endpoints();
        assert_eq!(endpoints.len(), INDEXNOW_HOSTS.len());
        assert!(endpoints
            .iter()
            .all(|e| e.starts_with("https://") && e.ends_with("/indexnow")));
    }
}
