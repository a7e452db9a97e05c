//! HTTP-backed page sessions
//!
//! This module loads documents with a plain HTTP client:
//! - building the client with the configured user agent and timeouts
//! - GET navigation with error classification
//! - following the targets of clicked anchors and `data-href` controls
//!
//! A fetched static document has no outstanding network activity once its
//! body has been read, so it is quiescent as soon as navigation returns.

use crate::browser::{click_target, Browser, Locator, PageSession};
use crate::config::BrowserConfig;
use crate::url::resolve_href;
use crate::{HarvestError, NavigationError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Browsing session backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: Client,
    navigation_timeout: Duration,
}

impl HttpBrowser {
    /// Builds the shared HTTP client
    ///
    /// # Arguments
    ///
    /// * `config` - The browser configuration (user agent, headless flag)
    /// * `navigation_timeout` - Upper bound for a single navigation
    pub fn new(config: &BrowserConfig, navigation_timeout: Duration) -> Result<Self, HarvestError> {
        if !config.headless {
            tracing::warn!("HTTP sessions have no visible window; headful mode is ignored");
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(navigation_timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| HarvestError::Session(e.to_string()))?;

        Ok(Self {
            client,
            navigation_timeout,
        })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageSession>, HarvestError> {
        Ok(Box::new(HttpPage::new(
            self.client.clone(),
            self.navigation_timeout,
        )))
    }
}

/// A single page session holding the last loaded document
#[derive(Debug)]
pub struct HttpPage {
    client: Client,
    navigation_timeout: Duration,
    url: Option<Url>,
    html: Option<String>,
}

impl HttpPage {
    pub fn new(client: Client, navigation_timeout: Duration) -> Self {
        Self {
            client,
            navigation_timeout,
            url: None,
            html: None,
        }
    }
}

#[async_trait]
impl PageSession for HttpPage {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError> {
        let target = Url::parse(url).map_err(|e| NavigationError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::trace!("GET {}", target);

        let response = self
            .client
            .get(target)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavigationError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                NavigationError::Timeout {
                    url: url.to_string(),
                }
            } else {
                NavigationError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        self.url = Some(final_url);
        self.html = Some(body);
        Ok(())
    }

    async fn wait_for_idle(&mut self, _timeout: Duration) -> bool {
        self.html.is_some()
    }

    fn current_url(&self) -> Option<String> {
        self.url.as_ref().map(Url::to_string)
    }

    async fn content(&mut self) -> Result<String, NavigationError> {
        self.html.clone().ok_or_else(|| NavigationError::Other {
            url: self.current_url().unwrap_or_default(),
            message: "no document loaded".to_string(),
        })
    }

    async fn click(&mut self, locator: &Locator) -> Result<bool, NavigationError> {
        let (Some(html), Some(base)) = (self.html.as_deref(), self.url.as_ref()) else {
            return Ok(false);
        };

        let Some(target) = click_target(html, locator).and_then(|href| resolve_href(&href, base))
        else {
            return Ok(false);
        };

        tracing::debug!("Clicking {} -> {}", locator, target);
        let timeout = self.navigation_timeout;
        self.goto(target.as_str(), timeout).await?;
        Ok(true)
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), NavigationError> {
        // Static documents have nothing to lazy-load.
        Ok(())
    }

    async fn close(&mut self) {
        self.url = None;
        self.html = None;
    }
}

/// Maps a transport error onto a navigation failure
fn classify_error(url: &str, error: reqwest::Error) -> NavigationError {
    if error.is_timeout() {
        NavigationError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        NavigationError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        NavigationError::Other {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
