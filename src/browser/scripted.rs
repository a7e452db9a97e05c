//! In-memory browser for unit tests
//!
//! Pages are served from a map of URL -> HTML. URLs registered as failing
//! always time out and URLs registered as panicking panic. Every navigation is counted and the number of concurrently
//! open sessions is tracked so tests can assert on retries and the
//! concurrency ceiling.

use crate::browser::{click_target, Browser, Locator, PageSession};
use crate::url::resolve_href;
use crate::{HarvestError, NavigationError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Debug, Default)]
struct SiteState {
    pages: HashMap<String, String>,
    after_scroll: HashMap<String, String>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    visits: HashMap<String, usize>,
    open_sessions: usize,
    max_open_sessions: usize,
    opened: usize,
    closed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedBrowser {
    state: Arc<Mutex<SiteState>>,
    fail_new_page: bool,
    latency: Duration,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(url.to_string(), html.to_string());
        self
    }

    /// Content that replaces `url`'s document once it has been scrolled
    pub fn after_scroll(self, url: &str, html: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .after_scroll
            .insert(url.to_string(), html.to_string());
        self
    }

    pub fn failing(self, url: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert(url.to_string());
        self
    }

    /// Navigating to `url` panics, after the visit is counted
    pub fn panicking(self, url: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .panicking
            .insert(url.to_string());
        self
    }

    /// Simulated time each navigation takes
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn unavailable() -> Self {
        Self {
            fail_new_page: true,
            ..Self::default()
        }
    }

    pub fn visits(&self, url: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .visits
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    pub fn max_open_sessions(&self) -> usize {
        self.state.lock().unwrap().max_open_sessions
    }

    pub fn opened_and_closed(&self) -> (usize, usize) {
        let state = self.state.lock().unwrap();
        (state.opened, state.closed)
    }
}

#[async_trait]
impl Browser for ScriptedBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageSession>, HarvestError> {
        if self.fail_new_page {
            return Err(HarvestError::Session("browser unavailable".to_string()));
        }

        {
            let mut state = self.state.lock().unwrap();
            state.open_sessions += 1;
            state.opened += 1;
            state.max_open_sessions = state.max_open_sessions.max(state.open_sessions);
        }

        Ok(Box::new(ScriptedPage {
            state: Arc::clone(&self.state),
            latency: self.latency,
            url: None,
            html: None,
            closed: false,
        }))
    }
}

pub struct ScriptedPage {
    state: Arc<Mutex<SiteState>>,
    latency: Duration,
    url: Option<String>,
    html: Option<String>,
    closed: bool,
}

#[async_trait]
impl PageSession for ScriptedPage {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> Result<(), NavigationError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let (failing, panicking, html) = {
            let mut state = self.state.lock().unwrap();
            *state.visits.entry(url.to_string()).or_insert(0) += 1;
            (
                state.failing.contains(url),
                state.panicking.contains(url),
                state.pages.get(url).cloned(),
            )
        };

        if panicking {
            panic!("scripted panic while loading {}", url);
        }

        if failing {
            return Err(NavigationError::Timeout {
                url: url.to_string(),
            });
        }

        match html {
            Some(html) => {
                self.url = Some(url.to_string());
                self.html = Some(html);
                Ok(())
            }
            None => Err(NavigationError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    async fn wait_for_idle(&mut self, _timeout: Duration) -> bool {
        true
    }

    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }

    async fn content(&mut self) -> Result<String, NavigationError> {
        self.html.clone().ok_or_else(|| NavigationError::Other {
            url: String::new(),
            message: "no document loaded".to_string(),
        })
    }

    async fn click(&mut self, locator: &Locator) -> Result<bool, NavigationError> {
        let target = match (&self.html, &self.url) {
            (Some(html), Some(url)) => {
                let base = Url::parse(url).map_err(|e| NavigationError::Other {
                    url: url.clone(),
                    message: e.to_string(),
                })?;
                click_target(html, locator).and_then(|href| resolve_href(&href, &base))
            }
            _ => None,
        };

        match target {
            Some(target) => {
                self.goto(target.as_str(), Duration::from_secs(1)).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), NavigationError> {
        if let Some(url) = &self.url {
            if let Some(html) = self.state.lock().unwrap().after_scroll.get(url) {
                self.html = Some(html.clone());
            }
        }
        Ok(())
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let mut state = self.state.lock().unwrap();
            state.open_sessions -= 1;
            state.closed += 1;
        }
    }
}
