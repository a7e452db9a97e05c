//! Navigable-page capability
//!
//! The harvester never talks to the target site directly. It asks a
//! [`Browser`] for isolated [`PageSession`]s and drives them through
//! navigation, click and scroll interactions, reading back the serialized
//! document for selector evaluation.
//!
//! - `HttpBrowser`: reqwest-backed sessions over static documents
//! - `Locator`: CSS + has-text match expressions shared by extraction and clicks

mod http;
mod locator;
#[cfg(test)]
pub(crate) mod scripted;

pub use http::{HttpBrowser, HttpPage};
pub use locator::{click_target, element_text, is_enabled, is_visible, Locator};

use crate::{HarvestError, NavigationError};
use async_trait::async_trait;
use std::time::Duration;

/// One isolated page/rendering context
///
/// Sessions are owned by exactly one unit of work and never shared.
#[async_trait]
pub trait PageSession: Send {
    /// Navigates to `url`, failing on DNS, connection, HTTP or timeout errors
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError>;

    /// Waits for network quiescence; returns false if `timeout` elapsed first
    async fn wait_for_idle(&mut self, timeout: Duration) -> bool;

    /// URL of the currently loaded document, after redirects
    fn current_url(&self) -> Option<String>;

    /// Serialized DOM of the current document
    async fn content(&mut self) -> Result<String, NavigationError>;

    /// Clicks the first visible, enabled element matching `locator`
    ///
    /// Returns Ok(false) when nothing clickable matched.
    async fn click(&mut self, locator: &Locator) -> Result<bool, NavigationError>;

    /// Scrolls the viewport to the bottom of the document
    async fn scroll_to_bottom(&mut self) -> Result<(), NavigationError>;

    /// Releases the session's resources
    async fn close(&mut self);
}

/// The top-level browsing session, acquired once per run
#[async_trait]
pub trait Browser: Send + Sync {
    /// Opens a fresh, isolated page session
    async fn new_page(&self) -> Result<Box<dyn PageSession>, HarvestError>;
}
