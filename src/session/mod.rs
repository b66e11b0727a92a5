//! Browser session abstraction
//!
//! The sync engine never talks to fantoccini directly; it drives a
//! [`Session`] capability trait so the traversal and reconciliation logic
//! can be exercised against a scripted fake in tests. The production
//! implementation lives in [`webdriver`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

pub use webdriver::WebDriverSession;

/// Element locator, fixed at compile time
///
/// Every element this tool touches is a known fixture of the remote UI,
/// so selectors are `'static` strings rather than runtime-built queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector
    Css(&'static str),
    /// XPath expression
    XPath(&'static str),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(s) => write!(f, "css `{s}`"),
            Selector::XPath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

/// Explicit window-handle value
///
/// Opening a secondary session returns one of these, and restoring the
/// primary session consumes one; positional indices into the browser's
/// window list are never used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability set the sync engine requires from an automated browser
///
/// Every call is blocking from the engine's point of view: it suspends the
/// single task of control until the browser answers or the bounded wait
/// elapses. Waits report [`crate::Error::WaitTimeout`]; plain lookups of an
/// absent element report [`crate::Error::ElementMissing`].
#[async_trait]
pub trait Session: Send + Sync {
    /// Navigate the active window to a URL.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Locate an element and click it.
    async fn click(&self, selector: &Selector) -> Result<()>;

    /// Locate an element and type text into it.
    async fn send_keys(&self, selector: &Selector, text: &str) -> Result<()>;

    /// Read an attribute from the first matching element.
    async fn attr(&self, selector: &Selector, name: &str) -> Result<Option<String>>;

    /// Read an attribute from every matching element, in document order.
    async fn attr_all(&self, selector: &Selector, name: &str) -> Result<Vec<String>>;

    /// Read a DOM property from the first matching element.
    async fn prop(&self, selector: &Selector, name: &str) -> Result<Option<String>>;

    /// Whether the first matching element (a checkbox) is selected.
    async fn is_selected(&self, selector: &Selector) -> Result<bool>;

    /// Block until the element is present, or time out.
    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Block until the active window's URL contains `fragment`, or time out.
    async fn wait_for_url_contains(&self, fragment: &str, timeout: Duration) -> Result<()>;

    /// Handles of all open windows.
    async fn windows(&self) -> Result<Vec<WindowId>>;

    /// Handle of the active window.
    async fn active_window(&self) -> Result<WindowId>;

    /// Make the given window the active one.
    async fn switch_window(&self, window: &WindowId) -> Result<()>;

    /// Close the active window. The caller must switch to another window
    /// before issuing further page commands.
    async fn close_window(&self) -> Result<()>;

    /// Block until a window not present in `known` opens, and return its
    /// handle without switching to it.
    async fn wait_for_new_window(&self, known: &[WindowId], timeout: Duration) -> Result<WindowId>;
}
