//! fantoccini-backed implementation of the [`Session`] trait

use std::time::{Duration, Instant};

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator};
use tracing::debug;

use crate::error::{Error, Result};
use crate::session::{Selector, Session, WindowId};

/// Poll interval for conditions fantoccini has no built-in wait for
/// (URL contents, window count).
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Production browser session backed by a WebDriver endpoint
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connect to a running WebDriver endpoint (e.g. chromedriver) and
    /// start a Chrome session.
    pub async fn connect(webdriver_url: &str) -> Result<Self> {
        let mut chrome_opts = serde_json::map::Map::new();
        chrome_opts.insert(
            "args".to_string(),
            serde_json::json!(["--start-maximized", "--disable-gpu"]),
        );

        let mut caps = serde_json::map::Map::new();
        caps.insert("browserName".to_string(), serde_json::json!("chrome"));
        caps.insert(
            "goog:chromeOptions".to_string(),
            serde_json::json!(chrome_opts),
        );

        debug!(url = webdriver_url, "connecting to WebDriver endpoint");
        let mut builder = ClientBuilder::native();
        builder.capabilities(caps);
        let client = builder.connect(webdriver_url).await?;

        Ok(Self { client })
    }

    /// End the WebDriver session.
    pub async fn quit(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }

    fn locator(selector: &Selector) -> Locator<'static> {
        match *selector {
            Selector::Css(s) => Locator::Css(s),
            Selector::XPath(s) => Locator::XPath(s),
        }
    }

    async fn find(&self, selector: &Selector) -> Result<Element> {
        match self.client.find(Self::locator(selector)).await {
            Ok(element) => Ok(element),
            Err(e) if e.is_no_such_element() => Err(Error::ElementMissing(selector.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

fn to_window_id(handle: WindowHandle) -> WindowId {
    WindowId(String::from(handle))
}

fn to_handle(window: &WindowId) -> Result<WindowHandle> {
    WindowHandle::try_from(window.0.clone())
        .map_err(|_| Error::InvalidWindow(window.0.clone()))
}

#[async_trait]
impl Session for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        self.find(selector).await?.click().await?;
        Ok(())
    }

    async fn send_keys(&self, selector: &Selector, text: &str) -> Result<()> {
        self.find(selector).await?.send_keys(text).await?;
        Ok(())
    }

    async fn attr(&self, selector: &Selector, name: &str) -> Result<Option<String>> {
        Ok(self.find(selector).await?.attr(name).await?)
    }

    async fn attr_all(&self, selector: &Selector, name: &str) -> Result<Vec<String>> {
        let elements = self.client.find_all(Self::locator(selector)).await?;
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(value) = element.attr(name).await? {
                values.push(value);
            }
        }
        Ok(values)
    }

    async fn prop(&self, selector: &Selector, name: &str) -> Result<Option<String>> {
        Ok(self.find(selector).await?.prop(name).await?)
    }

    async fn is_selected(&self, selector: &Selector) -> Result<bool> {
        Ok(self.find(selector).await?.is_selected().await?)
    }

    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Self::locator(selector))
            .await
        {
            Ok(_) => Ok(()),
            Err(fantoccini::error::CmdError::WaitTimeout) => {
                Err(Error::WaitTimeout(selector.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn wait_for_url_contains(&self, fragment: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let url = self.client.current_url().await?;
            if url.as_str().contains(fragment) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::WaitTimeout(format!("url containing `{fragment}`")));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn windows(&self) -> Result<Vec<WindowId>> {
        let handles = self.client.windows().await?;
        Ok(handles.into_iter().map(to_window_id).collect())
    }

    async fn active_window(&self) -> Result<WindowId> {
        Ok(to_window_id(self.client.window().await?))
    }

    async fn switch_window(&self, window: &WindowId) -> Result<()> {
        self.client.switch_to_window(to_handle(window)?).await?;
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        self.client.close_window().await?;
        Ok(())
    }

    async fn wait_for_new_window(
        &self,
        known: &[WindowId],
        timeout: Duration,
    ) -> Result<WindowId> {
        let deadline = Instant::now() + timeout;
        loop {
            let windows = self.windows().await?;
            if let Some(new) = windows.into_iter().find(|w| !known.contains(w)) {
                return Ok(new);
            }
            if Instant::now() >= deadline {
                return Err(Error::WaitTimeout("a new browser window".to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
