//! Scripted in-memory session for unit tests
//!
//! Models just enough of the remote UI for the traversal and reconciliation
//! modules: a paged account listing, a set of checkboxes that toggle on
//! click, configurable element misses and wait timeouts, and a window list.
//! Every call is recorded so tests can assert on click counts and window
//! discipline.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::selectors;
use crate::session::{Selector, Session, WindowId};

/// Sentinel for "this wait never succeeds".
pub const ALWAYS: u32 = u32::MAX;

#[derive(Default)]
struct FakeState {
    // page state
    checkboxes: HashMap<Selector, bool>,
    missing: HashSet<Selector>,
    attrs: HashMap<(Selector, &'static str), Vec<String>>,
    props: HashMap<(Selector, &'static str), String>,

    // paged account listing; `attr_all(ACCOUNT_LINKS)` reads the current
    // page, clicking NEXT_PAGE advances it
    listing_pages: Vec<Vec<String>>,
    page: usize,
    // transient misses of the next-page control while pages remain
    next_misses: u32,

    // remaining wait failures per selector before `wait_for` succeeds
    wait_misses: HashMap<Selector, u32>,
    url_fragment_matches: bool,

    // window model
    windows: Vec<WindowId>,
    active: usize,
    pending_window: Option<WindowId>,

    // call log
    gotos: Vec<String>,
    clicks: Vec<Selector>,
    typed: Vec<(Selector, String)>,
    switches: Vec<WindowId>,
    closed: Vec<WindowId>,
}

pub struct FakeSession {
    state: Mutex<FakeState>,
}

impl FakeSession {
    pub fn new() -> Self {
        let state = FakeState {
            url_fragment_matches: true,
            windows: vec![WindowId("primary".to_string())],
            ..FakeState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn primary() -> WindowId {
        WindowId("primary".to_string())
    }

    // -- scripting -----------------------------------------------------

    pub fn set_listing_pages(&self, pages: Vec<Vec<&str>>) {
        let pages = pages
            .into_iter()
            .map(|p| p.into_iter().map(str::to_string).collect())
            .collect();
        self.state.lock().unwrap().listing_pages = pages;
    }

    /// Make the next `n` clicks of the next-page control miss even though
    /// more pages remain.
    pub fn set_next_page_misses(&self, n: u32) {
        self.state.lock().unwrap().next_misses = n;
    }

    pub fn set_checkbox(&self, selector: Selector, selected: bool) {
        self.state.lock().unwrap().checkboxes.insert(selector, selected);
    }

    /// Make all ten flag checkboxes present, in the given state.
    pub fn set_all_flag_checkboxes(&self, selected: bool) {
        for flag in crate::flags::NotificationFlag::ALL {
            self.set_checkbox(flag.selector(), selected);
        }
    }

    pub fn set_missing(&self, selector: Selector) {
        self.state.lock().unwrap().missing.insert(selector);
    }

    pub fn set_attr(&self, selector: Selector, name: &'static str, values: Vec<&str>) {
        self.state
            .lock()
            .unwrap()
            .attrs
            .insert((selector, name), values.into_iter().map(str::to_string).collect());
    }

    pub fn set_prop(&self, selector: Selector, name: &'static str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .props
            .insert((selector, name), value.to_string());
    }

    /// Fail the first `n` waits for this selector ([`ALWAYS`] = every one).
    pub fn set_wait_misses(&self, selector: Selector, n: u32) {
        self.state.lock().unwrap().wait_misses.insert(selector, n);
    }

    /// Script a window that opens on the next `wait_for_new_window`.
    pub fn set_pending_window(&self, name: &str) {
        self.state.lock().unwrap().pending_window = Some(WindowId(name.to_string()));
    }

    // -- assertions ----------------------------------------------------

    pub fn clicks(&self) -> Vec<Selector> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn click_count(&self, selector: Selector) -> usize {
        self.state
            .lock()
            .unwrap()
            .clicks
            .iter()
            .filter(|s| **s == selector)
            .count()
    }

    pub fn gotos(&self) -> Vec<String> {
        self.state.lock().unwrap().gotos.clone()
    }

    pub fn typed(&self) -> Vec<(Selector, String)> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn switches(&self) -> Vec<WindowId> {
        self.state.lock().unwrap().switches.clone()
    }

    pub fn closed_windows(&self) -> Vec<WindowId> {
        self.state.lock().unwrap().closed.clone()
    }

    pub fn active(&self) -> WindowId {
        let state = self.state.lock().unwrap();
        state.windows[state.active].clone()
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.state.lock().unwrap().gotos.push(url.to_string());
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        if *selector == selectors::NEXT_PAGE && !state.listing_pages.is_empty() {
            if state.next_misses > 0 {
                state.next_misses -= 1;
                return Err(Error::ElementMissing(selector.to_string()));
            }
            if state.page + 1 >= state.listing_pages.len() {
                return Err(Error::ElementMissing(selector.to_string()));
            }
            state.page += 1;
            state.clicks.push(*selector);
            return Ok(());
        }

        if state.missing.contains(selector) {
            return Err(Error::ElementMissing(selector.to_string()));
        }
        if let Some(selected) = state.checkboxes.get(selector).copied() {
            state.checkboxes.insert(*selector, !selected);
        }
        state.clicks.push(*selector);
        Ok(())
    }

    async fn send_keys(&self, selector: &Selector, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.missing.contains(selector) {
            return Err(Error::ElementMissing(selector.to_string()));
        }
        state.typed.push((*selector, text.to_string()));
        Ok(())
    }

    async fn attr(&self, selector: &Selector, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if state.missing.contains(selector) {
            return Err(Error::ElementMissing(selector.to_string()));
        }
        Ok(state
            .attrs
            .iter()
            .find(|((s, n), _)| s == selector && *n == name)
            .and_then(|(_, values)| values.first().cloned()))
    }

    async fn attr_all(&self, selector: &Selector, name: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();

        if *selector == selectors::ACCOUNT_LINKS && !state.listing_pages.is_empty() {
            return Ok(state.listing_pages[state.page].clone());
        }

        Ok(state
            .attrs
            .iter()
            .find(|((s, n), _)| s == selector && *n == name)
            .map(|(_, values)| values.clone())
            .unwrap_or_default())
    }

    async fn prop(&self, selector: &Selector, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if state.missing.contains(selector) {
            return Err(Error::ElementMissing(selector.to_string()));
        }
        Ok(state
            .props
            .iter()
            .find(|((s, n), _)| s == selector && *n == name)
            .map(|(_, value)| value.clone()))
    }

    async fn is_selected(&self, selector: &Selector) -> Result<bool> {
        let state = self.state.lock().unwrap();
        state
            .checkboxes
            .get(selector)
            .copied()
            .ok_or_else(|| Error::ElementMissing(selector.to_string()))
    }

    async fn wait_for(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(remaining) = state.wait_misses.get_mut(selector) {
            if *remaining == ALWAYS {
                return Err(Error::WaitTimeout(selector.to_string()));
            }
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::WaitTimeout(selector.to_string()));
            }
        }
        if state.missing.contains(selector) {
            return Err(Error::WaitTimeout(selector.to_string()));
        }
        Ok(())
    }

    async fn wait_for_url_contains(&self, fragment: &str, _timeout: Duration) -> Result<()> {
        if self.state.lock().unwrap().url_fragment_matches {
            Ok(())
        } else {
            Err(Error::WaitTimeout(format!("url containing `{fragment}`")))
        }
    }

    async fn windows(&self) -> Result<Vec<WindowId>> {
        Ok(self.state.lock().unwrap().windows.clone())
    }

    async fn active_window(&self) -> Result<WindowId> {
        Ok(self.active())
    }

    async fn switch_window(&self, window: &WindowId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let index = state
            .windows
            .iter()
            .position(|w| w == window)
            .ok_or_else(|| Error::InvalidWindow(window.0.clone()))?;
        state.active = index;
        state.switches.push(window.clone());
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let active = state.active;
        let closed = state.windows.remove(active);
        state.closed.push(closed);
        state.active = 0;
        Ok(())
    }

    async fn wait_for_new_window(
        &self,
        _known: &[WindowId],
        _timeout: Duration,
    ) -> Result<WindowId> {
        let mut state = self.state.lock().unwrap();
        match state.pending_window.take() {
            Some(window) => {
                state.windows.push(window.clone());
                Ok(window)
            }
            None => Err(Error::WaitTimeout("a new browser window".to_string())),
        }
    }
}
