//! Account listing pagination
//!
//! Walks every page of the WHMCS services listing and accumulates the
//! account detail links. Pagination ends when the next-page control cannot
//! be found; because a single missed lookup is indistinguishable from the
//! true end of the listing, the control is probed a second time after a
//! short delay before the listing is declared exhausted.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::selectors;
use crate::session::Session;

/// Delay before the second probe of the next-page control.
const REPROBE_DELAY: Duration = Duration::from_millis(200);

/// Collect the account detail hrefs from every listing page.
///
/// Requires an authenticated session positioned on the first listing page.
/// The result preserves first-seen order and carries no duplicates. A
/// settle delay precedes each page read to avoid hammering the server.
pub async fn collect_account_links(
    session: &dyn Session,
    settings: &Settings,
) -> Result<Vec<String>> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1u32;

    loop {
        debug!(page, "reading account listing page");
        if !settings.settle_delay.is_zero() {
            tokio::time::sleep(settings.settle_delay).await;
        }

        let hrefs = session
            .attr_all(&selectors::ACCOUNT_LINKS, "href")
            .await?;
        for href in hrefs {
            if seen.insert(href.clone()) {
                links.push(href);
            }
        }

        if !advance_to_next_page(session).await? {
            break;
        }
        page += 1;
    }

    info!(pages = page, accounts = links.len(), "pagination complete");
    Ok(links)
}

/// Click the next-page control; `Ok(false)` means the listing is exhausted.
///
/// A missing control is re-probed once: if the second click also misses,
/// that is the end of the listing rather than a transient lookup glitch.
async fn advance_to_next_page(session: &dyn Session) -> Result<bool> {
    match session.click(&selectors::NEXT_PAGE).await {
        Ok(()) => Ok(true),
        Err(Error::ElementMissing(_)) => {
            tokio::time::sleep(REPROBE_DELAY).await;
            match session.click(&selectors::NEXT_PAGE).await {
                Ok(()) => Ok(true),
                Err(Error::ElementMissing(_)) => Ok(false),
                Err(e) => Err(e),
            }
        }
        Err(e) => Err(e),
    }
}
