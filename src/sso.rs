//! SSO handoff into per-account secondary sessions
//!
//! Transitions from the primary WHMCS session into an account's cPanel
//! session and lands on the app listing. The handoff carries explicit
//! window handles for the primary and secondary windows so restoring the
//! primary context never relies on window-list positions.

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::selectors;
use crate::session::{Session, WindowId};
use crate::types::SubResourceTarget;

/// A ready secondary-session context for one account
#[derive(Debug, Clone)]
pub struct Handoff {
    /// Display name read from the account detail page.
    pub account_name: String,
    /// Window that held the WHMCS session when the handoff started.
    pub primary: WindowId,
    /// Newly opened cPanel window; active until [`close`] is called.
    pub secondary: WindowId,
    /// Settings links for every app, in listing order. Empty when the
    /// account owns no apps.
    pub targets: Vec<SubResourceTarget>,
}

/// Perform the privilege handoff for one account.
///
/// On return the secondary window is active and positioned on the app
/// listing. An account with zero apps (the details-link probe timing out)
/// is a normal outcome, reported as an empty target list. Any other failure
/// along the way is an account-level failure for the caller to retry.
pub async fn open(
    session: &dyn Session,
    account_href: &str,
    settings: &Settings,
) -> Result<Handoff> {
    let primary = session.active_window().await?;
    let known = session.windows().await?;

    debug!(account = account_href, "starting SSO handoff");
    session.goto(account_href).await?;
    session
        .wait_for(&selectors::SSO_BUTTON, settings.wait_timeout)
        .await?;
    session.click(&selectors::SSO_BUTTON).await?;

    let account_name = session
        .prop(&selectors::ACCOUNT_NAME, "innerHTML")
        .await?
        .unwrap_or_default();

    let secondary = session
        .wait_for_new_window(&known, settings.wait_timeout)
        .await?;
    session.switch_window(&secondary).await?;
    // Liveness gate: confirms the handoff landed on the cPanel host, not
    // just that a window opened.
    session
        .wait_for_url_contains(&settings.secondary_host, settings.wait_timeout)
        .await?;

    let apps_href = session
        .attr(&selectors::MY_APPS_LINK, "href")
        .await?
        .ok_or_else(|| Error::ElementMissing(selectors::MY_APPS_LINK.to_string()))?;
    session.goto(&apps_href).await?;
    session
        .wait_for(&selectors::PAGE_DESCRIPTION, settings.wait_timeout)
        .await?;

    let targets = match session
        .wait_for(&selectors::DETAILS_LINK, settings.wait_timeout)
        .await
    {
        Ok(()) => session
            .attr_all(&selectors::DETAILS_LINK, "href")
            .await?
            .into_iter()
            .map(SubResourceTarget::new)
            .collect(),
        Err(Error::WaitTimeout(_)) => {
            info!(account = %account_name, "account has no apps");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    Ok(Handoff {
        account_name,
        primary,
        secondary,
        targets,
    })
}

/// Close the secondary window and restore the primary session context.
pub async fn close(session: &dyn Session, handoff: &Handoff) -> Result<()> {
    // make sure the secondary window is the one being closed
    match session.switch_window(&handoff.secondary).await {
        Ok(()) => session.close_window().await?,
        Err(e) => debug!(error = %e, "secondary window already gone"),
    }
    session.switch_window(&handoff.primary).await?;
    Ok(())
}
