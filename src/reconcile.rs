//! Notification reconciliation engine
//!
//! Makes one app's checkbox states match the desired configuration with a
//! verified save. The decision steps (`plan_clicks`, `render_statuses`) are
//! pure functions of the freshly read [`FlagSet`] and the immutable
//! [`DesiredConfig`]; browser effects happen only in [`reconcile`].

use tracing::{debug, info};

use crate::config::{DesiredConfig, Settings};
use crate::error::{Error, Result};
use crate::flags::{FlagSet, NotificationFlag};
use crate::selectors;
use crate::session::Session;
use crate::types::SubResourceTarget;

/// Read the current state of all ten flag checkboxes.
pub async fn read_flags(session: &dyn Session) -> Result<FlagSet> {
    let mut flags = FlagSet::new();
    for flag in NotificationFlag::ALL {
        let selected = session.is_selected(&flag.selector()).await?;
        flags.set(flag, selected);
    }
    Ok(flags)
}

/// Flags whose checkbox must be clicked to reach the desired state.
///
/// At most one click per flag; an already-converged flag set plans zero
/// clicks, which makes the whole apply step idempotent.
pub fn plan_clicks(current: &FlagSet, desired: &DesiredConfig) -> Vec<NotificationFlag> {
    desired
        .iter()
        .filter(|&(flag, want)| current.is_selected(flag) != want)
        .map(|(flag, _)| flag)
        .collect()
}

/// Render the flag states as `"<key>: Selected"` / `"<key>: Deselected"`
/// strings, in the desired configuration's key order.
pub fn render_statuses(current: &FlagSet, desired: &DesiredConfig) -> Vec<String> {
    desired
        .iter()
        .map(|(flag, _)| {
            if current.is_selected(flag) {
                format!("{flag}: Selected")
            } else {
                format!("{flag}: Deselected")
            }
        })
        .collect()
}

/// Reconcile one app's notification settings.
///
/// Navigates to the settings page, switches the page into manual
/// notification mode, applies the minimal click set, and saves. The save is
/// verified by waiting for the redirect back to a page carrying the
/// "View/edit details" anchor; a timeout there retries the whole
/// save-and-verify step under the configured budget and surfaces
/// [`Error::SaveNotConfirmed`] once it is spent.
///
/// Returns the resulting flag-state strings for the audit log.
pub async fn reconcile(
    session: &dyn Session,
    target: &SubResourceTarget,
    desired: &DesiredConfig,
    settings: &Settings,
) -> Result<Vec<String>> {
    debug!(target = %target, "reconciling app notifications");
    session.goto(target.as_str()).await?;

    // Manual mode is a prerequisite for the per-flag checkboxes. Clicking
    // it when already set is harmless.
    session
        .wait_for(&selectors::MANUAL_MODE, settings.wait_timeout)
        .await?;
    session.click(&selectors::MANUAL_MODE).await?;

    let current = read_flags(session).await?;
    let clicks = plan_clicks(&current, desired);
    debug!(target = %target, clicks = clicks.len(), "applying flag changes");
    for flag in &clicks {
        session.click(&flag.selector()).await?;
    }

    // Re-read after clicking; the statuses reported must reflect the page,
    // not the plan.
    let after = read_flags(session).await?;
    let statuses = render_statuses(&after, desired);

    save_and_verify(session, settings).await?;
    info!(target = %target, changed = clicks.len(), "app reconciled");

    Ok(statuses)
}

/// Click "Save All" and wait for the post-save redirect marker, retrying
/// the whole step under the save budget.
async fn save_and_verify(session: &dyn Session, settings: &Settings) -> Result<()> {
    let attempts = settings.save_retry.max_attempts;
    settings
        .save_retry
        .run("save notification settings", || async {
            if !settings.settle_delay.is_zero() {
                tokio::time::sleep(settings.settle_delay).await;
            }
            session.click(&selectors::SAVE_ALL).await?;
            session
                .wait_for(&selectors::DETAILS_LINK, settings.wait_timeout)
                .await
        })
        .await
        .map_err(|err| match err {
            Error::WaitTimeout(_) => Error::SaveNotConfirmed { attempts },
            other => other,
        })
}
