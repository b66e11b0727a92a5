//! Run orchestration
//!
//! Drives one account at a time through handoff, reconciliation, and audit
//! recording. Accounts are strictly serial: the remote UI's one-secondary-
//! window session model does not tolerate concurrent access. Each account
//! runs under the account retry budget; an attempt failure closes any
//! leftover secondary window and restores the primary context before the
//! account is restarted from scratch.

use tracing::{error, info, warn};

use crate::audit::Recorder;
use crate::config::{DesiredConfig, Settings};
use crate::error::Result;
use crate::session::{Session, WindowId};
use crate::types::{AccountRecord, FailedAccount, RunSummary};
use crate::{reconcile, sso};

/// Per-run orchestrator state
pub struct Orchestrator<'a> {
    session: &'a dyn Session,
    desired: &'a DesiredConfig,
    settings: &'a Settings,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        session: &'a dyn Session,
        desired: &'a DesiredConfig,
        settings: &'a Settings,
    ) -> Self {
        Self {
            session,
            desired,
            settings,
        }
    }

    /// Process every account, in order, recording completed accounts as
    /// they finish. Accounts whose retry budget is spent end up in the
    /// summary; they never abort the rest of the run.
    pub async fn run(
        &self,
        recorder: &mut dyn Recorder,
        account_hrefs: &[String],
    ) -> Result<RunSummary> {
        let primary = self.session.active_window().await?;
        let mut summary = RunSummary::default();

        for (index, href) in account_hrefs.iter().enumerate() {
            info!(
                account = href.as_str(),
                position = index + 1,
                total = account_hrefs.len(),
                "processing account"
            );

            let result = self
                .settings
                .account_retry
                .run("process account", || self.process_account(href, &primary))
                .await;

            match result {
                Ok(record) => {
                    recorder.record(&record)?;
                    summary.completed += 1;
                }
                Err(err) => {
                    error!(account = href.as_str(), error = %err, "account failed permanently");
                    summary.failed.push(FailedAccount {
                        whmcs_href: href.clone(),
                        error: err,
                    });
                }
            }
        }

        info!(
            completed = summary.completed,
            failed = summary.failed.len(),
            "run complete"
        );
        Ok(summary)
    }

    /// One attempt at one account; cleans up the window state on failure so
    /// the next attempt (or the next account) starts from the primary
    /// context.
    async fn process_account(&self, href: &str, primary: &WindowId) -> Result<AccountRecord> {
        let result = self.try_account(href).await;
        if result.is_err() {
            self.restore_primary(primary).await;
        }
        result
    }

    async fn try_account(&self, href: &str) -> Result<AccountRecord> {
        let handoff = sso::open(self.session, href, self.settings).await?;

        let mut statuses = Vec::with_capacity(handoff.targets.len());
        for target in &handoff.targets {
            let app_statuses =
                reconcile::reconcile(self.session, target, self.desired, self.settings).await?;
            statuses.push(app_statuses);
        }

        sso::close(self.session, &handoff).await?;

        Ok(AccountRecord {
            name: handoff.account_name,
            whmcs_href: href.to_string(),
            statuses,
        })
    }

    /// Best-effort cleanup: close every window except the primary one and
    /// make the primary active again.
    async fn restore_primary(&self, primary: &WindowId) {
        if let Ok(windows) = self.session.windows().await {
            for window in windows.iter().filter(|w| *w != primary) {
                if self.session.switch_window(window).await.is_ok() {
                    if let Err(e) = self.session.close_window().await {
                        warn!(window = %window, error = %e, "failed to close leftover window");
                    }
                }
            }
        }
        if let Err(e) = self.session.switch_window(primary).await {
            warn!(error = %e, "failed to restore primary window");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryRecorder;
    use crate::error::Error;
    use crate::selectors;
    use crate::session::fake::{FakeSession, ALWAYS};

    fn desired() -> DesiredConfig {
        DesiredConfig::parse(
            r#"{"notifications": {"sync_complete": true, "sync_error": false}}"#,
        )
        .unwrap()
    }

    fn scripted_account_session() -> FakeSession {
        let session = FakeSession::new();
        session.set_pending_window("secondary");
        session.set_prop(selectors::ACCOUNT_NAME, "innerHTML", "Alice");
        session.set_attr(selectors::MY_APPS_LINK, "href", vec!["http://cpanel.test/apps"]);
        session
    }

    #[tokio::test]
    async fn account_with_apps_is_reconciled_and_recorded() {
        let session = scripted_account_session();
        session.set_attr(selectors::DETAILS_LINK, "href", vec!["http://cpanel.test/app/1"]);
        session.set_all_flag_checkboxes(false);
        let desired = desired();
        let settings = Settings::for_tests();
        let mut recorder = MemoryRecorder::default();

        let orchestrator = Orchestrator::new(&session, &desired, &settings);
        let summary = orchestrator
            .run(&mut recorder, &["http://whmcs.test/account/1".to_string()])
            .await
            .unwrap();

        assert_eq!(summary.completed, 1);
        assert!(summary.failed.is_empty());
        assert_eq!(recorder.records.len(), 1);

        let record = &recorder.records[0];
        assert_eq!(record.name, "Alice");
        assert_eq!(record.whmcs_href, "http://whmcs.test/account/1");
        assert_eq!(
            record.statuses,
            vec![vec![
                "sync_complete: Selected".to_string(),
                "sync_error: Deselected".to_string(),
            ]]
        );
        // Primary context restored after the account completed.
        assert_eq!(session.active(), FakeSession::primary());
    }

    #[tokio::test]
    async fn zero_app_account_still_gets_an_audit_row() {
        let session = scripted_account_session();
        session.set_wait_misses(selectors::DETAILS_LINK, ALWAYS);
        let desired = desired();
        let settings = Settings::for_tests();
        let mut recorder = MemoryRecorder::default();

        let orchestrator = Orchestrator::new(&session, &desired, &settings);
        let summary = orchestrator
            .run(&mut recorder, &["http://whmcs.test/account/2".to_string()])
            .await
            .unwrap();

        assert_eq!(summary.completed, 1);
        assert_eq!(recorder.records.len(), 1);
        assert!(recorder.records[0].statuses.is_empty());
        // No reconciliation was attempted.
        assert_eq!(session.click_count(selectors::SAVE_ALL), 0);
    }

    #[tokio::test]
    async fn exhausted_account_is_reported_and_run_continues() {
        let session = scripted_account_session();
        // The handoff button never appears: every attempt fails.
        session.set_wait_misses(selectors::SSO_BUTTON, ALWAYS);
        let desired = desired();
        let settings = Settings::for_tests();
        let mut recorder = MemoryRecorder::default();

        let orchestrator = Orchestrator::new(&session, &desired, &settings);
        let summary = orchestrator
            .run(&mut recorder, &["http://whmcs.test/account/3".to_string()])
            .await
            .unwrap();

        assert_eq!(summary.completed, 0);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].whmcs_href, "http://whmcs.test/account/3");
        assert!(matches!(summary.failed[0].error, Error::WaitTimeout(_)));
        assert!(recorder.records.is_empty());
        // Cleanup left the primary window active.
        assert_eq!(session.active(), FakeSession::primary());
    }

    #[tokio::test]
    async fn failed_attempt_closes_the_leftover_secondary_window() {
        let session = scripted_account_session();
        // Handoff succeeds but reconciliation fails: checkboxes missing.
        session.set_attr(selectors::DETAILS_LINK, "href", vec!["http://cpanel.test/app/1"]);
        let desired = desired();
        let settings = Settings::for_tests();
        let mut recorder = MemoryRecorder::default();

        let orchestrator = Orchestrator::new(&session, &desired, &settings);
        let summary = orchestrator
            .run(&mut recorder, &["http://whmcs.test/account/4".to_string()])
            .await
            .unwrap();

        assert_eq!(summary.failed.len(), 1);
        assert_eq!(session.active(), FakeSession::primary());
        // The secondary window opened by the first attempt was closed.
        assert!(!session.closed_windows().is_empty());
    }
}
