//! Core value types shared across the sync run

use std::fmt;

/// Navigable reference to one app's settings page
///
/// Discovered during SSO handoff and consumed immediately by the
/// reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubResourceTarget(String);

impl SubResourceTarget {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubResourceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completed processing result for one account
///
/// `statuses` holds one status sequence per reconciled app, in discovery
/// order; an account with zero apps has an empty list. The record is handed
/// to the audit recorder and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// Display name read from the account detail page.
    pub name: String,
    /// WHMCS account detail URL.
    pub whmcs_href: String,
    /// Per-app flag-state strings, e.g. `"sync_error: Selected"`.
    pub statuses: Vec<Vec<String>>,
}

impl AccountRecord {
    /// Flatten the per-app status sequences into the audit log's
    /// `notif_status` field. Apps are joined in discovery order.
    pub fn notif_status_field(&self) -> String {
        self.statuses
            .iter()
            .map(|app| app.join(", "))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Terminal failure for one account after its retry budget was spent
#[derive(Debug)]
pub struct FailedAccount {
    pub whmcs_href: String,
    pub error: crate::error::Error,
}

/// Outcome of a whole run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Accounts recorded in the audit log.
    pub completed: usize,
    /// Accounts that exhausted their retry budget.
    pub failed: Vec<FailedAccount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notif_status_preserves_discovery_order() {
        let record = AccountRecord {
            name: "Alice".to_string(),
            whmcs_href: "http://whmcs.test/account/1".to_string(),
            statuses: vec![
                vec![
                    "sync_complete: Selected".to_string(),
                    "sync_error: Deselected".to_string(),
                ],
                vec!["sync_complete: Deselected".to_string()],
            ],
        };

        assert_eq!(
            record.notif_status_field(),
            "sync_complete: Selected, sync_error: Deselected | sync_complete: Deselected"
        );
    }

    #[test]
    fn zero_app_account_has_empty_status_field() {
        let record = AccountRecord {
            name: "Bob".to_string(),
            whmcs_href: "http://whmcs.test/account/2".to_string(),
            statuses: vec![],
        };
        assert_eq!(record.notif_status_field(), "");
    }
}
