//! Desired-configuration loading and run settings

use std::path::Path;
use std::time::Duration;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::error::{Error, Result};
use crate::flags::NotificationFlag;
use crate::retry::RetryPolicy;

/// Desired state for the notification toggles
///
/// Loaded exactly once per run and never mutated afterwards. The entry
/// order follows the key order of the configuration file; status strings in
/// the audit log are emitted in that same order.
#[derive(Debug, Clone)]
pub struct DesiredConfig {
    entries: Vec<(NotificationFlag, bool)>,
}

/// On-disk layout of the desired-configuration file
#[derive(Deserialize)]
struct ConfigFile {
    notifications: FlagEntries,
}

/// The `notifications` mapping as raw key/value pairs, in document order
///
/// Deserialized through a map visitor rather than into a `serde_json::Map`:
/// a JSON map type would collapse duplicate keys (last wins) before the
/// duplicate check could see them.
struct FlagEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for FlagEntries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = FlagEntries;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of flag names to booleans")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(FlagEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl DesiredConfig {
    /// Load the desired configuration from a JSON file with a top-level
    /// `notifications` mapping of flag key to boolean.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::parse(&raw)?;
        info!(
            path = %path.display(),
            flags = config.len(),
            "loaded desired notification configuration"
        );
        Ok(config)
    }

    /// Parse the configuration document, preserving key order.
    pub fn parse(raw: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("invalid configuration document: {e}")))?;

        let mut entries = Vec::with_capacity(file.notifications.0.len());
        for (key, value) in &file.notifications.0 {
            let flag: NotificationFlag = key
                .parse()
                .map_err(|e: String| Error::Config(e))?;
            let desired = value
                .as_bool()
                .ok_or_else(|| Error::Config(format!("flag `{key}` must be a boolean")))?;
            if entries.iter().any(|(f, _)| *f == flag) {
                return Err(Error::Config(format!("flag `{key}` listed twice")));
            }
            entries.push((flag, desired));
        }

        if entries.is_empty() {
            return Err(Error::Config("no notification flags configured".to_string()));
        }

        Ok(Self { entries })
    }

    /// Flags and their desired states, in file order.
    pub fn iter(&self) -> impl Iterator<Item = (NotificationFlag, bool)> + '_ {
        self.entries.iter().copied()
    }

    /// Desired state for one flag, if the file mentions it.
    pub fn get(&self, flag: NotificationFlag) -> Option<bool> {
        self.entries
            .iter()
            .find(|(f, _)| *f == flag)
            .map(|(_, desired)| *desired)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tunables shared by the traversal and reconciliation modules
#[derive(Debug, Clone)]
pub struct Settings {
    /// WHMCS admin login page.
    pub login_url: String,
    /// Products & services listing (first page).
    pub services_url: String,
    /// Host fragment that confirms the secondary session landed, e.g.
    /// `example.reclaimhosting.com`.
    pub secondary_host: String,
    /// Bound for every element/condition wait.
    pub wait_timeout: Duration,
    /// Pause before page reads and save clicks; rate-limiting politeness,
    /// not a correctness requirement.
    pub settle_delay: Duration,
    /// Retry budget for a whole account.
    pub account_retry: RetryPolicy,
    /// Retry budget for the save-and-verify gate.
    pub save_retry: RetryPolicy,
}

#[cfg(test)]
impl Settings {
    /// Settings with all delays zeroed, for scripted-session tests.
    pub(crate) fn for_tests() -> Self {
        Self {
            login_url: "http://whmcs.test/login.php".to_string(),
            services_url: "http://whmcs.test/services".to_string(),
            secondary_host: "cpanel.test".to_string(),
            wait_timeout: Duration::from_millis(10),
            settle_delay: Duration::ZERO,
            account_retry: RetryPolicy::immediate(2),
            save_retry: RetryPolicy::immediate(2),
        }
    }
}
