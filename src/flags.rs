//! Notification flags and their checkbox states
//!
//! The notification center exposes exactly ten named toggles. They are
//! modeled as a fixed enum with an explicit enumerator-to-selector lookup
//! table; flag lookups are never done by dynamic field name.

use std::fmt;
use std::str::FromStr;

use crate::session::Selector;

/// One of the ten fixed notification toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationFlag {
    CloneError,
    BackupError,
    RestoreError,
    SyncComplete,
    SyncError,
    UpdateAvailable,
    UpdateComplete,
    UpdateError,
    AddOnUpdateComplete,
    AddOnUpdateError,
}

impl NotificationFlag {
    /// All flags, in the order the settings page lays them out.
    pub const ALL: [NotificationFlag; 10] = [
        NotificationFlag::CloneError,
        NotificationFlag::BackupError,
        NotificationFlag::RestoreError,
        NotificationFlag::SyncComplete,
        NotificationFlag::SyncError,
        NotificationFlag::UpdateAvailable,
        NotificationFlag::UpdateComplete,
        NotificationFlag::UpdateError,
        NotificationFlag::AddOnUpdateComplete,
        NotificationFlag::AddOnUpdateError,
    ];

    /// Key used for this flag in the desired-configuration file and in the
    /// audit log's status strings.
    pub fn key(self) -> &'static str {
        match self {
            NotificationFlag::CloneError => "clone_error",
            NotificationFlag::BackupError => "backup_error",
            NotificationFlag::RestoreError => "restore_error",
            NotificationFlag::SyncComplete => "sync_complete",
            NotificationFlag::SyncError => "sync_error",
            NotificationFlag::UpdateAvailable => "update_available",
            NotificationFlag::UpdateComplete => "update_complete",
            NotificationFlag::UpdateError => "update_error",
            NotificationFlag::AddOnUpdateComplete => "add_on_update_complete",
            NotificationFlag::AddOnUpdateError => "add_on_update_error",
        }
    }

    /// Checkbox selector for this flag on the settings page.
    ///
    /// Note the element ids do not line up one-to-one with the config keys
    /// (`sync_complete` is `#field_nc_sync`, the add-on flags are
    /// `plugin_update` variants), which is why this table exists.
    pub fn selector(self) -> Selector {
        Selector::Css(match self {
            NotificationFlag::CloneError => "#field_nc_clone_error",
            NotificationFlag::BackupError => "#field_nc_backup_error",
            NotificationFlag::RestoreError => "#field_nc_restore_error",
            NotificationFlag::SyncComplete => "#field_nc_sync",
            NotificationFlag::SyncError => "#field_nc_sync_error",
            NotificationFlag::UpdateAvailable => "#field_nc_update_available",
            NotificationFlag::UpdateComplete => "#field_nc_update",
            NotificationFlag::UpdateError => "#field_nc_update_error",
            NotificationFlag::AddOnUpdateComplete => "#field_nc_plugin_update",
            NotificationFlag::AddOnUpdateError => "#field_nc_plugin_update_error",
        })
    }
}

impl fmt::Display for NotificationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NotificationFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationFlag::ALL
            .into_iter()
            .find(|flag| flag.key() == s)
            .ok_or_else(|| format!("unknown notification flag: {s}"))
    }
}

/// Checkbox states of one app's settings page at read time
///
/// A `FlagSet` is a snapshot: it goes stale the moment the page re-renders,
/// so it is re-read on every reconciliation attempt and never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagSet {
    selected: [bool; NotificationFlag::ALL.len()],
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given flag's checkbox was selected.
    pub fn is_selected(&self, flag: NotificationFlag) -> bool {
        self.selected[flag as usize]
    }

    pub fn set(&mut self, flag: NotificationFlag, selected: bool) {
        self.selected[flag as usize] = selected;
    }
}
