//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::Settings;
use crate::retry::RetryPolicy;

/// Command-line arguments for whmcs-notif-sync
#[derive(Parser, Debug)]
#[command(name = "whmcs-notif-sync")]
#[command(about = "Synchronize cPanel notification toggles for every WHMCS account")]
#[command(version)]
pub struct Args {
    /// WebDriver endpoint to drive the browser through
    #[arg(long, default_value = "http://localhost:9515", env = "NOTIF_SYNC_WEBDRIVER_URL")]
    pub webdriver_url: String,

    /// WHMCS admin login page URL
    #[arg(long, env = "NOTIF_SYNC_LOGIN_URL")]
    pub login_url: String,

    /// WHMCS products & services listing URL (first page)
    #[arg(long, env = "NOTIF_SYNC_SERVICES_URL")]
    pub services_url: String,

    /// Host fragment expected in the secondary-session URL after SSO
    #[arg(long, env = "NOTIF_SYNC_SECONDARY_HOST")]
    pub secondary_host: String,

    /// Desired notification configuration file
    #[arg(long, default_value = "whmcs_notif_config.json", env = "NOTIF_SYNC_CONFIG")]
    pub config: PathBuf,

    /// Directory for the per-run audit log
    #[arg(long, default_value = "WHMCS_Users", env = "NOTIF_SYNC_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Bound, in seconds, for every element/condition wait
    #[arg(long, default_value = "5")]
    pub wait_timeout_secs: u64,

    /// Politeness delay, in milliseconds, before page reads and saves
    #[arg(long, default_value = "300")]
    pub settle_delay_ms: u64,

    /// Retry attempts per account before it is reported as failed
    #[arg(long, default_value = "5")]
    pub account_attempts: u32,

    /// Retry attempts for the save-and-verify step of one app
    #[arg(long, default_value = "5")]
    pub save_attempts: u32,
}

impl Args {
    /// Derive the run settings shared by the traversal modules.
    pub fn settings(&self) -> Settings {
        let initial_backoff = Duration::from_millis(500);
        let max_backoff = Duration::from_secs(10);
        Settings {
            login_url: self.login_url.clone(),
            services_url: self.services_url.clone(),
            secondary_host: self.secondary_host.clone(),
            wait_timeout: Duration::from_secs(self.wait_timeout_secs),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            account_retry: RetryPolicy::new(self.account_attempts, initial_backoff, max_backoff),
            save_retry: RetryPolicy::new(self.save_attempts, initial_backoff, max_backoff),
        }
    }
}
