//! Common error types for the notification sync tool

use thiserror::Error;

/// Common result type for sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the sync run
///
/// `ElementMissing` and `WaitTimeout` are kept separate from the generic
/// WebDriver error so callers can branch on "the element is not there"
/// (end of pagination, zero sub-resources) versus "the browser broke".
#[derive(Error, Debug)]
pub enum Error {
    /// WebDriver command error (wraps fantoccini errors)
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    /// WebDriver session could not be established
    #[error("Failed to start WebDriver session: {0}")]
    NewSession(#[from] fantoccini::error::NewSessionError),

    /// Element lookup failed (no such element on the current page)
    #[error("Element not found: {0}")]
    ElementMissing(String),

    /// A bounded wait elapsed without the condition becoming true
    #[error("Timed out waiting for {0}")]
    WaitTimeout(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audit log write error (wraps csv::Error)
    #[error("Audit log error: {0}")]
    Audit(#[from] csv::Error),

    /// Desired-configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Login page did not load (fatal at startup)
    #[error("Failed to load login page: {0}")]
    LoginPage(String),

    /// Post-login verification failed (fatal at startup)
    #[error("Login verification failed: {0}")]
    LoginRejected(String),

    /// Window handle rejected by the WebDriver client
    #[error("Invalid window handle: {0}")]
    InvalidWindow(String),

    /// Save action never produced the post-save marker
    #[error("Settings save was not confirmed after {attempts} attempts")]
    SaveNotConfirmed { attempts: u32 },
}
