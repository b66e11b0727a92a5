//! whmcs-notif-sync library interface
//!
//! Bulk-synchronizes the cPanel notification toggles of every WHMCS account
//! against a single desired configuration, by driving a real browser
//! through the admin UI: paginate the account listing, SSO into each
//! account's cPanel session, enumerate its apps, and reconcile each app's
//! flag set with a verified save. Everything runs strictly sequentially;
//! the remote UI's one-secondary-window session model rules out
//! parallelism.

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod flags;
pub mod login;
pub mod orchestrate;
pub mod paginate;
pub mod reconcile;
pub mod retry;
pub mod selectors;
pub mod session;
pub mod sso;
pub mod types;

pub use crate::error::{Error, Result};
