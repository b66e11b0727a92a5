//! whmcs-notif-sync - Main entry point
//!
//! Startup sequence: parse arguments, load the desired configuration,
//! prompt for credentials, connect to the WebDriver endpoint, log into
//! WHMCS, then hand the discovered accounts to the orchestrator. Login
//! failures exit with status 1; accounts that exhaust their retry budget
//! leave a status-2 exit after the rest of the run completes.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use whmcs_notif_sync::audit::AuditLog;
use whmcs_notif_sync::cli::Args;
use whmcs_notif_sync::config::DesiredConfig;
use whmcs_notif_sync::orchestrate::Orchestrator;
use whmcs_notif_sync::session::WebDriverSession;
use whmcs_notif_sync::{login, paginate};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whmcs_notif_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("Starting whmcs-notif-sync v{}", env!("CARGO_PKG_VERSION"));

    let desired = DesiredConfig::load(&args.config)
        .context("Failed to load desired notification configuration")?;
    let settings = args.settings();

    let credentials = login::prompt_credentials().context("Failed to read credentials")?;

    let session = WebDriverSession::connect(&args.webdriver_url)
        .await
        .context("Failed to connect to WebDriver endpoint")?;
    info!("✓ Browser session established");

    if let Err(err) = login::authenticate(&session, &credentials, &settings).await {
        error!("{err}");
        let _ = session.quit().await;
        std::process::exit(1);
    }

    let mut audit = AuditLog::create(&args.output_dir, Local::now())
        .context("Failed to create audit log")?;
    info!("Audit log: {}", audit.path().display());

    let account_hrefs = paginate::collect_account_links(&session, &settings).await?;
    info!(accounts = account_hrefs.len(), "account discovery complete");

    let orchestrator = Orchestrator::new(&session, &desired, &settings);
    let summary = orchestrator.run(&mut audit, &account_hrefs).await?;

    session.quit().await?;

    if !summary.failed.is_empty() {
        for failed in &summary.failed {
            error!(account = failed.whmcs_href.as_str(), "not synchronized: {}", failed.error);
        }
        std::process::exit(2);
    }

    info!(completed = summary.completed, "all accounts synchronized");
    Ok(())
}
