//! Credential prompting and WHMCS login
//!
//! Both failure modes here are fatal: if the login page cannot be driven or
//! the post-login listing marker is absent, the run ends immediately with a
//! non-zero exit. Nothing at this stage is retried.

use std::io::Write;

use tracing::info;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::selectors;
use crate::session::Session;

/// WHMCS admin credentials
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Prompt for username and password on the terminal. The password is read
/// without echo.
pub fn prompt_credentials() -> Result<Credentials> {
    println!("\nWHMCS credentials required:");
    print!("Username: ");
    std::io::stdout().flush()?;

    let mut username = String::new();
    std::io::stdin().read_line(&mut username)?;
    let username = username.trim().to_string();

    let password = rpassword::prompt_password("Password: ")?;

    Ok(Credentials { username, password })
}

/// Log into WHMCS and verify the session sees the services listing.
///
/// Fills and submits the login form, navigates to the services page, and
/// waits for the account-link marker. A failure driving the form is
/// [`Error::LoginPage`]; an absent marker is [`Error::LoginRejected`]
/// (typically bad credentials).
pub async fn authenticate(
    session: &dyn Session,
    credentials: &Credentials,
    settings: &Settings,
) -> Result<()> {
    let fill = async {
        session.goto(&settings.login_url).await?;
        session
            .send_keys(&selectors::USERNAME_FIELD, &credentials.username)
            .await?;
        session
            .send_keys(&selectors::PASSWORD_FIELD, &credentials.password)
            .await?;
        session.click(&selectors::LOGIN_SUBMIT).await
    };
    if let Err(e) = fill.await {
        return Err(Error::LoginPage(e.to_string()));
    }
    info!("logging in");

    session.goto(&settings.services_url).await?;
    session
        .wait_for(&selectors::ACCOUNT_LINKS, settings.wait_timeout)
        .await
        .map_err(|_| {
            Error::LoginRejected("account listing not visible, possibly bad credentials".to_string())
        })?;

    info!("login verified");
    Ok(())
}
