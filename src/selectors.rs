//! Fixed element fixtures of the remote UI
//!
//! The WHMCS admin pages and the cPanel notification center expose a stable
//! set of elements; everything the tool touches is listed here. Per-flag
//! checkbox selectors live in [`crate::flags`] next to the flag enum.

use crate::session::Selector;

/// Username field on the WHMCS login page.
pub const USERNAME_FIELD: Selector = Selector::Css("input[name='username']");

/// Password field on the WHMCS login page.
pub const PASSWORD_FIELD: Selector = Selector::Css("input[name='password']");

/// Login form submit button.
pub const LOGIN_SUBMIT: Selector = Selector::Css("input[type='submit']");

/// Account detail links in the services listing table. Also serves as the
/// post-login marker: if it is absent, the credentials were rejected.
pub const ACCOUNT_LINKS: Selector = Selector::Css("#sortabletbl0 tr td:nth-child(2) a");

/// "Next Page" control of the services listing.
pub const NEXT_PAGE: Selector = Selector::XPath("//a[contains(text(), 'Next Page')]");

/// Single-sign-on button on an account's detail page.
pub const SSO_BUTTON: Selector =
    Selector::XPath("//button[@onclick=\"runModuleCommand('singlesignon'); return false\"]");

/// Account display name on the detail page.
pub const ACCOUNT_NAME: Selector = Selector::Css(".name");

/// "My Apps" link inside the cPanel secondary session.
pub const MY_APPS_LINK: Selector = Selector::Css("#item_myapps");

/// Description element of the app listing; its presence means the listing
/// page has finished loading.
pub const PAGE_DESCRIPTION: Selector = Selector::Css(".i_page_description.i_bg_page_description");

/// Per-app "View/edit details" anchors. Doubles as the post-save marker:
/// a successful save redirects back to a page carrying these.
pub const DETAILS_LINK: Selector = Selector::XPath("//a[@data-descr='View/edit details']");

/// Manual notification mode toggle on an app's settings page.
pub const MANUAL_MODE: Selector = Selector::Css("#field_notification_mode_manual");

/// "Save All" control on an app's settings page.
pub const SAVE_ALL: Selector = Selector::Css("#i_button_next");
