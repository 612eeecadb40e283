//! Sign-in, sign-up and sign-out.

use blitzshop_storefront::Storefront;
use blitzshop_storefront::validation::RegistrationForm;
use tracing::info;

use super::CommandError;
use crate::output;

/// Sign in and print the user.
///
/// # Errors
///
/// Returns an error for invalid credentials or a failed request.
pub async fn login(shop: &Storefront, email: &str, password: &str) -> Result<(), CommandError> {
    let user = shop.login(email, password).await?;
    info!(user_id = %user.id, "Signed in");
    output::line(&format!(
        "Signed in as {} ({} items in cart)",
        user.email,
        shop.cart().total_items().await
    ))
}

/// Create an account, sign in and print the user.
///
/// # Errors
///
/// Returns a validation error or the server's rejection.
pub async fn register(shop: &Storefront, form: &RegistrationForm) -> Result<(), CommandError> {
    let user = shop.register(form).await?;
    output::line(&format!("Account created for {}", user.email))
}

/// Sign out and forget the persisted session.
///
/// # Errors
///
/// Returns an error if the state file cannot be updated.
pub async fn logout(shop: &Storefront) -> Result<(), CommandError> {
    shop.logout().await?;
    output::line("Signed out")
}

/// Print the signed-in user, if any.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub async fn whoami(shop: &Storefront) -> Result<(), CommandError> {
    match shop.session().user().await {
        Some(user) => output::json(&user),
        None => output::line("Not signed in"),
    }
}
