//! Account settings and invoices.

use blitzshop_core::{InvoiceId, NotificationSettings};
use blitzshop_storefront::Storefront;

use super::{AccountAction, CommandError, InvoiceAction};
use crate::output;

const DEFAULT_INVOICES_PER_PAGE: u32 = 10;

/// Run an invoice command.
///
/// # Errors
///
/// Returns an error if signed out, the invoice belongs to someone else, or
/// the PDF cannot be generated or written.
pub async fn invoices(shop: &Storefront, action: InvoiceAction) -> Result<(), CommandError> {
    let token = shop.session().require_token().await?;
    match action {
        InvoiceAction::List { page, per_page } => {
            let invoices = shop
                .api()
                .invoices(
                    &token,
                    page.unwrap_or(1),
                    per_page.unwrap_or(DEFAULT_INVOICES_PER_PAGE),
                )
                .await?;
            output::json(&invoices)
        }
        InvoiceAction::Show { id } => {
            let invoice = shop.api().invoice(&token, InvoiceId::new(id)).await?;
            output::json(&invoice)
        }
        InvoiceAction::Download { id, out } => {
            let pdf = shop
                .api()
                .download_invoice(&token, InvoiceId::new(id))
                .await?;
            tokio::fs::write(&out, &pdf).await?;
            output::line(&format!("Saved {} bytes to {}", pdf.len(), out.display()))
        }
    }
}

fn parse_switch(state: &str) -> Result<bool, CommandError> {
    match state {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArgument(format!(
            "expected on or off, got '{other}'"
        ))),
    }
}

/// Run an account command.
///
/// # Errors
///
/// Returns a validation error, or the server's rejection.
pub async fn account(shop: &Storefront, action: AccountAction) -> Result<(), CommandError> {
    match action {
        AccountAction::Profile => {
            let token = shop.session().require_token().await?;
            let profile = shop.api().profile(&token).await?;
            output::json(&profile)
        }
        AccountAction::Address => {
            let token = shop.session().require_token().await?;
            let address = shop.api().address(&token).await?;
            output::json(&address)
        }
        AccountAction::Password {
            current,
            new,
            confirm,
        } => {
            shop.change_password(&current, &new, &confirm).await?;
            output::line("Password changed")
        }
        AccountAction::Notifications { state } => {
            let token = shop.session().require_token().await?;
            let settings = match state {
                Some(state) => {
                    let settings = NotificationSettings {
                        email_notifications: parse_switch(&state)?,
                    };
                    shop.api().update_notifications(&token, settings).await?
                }
                None => shop.api().notifications(&token).await?,
            };
            output::json(&settings)
        }
        AccountAction::Delete { password } => {
            shop.delete_account(&password).await?;
            output::line("Account deactivated")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch() {
        assert!(parse_switch("on").unwrap());
        assert!(!parse_switch("off").unwrap());
        assert!(matches!(
            parse_switch("maybe"),
            Err(CommandError::InvalidArgument(_))
        ));
    }
}
