//! Invoice administration (`/api/admin/invoices*`, `/api/admin/invoice-settings`).

use blitzshop_core::{
    Invoice, InvoiceDraft, InvoiceId, InvoicePage, InvoiceSettings, InvoiceStatus, InvoiceUpdate,
    OrderId, UserId,
};
use blitzshop_storefront::api::Ack;
use blitzshop_storefront::error::Result;
use chrono::NaiveDate;
use reqwest::Method;
use tracing::{info, instrument};

use crate::client::{AdminClient, Envelope};

/// Filters for the admin invoice listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<InvoiceStatus>,
    pub user_id: Option<UserId>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl InvoiceQuery {
    fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("page", self.page.map(|p| p.to_string())),
            ("per_page", self.per_page.map(|p| p.to_string())),
            ("status", self.status.map(|s| s.to_string())),
            ("user_id", self.user_id.map(|u| u.to_string())),
            (
                "from_date",
                self.from_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ),
            (
                "to_date",
                self.to_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ),
        ]
    }
}

impl AdminClient {
    /// All invoices with the aggregate `stats` block.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_invoices(&self, query: &InvoiceQuery) -> Result<InvoicePage> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::GET,
            "api/admin/invoices",
            &query.query_pairs(),
            Some(&token),
        )?;
        self.send(request, "Error fetching invoices").await
    }

    /// Issue the invoice for an order.
    ///
    /// # Errors
    ///
    /// Returns "Invoice already exists for this order" when one was issued.
    #[instrument(skip(self, draft), fields(order_id = %order_id))]
    pub async fn create_invoice(&self, order_id: OrderId, draft: &InvoiceDraft) -> Result<Invoice> {
        let token = self.token().await?;
        let request = self
            .api
            .request(
                Method::POST,
                &format!("api/admin/invoices/create/{order_id}"),
                &[],
                Some(&token),
            )?
            .json(draft);
        let created: Envelope<Invoice> = self.send(request, "Error creating invoice").await?;
        info!(invoice_number = %created.item.invoice_number, "Invoice created");
        Ok(created.item)
    }

    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown invoices.
    #[instrument(skip(self, update), fields(invoice_id = %id))]
    pub async fn update_invoice(&self, id: InvoiceId, update: &InvoiceUpdate) -> Result<Invoice> {
        let token = self.token().await?;
        let request = self
            .api
            .request(
                Method::PUT,
                &format!("api/admin/invoices/{id}"),
                &[],
                Some(&token),
            )?
            .json(update);
        let updated: Envelope<Invoice> = self.send(request, "Error updating invoice").await?;
        Ok(updated.item)
    }

    /// Cancel an invoice. The record is kept with status `cancelled`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown invoices.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn cancel_invoice(&self, id: InvoiceId) -> Result<Ack> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::DELETE,
            &format!("api/admin/invoices/{id}"),
            &[],
            Some(&token),
        )?;
        let ack = self.send(request, "Error cancelling invoice").await?;
        info!("Invoice cancelled");
        Ok(ack)
    }

    /// PDF of any invoice.
    ///
    /// # Errors
    ///
    /// Returns "PDF generation not available" when the server cannot render.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn download_invoice(&self, id: InvoiceId) -> Result<Vec<u8>> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::GET,
            &format!("api/admin/invoices/{id}/download"),
            &[],
            Some(&token),
        )?;
        self.send_bytes(request, "Error downloading invoice").await
    }

    /// Company and numbering defaults applied to new invoices.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn invoice_settings(&self) -> Result<InvoiceSettings> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::GET,
            "api/admin/invoice-settings",
            &[],
            Some(&token),
        )?;
        self.send(request, "Error fetching invoice settings").await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, settings))]
    pub async fn update_invoice_settings(
        &self,
        settings: &InvoiceSettings,
    ) -> Result<InvoiceSettings> {
        let token = self.token().await?;
        let request = self
            .api
            .request(
                Method::PUT,
                "api/admin/invoice-settings",
                &[],
                Some(&token),
            )?
            .json(settings);
        let updated: Envelope<InvoiceSettings> = self
            .send(request, "Error updating invoice settings")
            .await?;
        info!("Invoice settings updated");
        Ok(updated.item)
    }
}
