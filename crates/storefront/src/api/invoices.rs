//! Shopper invoice endpoints (`/api/invoices*`).

use blitzshop_core::{Invoice, InvoiceId, InvoicePage};
use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::ApiClient;
use crate::error::ClientError;

impl ApiClient {
    /// Page through the signed-in user's invoices.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn invoices(
        &self,
        token: &SecretString,
        page: u32,
        per_page: u32,
    ) -> Result<InvoicePage, ClientError> {
        let request = self.request(
            Method::GET,
            "api/invoices",
            &[
                ("page", Some(page.to_string())),
                ("per_page", Some(per_page.to_string())),
            ],
            Some(token),
        )?;
        self.send(request, "Failed to retrieve invoices").await
    }

    /// Get one of the signed-in user's invoices.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown invoices and
    /// `ClientError::Api` with status 403 for another user's invoice.
    #[instrument(skip(self, token), fields(invoice_id = %id))]
    pub async fn invoice(&self, token: &SecretString, id: InvoiceId) -> Result<Invoice, ClientError> {
        let request = self.request(Method::GET, &format!("api/invoices/{id}"), &[], Some(token))?;
        self.send(request, "Failed to retrieve invoice").await
    }

    /// Download an invoice as PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 503 and "PDF generation not
    /// available" when the server cannot render PDFs.
    #[instrument(skip(self, token), fields(invoice_id = %id))]
    pub async fn download_invoice(
        &self,
        token: &SecretString,
        id: InvoiceId,
    ) -> Result<Vec<u8>, ClientError> {
        let request = self.request(
            Method::GET,
            &format!("api/invoices/{id}/download"),
            &[],
            Some(token),
        )?;
        self.send_bytes(request, "Failed to generate PDF").await
    }
}
