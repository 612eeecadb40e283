//! Unified error handling with Sentry integration.
//!
//! Every SDK operation returns `Result<T, ClientError>`. A failure is either
//! a validation error (raised before any request is sent) or a request
//! failure (non-2xx response or transport error). The `Display` text of each
//! variant is the message shown to the shopper.

use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Message shown for failures the shopper cannot act on.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Errors returned by the storefront and admin SDKs.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected client-side; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No session token is available.
    #[error("Authentication required")]
    Unauthenticated,

    /// The signed-in user is not an administrator, or an admin route refused
    /// the request.
    #[error("Admin access required")]
    Forbidden,

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Too many requests, retry after {0} seconds")]
    RateLimited(u64),

    /// API returned a non-2xx response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The hosted card widget declined or could not confirm the payment.
    #[error("{0}")]
    Payment(String),

    /// HTTP request failed before a response was received.
    #[error("Connection error. Please try again.")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// Persisted client state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Whether the failure happened before any request was sent.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Unauthenticated)
    }

    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Forbidden => Some(403),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }

    /// Banner text for the failure. Internal details (parse and storage
    /// failures) are replaced by a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Parse(_) | Self::Storage(_) => GENERIC_ERROR.to_string(),
            other => other.to_string(),
        }
    }

    /// Report unexpected failures to Sentry.
    ///
    /// Validation errors and ordinary 4xx rejections are expected and are not
    /// captured; transport, parse, storage and 5xx failures are.
    pub fn capture(&self) {
        let unexpected = match self {
            Self::Http(_) | Self::Parse(_) | Self::Storage(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        };
        if unexpected {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
