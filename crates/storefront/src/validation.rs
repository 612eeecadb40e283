//! Client-side form validation.
//!
//! These checks run before any request is sent. They are deliberately no
//! stricter than the forms the backend was built against.

use blitzshop_core::{Email, EmailError, MAX_RATING, MIN_RATING, ReviewDraft};
use thiserror::Error;

/// Minimum password length accepted at sign-up, sign-in and password change.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum length of first and last names at sign-up.
pub const MIN_NAME_LENGTH: usize = 2;

/// Input rejected before a request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Email is invalid: {0}")]
    InvalidEmail(EmailError),
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("New password must be different from the current password")]
    PasswordUnchanged,
    #[error("{field} must be at least {min} characters")]
    NameTooShort { field: &'static str, min: usize },
    #[error("Coupon code is required")]
    CouponCodeRequired,
    #[error("Quantity must be positive")]
    InvalidQuantity,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Start date must not be after end date")]
    InvalidDateRange,
    #[error("Rating must be between {min} and {max}")]
    InvalidRating { min: u8, max: u8 },
}

/// Sign-up form.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub username: Option<String>,
}

/// Validate an email field.
///
/// # Errors
///
/// Returns `EmailRequired` for blank input, `InvalidEmail` otherwise.
pub fn validate_email(email: &str) -> Result<Email, ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    Email::parse(email).map_err(ValidationError::InvalidEmail)
}

/// Validate a password field.
///
/// # Errors
///
/// Returns an error if the password is empty or shorter than the minimum.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validate the sign-in form.
///
/// # Errors
///
/// Returns the first failing field check.
pub fn validate_login(email: &str, password: &str) -> Result<Email, ValidationError> {
    let email = validate_email(email)?;
    validate_password(password)?;
    Ok(email)
}

/// Validate the sign-up form.
///
/// # Errors
///
/// Returns the first failing field check.
pub fn validate_registration(form: &RegistrationForm) -> Result<Email, ValidationError> {
    let email = validate_email(&form.email)?;
    validate_password(&form.password)?;
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    validate_name("First name", &form.first_name)?;
    validate_name("Last name", &form.last_name)?;
    Ok(email)
}

fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::NameTooShort {
            field,
            min: MIN_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Validate the change-password form.
///
/// # Errors
///
/// Returns the first failing check.
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    if current.is_empty() {
        return Err(ValidationError::MissingField("Current password"));
    }
    if new.is_empty() {
        return Err(ValidationError::MissingField("New password"));
    }
    if confirm.is_empty() {
        return Err(ValidationError::MissingField("Password confirmation"));
    }
    validate_password(new)?;
    if new != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if new == current {
        return Err(ValidationError::PasswordUnchanged);
    }
    Ok(())
}

/// Normalize a coupon code the way the backend stores them.
///
/// # Errors
///
/// Returns `CouponCodeRequired` if nothing is left after trimming.
pub fn normalize_coupon_code(code: &str) -> Result<String, ValidationError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ValidationError::CouponCodeRequired);
    }
    Ok(code.to_uppercase())
}

/// Check a review before it is written, returning it with title and
/// comment trimmed.
///
/// A new review needs a rating and a comment; an update only checks the
/// fields it sets.
///
/// # Errors
///
/// Returns `InvalidRating` for a missing or out-of-range rating and
/// `MissingField("Review")` for a blank comment.
pub fn validate_review(draft: &ReviewDraft, is_new: bool) -> Result<ReviewDraft, ValidationError> {
    let rating_ok = match draft.rating {
        Some(rating) => (MIN_RATING..=MAX_RATING).contains(&rating),
        None => !is_new,
    };
    if !rating_ok {
        return Err(ValidationError::InvalidRating {
            min: MIN_RATING,
            max: MAX_RATING,
        });
    }

    let comment = draft.comment.as_deref().map(str::trim);
    let comment_ok = match comment {
        Some(comment) => !comment.is_empty(),
        None => !is_new,
    };
    if !comment_ok {
        return Err(ValidationError::MissingField("Review"));
    }

    Ok(ReviewDraft {
        rating: draft.rating,
        title: draft.title.as_deref().map(|t| t.trim().to_string()),
        comment: comment.map(String::from),
        order_id: draft.order_id,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            email: "ana@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            first_name: "Ana".into(),
            last_name: "Ruiz".into(),
            username: None,
        }
    }

    #[test]
    fn test_login_requires_email() {
        assert_eq!(validate_login("  ", "secret1"), Err(ValidationError::EmailRequired));
    }

    #[test]
    fn test_login_rejects_malformed_email() {
        assert!(matches!(
            validate_login("ana@localhost", "secret1"),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_login_password_length() {
        assert_eq!(
            validate_login("ana@example.com", "12345"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            validate_login("ana@example.com", ""),
            Err(ValidationError::PasswordRequired)
        );
        assert!(validate_login("ana@example.com", "123456").is_ok());
    }

    #[test]
    fn test_registration_checks() {
        assert!(validate_registration(&form()).is_ok());

        let mismatch = RegistrationForm {
            confirm_password: "secret2".into(),
            ..form()
        };
        assert_eq!(
            validate_registration(&mismatch),
            Err(ValidationError::PasswordMismatch)
        );

        let short_name = RegistrationForm {
            last_name: "R".into(),
            ..form()
        };
        assert_eq!(
            validate_registration(&short_name),
            Err(ValidationError::NameTooShort {
                field: "Last name",
                min: 2
            })
        );
    }

    #[test]
    fn test_password_change_rules() {
        assert_eq!(
            validate_password_change("", "newpass", "newpass"),
            Err(ValidationError::MissingField("Current password"))
        );
        assert_eq!(
            validate_password_change("oldpass", "abc", "abc"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            validate_password_change("oldpass", "newpass", "newpasz"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_password_change("oldpass", "oldpass", "oldpass"),
            Err(ValidationError::PasswordUnchanged)
        );
        assert!(validate_password_change("oldpass", "newpass", "newpass").is_ok());
    }

    #[test]
    fn test_coupon_code_normalization() {
        assert_eq!(normalize_coupon_code("  save10 ").unwrap(), "SAVE10");
        assert_eq!(
            normalize_coupon_code("   "),
            Err(ValidationError::CouponCodeRequired)
        );
    }

    #[test]
    fn test_new_review_needs_rating_and_comment() {
        let draft = ReviewDraft {
            rating: Some(4),
            title: Some("  Solid mug ".into()),
            comment: Some(" Keeps coffee warm. ".into()),
            order_id: None,
        };
        let clean = validate_review(&draft, true).unwrap();
        assert_eq!(clean.title.as_deref(), Some("Solid mug"));
        assert_eq!(clean.comment.as_deref(), Some("Keeps coffee warm."));

        let unrated = ReviewDraft {
            rating: None,
            ..draft.clone()
        };
        assert_eq!(
            validate_review(&unrated, true),
            Err(ValidationError::InvalidRating { min: 1, max: 5 })
        );

        let blank = ReviewDraft {
            comment: Some("   ".into()),
            ..draft
        };
        assert_eq!(
            validate_review(&blank, true),
            Err(ValidationError::MissingField("Review"))
        );
    }

    #[test]
    fn test_review_update_checks_only_set_fields() {
        let rating_only = ReviewDraft {
            rating: Some(2),
            ..ReviewDraft::default()
        };
        assert!(validate_review(&rating_only, false).is_ok());

        for rating in [0, 6] {
            let out_of_range = ReviewDraft {
                rating: Some(rating),
                ..ReviewDraft::default()
            };
            assert!(matches!(
                validate_review(&out_of_range, false),
                Err(ValidationError::InvalidRating { .. })
            ));
        }
    }
}
