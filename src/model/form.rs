//! Auth form input and its field rules.
//!
//! Validation runs before any network call; each invalid field reports one message.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::{error::FieldErrors, model::auth::SignUpDetails};

const REQUIRED: &str = "required";

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SignInForm {
    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(
        custom(function = "not_blank", message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SignUpForm {
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank", message = "Last name is required"))]
    pub last_name: String,
    #[validate(
        custom(function = "not_blank", message = "Username is required"),
        length(min = 3, message = "Username must be at least 3 characters")
    )]
    pub username: String,
    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(
        custom(function = "not_blank", message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(custom(
        function = "accepted",
        message = "You must accept the terms and conditions"
    ))]
    pub accept_terms: bool,
}

impl SignInForm {
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|errors| first_messages(&errors))
    }
}

impl SignUpForm {
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|errors| first_messages(&errors))
    }

    pub fn details(&self) -> SignUpDetails {
        SignUpDetails {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            username: self.username.trim().to_string(),
        }
    }
}

fn not_blank(value: &String) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(REQUIRED));
    }

    Ok(())
}

fn accepted(value: &bool) -> Result<(), ValidationError> {
    if !*value {
        return Err(ValidationError::new(REQUIRED));
    }

    Ok(())
}

/// Reduce validator output to one message per field, preferring "required" over format
/// messages so an empty field is not reported as malformed.
fn first_messages(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errors)| {
            let error = errors
                .iter()
                .find(|e| e.code == REQUIRED)
                .or_else(|| errors.first())?;
            let message = error
                .message
                .clone()
                .unwrap_or_else(|| Cow::Owned(format!("{} is invalid", field)));

            Some((field.to_string(), message.into_owned()))
        })
        .collect()
}
