use std::fmt;

use crate::domain::error::DomainError;

/// An email address kept as separate parts until it is written into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    user: String,
    domain: String,
}

impl EmailAddress {
    pub fn new(user: impl Into<String>, domain: impl Into<String>) -> Result<Self, DomainError> {
        let user = user.into().trim().to_string();
        let domain = domain.into().trim().to_string();

        if user.is_empty() || domain.is_empty() {
            return Err(DomainError::validation(
                "email user and domain must both be non-empty",
            ));
        }
        if user.contains('@') || domain.contains('@') {
            return Err(DomainError::validation(
                "email parts must not contain `@`",
            ));
        }
        if user.chars().chain(domain.chars()).any(char::is_whitespace) {
            return Err(DomainError::validation(
                "email parts must not contain whitespace",
            ));
        }
        if !domain.contains('.') {
            return Err(DomainError::validation(format!(
                "email domain `{domain}` is not a qualified host name"
            )));
        }

        Ok(Self { user, domain })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn mailto(&self) -> String {
        format!("mailto:{self}")
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.domain)
    }
}
