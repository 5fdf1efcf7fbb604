use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("enter an email address")]
    MissingEmail,
    #[error("'{0}' is not an email address")]
    InvalidEmail(String),
}

/// The signed-in user. Only `email` matters to storage; the rest is display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

impl User {
    pub fn sign_in(email: &str, name: Option<&str>) -> Result<Self, IdentityError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(IdentityError::MissingEmail);
        }
        let Some((local, domain)) = email.split_once('@') else {
            return Err(IdentityError::InvalidEmail(email.to_string()));
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(IdentityError::InvalidEmail(email.to_string()));
        }

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(local)
            .to_string();
        Ok(Self {
            name,
            email: email.to_string(),
            picture: None,
        })
    }

    /// Namespace for this user's storage keys.
    pub fn storage_id(&self) -> String {
        self.email.to_lowercase()
    }
}
