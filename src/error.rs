use thiserror::Error;

/// Shown when neither the provider nor the transport gave a usable message.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Stripe secret key is not set")]
    MissingSecretKey,

    #[error("Base URL is not set")]
    MissingBaseUrl,

    #[error("{0}")]
    Provider(String),

    #[error("Failed to create checkout session URL")]
    MissingRedirectUrl,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unknown package: {0}")]
    UnknownOffering(String),
}

impl CheckoutError {
    /// Configuration problems abort the attempt before any network call.
    pub fn is_config(&self) -> bool {
        matches!(self, CheckoutError::MissingSecretKey | CheckoutError::MissingBaseUrl)
    }

    /// Message carried by a `CheckoutResult::Failure`.
    pub fn failure_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Catalog has no packages")]
    Empty,

    #[error("Package {name} is invalid: {reason}")]
    Invalid { name: String, reason: &'static str },

    #[error("Package {0} is listed twice")]
    Duplicate(String),
}

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Failed to reach contact endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Contact endpoint answered {0}")]
    Rejected(reqwest::StatusCode),
}
