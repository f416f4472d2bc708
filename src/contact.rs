//! Forwards the contact form to the external inbox endpoint.

use crate::{error::ContactError, orchestrator::Notification};
use log::{error, info};
use reqwest::multipart::Form;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingField("Name"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ContactError::MissingField("Email"));
        }
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ContactError::InvalidEmail),
        }
    }

    fn to_form(&self) -> Form {
        Form::new()
            .text("name", self.name.trim().to_string())
            .text("email", self.email.trim().to_string())
            .text("message", self.message.clone().unwrap_or_default())
    }
}

#[derive(Clone)]
pub struct ContactClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ContactClient {
    pub fn new(http: reqwest::Client, endpoint: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
        }
    }

    /// Any 2xx counts as delivered; the body is not read.
    pub async fn submit(&self, message: &ContactMessage) -> Result<(), ContactError> {
        message.validate()?;
        let response = self
            .http
            .post(&self.endpoint)
            .multipart(message.to_form())
            .send()
            .await?;

        if response.status().is_success() {
            info!("Contact message from {} delivered", message.email.trim());
            Ok(())
        } else {
            Err(ContactError::Rejected(response.status()))
        }
    }

    /// Submits and turns the outcome into the toast shown to the visitor.
    pub async fn submit_and_notify(&self, message: &ContactMessage) -> Notification {
        match self.submit(message).await {
            Ok(()) => Notification::info(
                "Message sent",
                "Thank you for your message. We'll get back to you soon.",
            ),
            Err(ContactError::MissingField(field)) => {
                Notification::error("Error", &format!("{} is required.", field))
            }
            Err(ContactError::InvalidEmail) => {
                Notification::error("Error", "Please enter a valid email address.")
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                Notification::error("Error", "Failed to send message. Please try again.")
            }
        }
    }
}
