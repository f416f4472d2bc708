//! Turns a selected offering into a hosted checkout session.

use crate::{
    catalog::Offering,
    client::StripeClient,
    config::CheckoutSettings,
    error::CheckoutError,
    stripe::{CheckoutSession, LineItem, PriceData, ProductData},
};
use log::{debug, error, info};
use serde::Serialize;

pub const CURRENCY: &str = "EUR";

/// What gets charged for one attempt. Built fresh per click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub offering_name: String,
    pub amount_minor_units: i64,
    pub currency: &'static str,
}

impl From<&Offering> for CheckoutRequest {
    fn from(offering: &Offering) -> Self {
        Self {
            offering_name: offering.name.clone(),
            amount_minor_units: offering.amount_minor_units(),
            currency: CURRENCY,
        }
    }
}

impl CheckoutRequest {
    pub fn product_name(&self) -> String {
        format!("{} Video Package", self.offering_name)
    }

    pub fn to_session(&self, success_url: String, cancel_url: String) -> CheckoutSession {
        let mut session = CheckoutSession::new();
        session.mode = Some("payment".to_string());
        session.payment_method_types = Some(vec!["card".to_string()]);
        session.success_url = Some(success_url);
        session.cancel_url = Some(cancel_url);
        session.line_items = Some(vec![LineItem {
            price: None,
            price_data: Some(PriceData {
                currency: self.currency.to_lowercase(),
                unit_amount: self.amount_minor_units,
                product_data: ProductData {
                    name: self.product_name(),
                },
            }),
            quantity: Some(1),
        }]);
        session
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutResult {
    Success { redirect_url: String },
    Failure { message: String },
}

/// Wire shape of a `CheckoutResult`: `{"success":true,"url":..}` or
/// `{"success":false,"error":..}`.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<CheckoutResult> for CheckoutResponse {
    fn from(result: CheckoutResult) -> Self {
        match result {
            CheckoutResult::Success { redirect_url } => Self {
                success: true,
                url: Some(redirect_url),
                error: None,
            },
            CheckoutResult::Failure { message } => Self::failure(message),
        }
    }
}

impl CheckoutResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Clone, Default)]
pub struct CheckoutInitiator {
    http: reqwest::Client,
}

impl CheckoutInitiator {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Creates a session for `offering`.
    ///
    /// Missing configuration is returned as `Err` before anything goes on the
    /// wire. Everything the provider or the transport does wrong comes back as
    /// `Ok(CheckoutResult::Failure)`.
    pub async fn initiate(
        &self,
        settings: &CheckoutSettings,
        offering: &Offering,
    ) -> Result<CheckoutResult, CheckoutError> {
        debug!("Entering checkout for {}", offering.name);
        let creds = settings.require()?;

        let request = CheckoutRequest::from(offering);
        let session = request.to_session(creds.success_url(), creds.cancel_url());

        info!(
            "Creating Stripe checkout session for {} ({} minor units {})",
            request.offering_name, request.amount_minor_units, request.currency
        );
        let outcome = session
            .async_post(&self.http, StripeClient::from(&creds))
            .await
            .and_then(|created| {
                created
                    .url
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(CheckoutError::MissingRedirectUrl)
            });

        match outcome {
            Ok(redirect_url) => {
                info!("Checkout session created for {}", request.offering_name);
                Ok(CheckoutResult::Success { redirect_url })
            }
            Err(e) => {
                error!("Error creating checkout for {}: {}", request.offering_name, e);
                Ok(CheckoutResult::Failure {
                    message: e.failure_message(),
                })
            }
        }
    }
}
