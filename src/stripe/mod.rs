pub mod checkout_session;

pub use checkout_session::{CheckoutSession, LineItem, PriceData, ProductData};

use serde::Deserialize;

/// Basic-auth pair sent with every Stripe request. Stripe takes the secret key
/// as the username and no password.
#[derive(Debug, Clone)]
pub struct Auth {
    pub client: String,
    pub secret: Option<String>,
}

/// Body Stripe returns on 4xx/5xx.
#[derive(Debug, Deserialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorBody {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}
