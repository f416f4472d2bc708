use super::{Auth, StripeErrorEnvelope};
use crate::{client::StripeClient, error::CheckoutError, error::UNKNOWN_ERROR};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A hosted checkout session. Built locally as the create request; the same
/// shape is read back from Stripe, which fills in `id` and `url`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CheckoutSession {
    pub id: Option<String>,
    pub customer: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
    pub mode: Option<String>,
    pub payment_method_types: Option<Vec<String>>,
    pub line_items: Option<Vec<LineItem>>,
    pub url: Option<String>, // for response
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LineItem {
    pub price: Option<String>,
    pub price_data: Option<PriceData>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PriceData {
    pub currency: String,
    pub unit_amount: i64,
    pub product_data: ProductData,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductData {
    pub name: String,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stripe's bracketed form encoding, e.g. `line_items[0][quantity]`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![];
        match &self.customer {
            Some(customer) => params.push(("customer".to_string(), customer.clone())),
            None => {}
        }
        match &self.mode {
            Some(mode) => params.push(("mode".to_string(), mode.clone())),
            None => {}
        }
        match &self.success_url {
            Some(url) => params.push(("success_url".to_string(), url.clone())),
            None => {}
        }
        match &self.cancel_url {
            Some(url) => params.push(("cancel_url".to_string(), url.clone())),
            None => {}
        }
        if let Some(types) = &self.payment_method_types {
            for (i, kind) in types.iter().enumerate() {
                params.push((format!("payment_method_types[{}]", i), kind.clone()));
            }
        }
        if let Some(items) = &self.line_items {
            for (i, item) in items.iter().enumerate() {
                let prefix = format!("line_items[{}]", i);
                if let Some(price) = &item.price {
                    params.push((format!("{}[price]", prefix), price.clone()));
                }
                if let Some(data) = &item.price_data {
                    params.push((format!("{}[price_data][currency]", prefix), data.currency.clone()));
                    params.push((
                        format!("{}[price_data][unit_amount]", prefix),
                        data.unit_amount.to_string(),
                    ));
                    params.push((
                        format!("{}[price_data][product_data][name]", prefix),
                        data.product_data.name.clone(),
                    ));
                }
                if let Some(quantity) = item.quantity {
                    params.push((format!("{}[quantity]", prefix), quantity.to_string()));
                }
            }
        }
        params
    }

    pub async fn async_post(
        &self,
        http: &reqwest::Client,
        client: StripeClient,
    ) -> Result<Self, CheckoutError> {
        let url = client.endpoint("checkout/sessions");
        let creds: Auth = client.into();
        debug!("POST {}", url);

        let response = http
            .post(url)
            .basic_auth(creds.client.as_str(), creds.secret.as_deref())
            .form(&self.to_params())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let session = response.json::<Self>().await?;
            return Ok(session);
        }

        let message = match response.json::<StripeErrorEnvelope>().await {
            Ok(envelope) => {
                warn!(
                    "Stripe rejected checkout session ({} {:?}/{:?})",
                    status, envelope.error.kind, envelope.error.code
                );
                envelope
                    .error
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
            }
            Err(e) => {
                warn!("Stripe answered {} with an unreadable body: {}", status, e);
                UNKNOWN_ERROR.to_string()
            }
        };
        Err(CheckoutError::Provider(message))
    }
}
