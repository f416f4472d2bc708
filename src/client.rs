use crate::{config::CheckoutCredentials, stripe::Auth};

/// Secret key plus the API host it is sent to.
#[derive(Clone)]
pub struct StripeClient {
    pub api_key: String,
    pub api_base: String,
}

impl StripeClient {
    pub fn new(api_key: &str, api_base: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path.trim_start_matches('/'))
    }
}

impl From<&CheckoutCredentials> for StripeClient {
    fn from(creds: &CheckoutCredentials) -> Self {
        StripeClient::new(&creds.secret_key, &creds.api_base)
    }
}

impl From<StripeClient> for Auth {
    fn from(client: StripeClient) -> Self {
        Auth {
            client: client.api_key,
            secret: None,
        }
    }
}
