use httpmock::prelude::*;
use serde_json::json;
use videopack_checkout::{
    error::{CheckoutError, UNKNOWN_ERROR},
    stripe::{CheckoutSession, LineItem, PriceData, ProductData},
    StripeClient,
};

fn session() -> CheckoutSession {
    let mut session = CheckoutSession::new();
    session.mode = Some("payment".to_string());
    session.success_url = Some("https://videos.example.com/success".to_string());
    session.cancel_url = Some("https://videos.example.com/cancel".to_string());
    session.line_items = Some(vec![LineItem {
        price: None,
        price_data: Some(PriceData {
            currency: "eur".to_string(),
            unit_amount: 359_300,
            product_data: ProductData {
                name: "Basic Video Package".to_string(),
            },
        }),
        quantity: Some(1),
    }]);
    session
}

#[tokio::test]
async fn session_is_posted_with_the_secret_as_basic_auth() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/checkout/sessions")
                .header("authorization", "Basic c2tfdGVzdF8xMjM6")
                .x_www_form_urlencoded_tuple("line_items[0][price_data][unit_amount]", "359300")
                .x_www_form_urlencoded_tuple("mode", "payment");
            then.status(200).json_body(json!({
                "id": "cs_test_basic",
                "object": "checkout.session",
                "url": "https://checkout.stripe.com/c/pay/cs_test_basic"
            }));
        })
        .await;

    let client = StripeClient::new("sk_test_123", &server.base_url());
    let created = session()
        .async_post(&reqwest::Client::new(), client)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.id.as_deref(), Some("cs_test_basic"));
    assert_eq!(
        created.url.as_deref(),
        Some("https://checkout.stripe.com/c/pay/cs_test_basic")
    );
}

#[tokio::test]
async fn stripe_error_message_is_kept() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/checkout/sessions");
            then.status(401).json_body(json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "Invalid API Key provided: sk_test_***123"
                }
            }));
        })
        .await;

    let client = StripeClient::new("sk_test_123", &server.base_url());
    let err = session()
        .async_post(&reqwest::Client::new(), client)
        .await
        .unwrap_err();

    match err {
        CheckoutError::Provider(message) => {
            assert_eq!(message, "Invalid API Key provided: sk_test_***123")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreadable_error_body_falls_back_to_generic_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/checkout/sessions");
            then.status(502).body("<html>Bad Gateway</html>");
        })
        .await;

    let client = StripeClient::new("sk_test_123", &server.base_url());
    let err = session()
        .async_post(&reqwest::Client::new(), client)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Provider(ref m) if m == UNKNOWN_ERROR));
}
