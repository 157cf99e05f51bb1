//! Coverage for request encoding, status mapping and a loopback round trip.

use super::*;
use rstest::rstest;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

fn request(price: f64) -> PaymentIntentRequest {
    PaymentIntentRequest::from_price(price, Some("EUR")).expect("valid price")
}

#[rstest]
#[case("https://api.stripe.com", "https://api.stripe.com/v1/payment_intents")]
#[case("http://127.0.0.1:12111/", "http://127.0.0.1:12111/v1/payment_intents")]
#[case("http://mock.local/stripe", "http://mock.local/stripe/v1/payment_intents")]
fn endpoint_is_joined_under_the_base(#[case] base: &str, #[case] expected: &str) {
    let base = Url::parse(base).expect("valid base");
    let endpoint = payment_intents_endpoint(&base).expect("joinable");
    assert_eq!(endpoint.as_str(), expected);
}

#[test]
fn form_carries_minor_units_currency_and_card() {
    let form = intent_form(&request(42.5));
    assert_eq!(
        form,
        [
            ("amount", "4250".to_owned()),
            ("currency", "eur".to_owned()),
            ("payment_method_types[]", "card".to_owned()),
        ]
    );
}

#[rstest]
#[case::bad_request(StatusCode::BAD_REQUEST, "Rejected")]
#[case::unauthorised(StatusCode::UNAUTHORIZED, "Rejected")]
#[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
#[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
#[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
fn maps_http_statuses_to_gateway_errors(#[case] status: StatusCode, #[case] expected: &str) {
    let error = map_status_error(status, b"{}");
    let matched = match expected {
        "Rejected" => matches!(error, PaymentGatewayError::Rejected { .. }),
        "Timeout" => matches!(error, PaymentGatewayError::Timeout { .. }),
        "Transport" => matches!(error, PaymentGatewayError::Transport { .. }),
        _ => panic!("unsupported test expectation: {expected}"),
    };
    assert!(matched, "{status} should map to {expected}, got {error:?}");
}

#[test]
fn provider_error_message_is_preferred_over_raw_body() {
    let body = br#"{"error":{"type":"invalid_request_error","message":"Amount must be at least 50 cents"}}"#;
    let error = map_status_error(StatusCode::BAD_REQUEST, body);
    assert_eq!(
        error,
        PaymentGatewayError::rejected("status 400: Amount must be at least 50 cents")
    );
}

#[test]
fn body_preview_truncates_long_bodies() {
    let body = "x".repeat(500);
    let preview = body_preview(body.as_bytes());
    assert_eq!(preview.chars().count(), 163);
    assert!(preview.ends_with("..."));
}

#[test]
fn malformed_success_payloads_are_transport_errors() {
    let error = parse_intent(b"{\"id\":\"pi_1\"}").expect_err("missing client_secret");
    assert!(matches!(error, PaymentGatewayError::Transport { .. }));
}

#[test]
fn debug_output_hides_the_secret() {
    let base = Url::parse(DEFAULT_STRIPE_API_BASE).expect("valid base");
    let gateway =
        StripePaymentGateway::new(&base, "sk_test_hidden", DEFAULT_STRIPE_TIMEOUT).expect("build");
    assert!(!format!("{gateway:?}").contains("sk_test_hidden"));
}

/// Serve one canned HTTP response and hand back the raw request text.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (Url, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let address = listener.local_addr().expect("local addr");
    let (sender, receiver) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut raw = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let read = socket.read(&mut chunk).await.expect("read request");
            if read == 0 {
                break;
            }
            raw.extend_from_slice(chunk.get(..read).expect("read within buffer"));
            let text = String::from_utf8_lossy(&raw);
            if let Some((head, rest)) = text.split_once("\r\n\r\n") {
                let expected = head
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|value| value.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if rest.len() >= expected {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        sender.send(String::from_utf8_lossy(&raw).into_owned()).ok();
    });

    let base = Url::parse(&format!("http://{address}")).expect("loopback url");
    (base, receiver)
}

#[tokio::test]
async fn creates_intent_against_a_loopback_provider() {
    let (base, captured) =
        serve_once("200 OK", r#"{"id":"pi_1","client_secret":"pi_1_secret_abc"}"#).await;
    let gateway =
        StripePaymentGateway::new(&base, "sk_test_123", DEFAULT_STRIPE_TIMEOUT).expect("build");

    let intent = gateway
        .create_intent(&request(12.34))
        .await
        .expect("intent created");
    assert_eq!(intent.client_secret, "pi_1_secret_abc");

    let raw = captured.await.expect("request captured");
    assert!(raw.starts_with("POST /v1/payment_intents "));
    assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk_test_123"));
    assert!(raw.contains("amount=1234"));
    assert!(raw.contains("currency=eur"));
    assert!(raw.contains("payment_method_types%5B%5D=card"));
}

#[tokio::test]
async fn provider_rejections_surface_as_rejected() {
    let (base, _captured) = serve_once(
        "402 Payment Required",
        r#"{"error":{"message":"Your card was declined."}}"#,
    )
    .await;
    let gateway =
        StripePaymentGateway::new(&base, "sk_test_123", DEFAULT_STRIPE_TIMEOUT).expect("build");

    let error = gateway
        .create_intent(&request(5.0))
        .await
        .expect_err("declined");
    assert_eq!(
        error,
        PaymentGatewayError::rejected("status 402: Your card was declined.")
    );
}
