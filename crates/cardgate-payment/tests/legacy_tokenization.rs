//! Two-hop legacy tokenization against a scripted gateway.

mod common;

use cardgate_http::{Method, TransportError};
use cardgate_payment::gateway::{CREDIT_CARD_TOKENS_PATH, TOKENIZATION_CONFIGURATION_PATH};
use cardgate_payment::{CardInput, Decimal, PaymentError, TransactionMetadata};
use cardgate_payment_mocks::{MockChallengeWidget, MockScriptLoader};
use common::*;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

fn configuration() -> Value {
	json!({
		"flex_production_url": FLEX_PRODUCTION_URL,
		"flex_development_url": FLEX_DEVELOPMENT_URL,
		"tokenization_auth_key_id": "key_abc"
	})
}

/// Harness with every legacy hop scripted to succeed.
async fn scripted(harness: Harness) -> Harness {
	harness
		.transport
		.respond(Method::GET, TOKENIZATION_CONFIGURATION_PATH, configuration())
		.await;
	harness
		.transport
		.respond(Method::POST, FLEX_TOKENS_PATH, json!({"token": "flex_transient_1", "keyId": "key_abc"}))
		.await;
	harness
		.transport
		.respond(Method::POST, CREDIT_CARD_TOKENS_PATH, token_body("tok_legacy"))
		.await;
	harness
}

#[fixture]
fn metadata() -> TransactionMetadata {
	let mut metadata = TransactionMetadata::new();
	metadata.insert("order_id".to_string(), json!("order-42"));
	metadata
}

#[rstest]
#[tokio::test]
async fn test_legacy_flow_makes_three_calls_in_order(metadata: TransactionMetadata) {
	// Arrange
	let harness = scripted(Harness::new()).await;

	// Act
	let token = harness
		.card
		.create_token_legacy(visa_input(), Some(metadata))
		.await
		.unwrap();

	// Assert
	assert_eq!(token.id, "tok_legacy");
	let paths: Vec<String> = harness
		.transport
		.requests()
		.await
		.iter()
		.map(|request| request.path().to_string())
		.collect();
	assert_eq!(
		paths,
		vec![
			TOKENIZATION_CONFIGURATION_PATH.to_string(),
			FLEX_TOKENS_PATH.to_string(),
			CREDIT_CARD_TOKENS_PATH.to_string(),
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_transient_token_request_shape() {
	let harness = scripted(Harness::new()).await;

	harness
		.card
		.create_token_legacy(visa_input(), None)
		.await
		.unwrap();

	let flex = &harness.transport.requests_to(FLEX_TOKENS_PATH).await[0];
	assert_eq!(flex.url, format!("{}{}", FLEX_DEVELOPMENT_URL, FLEX_TOKENS_PATH));
	assert_eq!(flex.header_value("Authorization"), None);
	assert_eq!(
		flex.body,
		Some(json!({
			"keyId": "key_abc",
			"cardInfo": {
				"cardNumber": VISA,
				"cardExpirationMonth": "12",
				"cardExpirationYear": "2030",
				"cardType": "001"
			}
		}))
	);
}

#[rstest]
#[tokio::test]
async fn test_production_key_uses_production_tokenization_endpoint() {
	let loader = MockScriptLoader::new(Arc::new(MockChallengeWidget::new()));
	let harness = scripted(Harness::with_loader(PRODUCTION_KEY, loader)).await;

	harness
		.card
		.create_token_legacy(visa_input(), None)
		.await
		.unwrap();

	let flex = &harness.transport.requests_to(FLEX_TOKENS_PATH).await[0];
	assert_eq!(flex.url, format!("{}{}", FLEX_PRODUCTION_URL, FLEX_TOKENS_PATH));
}

#[rstest]
#[tokio::test]
async fn test_exchange_body_carries_enriched_metadata(metadata: TransactionMetadata) {
	let harness = scripted(Harness::new()).await;

	harness
		.card
		.create_token_legacy(visa_input(), Some(metadata))
		.await
		.unwrap();

	let exchange = &harness.transport.requests_to(CREDIT_CARD_TOKENS_PATH).await[0];
	assert_eq!(
		exchange.body,
		Some(json!({
			"is_authentication_bundled": true,
			"credit_card_token": "flex_transient_1",
			"should_authenticate": true,
			"amount": 10000,
			"card_cvn": "123",
			"transaction_metadata": {
				"order_id": "order-42",
				"credit_card_type": "001",
				"device_fingerprint_id": "fp_123"
			}
		}))
	);
}

#[rstest]
#[tokio::test]
async fn test_exchange_without_metadata_omits_it() {
	let harness = scripted(Harness::new()).await;
	let input = CardInput::new("5200000000000007", "01", "2031").multiple_use(true);

	harness.card.create_token_legacy(input, None).await.unwrap();

	let exchange = &harness.transport.requests_to(CREDIT_CARD_TOKENS_PATH).await[0];
	let body = exchange.body.as_ref().unwrap();
	assert_eq!(body["is_authentication_bundled"], json!(false));
	assert!(body.get("transaction_metadata").is_none());
	assert!(body.get("amount").is_none());
	let flex = &harness.transport.requests_to(FLEX_TOKENS_PATH).await[0];
	assert_eq!(flex.body.as_ref().unwrap()["cardInfo"]["cardType"], json!("002"));
}

#[rstest]
#[tokio::test]
async fn test_configuration_failure_stops_the_flow() {
	// Arrange
	let harness = Harness::new();
	harness.transport.set_fail_next(true).await;

	// Act
	let result = harness
		.card
		.create_token_legacy(visa_input(), None)
		.await;

	// Assert
	assert_eq!(result.unwrap_err().error_code(), "SERVER_ERROR");
	assert_eq!(harness.transport.request_count().await, 1);
	assert!(harness.transport.requests_to(FLEX_TOKENS_PATH).await.is_empty());
	assert!(harness.transport.requests_to(CREDIT_CARD_TOKENS_PATH).await.is_empty());
}

#[rstest]
#[case(
	json!({"responseStatus": {"reason": "VALIDATION_ERROR", "message": "Invalid card number"}}),
	PaymentError::Validation("Invalid card number".to_string())
)]
#[case(
	json!({"responseStatus": {"reason": "CARD_DECLINED", "message": "Card was declined"}}),
	PaymentError::Tokenization("Card was declined".to_string())
)]
#[case(
	json!({"message": "upstream down"}),
	PaymentError::Server("Something unexpected happened, we are investigating this issue right now".to_string())
)]
#[tokio::test]
async fn test_tokenization_endpoint_errors(#[case] body: Value, #[case] expected: PaymentError) {
	let harness = Harness::new();
	harness
		.transport
		.respond(Method::GET, TOKENIZATION_CONFIGURATION_PATH, configuration())
		.await;
	harness
		.transport
		.respond_error(
			Method::POST,
			FLEX_TOKENS_PATH,
			TransportError::Status {
				status: 400,
				body: Some(body),
			},
		)
		.await;

	let result = harness
		.card
		.create_token_legacy(visa_input(), None)
		.await;

	assert_eq!(result, Err(expected));
	assert!(harness.transport.requests_to(CREDIT_CARD_TOKENS_PATH).await.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_legacy_validation_runs_first() {
	let harness = Harness::new();

	let result = harness
		.card
		.create_token_legacy(visa_input().with_amount(Decimal::new(-1, 0)), None)
		.await;

	assert!(result.unwrap_err().is_validation());
	assert_eq!(harness.transport.request_count().await, 0);
}
