//! Direct token creation against a scripted gateway.

mod common;

use cardgate_conf::Environment;
use cardgate_http::{CLIENT_TYPE_HEADER, FOR_USER_ID_HEADER, Method, TransportError, basic_auth_header};
use cardgate_payment::gateway::{CREDIT_CARD_TOKENS_V2_PATH, authentications_path, verification_path};
use cardgate_payment::{CardInput, CreateTokenResponse, Decimal, PaymentError};
use common::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test]
async fn test_negative_amount_is_rejected_without_network_call() {
	// Arrange
	let harness = Harness::new();
	let input = visa_input().with_amount(Decimal::new(-1, 0));

	// Act
	let result = harness.card.create_token(input).await;

	// Assert
	let error = result.unwrap_err();
	assert_eq!(error.error_code(), "VALIDATION_ERROR");
	assert_eq!(error.message(), "Amount must be a number equal or greater than 0");
	assert_eq!(harness.transport.request_count().await, 0);
}

#[rstest]
#[case(CardInput::new("4000000000000001", "12", "2030"), "Card number is invalid")]
#[case(CardInput::new(VISA, "0", "2030"), "Card expiration date is invalid")]
#[case(CardInput::new(VISA, "12", "2030").with_cvn("1x3"), "Card CVN is invalid")]
#[case(CardInput::new(VISA, "12", "2030").with_cvn("1234"), "Card CVN is invalid for this card type")]
#[tokio::test]
async fn test_invalid_card_never_reaches_gateway(#[case] input: CardInput, #[case] message: &str) {
	let harness = Harness::new();

	let result = harness
		.card
		.create_token(input.with_amount(Decimal::ONE))
		.await;

	assert_eq!(result, Err(PaymentError::Validation(message.to_string())));
	assert_eq!(harness.transport.request_count().await, 0);
}

#[rstest]
#[tokio::test]
async fn test_token_without_jwt_is_returned_unchanged() {
	// Arrange
	let harness = Harness::new();
	let body = token_body("tok_1");
	harness
		.transport
		.respond(Method::POST, CREDIT_CARD_TOKENS_V2_PATH, body.clone())
		.await;

	// Act
	let response = harness.card.create_token(visa_input()).await.unwrap();

	// Assert
	assert!(!response.is_authenticated());
	assert_eq!(response.id(), "tok_1");
	let mut expected = body;
	expected.as_object_mut().unwrap().remove("authentication_id");
	assert_eq!(serde_json::to_value(&response).unwrap(), expected);
	assert!(harness.loader.loads().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_direct_request_shape() {
	let harness = Harness::new();
	harness
		.transport
		.respond(Method::POST, CREDIT_CARD_TOKENS_V2_PATH, token_body("tok_1"))
		.await;

	harness.card.create_token(visa_input()).await.unwrap();

	let requests = harness.transport.requests().await;
	assert_eq!(requests.len(), 1);
	let request = &requests[0];
	assert_eq!(request.method, Method::POST);
	assert_eq!(request.url, format!("{}{}", BASE_URL, CREDIT_CARD_TOKENS_V2_PATH));
	assert_eq!(
		request.header_value("Authorization"),
		Some(basic_auth_header(DEVELOPMENT_KEY).as_str())
	);
	assert_eq!(request.header_value(CLIENT_TYPE_HEADER), Some("CARDGATE_RS"));
	assert_eq!(request.header_value(FOR_USER_ID_HEADER), None);
	assert_eq!(
		request.body,
		Some(json!({
			"is_single_use": true,
			"card_data": {
				"account_number": VISA,
				"exp_month": "12",
				"exp_year": "2030",
				"cvn": "123"
			},
			"should_authenticate": true,
			"amount": 10000,
			"card_cvn": "123"
		}))
	);
}

#[rstest]
#[tokio::test]
async fn test_on_behalf_of_sets_header() {
	let harness = Harness::new();
	harness
		.transport
		.respond(Method::POST, CREDIT_CARD_TOKENS_V2_PATH, token_body("tok_1"))
		.await;

	harness
		.card
		.create_token(visa_input().on_behalf_of("sub_account_1"))
		.await
		.unwrap();

	let requests = harness.transport.requests().await;
	assert_eq!(requests[0].header_value(FOR_USER_ID_HEADER), Some("sub_account_1"));
}

#[rstest]
#[tokio::test]
async fn test_jwt_triggers_one_authentication_and_reshapes_result() {
	// Arrange
	let harness = Harness::new();
	harness
		.transport
		.respond(
			Method::POST,
			CREDIT_CARD_TOKENS_V2_PATH,
			token_body_with_jwt("tok_original", "DEVELOPMENT"),
		)
		.await;
	harness
		.transport
		.respond(
			Method::POST,
			&authentications_path("tok_original"),
			authentication("auth_1", "tok_from_authentication", "VERIFIED"),
		)
		.await;

	// Act
	let response = harness.card.create_token(visa_input()).await.unwrap();

	// Assert
	let CreateTokenResponse::Authenticated(token) = response else {
		panic!("expected an authenticated token");
	};
	assert_eq!(token.id, "tok_from_authentication");
	assert_eq!(token.authentication_id, "auth_1");
	assert_eq!(token.masked_card_number.as_deref(), Some("400000XXXXXX0002"));
	assert_eq!(token.status.as_str(), "VERIFIED");
	assert_eq!(token.metadata, Some(json!({"eci": "05"})));
	assert_eq!(
		harness
			.transport
			.requests_to(&authentications_path("tok_original"))
			.await
			.len(),
		1
	);
	assert_eq!(harness.transport.request_count().await, 2);
}

#[rstest]
#[tokio::test]
async fn test_inline_step_up_runs_full_challenge() {
	// Arrange
	let harness = Harness::new();
	harness
		.transport
		.respond(
			Method::POST,
			CREDIT_CARD_TOKENS_V2_PATH,
			token_body_with_jwt("tok_1", "DEVELOPMENT"),
		)
		.await;
	harness
		.transport
		.respond(
			Method::POST,
			&authentications_path("tok_1"),
			pending_authentication("auth_1", "tok_1"),
		)
		.await;
	harness
		.transport
		.respond(
			Method::POST,
			&verification_path("auth_1"),
			authentication("auth_1", "tok_1", "VERIFIED"),
		)
		.await;

	// Act
	let response = harness
		.card
		.create_token(visa_input().with_currency("IDR"))
		.await
		.unwrap();

	// Assert
	assert!(response.is_authenticated());
	assert_eq!(response.status(), Some("VERIFIED"));
	let verification = harness.transport.requests_to(&verification_path("auth_1")).await;
	assert_eq!(verification.len(), 1);
	assert_eq!(
		verification[0].body,
		Some(json!({"authentication_transaction_id": "txn_123"}))
	);
	let create = harness.transport.requests_to(&authentications_path("tok_1")).await;
	let body = create[0].body.as_ref().unwrap();
	assert_eq!(body["amount"], json!(10000));
	assert_eq!(body["currency"], json!("IDR"));
}

#[rstest]
#[tokio::test]
async fn test_token_environment_tag_selects_challenge_script() {
	let harness = Harness::new();
	harness
		.transport
		.respond(
			Method::POST,
			CREDIT_CARD_TOKENS_V2_PATH,
			token_body_with_jwt("tok_1", "production"),
		)
		.await;
	harness
		.transport
		.respond(
			Method::POST,
			&authentications_path("tok_1"),
			authentication("auth_1", "tok_1", "VERIFIED"),
		)
		.await;

	harness.card.create_token(visa_input()).await.unwrap();

	assert_eq!(harness.loader.loads(), vec![Environment::Production]);
}

#[rstest]
#[tokio::test]
async fn test_unknown_environment_tag_falls_back_to_key() {
	let harness = Harness::new();
	harness
		.transport
		.respond(
			Method::POST,
			CREDIT_CARD_TOKENS_V2_PATH,
			token_body_with_jwt("tok_1", "somewhere"),
		)
		.await;
	harness
		.transport
		.respond(
			Method::POST,
			&authentications_path("tok_1"),
			authentication("auth_1", "tok_1", "FAILED"),
		)
		.await;

	let response = harness.card.create_token(visa_input()).await.unwrap();

	assert_eq!(response.status(), Some("FAILED"));
	assert_eq!(harness.loader.loads(), vec![Environment::Development]);
}

#[rstest]
#[tokio::test]
async fn test_inline_amount_defaults_to_zero() {
	let harness = Harness::new();
	harness
		.transport
		.respond(
			Method::POST,
			CREDIT_CARD_TOKENS_V2_PATH,
			token_body_with_jwt("tok_1", "DEVELOPMENT"),
		)
		.await;
	harness
		.transport
		.respond(
			Method::POST,
			&authentications_path("tok_1"),
			authentication("auth_1", "tok_1", "VERIFIED"),
		)
		.await;
	let input = CardInput::new(VISA, "12", "2030").multiple_use(true);

	harness.card.create_token(input).await.unwrap();

	let token_request = &harness.transport.requests_to(CREDIT_CARD_TOKENS_V2_PATH).await[0];
	assert!(token_request.body.as_ref().unwrap().get("amount").is_none());
	let auth_request = &harness.transport.requests_to(&authentications_path("tok_1")).await[0];
	assert_eq!(auth_request.body.as_ref().unwrap()["amount"], json!(0));
}

#[rstest]
#[tokio::test]
async fn test_jwt_without_loader_is_authentication_error() {
	let harness = Harness::without_loader();
	harness
		.transport
		.respond(
			Method::POST,
			CREDIT_CARD_TOKENS_V2_PATH,
			token_body_with_jwt("tok_1", "DEVELOPMENT"),
		)
		.await;

	let error = harness.card.create_token(visa_input()).await.unwrap_err();

	assert_eq!(error.error_code(), "AUTHENTICATION_ERROR");
	assert_eq!(harness.transport.request_count().await, 1);
}

#[rstest]
#[tokio::test]
async fn test_structured_gateway_error_passes_through() {
	let harness = Harness::new();
	harness
		.transport
		.respond_error(
			Method::POST,
			CREDIT_CARD_TOKENS_V2_PATH,
			TransportError::Status {
				status: 400,
				body: Some(json!({
					"error_code": "API_VALIDATION_ERROR",
					"message": "card_data.exp_year is invalid"
				})),
			},
		)
		.await;

	let error = harness.card.create_token(visa_input()).await.unwrap_err();

	assert_eq!(
		error.to_body(),
		cardgate_payment::ErrorBody {
			error_code: "API_VALIDATION_ERROR".to_string(),
			message: "card_data.exp_year is invalid".to_string(),
		}
	);
}

#[rstest]
#[tokio::test]
async fn test_gateway_message_without_error_code_is_kept() {
	// Arrange
	let harness = Harness::new();
	harness
		.transport
		.respond_error(
			Method::POST,
			CREDIT_CARD_TOKENS_V2_PATH,
			TransportError::Status {
				status: 400,
				body: Some(json!({"message": "Amount is below the minimum"})),
			},
		)
		.await;

	// Act
	let error = harness.card.create_token(visa_input()).await.unwrap_err();

	// Assert
	assert_eq!(
		error.to_body(),
		cardgate_payment::ErrorBody {
			error_code: "SERVER_ERROR".to_string(),
			message: "Amount is below the minimum".to_string(),
		}
	);
}

#[rstest]
#[case(TransportError::Status { status: 502, body: None })]
#[case(TransportError::Network("connection reset".to_string()))]
#[tokio::test]
async fn test_unstructured_failure_is_server_error(#[case] failure: TransportError) {
	let harness = Harness::new();
	harness
		.transport
		.respond_error(Method::POST, CREDIT_CARD_TOKENS_V2_PATH, failure)
		.await;

	let error = harness.card.create_token(visa_input()).await.unwrap_err();

	assert_eq!(error.error_code(), "SERVER_ERROR");
	assert_eq!(error.message(), "Sorry, we had a problem processing your request.");
}

#[rstest]
#[tokio::test]
async fn test_logs_never_contain_card_data() {
	// Arrange
	let (logs, _guard) = capture_logs();
	let harness = Harness::new();
	harness
		.transport
		.respond(
			Method::POST,
			CREDIT_CARD_TOKENS_V2_PATH,
			token_body_with_jwt("tok_1", "DEVELOPMENT"),
		)
		.await;
	harness
		.transport
		.respond(
			Method::POST,
			&authentications_path("tok_1"),
			authentication("auth_1", "tok_1", "VERIFIED"),
		)
		.await;

	// Act
	harness.card.create_token(visa_input()).await.unwrap();

	// Assert
	let lines = logs.lines();
	assert!(logs.contains("creating credit card token"), "got {:?}", lines);
	assert!(logs.contains("token requires 3DS2 step-up"), "got {:?}", lines);
	assert!(lines.iter().all(|line| !line.contains(VISA)));
	assert!(lines.iter().all(|line| !line.contains("eyJhbGciOiJIUzI1NiJ9")));
}
