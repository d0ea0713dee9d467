//! Card tokenization.
//!
//! Two protocols share the validation gate:
//!
//! - direct: one POST to `/v2/credit_card_tokens`, followed by an inline 3DS2
//!   step-up when the gateway returns a challenge JWT
//! - legacy: fetch the tokenization configuration, obtain a transient token
//!   from the third-party tokenization endpoint, then exchange it for a
//!   gateway token

use crate::authentication::Authenticator;
use crate::gateway::{
	CREDIT_CARD_TOKENS_PATH, CREDIT_CARD_TOKENS_V2_PATH, GatewayClient, TOKENIZATION_CONFIGURATION_PATH,
	decode,
};
use crate::types::{
	AuthenticatedToken, AuthenticationRequest, CardInput, CreateTokenResponse, CreditCardToken,
	PaymentError, TokenizationConfiguration, TransactionMetadata, TransientToken, amount_to_json,
};
use crate::validation::validate_card_input;
use cardgate_card::CardBrand;
use cardgate_http::{FOR_USER_ID_HEADER, GatewayRequest, Method};
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

/// Runs both tokenization protocols.
#[derive(Clone)]
pub struct Tokenizer {
	gateway: GatewayClient,
	authenticator: Authenticator,
}

impl Tokenizer {
	pub fn new(gateway: GatewayClient, authenticator: Authenticator) -> Self {
		Self {
			gateway,
			authenticator,
		}
	}

	pub fn with_authenticator(&self, authenticator: Authenticator) -> Self {
		Self {
			gateway: self.gateway.clone(),
			authenticator,
		}
	}

	/// Creates a token with a single gateway call.
	///
	/// When the gateway answers with a challenge JWT the step-up runs before
	/// this returns, and the result is the authentication reshaped as an
	/// [`AuthenticatedToken`]. Otherwise the gateway response is returned
	/// unchanged.
	pub async fn create_token(&self, input: &CardInput) -> Result<CreateTokenResponse, PaymentError> {
		let brand = validate_card_input(input)?;

		tracing::info!(
			brand = %brand,
			multiple_use = input.is_multiple_use,
			should_authenticate = input.should_authenticate,
			"creating credit card token"
		);

		let request = self.on_behalf_of(
			self.gateway
				.request(Method::POST, CREDIT_CARD_TOKENS_V2_PATH)
				.json(direct_token_body(input)),
			input,
		);
		let token: CreditCardToken = self.gateway.send(request).await?;

		tracing::info!(
			token_id = %token.id,
			status = token.status.as_deref().unwrap_or_default(),
			masked_card_number = token.masked_card_number.as_deref().unwrap_or_default(),
			"credit card token created"
		);

		let Some(jwt) = token.three_ds2_jwt() else {
			return Ok(CreateTokenResponse::Token(token));
		};

		let environment = token
			.parsed_environment()
			.unwrap_or_else(|| self.gateway.environment());
		let amount = input
			.amount
			.filter(|amount| !amount.is_sign_negative())
			.unwrap_or(Decimal::ZERO);

		let mut step_up = AuthenticationRequest::new(token.id.clone(), amount)
			.with_jwt(jwt)
			.with_environment(environment);
		step_up.currency = input.currency.clone();

		tracing::info!(token_id = %token.id, environment = %environment, "token requires 3DS2 step-up");

		let authentication = self.authenticator.authenticate(step_up).await?;
		Ok(CreateTokenResponse::Authenticated(
			AuthenticatedToken::from_authentication(authentication, &token),
		))
	}

	/// Creates a token through the two-hop legacy protocol.
	///
	/// When `metadata` is supplied it is forwarded with the card's processor
	/// brand code and the configured device fingerprint id added.
	pub async fn create_token_legacy(
		&self,
		input: &CardInput,
		metadata: Option<TransactionMetadata>,
	) -> Result<CreditCardToken, PaymentError> {
		let brand = validate_card_input(input)?;

		tracing::info!(brand = %brand, "creating credit card token via tokenization endpoint");

		let configuration: TokenizationConfiguration = self
			.gateway
			.send(
				self.gateway
					.request(Method::GET, TOKENIZATION_CONFIGURATION_PATH),
			)
			.await?;

		let transient = self.tokenize_card(&configuration, input, brand).await?;

		let metadata = metadata.map(|metadata| self.enrich_metadata(metadata, brand));
		let request = self.on_behalf_of(
			self.gateway
				.request(Method::POST, CREDIT_CARD_TOKENS_PATH)
				.json(legacy_token_body(input, &transient.token, metadata)),
			input,
		);

		let token: CreditCardToken = self.gateway.send(request).await?;
		tracing::info!(token_id = %token.id, "credit card token created");
		Ok(token)
	}

	/// Exchanges card data for a transient token at the third-party endpoint.
	///
	/// That endpoint takes no gateway credentials.
	async fn tokenize_card(
		&self,
		configuration: &TokenizationConfiguration,
		input: &CardInput,
		brand: CardBrand,
	) -> Result<TransientToken, PaymentError> {
		let environment = self.gateway.environment();
		let url = configuration.tokens_url(environment);

		tracing::debug!(environment = %environment, "requesting transient token");

		let request = GatewayRequest::post(url).json(json!({
			"keyId": configuration.tokenization_auth_key_id,
			"cardInfo": {
				"cardNumber": input.number,
				"cardExpirationMonth": input.exp_month,
				"cardExpirationYear": input.exp_year,
				"cardType": brand.processor_code(),
			}
		}));

		let value = self
			.gateway
			.send_raw(request)
			.await
			.map_err(PaymentError::from_tokenization)?;
		decode(value)
	}

	fn enrich_metadata(&self, mut metadata: TransactionMetadata, brand: CardBrand) -> TransactionMetadata {
		metadata.insert(
			"credit_card_type".to_string(),
			Value::from(brand.processor_code()),
		);
		if let Some(fingerprint) = self.gateway.config().device_fingerprint_id() {
			metadata.insert("device_fingerprint_id".to_string(), Value::from(fingerprint));
		}
		metadata
	}

	fn on_behalf_of(&self, request: GatewayRequest, input: &CardInput) -> GatewayRequest {
		match input.on_behalf_of.as_deref().filter(|id| !id.is_empty()) {
			Some(user_id) => request.header(FOR_USER_ID_HEADER, user_id),
			None => request,
		}
	}
}

fn direct_token_body(input: &CardInput) -> Value {
	let mut card_data = Map::new();
	card_data.insert("account_number".to_string(), Value::from(input.number.as_str()));
	card_data.insert("exp_month".to_string(), Value::from(input.exp_month.as_str()));
	card_data.insert("exp_year".to_string(), Value::from(input.exp_year.as_str()));
	if let Some(cvn) = input.provided_cvn() {
		card_data.insert("cvn".to_string(), Value::from(cvn));
	}

	let mut body = Map::new();
	body.insert("is_single_use".to_string(), Value::Bool(!input.is_multiple_use));
	body.insert("card_data".to_string(), Value::Object(card_data));
	body.insert(
		"should_authenticate".to_string(),
		Value::Bool(input.should_authenticate),
	);
	insert_amount_and_cvn(&mut body, input);
	Value::Object(body)
}

fn legacy_token_body(
	input: &CardInput,
	transient_token: &str,
	metadata: Option<TransactionMetadata>,
) -> Value {
	let mut body = Map::new();
	body.insert(
		"is_authentication_bundled".to_string(),
		Value::Bool(!input.is_multiple_use),
	);
	body.insert("credit_card_token".to_string(), Value::from(transient_token));
	body.insert(
		"should_authenticate".to_string(),
		Value::Bool(input.should_authenticate),
	);
	insert_amount_and_cvn(&mut body, input);
	if let Some(metadata) = metadata {
		body.insert("transaction_metadata".to_string(), Value::Object(metadata));
	}
	Value::Object(body)
}

fn insert_amount_and_cvn(body: &mut Map<String, Value>, input: &CardInput) {
	if let Some(amount) = input.amount {
		body.insert("amount".to_string(), amount_to_json(amount));
	}
	if let Some(cvn) = input.provided_cvn() {
		body.insert("card_cvn".to_string(), Value::from(cvn));
	}
}
