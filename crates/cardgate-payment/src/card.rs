//! Caller-facing entry point.

use crate::authentication::Authenticator;
use crate::gateway::GatewayClient;
use crate::tokenization::Tokenizer;
use crate::types::{
	AuthenticationRequest, AuthenticationResult, CardInput, CreateTokenResponse, CreditCardToken,
	PaymentError, TransactionMetadata,
};
use crate::validation::validate_authentication_request;
use crate::widget::ChallengeScriptLoader;
use cardgate_card::CardBrand;
use cardgate_conf::ConfigurationProvider;
use cardgate_http::Transport;
use std::sync::Arc;

/// Card tokenization, 3DS authentication and card validation.
///
/// Cheap to clone; clones share the transport, configuration and challenge
/// lock.
///
/// # Examples
///
/// ```rust,ignore
/// use cardgate_conf::Settings;
/// use cardgate_http::ReqwestTransport;
/// use cardgate_payment::{Card, CardInput, Decimal};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = Settings::new("xnd_public_development_abc");
/// let transport = ReqwestTransport::new(Duration::from_secs(30))?;
/// let card = Card::new(Arc::new(transport), Arc::new(settings));
///
/// let input = CardInput::new("4000000000000002", "12", "2030")
///     .with_cvn("123")
///     .with_amount(Decimal::new(10000, 0));
/// let token = card.create_token(input).await?;
/// println!("token {}", token.id());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Card {
	tokenizer: Tokenizer,
	authenticator: Authenticator,
}

impl Card {
	/// Card without a challenge script loader. Tokens that require a 3DS2
	/// step-up fail with `AUTHENTICATION_ERROR`.
	pub fn new(transport: Arc<dyn Transport>, config: Arc<dyn ConfigurationProvider>) -> Self {
		Self::build(transport, config, None)
	}

	pub fn with_challenge_loader(
		transport: Arc<dyn Transport>,
		config: Arc<dyn ConfigurationProvider>,
		loader: Arc<dyn ChallengeScriptLoader>,
	) -> Self {
		Self::build(transport, config, Some(loader))
	}

	/// Copy of this card that drives the widget through `loader`.
	///
	/// The copy keeps this card's challenge lock, so its widget-driven
	/// attempts still run one at a time with those of this card and its clones.
	pub fn attach_challenge_loader(&self, loader: Arc<dyn ChallengeScriptLoader>) -> Self {
		let authenticator = self.authenticator.with_loader(loader);
		Self {
			tokenizer: self.tokenizer.with_authenticator(authenticator.clone()),
			authenticator,
		}
	}

	fn build(
		transport: Arc<dyn Transport>,
		config: Arc<dyn ConfigurationProvider>,
		loader: Option<Arc<dyn ChallengeScriptLoader>>,
	) -> Self {
		let gateway = GatewayClient::new(transport, config);
		let authenticator = Authenticator::new(gateway.clone(), loader);
		Self {
			tokenizer: Tokenizer::new(gateway, authenticator.clone()),
			authenticator,
		}
	}

	/// Validates the card and creates a token, stepping up inline when the
	/// gateway requires 3DS2.
	pub async fn create_token(&self, input: CardInput) -> Result<CreateTokenResponse, PaymentError> {
		self.tokenizer.create_token(&input).await
	}

	/// Validates the card and creates a token through the two-hop protocol.
	pub async fn create_token_legacy(
		&self,
		input: CardInput,
		metadata: Option<TransactionMetadata>,
	) -> Result<CreditCardToken, PaymentError> {
		self.tokenizer.create_token_legacy(&input, metadata).await
	}

	/// Authenticates an existing token.
	pub async fn create_authentication(
		&self,
		request: AuthenticationRequest,
	) -> Result<AuthenticationResult, PaymentError> {
		validate_authentication_request(&request)?;
		self.authenticator.authenticate(request).await
	}

	pub fn validate_card_number(&self, number: &str) -> bool {
		cardgate_card::is_card_number_valid(number)
	}

	pub fn validate_expiry(&self, month: &str, year: &str) -> bool {
		cardgate_card::is_expiration_valid(month, year)
	}

	pub fn validate_cvn(&self, cvn: Option<&str>) -> bool {
		cardgate_card::is_cvn_valid(cvn)
	}

	pub fn validate_cvn_for_card_type(&self, cvn: Option<&str>, number: &str) -> bool {
		cardgate_card::is_cvn_valid_for_brand(cvn, number)
	}

	pub fn card_brand(&self, number: &str) -> Option<CardBrand> {
		cardgate_card::classify(number)
	}
}
