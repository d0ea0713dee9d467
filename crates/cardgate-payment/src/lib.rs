//! # Cardgate Payment
//!
//! Card tokenization and 3-D Secure authentication against the payment
//! gateway.
//!
//! - [`Card`]: caller entry point (create token, legacy create token,
//!   create authentication, validators)
//! - [`Tokenizer`] / [`Authenticator`]: the two workflows behind it
//! - [`ChallengeWidget`] / [`ChallengeScriptLoader`]: the third-party challenge
//!   widget seam used by 3DS2
//! - [`PaymentError`]: every failure, with a stable `error_code()`
//!
//! Errors are returned, never retried. Card numbers, CVNs and JWTs are never
//! logged.

pub mod authentication;
pub mod card;
pub mod gateway;
pub mod tokenization;
pub mod types;
pub mod validation;
pub mod widget;

pub use authentication::Authenticator;
pub use card::Card;
pub use gateway::GatewayClient;
pub use tokenization::Tokenizer;
pub use types::{
	AuthenticatedToken, AuthenticationPhase, AuthenticationRequest, AuthenticationResult,
	AuthenticationSession, AuthenticationStatus, CardInput, CreateTokenResponse, CreditCardToken,
	ErrorBody, GENERIC_SERVER_MESSAGE, PaymentError, TOKENIZATION_SERVER_MESSAGE,
	TokenizationConfiguration, TransactionMetadata, TransientToken, WidgetError,
};
pub use validation::{validate_authentication_request, validate_card_input};
pub use widget::{
	ChallengeData, ChallengeScriptLoader, ChallengeWidget, EventHandler, EventSubscription,
	OrderDetails, WidgetEvent, WidgetSession,
};

pub use rust_decimal::Decimal;
