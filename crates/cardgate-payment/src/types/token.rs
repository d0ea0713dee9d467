//! Tokenization wire types.

use super::authentication::{AuthenticationResult, AuthenticationStatus};
use cardgate_conf::Environment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied metadata forwarded on legacy token creation.
pub type TransactionMetadata = Map<String, Value>;

/// Credit card token created by the gateway.
///
/// Fields the gateway sends beyond the ones named here are kept in `extra`,
/// so serializing the token reproduces the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCardToken {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub masked_card_number: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authentication_id: Option<String>,
	/// Present only when the gateway requires a 3DS2 step-up
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub jwt: Option<String>,
	/// Environment tag that goes with `jwt`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub environment: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl CreditCardToken {
	/// The challenge JWT, when the gateway asked for a 3DS2 step-up.
	pub fn three_ds2_jwt(&self) -> Option<&str> {
		self.jwt.as_deref().filter(|jwt| !jwt.is_empty())
	}

	pub fn requires_3ds2(&self) -> bool {
		self.three_ds2_jwt().is_some()
	}

	/// Environment tag parsed leniently; `None` when absent or unrecognised.
	pub fn parsed_environment(&self) -> Option<Environment> {
		self.environment.as_deref().and_then(|tag| tag.parse().ok())
	}
}

/// Token reshaped after an inline 3DS2 step-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedToken {
	/// Token id as reported by the authentication record
	pub id: String,
	pub authentication_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub masked_card_number: Option<String>,
	pub status: AuthenticationStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<Value>,
}

impl AuthenticatedToken {
	/// Builds the canonical shape from the authentication and its source token.
	///
	/// Ids come from the authentication record; the token only fills in a
	/// masked number the authentication lacks.
	pub fn from_authentication(authentication: AuthenticationResult, token: &CreditCardToken) -> Self {
		Self {
			id: authentication
				.credit_card_token_id
				.unwrap_or_else(|| token.id.clone()),
			authentication_id: authentication.id,
			masked_card_number: authentication
				.masked_card_number
				.or_else(|| token.masked_card_number.clone()),
			status: authentication.status,
			metadata: authentication.metadata,
		}
	}
}

/// Outcome of direct token creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreateTokenResponse {
	/// Gateway response, unchanged
	Token(CreditCardToken),
	/// Result of the inline 3DS2 step-up
	Authenticated(AuthenticatedToken),
}

impl CreateTokenResponse {
	pub fn id(&self) -> &str {
		match self {
			CreateTokenResponse::Token(token) => &token.id,
			CreateTokenResponse::Authenticated(token) => &token.id,
		}
	}

	pub fn status(&self) -> Option<&str> {
		match self {
			CreateTokenResponse::Token(token) => token.status.as_deref(),
			CreateTokenResponse::Authenticated(token) => Some(token.status.as_str()),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		matches!(self, CreateTokenResponse::Authenticated(_))
	}
}

/// Environment-scoped endpoints for the legacy tokenization hop.
///
/// Fetched once per attempt and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizationConfiguration {
	pub flex_production_url: String,
	pub flex_development_url: String,
	pub tokenization_auth_key_id: String,
}

impl TokenizationConfiguration {
	/// Tokenization endpoint for `environment`.
	pub fn tokens_url(&self, environment: Environment) -> String {
		let base = match environment {
			Environment::Production => &self.flex_production_url,
			Environment::Development => &self.flex_development_url,
		};
		format!("{}/cybersource/flex/v1/tokens", base.trim_end_matches('/'))
	}
}

/// Transient token issued by the third-party tokenization endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientToken {
	pub token: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
