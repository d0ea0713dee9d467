//! Authentication wire types and per-attempt session state.

use super::token::TransactionMetadata;
use cardgate_conf::Environment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Request for an explicit 3DS step-up against an existing token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationRequest {
	pub token_id: String,
	pub amount: Decimal,
	pub currency: Option<String>,
	/// Challenge JWT; selects the widget-driven 3DS2 path when present
	pub jwt: Option<String>,
	/// Environment the JWT was issued for; defaults to the configured one
	pub environment: Option<Environment>,
	pub transaction_metadata: Option<TransactionMetadata>,
}

impl AuthenticationRequest {
	pub fn new(token_id: impl Into<String>, amount: Decimal) -> Self {
		Self {
			token_id: token_id.into(),
			amount,
			currency: None,
			jwt: None,
			environment: None,
			transaction_metadata: None,
		}
	}

	pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
		self.currency = Some(currency.into());
		self
	}

	pub fn with_jwt(mut self, jwt: impl Into<String>) -> Self {
		self.jwt = Some(jwt.into());
		self
	}

	pub fn with_environment(mut self, environment: Environment) -> Self {
		self.environment = Some(environment);
		self
	}

	pub fn with_transaction_metadata(mut self, metadata: TransactionMetadata) -> Self {
		self.transaction_metadata = Some(metadata);
		self
	}

	/// The JWT when one was actually supplied.
	pub fn challenge_jwt(&self) -> Option<&str> {
		self.jwt.as_deref().filter(|jwt| !jwt.is_empty())
	}
}

/// Authentication status reported by the gateway.
///
/// Unknown statuses are preserved rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthenticationStatus {
	Verified,
	Failed,
	Pending,
	Other(String),
}

impl AuthenticationStatus {
	pub fn as_str(&self) -> &str {
		match self {
			AuthenticationStatus::Verified => "VERIFIED",
			AuthenticationStatus::Failed => "FAILED",
			AuthenticationStatus::Pending => "PENDING",
			AuthenticationStatus::Other(status) => status,
		}
	}

	/// `VERIFIED` and `FAILED` end an attempt without a challenge.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			AuthenticationStatus::Verified | AuthenticationStatus::Failed
		)
	}
}

impl From<String> for AuthenticationStatus {
	fn from(status: String) -> Self {
		match status.as_str() {
			"VERIFIED" => AuthenticationStatus::Verified,
			"FAILED" => AuthenticationStatus::Failed,
			"PENDING" => AuthenticationStatus::Pending,
			_ => AuthenticationStatus::Other(status),
		}
	}
}

impl From<AuthenticationStatus> for String {
	fn from(status: AuthenticationStatus) -> Self {
		match status {
			AuthenticationStatus::Other(status) => status,
			known => known.as_str().to_string(),
		}
	}
}

impl fmt::Display for AuthenticationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Authentication record returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationResult {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub credit_card_token_id: Option<String>,
	pub status: AuthenticationStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub masked_card_number: Option<String>,
	/// 3DS1 redirect target
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payer_authentication_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub acs_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pa_req: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authentication_transaction_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<Value>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Phase of one authentication attempt.
///
/// `Requested → WidgetSetup → ChallengePending → {Verified | Failed}`. The
/// no-JWT path goes straight from `Requested` to a terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticationPhase {
	Requested,
	WidgetSetup,
	ChallengePending,
	Verified,
	Failed,
}

impl AuthenticationPhase {
	pub fn as_str(&self) -> &'static str {
		match self {
			AuthenticationPhase::Requested => "REQUESTED",
			AuthenticationPhase::WidgetSetup => "WIDGET_SETUP",
			AuthenticationPhase::ChallengePending => "CHALLENGE_PENDING",
			AuthenticationPhase::Verified => "VERIFIED",
			AuthenticationPhase::Failed => "FAILED",
		}
	}

	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			AuthenticationPhase::Verified | AuthenticationPhase::Failed
		)
	}

	/// Whether `next` is a legal successor of this phase.
	pub fn can_transition_to(&self, next: AuthenticationPhase) -> bool {
		use AuthenticationPhase::*;
		matches!(
			(self, next),
			(Requested, WidgetSetup)
				| (Requested, Verified)
				| (Requested, Failed)
				| (WidgetSetup, ChallengePending)
				| (WidgetSetup, Verified)
				| (WidgetSetup, Failed)
				| (ChallengePending, Verified)
				| (ChallengePending, Failed)
		)
	}
}

impl fmt::Display for AuthenticationPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// State held for the duration of one authentication attempt.
///
/// Owned by the attempt that created it and dropped when the attempt ends.
#[derive(Clone, PartialEq)]
pub struct AuthenticationSession {
	pub token_id: String,
	pub amount: Decimal,
	pub currency: Option<String>,
	pub jwt: Option<String>,
	pub environment: Environment,
	pub widget_session_id: Option<String>,
	pub authentication_id: Option<String>,
	pub acs_url: Option<String>,
	pub pa_req: Option<String>,
	pub transaction_id: Option<String>,
	phase: AuthenticationPhase,
}

impl AuthenticationSession {
	pub fn new(request: &AuthenticationRequest, environment: Environment) -> Self {
		Self {
			token_id: request.token_id.clone(),
			amount: request.amount,
			currency: request.currency.clone(),
			jwt: request.challenge_jwt().map(str::to_string),
			environment,
			widget_session_id: None,
			authentication_id: None,
			acs_url: None,
			pa_req: None,
			transaction_id: None,
			phase: AuthenticationPhase::Requested,
		}
	}

	pub fn phase(&self) -> AuthenticationPhase {
		self.phase
	}

	/// Moves to `next`. Returns `false`, leaving the phase unchanged, when the
	/// move is not a legal transition.
	pub fn advance(&mut self, next: AuthenticationPhase) -> bool {
		if !self.phase.can_transition_to(next) {
			return false;
		}
		self.phase = next;
		true
	}

	/// Records the challenge fields of a pending authentication.
	pub fn record_authentication(&mut self, authentication: &AuthenticationResult) {
		self.authentication_id = Some(authentication.id.clone());
		self.acs_url = authentication.acs_url.clone();
		self.pa_req = authentication.pa_req.clone();
		self.transaction_id = authentication.authentication_transaction_id.clone();
	}

	/// Terminal phase matching a gateway status.
	pub fn terminal_phase_for(status: &AuthenticationStatus) -> AuthenticationPhase {
		match status {
			AuthenticationStatus::Verified => AuthenticationPhase::Verified,
			_ => AuthenticationPhase::Failed,
		}
	}
}

impl fmt::Debug for AuthenticationSession {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AuthenticationSession")
			.field("token_id", &self.token_id)
			.field("amount", &self.amount)
			.field("currency", &self.currency)
			.field("jwt", &self.jwt.as_ref().map(|_| "***"))
			.field("environment", &self.environment)
			.field("widget_session_id", &self.widget_session_id)
			.field("authentication_id", &self.authentication_id)
			.field("transaction_id", &self.transaction_id)
			.field("phase", &self.phase)
			.finish()
	}
}
