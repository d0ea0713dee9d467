//! Error types for tokenization and authentication.

use cardgate_http::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message used when the gateway failed without a readable error body.
pub const GENERIC_SERVER_MESSAGE: &str = "Sorry, we had a problem processing your request.";
/// Message used when the tokenization endpoint failed without a reason.
pub const TOKENIZATION_SERVER_MESSAGE: &str =
	"Something unexpected happened, we are investigating this issue right now";

/// Payment workflow errors.
///
/// Every error is an ordinary return value; nothing here is retried.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaymentError {
	/// Input rejected before any network call
	#[error("{0}")]
	Validation(String),

	/// Card data rejected by the third-party tokenization endpoint
	#[error("{0}")]
	Tokenization(String),

	/// Structured error returned by the gateway, passed through as-is
	#[error("{message}")]
	Gateway { error_code: String, message: String },

	/// Transport failure or an error body that could not be read
	#[error("{0}")]
	Server(String),

	/// The challenge widget could not be loaded or driven
	#[error("{0}")]
	Widget(#[from] WidgetError),

	/// A bounded wait on the challenge widget ran out
	#[error("Timed out waiting for {stage}")]
	Timeout { stage: String },
}

impl PaymentError {
	/// Stable error code reported to callers.
	pub fn error_code(&self) -> &str {
		match self {
			PaymentError::Validation(_) => "VALIDATION_ERROR",
			PaymentError::Tokenization(_) => "TOKENIZATION_ERROR",
			PaymentError::Gateway { error_code, .. } => error_code,
			PaymentError::Server(_) => "SERVER_ERROR",
			PaymentError::Widget(_) => "AUTHENTICATION_ERROR",
			PaymentError::Timeout { .. } => "AUTHENTICATION_TIMEOUT",
		}
	}

	pub fn message(&self) -> String {
		self.to_string()
	}

	/// `{ error_code, message }` record.
	pub fn to_body(&self) -> ErrorBody {
		ErrorBody {
			error_code: self.error_code().to_string(),
			message: self.message(),
		}
	}

	pub fn is_validation(&self) -> bool {
		matches!(self, PaymentError::Validation(_))
	}

	/// Maps a failed gateway call.
	///
	/// A JSON object error body is passed through, with `SERVER_ERROR` and the
	/// generic message standing in for a missing `error_code` or `message`.
	/// Anything else becomes `SERVER_ERROR`.
	pub fn from_gateway(error: TransportError) -> Self {
		if let Some(body) = error.body().and_then(Value::as_object) {
			let error_code = body
				.get("error_code")
				.and_then(Value::as_str)
				.unwrap_or("SERVER_ERROR")
				.to_string();
			let message = body
				.get("message")
				.and_then(Value::as_str)
				.unwrap_or(GENERIC_SERVER_MESSAGE)
				.to_string();
			return PaymentError::Gateway {
				error_code,
				message,
			};
		}

		PaymentError::Server(GENERIC_SERVER_MESSAGE.to_string())
	}

	/// Maps a failed call to the third-party tokenization endpoint.
	///
	/// The endpoint reports `responseStatus.reason`; `VALIDATION_ERROR` passes
	/// through, any other reason is a tokenization error, and a missing reason
	/// is a server error.
	pub fn from_tokenization(error: TransportError) -> Self {
		let status = error.body().and_then(|body| body.get("responseStatus"));
		let Some(reason) = status
			.and_then(|status| status.get("reason"))
			.and_then(Value::as_str)
		else {
			return PaymentError::Server(TOKENIZATION_SERVER_MESSAGE.to_string());
		};

		let message = status
			.and_then(|status| status.get("message"))
			.and_then(Value::as_str)
			.unwrap_or(reason)
			.to_string();

		match reason {
			"VALIDATION_ERROR" => PaymentError::Validation(message),
			_ => PaymentError::Tokenization(message),
		}
	}
}

/// Serializable `{ error_code, message }` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	pub error_code: String,
	pub message: String,
}

/// Challenge widget failures.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
	#[error("Failed to load challenge script: {0}")]
	ScriptLoad(String),

	#[error("Challenge widget call failed: {0}")]
	Call(String),

	#[error("Challenge widget did not provide a session id")]
	MissingSessionId,

	#[error("Challenge widget dropped the '{0}' handler without firing it")]
	EventDropped(String),
}
