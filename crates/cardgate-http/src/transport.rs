//! Transport contract.

use crate::request::GatewayRequest;
use async_trait::async_trait;
use serde_json::Value;

/// Transport failures, normalized across implementations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
	/// The request never produced a response (DNS, connect, timeout, TLS)
	#[error("Network error: {0}")]
	Network(String),

	/// Non-2xx response. `body` holds the parsed JSON error body when the
	/// response carried one.
	#[error("Request failed with status {status}")]
	Status { status: u16, body: Option<Value> },

	/// 2xx response whose body was not valid JSON
	#[error("Failed to parse response: {0}")]
	Decode(String),
}

impl TransportError {
	/// The structured error body, if the gateway sent one.
	pub fn body(&self) -> Option<&Value> {
		match self {
			TransportError::Status { body, .. } => body.as_ref(),
			_ => None,
		}
	}

	pub fn status(&self) -> Option<u16> {
		match self {
			TransportError::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Sends one request and returns the parsed JSON body.
///
/// Implementations issue exactly one request per call; no retries.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, request: GatewayRequest) -> Result<Value, TransportError>;
}
