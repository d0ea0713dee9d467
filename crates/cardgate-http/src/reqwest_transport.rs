//! reqwest-backed transport.

use crate::request::{GatewayRequest, JSON_CONTENT_TYPE};
use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// [`Transport`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	client: reqwest::Client,
}

impl ReqwestTransport {
	/// Creates a transport whose requests time out after `timeout`.
	pub fn new(timeout: Duration) -> Result<Self, TransportError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| TransportError::Network(format!("Failed to create client: {}", e)))?;

		Ok(Self { client })
	}

	/// Wraps an existing client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl Transport for ReqwestTransport {
	async fn send(&self, request: GatewayRequest) -> Result<Value, TransportError> {
		let GatewayRequest {
			method,
			url,
			headers,
			body,
		} = request;

		tracing::debug!(%method, %url, "sending gateway request");

		let mut builder = self
			.client
			.request(method, &url)
			.header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE);

		for (name, value) in &headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		if let Some(body) = &body {
			let payload = serde_json::to_vec(body)
				.map_err(|e| TransportError::Decode(format!("Failed to encode body: {}", e)))?;
			builder = builder.body(payload);
		}

		let response = builder
			.send()
			.await
			.map_err(|e| TransportError::Network(format!("Request failed: {}", e)))?;

		let status = response.status();
		let bytes = response
			.bytes()
			.await
			.map_err(|e| TransportError::Network(format!("Failed to read response: {}", e)))?;

		if !status.is_success() {
			let body = serde_json::from_slice::<Value>(&bytes).ok();
			tracing::warn!(
				status = status.as_u16(),
				structured = body.is_some(),
				"gateway request failed"
			);
			return Err(TransportError::Status {
				status: status.as_u16(),
				body,
			});
		}

		serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
	}
}
