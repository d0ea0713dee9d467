//! Authenticated gateway client shared by the workflows.

use crate::types::{GENERIC_SERVER_MESSAGE, PaymentError};
use cardgate_conf::{ConfigurationProvider, Environment};
use cardgate_http::{
	CLIENT_TYPE_HEADER, CLIENT_VERSION_HEADER, GatewayRequest, Method, Transport, TransportError,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub const TOKENIZATION_CONFIGURATION_PATH: &str = "/credit_card_tokenization_configuration";
pub const CREDIT_CARD_TOKENS_PATH: &str = "/credit_card_tokens";
pub const CREDIT_CARD_TOKENS_V2_PATH: &str = "/v2/credit_card_tokens";

/// `/credit_card_tokens/{token_id}/authentications`
pub fn authentications_path(token_id: &str) -> String {
	format!("{}/{}/authentications", CREDIT_CARD_TOKENS_PATH, token_id)
}

/// `/credit_card_authentications/{authentication_id}/verification`
pub fn verification_path(authentication_id: &str) -> String {
	format!("/credit_card_authentications/{}/verification", authentication_id)
}

/// Builds gateway requests from the current configuration and sends them.
#[derive(Clone)]
pub struct GatewayClient {
	transport: Arc<dyn Transport>,
	config: Arc<dyn ConfigurationProvider>,
}

impl GatewayClient {
	pub fn new(transport: Arc<dyn Transport>, config: Arc<dyn ConfigurationProvider>) -> Self {
		Self { transport, config }
	}

	pub fn config(&self) -> &Arc<dyn ConfigurationProvider> {
		&self.config
	}

	pub fn environment(&self) -> Environment {
		self.config.environment()
	}

	/// Request against the configured base URL with the Basic auth and
	/// client headers set.
	pub fn request(&self, method: Method, path: &str) -> GatewayRequest {
		let url = format!("{}{}", self.config.base_url().trim_end_matches('/'), path);
		GatewayRequest::new(method, url)
			.basic_auth(&self.config.publishable_key())
			.header(CLIENT_TYPE_HEADER, self.config.client_type())
			.header(CLIENT_VERSION_HEADER, self.config.client_version())
	}

	/// Sends a gateway request, mapping failures with the gateway rules.
	pub async fn send<T: DeserializeOwned>(&self, request: GatewayRequest) -> Result<T, PaymentError> {
		let value = self.send_raw(request).await.map_err(PaymentError::from_gateway)?;
		decode(value)
	}

	/// Sends any request and hands back the raw transport result.
	pub async fn send_raw(&self, request: GatewayRequest) -> Result<Value, TransportError> {
		let path = request.path().to_string();
		let result = self.transport.send(request).await;
		if let Err(error) = &result {
			tracing::debug!(path = %path, status = ?error.status(), "gateway call failed");
		}
		result
	}
}

/// Deserializes a response body, treating an unexpected shape as a server error.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, PaymentError> {
	serde_json::from_value(value).map_err(|e| {
		tracing::warn!(error = %e, "unexpected gateway response shape");
		PaymentError::Server(GENERIC_SERVER_MESSAGE.to_string())
	})
}
