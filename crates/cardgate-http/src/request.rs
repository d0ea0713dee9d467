//! Outgoing request description.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::Method;
use serde_json::Value;

/// Content type sent with every request.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
/// Header carrying the client type.
pub const CLIENT_TYPE_HEADER: &str = "x-client-type";
/// Header carrying the client version.
pub const CLIENT_VERSION_HEADER: &str = "x-client-version";
/// Header naming the sub-account a request is made on behalf of.
pub const FOR_USER_ID_HEADER: &str = "for-user-id";

/// Builds the Basic authorization value for a publishable key.
///
/// The key is the username and the password is empty.
///
/// ```
/// use cardgate_http::basic_auth_header;
///
/// assert_eq!(basic_auth_header("key"), "Basic a2V5Og==");
/// ```
pub fn basic_auth_header(publishable_key: &str) -> String {
	format!("Basic {}", STANDARD.encode(format!("{}:", publishable_key)))
}

/// A single HTTP request with an optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
	pub method: Method,
	pub url: String,
	pub headers: Vec<(String, String)>,
	pub body: Option<Value>,
}

impl GatewayRequest {
	pub fn new(method: Method, url: impl Into<String>) -> Self {
		Self {
			method,
			url: url.into(),
			headers: Vec::new(),
			body: None,
		}
	}

	pub fn get(url: impl Into<String>) -> Self {
		Self::new(Method::GET, url)
	}

	pub fn post(url: impl Into<String>) -> Self {
		Self::new(Method::POST, url)
	}

	/// Adds a header, replacing an earlier one with the same name.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let name = name.into();
		self.headers
			.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
		self.headers.push((name, value.into()));
		self
	}

	pub fn basic_auth(self, publishable_key: &str) -> Self {
		self.header("Authorization", basic_auth_header(publishable_key))
	}

	pub fn json(mut self, body: Value) -> Self {
		self.body = Some(body);
		self
	}

	/// Looks up a header value by case-insensitive name.
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(existing, _)| existing.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Path portion of the URL, without scheme, host or query.
	pub fn path(&self) -> &str {
		let without_scheme = self
			.url
			.split_once("://")
			.map(|(_, rest)| rest)
			.unwrap_or(&self.url);
		let path = without_scheme
			.find('/')
			.map(|index| &without_scheme[index..])
			.unwrap_or("/");
		path.split('?').next().unwrap_or(path)
	}
}
