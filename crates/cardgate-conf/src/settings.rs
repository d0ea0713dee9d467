//! Gateway settings
//!
//! Configure once, then share the value with every workflow:
//!
//! ```
//! use std::time::Duration;
//! use cardgate_conf::Settings;
//!
//! let settings = Settings::new("xnd_public_production_abc")
//!     .with_device_fingerprint_id("fp_123")
//!     .with_request_timeout(Duration::from_secs(10));
//!
//! assert!(settings.validate().is_ok());
//! ```

use crate::env::{Env, EnvError};
use crate::provider::ConfigurationProvider;
use std::time::Duration;

/// Production gateway base URL
pub const PRODUCTION_BASE_URL: &str = "https://api.xendit.co";
/// Staging gateway base URL
pub const STAGING_BASE_URL: &str = "https://api-staging.xendit.co";
/// Client type reported in request headers and authentication bodies
pub const DEFAULT_CLIENT_TYPE: &str = "CARDGATE_RS";

const ENV_PREFIX: &str = "CARDGATE_";

/// Configuration errors
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Publishable key must not be empty")]
	EmptyPublishableKey,

	#[error("Invalid base URL '{url}': {reason}")]
	InvalidBaseUrl { url: String, reason: String },

	#[error("Environment error: {0}")]
	Env(#[from] EnvError),
}

/// Timing limits for the challenge widget.
///
/// Every wait on the third-party widget is bounded; none of them retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeSettings {
	/// Upper bound for loading the challenge script
	pub script_load_timeout: Duration,
	/// Upper bound for the one-shot "setup complete" event
	pub setup_timeout: Duration,
	/// Upper bound for the one-shot "validated" event (the cardholder is typing here)
	pub challenge_timeout: Duration,
	/// Pause after the bin probe before the widget session id is read
	pub bin_settle_delay: Duration,
}

impl Default for ChallengeSettings {
	fn default() -> Self {
		Self {
			script_load_timeout: Duration::from_secs(30),
			setup_timeout: Duration::from_secs(30),
			challenge_timeout: Duration::from_secs(600),
			bin_settle_delay: Duration::from_millis(1000),
		}
	}
}

/// Gateway client settings
#[derive(Clone)]
pub struct Settings {
	/// Publishable (public) API key
	pub publishable_key: String,
	/// Gateway base URL, without trailing slash
	pub base_url: String,
	/// Device fingerprint id attached to legacy tokenization metadata
	pub device_fingerprint_id: Option<String>,
	/// Client type reported to the gateway
	pub client_type: String,
	/// Client version reported to the gateway
	pub client_version: String,
	/// Per-request HTTP timeout
	pub request_timeout: Duration,
	/// Challenge widget timing
	pub challenge: ChallengeSettings,
}

impl std::fmt::Debug for Settings {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Settings")
			.field("publishable_key", &"[REDACTED]")
			.field("base_url", &self.base_url)
			.field("device_fingerprint_id", &self.device_fingerprint_id)
			.field("client_type", &self.client_type)
			.field("client_version", &self.client_version)
			.field("request_timeout", &self.request_timeout)
			.field("challenge", &self.challenge)
			.finish()
	}
}

impl Settings {
	/// Settings for `publishable_key` against the production gateway.
	pub fn new(publishable_key: impl Into<String>) -> Self {
		Self {
			publishable_key: publishable_key.into(),
			base_url: PRODUCTION_BASE_URL.to_string(),
			device_fingerprint_id: None,
			client_type: DEFAULT_CLIENT_TYPE.to_string(),
			client_version: env!("CARGO_PKG_VERSION").to_string(),
			request_timeout: Duration::from_secs(30),
			challenge: ChallengeSettings::default(),
		}
	}

	/// Switches between the staging and production gateway.
	pub fn use_staging(mut self, staging: bool) -> Self {
		self.base_url = if staging {
			STAGING_BASE_URL
		} else {
			PRODUCTION_BASE_URL
		}
		.to_string();
		self
	}

	/// Overrides the gateway base URL.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into().trim_end_matches('/').to_string();
		self
	}

	pub fn with_device_fingerprint_id(mut self, id: impl Into<String>) -> Self {
		self.device_fingerprint_id = Some(id.into());
		self
	}

	pub fn with_client_type(mut self, client_type: impl Into<String>) -> Self {
		self.client_type = client_type.into();
		self
	}

	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn with_challenge_settings(mut self, challenge: ChallengeSettings) -> Self {
		self.challenge = challenge;
		self
	}

	/// Checks the key is present and the base URL is an absolute http(s) URL.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.publishable_key.trim().is_empty() {
			return Err(ConfigError::EmptyPublishableKey);
		}

		let parsed = url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
			url: self.base_url.clone(),
			reason: e.to_string(),
		})?;

		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(ConfigError::InvalidBaseUrl {
				url: self.base_url.clone(),
				reason: format!("unsupported scheme '{}'", parsed.scheme()),
			});
		}

		Ok(())
	}

	/// Loads settings from `CARDGATE_`-prefixed environment variables.
	///
	/// `CARDGATE_PUBLISHABLE_KEY` is required. `CARDGATE_BASE_URL` wins over
	/// `CARDGATE_USE_STAGING`. Durations are given in milliseconds.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_with(&Env::new().with_prefix(ENV_PREFIX))
	}

	pub fn from_env_with(env: &Env) -> Result<Self, ConfigError> {
		let mut settings = Settings::new(env.str("PUBLISHABLE_KEY")?)
			.use_staging(env.bool_with_default("USE_STAGING", false)?);

		if let Some(base_url) = env.str_opt("BASE_URL")? {
			settings = settings.with_base_url(base_url);
		}
		if let Some(id) = env.str_opt("DEVICE_FINGERPRINT_ID")? {
			settings = settings.with_device_fingerprint_id(id);
		}
		if let Some(client_type) = env.str_opt("CLIENT_TYPE")? {
			settings = settings.with_client_type(client_type);
		}
		if let Some(ms) = env.u64_opt("REQUEST_TIMEOUT_MS")? {
			settings.request_timeout = Duration::from_millis(ms);
		}
		if let Some(ms) = env.u64_opt("SCRIPT_LOAD_TIMEOUT_MS")? {
			settings.challenge.script_load_timeout = Duration::from_millis(ms);
		}
		if let Some(ms) = env.u64_opt("SETUP_TIMEOUT_MS")? {
			settings.challenge.setup_timeout = Duration::from_millis(ms);
		}
		if let Some(ms) = env.u64_opt("CHALLENGE_TIMEOUT_MS")? {
			settings.challenge.challenge_timeout = Duration::from_millis(ms);
		}
		if let Some(ms) = env.u64_opt("BIN_SETTLE_DELAY_MS")? {
			settings.challenge.bin_settle_delay = Duration::from_millis(ms);
		}

		settings.validate()?;
		Ok(settings)
	}
}

impl ConfigurationProvider for Settings {
	fn publishable_key(&self) -> String {
		self.publishable_key.clone()
	}

	fn base_url(&self) -> String {
		self.base_url.clone()
	}

	fn device_fingerprint_id(&self) -> Option<String> {
		self.device_fingerprint_id.clone()
	}

	fn client_type(&self) -> String {
		self.client_type.clone()
	}

	fn client_version(&self) -> String {
		self.client_version.clone()
	}

	fn challenge_settings(&self) -> ChallengeSettings {
		self.challenge
	}
}
