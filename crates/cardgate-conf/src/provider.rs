//! Configuration provider contract consumed by the workflows.

use crate::environment::Environment;
use crate::settings::{ChallengeSettings, DEFAULT_CLIENT_TYPE};

/// Supplies gateway credentials and endpoints.
///
/// Values are read on every request, so an implementation backed by shared
/// state may rotate the key without rebuilding the workflows.
pub trait ConfigurationProvider: Send + Sync {
	fn publishable_key(&self) -> String;

	fn base_url(&self) -> String;

	/// Environment derived from the publishable key.
	fn environment(&self) -> Environment {
		Environment::from_publishable_key(&self.publishable_key())
	}

	fn device_fingerprint_id(&self) -> Option<String> {
		None
	}

	fn client_type(&self) -> String {
		DEFAULT_CLIENT_TYPE.to_string()
	}

	fn client_version(&self) -> String {
		env!("CARGO_PKG_VERSION").to_string()
	}

	fn challenge_settings(&self) -> ChallengeSettings {
		ChallengeSettings::default()
	}
}
