//! Gateway environment derived from the publishable key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PRODUCTION_CHALLENGE_SCRIPT_URL: &str = "https://songbird.cardinalcommerce.com/edge/v1/songbird.js";
const DEVELOPMENT_CHALLENGE_SCRIPT_URL: &str =
	"https://songbirdstag.cardinalcommerce.com/edge/v1/songbird.js";

/// Environment a publishable key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
	Production,
	Development,
}

impl Environment {
	/// Derives the environment from a publishable key.
	///
	/// A key containing `PRODUCTION` anywhere (case-insensitive) is a
	/// production key; everything else is development.
	///
	/// ```
	/// use cardgate_conf::Environment;
	///
	/// assert_eq!(Environment::from_publishable_key("xnd_public_production_abc"), Environment::Production);
	/// assert_eq!(Environment::from_publishable_key("xnd_public_development_abc"), Environment::Development);
	/// ```
	pub fn from_publishable_key(key: &str) -> Self {
		if key.to_uppercase().contains("PRODUCTION") {
			Environment::Production
		} else {
			Environment::Development
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Environment::Production => "PRODUCTION",
			Environment::Development => "DEVELOPMENT",
		}
	}

	/// Location of the third-party challenge script for this environment.
	pub fn challenge_script_url(&self) -> &'static str {
		match self {
			Environment::Production => PRODUCTION_CHALLENGE_SCRIPT_URL,
			Environment::Development => DEVELOPMENT_CHALLENGE_SCRIPT_URL,
		}
	}
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned for an unrecognised environment tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown environment: {0}")]
pub struct ParseEnvironmentError(pub String);

impl FromStr for Environment {
	type Err = ParseEnvironmentError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_uppercase().as_str() {
			"PRODUCTION" | "LIVE" => Ok(Environment::Production),
			"DEVELOPMENT" | "TEST" | "STAGING" => Ok(Environment::Development),
			_ => Err(ParseEnvironmentError(s.to_string())),
		}
	}
}
