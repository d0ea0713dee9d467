//! Environment variable handling
//!
//! Typed lookups with an optional prefix, so `Env::new().with_prefix("CARDGATE_")`
//! reads `PUBLISHABLE_KEY` from `CARDGATE_PUBLISHABLE_KEY`.

use std::env;

/// Environment variable reader with prefix support
#[derive(Debug, Clone, Default)]
pub struct Env {
	/// Optional prefix for environment variables (e.g., "CARDGATE_")
	pub prefix: Option<String>,
}

impl Env {
	pub fn new() -> Self {
		Self { prefix: None }
	}

	/// Set a prefix for all environment variable lookups
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	fn key_name(&self, key: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}{}", prefix, key),
			None => key.to_string(),
		}
	}

	/// Read a required string value
	pub fn str(&self, key: &str) -> Result<String, EnvError> {
		let full_key = self.key_name(key);
		self.str_opt(key)?
			.ok_or(EnvError::MissingVariable(full_key))
	}

	/// Read an optional string value; empty values count as unset
	pub fn str_opt(&self, key: &str) -> Result<Option<String>, EnvError> {
		let full_key = self.key_name(key);
		validate_env_var_name(&full_key)?;

		Ok(env::var(&full_key).ok().filter(|value| !value.is_empty()))
	}

	/// Read a boolean value with a default
	pub fn bool_with_default(&self, key: &str, default: bool) -> Result<bool, EnvError> {
		match self.str_opt(key)? {
			Some(value) => parse_bool(&value).map_err(|error| EnvError::ParseError {
				key: self.key_name(key),
				value_len: value.len(),
				error,
			}),
			None => Ok(default),
		}
	}

	/// Read an unsigned integer value, if set
	pub fn u64_opt(&self, key: &str) -> Result<Option<u64>, EnvError> {
		match self.str_opt(key)? {
			Some(value) => value
				.trim()
				.parse::<u64>()
				.map(Some)
				.map_err(|e| EnvError::ParseError {
					key: self.key_name(key),
					value_len: value.len(),
					error: e.to_string(),
				}),
			None => Ok(None),
		}
	}
}

/// Parses the usual spellings of a boolean flag.
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		other => Err(format!("Invalid boolean value: {}", other)),
	}
}

/// Validates an environment variable name.
///
/// Rejects names that are empty, contain control characters, or contain
/// the `=` character.
pub fn validate_env_var_name(name: &str) -> Result<(), EnvError> {
	if name.is_empty() {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not be empty".to_string(),
		});
	}

	if let Some(pos) = name.find(|c: char| c.is_control()) {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: format!(
				"environment variable name contains control character at position {}",
				pos
			),
		});
	}

	if name.contains('=') {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not contain '='".to_string(),
		});
	}

	Ok(())
}

/// Environment variable errors
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
	#[error("Missing environment variable: {0}")]
	MissingVariable(String),

	#[error("Failed to parse environment variable '{key}' (value length: {value_len}): {error}")]
	ParseError {
		key: String,
		/// Length of the original value, kept instead of the value itself
		value_len: usize,
		error: String,
	},

	#[error("Invalid environment variable name '{name}': {reason}")]
	InvalidVariableName { name: String, reason: String },
}
