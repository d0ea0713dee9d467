//! # Cardgate Conf
//!
//! Configuration for talking to the payment gateway.
//!
//! [`Settings`] is an explicit value handed to the workflows through the
//! [`ConfigurationProvider`] trait, so there is no process-wide mutable state.
//! Build it in code or load it from `CARDGATE_`-prefixed environment variables:
//!
//! ```
//! use cardgate_conf::{ConfigurationProvider, Environment, Settings};
//!
//! let settings = Settings::new("xnd_public_development_abc").use_staging(true);
//! assert_eq!(settings.environment(), Environment::Development);
//! assert_eq!(settings.base_url(), "https://api-staging.xendit.co");
//! ```

pub mod environment;
pub mod env;
pub mod provider;
pub mod settings;

pub use env::{Env, EnvError, parse_bool};
pub use environment::{Environment, ParseEnvironmentError};
pub use provider::ConfigurationProvider;
pub use settings::{
	ChallengeSettings, ConfigError, DEFAULT_CLIENT_TYPE, PRODUCTION_BASE_URL, STAGING_BASE_URL,
	Settings,
};
