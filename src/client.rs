//! Configure-once client.

use cardgate_conf::{ConfigError, ConfigurationProvider, Environment, Settings};
use cardgate_http::{Transport, TransportError};
use cardgate_payment::{Card, ChallengeScriptLoader};
use std::sync::Arc;

/// Errors raised while building a [`Cardgate`] client.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CardgateError {
	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("Transport error: {0}")]
	Transport(#[from] TransportError),
}

/// Holds validated settings, a transport and an optional challenge script
/// loader, and hands out [`Card`]s wired to them.
///
/// Every `Card` handed out shares one challenge lock, so widget-driven
/// attempts from any of them run one at a time.
#[derive(Clone)]
pub struct Cardgate {
	settings: Arc<Settings>,
	card: Card,
}

impl Cardgate {
	/// Validates `settings` and sends requests through a reqwest client with
	/// the configured timeout.
	#[cfg(feature = "reqwest-transport")]
	pub fn new(settings: Settings) -> Result<Self, CardgateError> {
		let transport = cardgate_http::ReqwestTransport::new(settings.request_timeout)?;
		Self::with_transport(settings, Arc::new(transport))
	}

	/// [`Cardgate::new`] with settings read from `CARDGATE_*` variables.
	#[cfg(feature = "reqwest-transport")]
	pub fn from_env() -> Result<Self, CardgateError> {
		Self::new(Settings::from_env()?)
	}

	/// Validates `settings` and uses `transport` for every request.
	pub fn with_transport(
		settings: Settings,
		transport: Arc<dyn Transport>,
	) -> Result<Self, CardgateError> {
		settings.validate()?;

		tracing::info!(
			environment = %settings.environment(),
			base_url = %settings.base_url,
			"cardgate client configured"
		);

		let settings = Arc::new(settings);
		let card = Card::new(transport, settings.clone());
		Ok(Self { settings, card })
	}

	/// Enables the widget-driven 3DS2 path.
	///
	/// Cards handed out before this call keep running without a loader but
	/// still share the challenge lock.
	pub fn with_challenge_loader(mut self, loader: Arc<dyn ChallengeScriptLoader>) -> Self {
		self.card = self.card.attach_challenge_loader(loader);
		self
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn environment(&self) -> Environment {
		self.settings.environment()
	}

	/// Card entry point sharing this client's configuration.
	pub fn card(&self) -> Card {
		self.card.clone()
	}
}
