//! Challenge widget contract and per-attempt event subscriptions.
//!
//! The widget is third-party, event-driven and shared by every attempt that
//! loads it. [`WidgetSession`] wraps one loaded widget for the lifetime of a
//! single attempt, and each [`EventSubscription`] unregisters its handler when
//! dropped, so an abandoned or timed-out attempt leaves no handler behind.

use crate::types::{PaymentError, WidgetError};
use async_trait::async_trait;
use cardgate_conf::Environment;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Fired once the widget finished initializing with a JWT.
pub const SETUP_COMPLETE_EVENT: &str = "payments.setupComplete";
/// Fired once the cardholder completed the challenge.
pub const VALIDATED_EVENT: &str = "payments.validated";
/// Bin-check event triggered after setup.
pub const BIN_PROCESS_EVENT: &str = "bin.process";
/// Fixed value sent with [`BIN_PROCESS_EVENT`].
pub const BIN_PROBE: &str = "1234567890";
/// Continuation action for a card challenge.
pub const CONTINUE_ACTION: &str = "cca";

/// Event delivered by the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEvent {
	pub name: String,
	pub data: Value,
}

impl WidgetEvent {
	pub fn new(name: impl Into<String>, data: Value) -> Self {
		Self {
			name: name.into(),
			data,
		}
	}
}

/// One-shot event handler.
pub type EventHandler = Box<dyn FnOnce(WidgetEvent) + Send>;

/// Challenge location and payload handed to the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeData {
	#[serde(rename = "AcsUrl")]
	pub acs_url: String,
	#[serde(rename = "Payload")]
	pub payload: String,
}

/// Order reference handed to the widget alongside [`ChallengeData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
	#[serde(rename = "OrderDetails")]
	pub order: OrderReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReference {
	#[serde(rename = "TransactionId")]
	pub transaction_id: String,
}

impl OrderDetails {
	pub fn new(transaction_id: impl Into<String>) -> Self {
		Self {
			order: OrderReference {
				transaction_id: transaction_id.into(),
			},
		}
	}
}

/// Third-party challenge widget.
///
/// Calls are synchronous; results arrive through events registered with
/// [`on`](ChallengeWidget::on). Registering a handler for an event replaces any
/// earlier one.
pub trait ChallengeWidget: Send + Sync {
	/// Initializes a widget session with a challenge JWT.
	fn setup(&self, jwt: &str) -> Result<(), WidgetError>;

	fn on(&self, event: &str, handler: EventHandler);

	fn off(&self, event: &str);

	fn trigger(&self, event: &str, payload: &str) -> Result<(), WidgetError>;

	/// Hands the challenge to the widget.
	fn continue_challenge(
		&self,
		action: &str,
		data: &ChallengeData,
		order: &OrderDetails,
	) -> Result<(), WidgetError>;

	/// Session id assigned by the widget, once known.
	fn session_id(&self) -> Option<String>;
}

/// Loads the challenge script for an environment.
#[async_trait]
pub trait ChallengeScriptLoader: Send + Sync {
	async fn load(&self, environment: Environment) -> Result<Arc<dyn ChallengeWidget>, WidgetError>;
}

/// A loaded widget, scoped to one authentication attempt.
#[derive(Clone)]
pub struct WidgetSession {
	widget: Arc<dyn ChallengeWidget>,
}

impl WidgetSession {
	pub fn new(widget: Arc<dyn ChallengeWidget>) -> Self {
		Self { widget }
	}

	/// Registers a one-shot handler for `event`.
	pub fn once(&self, event: &str) -> EventSubscription {
		let (tx, rx) = oneshot::channel();
		self.widget.on(
			event,
			Box::new(move |fired| {
				// The receiver is gone when the attempt already gave up.
				let _ = tx.send(fired);
			}),
		);

		EventSubscription {
			widget: Arc::clone(&self.widget),
			event: event.to_string(),
			rx: Some(rx),
		}
	}

	pub fn setup(&self, jwt: &str) -> Result<(), WidgetError> {
		self.widget.setup(jwt)
	}

	pub fn trigger_bin_probe(&self) -> Result<(), WidgetError> {
		self.widget.trigger(BIN_PROCESS_EVENT, BIN_PROBE)
	}

	pub fn continue_challenge(&self, data: &ChallengeData, order: &OrderDetails) -> Result<(), WidgetError> {
		self.widget.continue_challenge(CONTINUE_ACTION, data, order)
	}

	pub fn session_id(&self) -> Option<String> {
		self.widget.session_id().filter(|id| !id.is_empty())
	}
}

/// Registered one-shot handler. Dropping it unregisters the handler.
pub struct EventSubscription {
	widget: Arc<dyn ChallengeWidget>,
	event: String,
	rx: Option<oneshot::Receiver<WidgetEvent>>,
}

impl EventSubscription {
	/// Waits up to `limit` for the event.
	pub async fn wait(mut self, limit: Duration) -> Result<WidgetEvent, PaymentError> {
		let Some(rx) = self.rx.take() else {
			return Err(WidgetError::EventDropped(self.event.clone()).into());
		};

		match tokio::time::timeout(limit, rx).await {
			Ok(Ok(event)) => Ok(event),
			Ok(Err(_)) => Err(WidgetError::EventDropped(self.event.clone()).into()),
			Err(_) => {
				tracing::warn!(event = %self.event, limit_ms = limit.as_millis() as u64, "widget event wait timed out");
				Err(PaymentError::Timeout {
					stage: self.event.clone(),
				})
			}
		}
	}
}

impl Drop for EventSubscription {
	fn drop(&mut self) {
		self.widget.off(&self.event);
	}
}
