//! Shared fixtures for the payment workflow tests.

#![allow(dead_code)]

use cardgate_conf::{ChallengeSettings, Settings};
use cardgate_payment::{Card, CardInput, Decimal};
use cardgate_payment_mocks::{MockChallengeWidget, MockScriptLoader, MockTransport};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

pub const DEVELOPMENT_KEY: &str = "xnd_public_development_key";
pub const PRODUCTION_KEY: &str = "xnd_public_production_key";
pub const BASE_URL: &str = "https://api.example.com";
pub const FLEX_DEVELOPMENT_URL: &str = "https://flex-test.example.com";
pub const FLEX_PRODUCTION_URL: &str = "https://flex.example.com";
pub const FLEX_TOKENS_PATH: &str = "/cybersource/flex/v1/tokens";
pub const VISA: &str = "4000000000000002";

pub fn challenge_settings() -> ChallengeSettings {
	ChallengeSettings {
		script_load_timeout: Duration::from_secs(5),
		setup_timeout: Duration::from_secs(5),
		challenge_timeout: Duration::from_secs(60),
		bin_settle_delay: Duration::from_millis(10),
	}
}

pub fn settings(key: &str) -> Settings {
	Settings::new(key)
		.with_base_url(BASE_URL)
		.with_device_fingerprint_id("fp_123")
		.with_challenge_settings(challenge_settings())
}

/// Card wired to in-memory collaborators.
pub struct Harness {
	pub transport: MockTransport,
	pub loader: Arc<MockScriptLoader>,
	pub card: Card,
}

impl Harness {
	pub fn new() -> Self {
		Self::with_loader(DEVELOPMENT_KEY, MockScriptLoader::new(Arc::new(MockChallengeWidget::new())))
	}

	pub fn with_widget(widget: MockChallengeWidget) -> Self {
		Self::with_loader(DEVELOPMENT_KEY, MockScriptLoader::new(Arc::new(widget)))
	}

	pub fn with_loader(key: &str, loader: MockScriptLoader) -> Self {
		let transport = MockTransport::new();
		let loader = Arc::new(loader);
		let card = Card::with_challenge_loader(
			Arc::new(transport.clone()),
			Arc::new(settings(key)),
			loader.clone(),
		);
		Self {
			transport,
			loader,
			card,
		}
	}

	/// Card with no challenge script loader.
	pub fn without_loader() -> Self {
		let transport = MockTransport::new();
		let loader = Arc::new(MockScriptLoader::new(Arc::new(MockChallengeWidget::new())));
		let card = Card::new(Arc::new(transport.clone()), Arc::new(settings(DEVELOPMENT_KEY)));
		Self {
			transport,
			loader,
			card,
		}
	}

	pub fn widget(&self) -> &Arc<MockChallengeWidget> {
		self.loader.widget()
	}
}

pub fn visa_input() -> CardInput {
	CardInput::new(VISA, "12", "2030")
		.with_cvn("123")
		.with_amount(Decimal::new(10000, 0))
}

pub fn token_body(id: &str) -> Value {
	json!({
		"id": id,
		"status": "VERIFIED",
		"masked_card_number": "400000XXXXXX0002",
		"authentication_id": null
	})
}

pub fn token_body_with_jwt(id: &str, environment: &str) -> Value {
	json!({
		"id": id,
		"status": "IN_REVIEW",
		"masked_card_number": "400000XXXXXX0002",
		"jwt": "eyJhbGciOiJIUzI1NiJ9.challenge.sig",
		"environment": environment
	})
}

pub fn pending_authentication(id: &str, token_id: &str) -> Value {
	json!({
		"id": id,
		"credit_card_token_id": token_id,
		"status": "PENDING",
		"acs_url": "https://acs.example.com/challenge",
		"pa_req": "pareq_payload",
		"authentication_transaction_id": "txn_123"
	})
}

pub fn authentication(id: &str, token_id: &str, status: &str) -> Value {
	json!({
		"id": id,
		"credit_card_token_id": token_id,
		"status": status,
		"masked_card_number": "400000XXXXXX0002",
		"metadata": {"eci": "05"}
	})
}

/// Log lines captured while a guard returned by [`capture_logs`] is alive.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<String>>>);

impl CapturedLogs {
	pub fn lines(&self) -> Vec<String> {
		self.0.lock().unwrap().clone()
	}

	pub fn contains(&self, needle: &str) -> bool {
		self.lines().iter().any(|line| line.contains(needle))
	}
}

struct LogCapture {
	logs: CapturedLogs,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
	fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
		struct FieldVisitor {
			line: String,
		}

		impl tracing::field::Visit for FieldVisitor {
			fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
				self.line.push_str(&format!(" {}={:?}", field.name(), value));
			}
		}

		let mut visitor = FieldVisitor {
			line: format!("[{}]", event.metadata().level()),
		};
		event.record(&mut visitor);
		self.logs.0.lock().unwrap().push(visitor.line);
	}
}

/// Captures every event on the current thread until the guard drops.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
	let logs = CapturedLogs::default();
	let guard = tracing_subscriber::registry()
		.with(LogCapture { logs: logs.clone() })
		.set_default();
	(logs, guard)
}
