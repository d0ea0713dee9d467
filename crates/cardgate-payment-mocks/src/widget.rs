//! Mock challenge widget and script loader.

use async_trait::async_trait;
use cardgate_conf::Environment;
use cardgate_payment::widget::{SETUP_COMPLETE_EVENT, VALIDATED_EVENT};
use cardgate_payment::{
	ChallengeData, ChallengeScriptLoader, ChallengeWidget, EventHandler, OrderDetails,
	WidgetError, WidgetEvent,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Call made on a [`MockChallengeWidget`].
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCall {
	Setup { jwt: String },
	On { event: String },
	Off { event: String },
	Trigger { event: String, payload: String },
	Continue {
		action: String,
		data: ChallengeData,
		order: OrderDetails,
	},
}

struct WidgetState {
	handlers: HashMap<String, EventHandler>,
	calls: Vec<WidgetCall>,
	session_id: Option<String>,
	setup_complete: Option<Value>,
	validated: Option<Value>,
	fail_setup: bool,
}

/// In-memory challenge widget.
///
/// By default `setup` fires `payments.setupComplete` and `continue_challenge`
/// fires `payments.validated`, each to whichever handler is registered at the
/// time. Handlers run after the internal lock is released.
pub struct MockChallengeWidget {
	state: Mutex<WidgetState>,
}

impl Default for MockChallengeWidget {
	fn default() -> Self {
		Self::new()
	}
}

impl MockChallengeWidget {
	pub fn new() -> Self {
		let session_id = format!("mock_session_{}", uuid::Uuid::new_v4().simple());
		Self {
			state: Mutex::new(WidgetState {
				handlers: HashMap::new(),
				calls: Vec::new(),
				setup_complete: Some(json!({ "sessionId": session_id })),
				session_id: Some(session_id),
				validated: Some(json!({ "ActionCode": "SUCCESS" })),
				fail_setup: false,
			}),
		}
	}

	/// Session id reported by `session_id()`; `None` leaves only the
	/// setup-complete payload to fall back on.
	pub fn with_session_id(self, session_id: Option<&str>) -> Self {
		self.state.lock().session_id = session_id.map(str::to_string);
		self
	}

	/// Payload of the `payments.setupComplete` event.
	pub fn with_setup_complete_data(self, data: Value) -> Self {
		self.state.lock().setup_complete = Some(data);
		self
	}

	/// Never fires `payments.setupComplete`.
	pub fn without_setup_complete(self) -> Self {
		self.state.lock().setup_complete = None;
		self
	}

	/// Never fires `payments.validated`.
	pub fn without_validation(self) -> Self {
		self.state.lock().validated = None;
		self
	}

	/// Makes `setup` fail.
	pub fn failing_setup(self) -> Self {
		self.state.lock().fail_setup = true;
		self
	}

	/// Every call so far, in order.
	pub fn calls(&self) -> Vec<WidgetCall> {
		self.state.lock().calls.clone()
	}

	/// Events that currently have a handler registered.
	pub fn registered_events(&self) -> Vec<String> {
		let mut events: Vec<String> = self.state.lock().handlers.keys().cloned().collect();
		events.sort();
		events
	}

	/// Fires `event` by hand. Returns `false` when no handler was registered.
	pub fn fire(&self, event: &str, data: Value) -> bool {
		let handler = self.state.lock().handlers.remove(event);
		match handler {
			Some(handler) => {
				handler(WidgetEvent::new(event, data));
				true
			}
			None => false,
		}
	}

	fn record(&self, call: WidgetCall) {
		self.state.lock().calls.push(call);
	}

	fn fire_scripted(&self, event: &str, scripted: fn(&WidgetState) -> Option<Value>) {
		let (handler, data) = {
			let mut state = self.state.lock();
			let Some(data) = scripted(&state) else {
				return;
			};
			(state.handlers.remove(event), data)
		};
		if let Some(handler) = handler {
			handler(WidgetEvent::new(event, data));
		}
	}
}

impl ChallengeWidget for MockChallengeWidget {
	fn setup(&self, jwt: &str) -> Result<(), WidgetError> {
		self.record(WidgetCall::Setup {
			jwt: jwt.to_string(),
		});
		if self.state.lock().fail_setup {
			return Err(WidgetError::Call("Mock configured to fail setup".to_string()));
		}
		self.fire_scripted(SETUP_COMPLETE_EVENT, |state| state.setup_complete.clone());
		Ok(())
	}

	fn on(&self, event: &str, handler: EventHandler) {
		let mut state = self.state.lock();
		state.calls.push(WidgetCall::On {
			event: event.to_string(),
		});
		state.handlers.insert(event.to_string(), handler);
	}

	fn off(&self, event: &str) {
		let mut state = self.state.lock();
		state.calls.push(WidgetCall::Off {
			event: event.to_string(),
		});
		state.handlers.remove(event);
	}

	fn trigger(&self, event: &str, payload: &str) -> Result<(), WidgetError> {
		self.record(WidgetCall::Trigger {
			event: event.to_string(),
			payload: payload.to_string(),
		});
		Ok(())
	}

	fn continue_challenge(
		&self,
		action: &str,
		data: &ChallengeData,
		order: &OrderDetails,
	) -> Result<(), WidgetError> {
		self.record(WidgetCall::Continue {
			action: action.to_string(),
			data: data.clone(),
			order: order.clone(),
		});
		self.fire_scripted(VALIDATED_EVENT, |state| state.validated.clone());
		Ok(())
	}

	fn session_id(&self) -> Option<String> {
		self.state.lock().session_id.clone()
	}
}

/// Script loader handing out one shared [`MockChallengeWidget`].
pub struct MockScriptLoader {
	widget: Arc<MockChallengeWidget>,
	loads: Mutex<Vec<Environment>>,
	failure: Option<String>,
	hang: bool,
}

impl MockScriptLoader {
	pub fn new(widget: Arc<MockChallengeWidget>) -> Self {
		Self {
			widget,
			loads: Mutex::new(Vec::new()),
			failure: None,
			hang: false,
		}
	}

	/// Fails every load with `message`.
	pub fn failing(mut self, message: impl Into<String>) -> Self {
		self.failure = Some(message.into());
		self
	}

	/// Never finishes loading.
	pub fn hanging(mut self) -> Self {
		self.hang = true;
		self
	}

	pub fn widget(&self) -> &Arc<MockChallengeWidget> {
		&self.widget
	}

	/// Environments requested so far, in order.
	pub fn loads(&self) -> Vec<Environment> {
		self.loads.lock().clone()
	}
}

#[async_trait]
impl ChallengeScriptLoader for MockScriptLoader {
	async fn load(&self, environment: Environment) -> Result<Arc<dyn ChallengeWidget>, WidgetError> {
		self.loads.lock().push(environment);

		if self.hang {
			std::future::pending::<()>().await;
		}

		if let Some(message) = &self.failure {
			return Err(WidgetError::ScriptLoad(message.clone()));
		}

		Ok(self.widget.clone() as Arc<dyn ChallengeWidget>)
	}
}
