//! 3-D Secure authentication workflow.
//!
//! An attempt without a challenge JWT is a single POST against the token.
//! With a JWT the attempt drives the challenge widget:
//!
//! 1. load the challenge script for the environment
//! 2. set the widget up with the JWT and wait for `payments.setupComplete`
//! 3. trigger the bin probe, wait the settling delay, read the session id
//! 4. create the authentication record with the session id
//! 5. return a `VERIFIED`/`FAILED` record as-is; otherwise continue the
//!    challenge on the widget, wait for `payments.validated`, and verify
//!
//! Every step short-circuits on the first error. Script load and event waits
//! are bounded by [`ChallengeSettings`](cardgate_conf::ChallengeSettings).

use crate::gateway::{GatewayClient, authentications_path, verification_path};
use crate::types::{
	AuthenticationPhase, AuthenticationRequest, AuthenticationResult, AuthenticationSession,
	GENERIC_SERVER_MESSAGE, PaymentError, WidgetError, amount_to_json,
};
use crate::widget::{
	ChallengeData, ChallengeScriptLoader, OrderDetails, SETUP_COMPLETE_EVENT, VALIDATED_EVENT,
	WidgetSession,
};
use cardgate_http::Method;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Stage name reported when the challenge script does not load in time.
pub const SCRIPT_LOAD_STAGE: &str = "challenge script load";

/// Runs authentication attempts.
///
/// Clones share the challenge lock: the widget is a single shared object, so
/// widget-driven attempts run one at a time. Attempts without a JWT never
/// take the lock.
#[derive(Clone)]
pub struct Authenticator {
	gateway: GatewayClient,
	loader: Option<Arc<dyn ChallengeScriptLoader>>,
	challenge_lock: Arc<Mutex<()>>,
}

impl Authenticator {
	pub fn new(gateway: GatewayClient, loader: Option<Arc<dyn ChallengeScriptLoader>>) -> Self {
		Self {
			gateway,
			loader,
			challenge_lock: Arc::new(Mutex::new(())),
		}
	}

	/// Copy that drives the widget through `loader` and keeps this
	/// authenticator's challenge lock.
	pub fn with_loader(&self, loader: Arc<dyn ChallengeScriptLoader>) -> Self {
		Self {
			gateway: self.gateway.clone(),
			loader: Some(loader),
			challenge_lock: self.challenge_lock.clone(),
		}
	}

	/// Runs one attempt to completion.
	///
	/// Input is not validated here; callers validate first.
	pub async fn authenticate(
		&self,
		request: AuthenticationRequest,
	) -> Result<AuthenticationResult, PaymentError> {
		let environment = request
			.environment
			.unwrap_or_else(|| self.gateway.environment());
		let mut session = AuthenticationSession::new(&request, environment);

		tracing::info!(
			token_id = %session.token_id,
			environment = %environment,
			three_ds2 = session.jwt.is_some(),
			phase = %session.phase(),
			"starting authentication"
		);

		let result = match session.jwt.clone() {
			None => self.create_authentication(&request).await,
			Some(jwt) => self.run_challenge(&mut session, &jwt).await,
		};

		match &result {
			Ok(authentication) if authentication.status.is_terminal() => {
				transition(
					&mut session,
					AuthenticationSession::terminal_phase_for(&authentication.status),
				);
			}
			Ok(authentication) => {
				tracing::info!(
					token_id = %session.token_id,
					authentication_id = %authentication.id,
					status = %authentication.status,
					"authentication returned without a terminal status"
				);
			}
			Err(error) => {
				tracing::warn!(
					token_id = %session.token_id,
					phase = %session.phase(),
					error_code = error.error_code(),
					"authentication failed"
				);
				transition(&mut session, AuthenticationPhase::Failed);
			}
		}

		result
	}

	/// Single POST without widget interaction.
	async fn create_authentication(
		&self,
		request: &AuthenticationRequest,
	) -> Result<AuthenticationResult, PaymentError> {
		let mut body = Map::new();
		body.insert("amount".to_string(), amount_to_json(request.amount));
		if let Some(metadata) = &request.transaction_metadata {
			body.insert(
				"transaction_metadata".to_string(),
				Value::Object(metadata.clone()),
			);
		}

		let http_request = self
			.gateway
			.request(Method::POST, &authentications_path(&request.token_id))
			.json(Value::Object(body));
		self.gateway.send(http_request).await
	}

	async fn run_challenge(
		&self,
		session: &mut AuthenticationSession,
		jwt: &str,
	) -> Result<AuthenticationResult, PaymentError> {
		let _active = self.challenge_lock.lock().await;
		let settings = self.gateway.config().challenge_settings();

		let loader = self.loader.as_ref().ok_or_else(|| {
			WidgetError::ScriptLoad("no challenge script loader configured".to_string())
		})?;

		transition(session, AuthenticationPhase::WidgetSetup);

		let widget = match tokio::time::timeout(
			settings.script_load_timeout,
			loader.load(session.environment),
		)
		.await
		{
			Ok(loaded) => WidgetSession::new(loaded?),
			Err(_) => {
				return Err(PaymentError::Timeout {
					stage: SCRIPT_LOAD_STAGE.to_string(),
				});
			}
		};

		let setup_complete = widget.once(SETUP_COMPLETE_EVENT);
		widget.setup(jwt)?;
		let setup_event = setup_complete.wait(settings.setup_timeout).await?;

		// The widget only reports a usable session id once the bin probe has
		// been processed.
		widget.trigger_bin_probe()?;
		tokio::time::sleep(settings.bin_settle_delay).await;

		let session_id = widget
			.session_id()
			.or_else(|| {
				setup_event
					.data
					.get("sessionId")
					.and_then(Value::as_str)
					.filter(|id| !id.is_empty())
					.map(str::to_string)
			})
			.ok_or(WidgetError::MissingSessionId)?;
		session.widget_session_id = Some(session_id.clone());

		tracing::debug!(token_id = %session.token_id, "widget session ready");

		let mut body = Map::new();
		body.insert("amount".to_string(), amount_to_json(session.amount));
		if let Some(currency) = &session.currency {
			body.insert("currency".to_string(), Value::from(currency.as_str()));
		}
		body.insert("session_id".to_string(), Value::from(session_id));
		body.insert(
			"client_type".to_string(),
			Value::from(self.gateway.config().client_type()),
		);

		let http_request = self
			.gateway
			.request(Method::POST, &authentications_path(&session.token_id))
			.json(Value::Object(body));
		let authentication: AuthenticationResult = self.gateway.send(http_request).await?;

		if authentication.status.is_terminal() {
			tracing::info!(
				token_id = %session.token_id,
				authentication_id = %authentication.id,
				status = %authentication.status,
				"authentication finished without a challenge"
			);
			return Ok(authentication);
		}

		session.record_authentication(&authentication);
		let (Some(acs_url), Some(payload), Some(transaction_id)) = (
			session.acs_url.clone(),
			session.pa_req.clone(),
			session.transaction_id.clone(),
		) else {
			tracing::warn!(
				authentication_id = %authentication.id,
				status = %authentication.status,
				"pending authentication is missing challenge fields"
			);
			return Err(PaymentError::Server(GENERIC_SERVER_MESSAGE.to_string()));
		};

		transition(session, AuthenticationPhase::ChallengePending);

		let validated = widget.once(VALIDATED_EVENT);
		widget.continue_challenge(
			&ChallengeData { acs_url, payload },
			&OrderDetails::new(transaction_id.clone()),
		)?;
		let event = validated.wait(settings.challenge_timeout).await?;

		let action_code = event
			.data
			.get("ActionCode")
			.and_then(Value::as_str)
			.unwrap_or_default();
		tracing::debug!(
			authentication_id = %authentication.id,
			action_code,
			"challenge validated"
		);

		let http_request = self
			.gateway
			.request(Method::POST, &verification_path(&authentication.id))
			.json(json!({ "authentication_transaction_id": transaction_id }));
		self.gateway.send(http_request).await
	}
}

fn transition(session: &mut AuthenticationSession, next: AuthenticationPhase) {
	let from = session.phase();
	if session.advance(next) {
		tracing::debug!(token_id = %session.token_id, from = %from, to = %next, "authentication phase changed");
	} else if from != next {
		tracing::warn!(token_id = %session.token_id, from = %from, to = %next, "ignored illegal phase change");
	}
}
