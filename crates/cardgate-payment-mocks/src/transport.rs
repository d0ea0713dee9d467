//! Mock gateway transport.

use async_trait::async_trait;
use cardgate_http::{GatewayRequest, Method, Transport, TransportError};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

type Route = (Method, String);

/// Unique id with a recognisable prefix, e.g. `tok_mock_...`.
pub fn mock_id(prefix: &str) -> String {
	format!("{}_mock_{}", prefix, Uuid::new_v4().simple())
}

/// Mock transport for testing.
///
/// Responses are queued per `(method, path)`. Each request takes the next
/// queued response; the last one is repeated once the queue is down to it.
/// Requests to a route with nothing queued fail with status 404 and no body.
#[derive(Clone, Default)]
pub struct MockTransport {
	routes: Arc<RwLock<HashMap<Route, VecDeque<Result<Value, TransportError>>>>>,
	requests: Arc<RwLock<Vec<GatewayRequest>>>,
	fail_next: Arc<RwLock<bool>>,
}

impl MockTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a successful JSON response.
	pub async fn respond(&self, method: Method, path: &str, body: Value) {
		self.enqueue(method, path, Ok(body)).await;
	}

	/// Queues a failure.
	pub async fn respond_error(&self, method: Method, path: &str, error: TransportError) {
		self.enqueue(method, path, Err(error)).await;
	}

	async fn enqueue(&self, method: Method, path: &str, result: Result<Value, TransportError>) {
		self.routes
			.write()
			.await
			.entry((method, path.to_string()))
			.or_default()
			.push_back(result);
	}

	/// Configures whether the next request fails with a network error.
	pub async fn set_fail_next(&self, fail: bool) {
		*self.fail_next.write().await = fail;
	}

	/// Every request sent so far, in order.
	pub async fn requests(&self) -> Vec<GatewayRequest> {
		self.requests.read().await.clone()
	}

	pub async fn request_count(&self) -> usize {
		self.requests.read().await.len()
	}

	/// Requests sent to `path`, in order.
	pub async fn requests_to(&self, path: &str) -> Vec<GatewayRequest> {
		self.requests
			.read()
			.await
			.iter()
			.filter(|request| request.path() == path)
			.cloned()
			.collect()
	}

	/// Clears queued responses and recorded requests.
	pub async fn clear(&self) {
		self.routes.write().await.clear();
		self.requests.write().await.clear();
		*self.fail_next.write().await = false;
	}
}

#[async_trait]
impl Transport for MockTransport {
	async fn send(&self, request: GatewayRequest) -> Result<Value, TransportError> {
		let route = (request.method.clone(), request.path().to_string());
		self.requests.write().await.push(request);

		{
			let mut fail_next = self.fail_next.write().await;
			if *fail_next {
				*fail_next = false;
				return Err(TransportError::Network(
					"Mock configured to fail".to_string(),
				));
			}
		}

		let mut routes = self.routes.write().await;
		let Some(queue) = routes.get_mut(&route) else {
			return Err(TransportError::Status {
				status: 404,
				body: None,
			});
		};

		let next = if queue.len() > 1 {
			queue.pop_front()
		} else {
			queue.front().cloned()
		};
		next.unwrap_or(Err(TransportError::Status {
			status: 404,
			body: None,
		}))
	}
}
