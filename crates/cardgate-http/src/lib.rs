//! # Cardgate HTTP
//!
//! The transport seam between the payment workflows and the network.
//!
//! - [`Transport`]: send one request, get parsed JSON back or a [`TransportError`]
//! - [`GatewayRequest`]: method, URL, headers and optional JSON body
//! - [`ReqwestTransport`] (feature `reqwest`, on by default): the production implementation
//!
//! Workflows depend only on the trait, so tests swap in an in-memory transport.

pub mod request;
pub mod transport;

#[cfg(feature = "reqwest")]
pub mod reqwest_transport;

pub use http::Method;
pub use request::{
	CLIENT_TYPE_HEADER, CLIENT_VERSION_HEADER, FOR_USER_ID_HEADER, GatewayRequest,
	JSON_CONTENT_TYPE, basic_auth_header,
};
pub use transport::{Transport, TransportError};

#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
