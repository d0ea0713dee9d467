//! # Cardgate
//!
//! Card validation, tokenization and 3-D Secure authentication for payment
//! gateways, without raw card data ever touching the merchant's own servers.
//!
//! ## Crates
//!
//! - [`card`] (`cardgate-card`): Luhn and brand-range validators, brand classifier
//! - [`conf`] (`cardgate-conf`): [`Settings`], [`Environment`], env-var loading
//! - [`http`] (`cardgate-http`): the [`Transport`] seam and its reqwest implementation
//! - [`payment`] (`cardgate-payment`): tokenization and authentication workflows
//!
//! ## Feature Flags
//!
//! - `reqwest-transport` (default): ships [`ReqwestTransport`] and
//!   [`Cardgate::new`] / [`Cardgate::from_env`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cardgate::prelude::*;
//!
//! let client = Cardgate::new(Settings::new("xnd_public_development_abc"))?;
//! let card = client.card();
//!
//! let input = CardInput::new("4000000000000002", "12", "2030")
//!     .with_cvn("123")
//!     .with_amount(Decimal::new(10000, 0));
//!
//! match card.create_token(input).await {
//!     Ok(token) => println!("token {}", token.id()),
//!     Err(e) => eprintln!("{}: {}", e.error_code(), e),
//! }
//! ```

pub mod client;

pub use client::{Cardgate, CardgateError};

pub use cardgate_card as card;
pub use cardgate_conf as conf;
pub use cardgate_http as http;
pub use cardgate_payment as payment;

pub use cardgate_card::CardBrand;
pub use cardgate_conf::{ChallengeSettings, ConfigError, ConfigurationProvider, Environment, Settings};
#[cfg(feature = "reqwest-transport")]
pub use cardgate_http::ReqwestTransport;
pub use cardgate_http::{Transport, TransportError};
pub use cardgate_payment::{
	AuthenticationRequest, AuthenticationResult, Card, CardInput, ChallengeScriptLoader,
	ChallengeWidget, CreateTokenResponse, CreditCardToken, Decimal, PaymentError,
};

/// Common imports.
pub mod prelude {
	pub use crate::{Cardgate, CardgateError};

	pub use cardgate_card::CardBrand;
	pub use cardgate_conf::{ChallengeSettings, Environment, Settings};
	pub use cardgate_payment::{
		AuthenticationRequest, AuthenticationResult, AuthenticationStatus, Card, CardInput,
		ChallengeScriptLoader, ChallengeWidget, CreateTokenResponse, CreditCardToken, Decimal,
		PaymentError, TransactionMetadata,
	};
}
