//! Payment data types.

pub mod authentication;
pub mod card;
pub mod error;
pub mod token;

pub use authentication::{
	AuthenticationPhase, AuthenticationRequest, AuthenticationResult, AuthenticationSession,
	AuthenticationStatus,
};
pub use card::CardInput;
pub use error::{
	ErrorBody, GENERIC_SERVER_MESSAGE, PaymentError, TOKENIZATION_SERVER_MESSAGE, WidgetError,
};
pub use token::{
	AuthenticatedToken, CreateTokenResponse, CreditCardToken, TokenizationConfiguration,
	TransactionMetadata, TransientToken,
};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Number, Value};

/// Renders an amount as a JSON number.
///
/// Whole amounts are sent as integers (`10000`, not `10000.0`); fractional
/// amounts as floats.
pub(crate) fn amount_to_json(amount: Decimal) -> Value {
	let normalized = amount.normalize();
	if normalized.fract().is_zero()
		&& let Some(whole) = normalized.to_i64()
	{
		return Value::from(whole);
	}

	normalized
		.to_f64()
		.and_then(Number::from_f64)
		.map(Value::Number)
		.unwrap_or_else(|| Value::String(normalized.to_string()))
}
