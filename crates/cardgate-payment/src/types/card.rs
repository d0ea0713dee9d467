//! Card input supplied by the caller.

use rust_decimal::Decimal;

/// Card data for tokenization.
///
/// **Security Note**: `Debug` is implemented by hand and prints only the last
/// four digits of the number; the CVN is never printed.
#[derive(Clone)]
pub struct CardInput {
	/// Card number, digits only
	pub number: String,
	/// Expiration month ("1"-"12")
	pub exp_month: String,
	/// Expiration year (4 digits)
	pub exp_year: String,
	/// CVN, optional
	pub cvn: Option<String>,
	/// Charge amount; required (and non-negative) for single-use tokens
	pub amount: Option<Decimal>,
	/// Currency of `amount`, used when a step-up authentication follows
	pub currency: Option<String>,
	/// Multi-use tokens can be charged more than once
	pub is_multiple_use: bool,
	/// Ask the gateway to decide whether 3DS is needed
	pub should_authenticate: bool,
	/// Sub-account the token is created for
	pub on_behalf_of: Option<String>,
}

impl CardInput {
	/// Single-use card input with authentication requested.
	pub fn new(
		number: impl Into<String>,
		exp_month: impl Into<String>,
		exp_year: impl Into<String>,
	) -> Self {
		Self {
			number: number.into(),
			exp_month: exp_month.into(),
			exp_year: exp_year.into(),
			cvn: None,
			amount: None,
			currency: None,
			is_multiple_use: false,
			should_authenticate: true,
			on_behalf_of: None,
		}
	}

	pub fn with_cvn(mut self, cvn: impl Into<String>) -> Self {
		self.cvn = Some(cvn.into());
		self
	}

	pub fn with_amount(mut self, amount: Decimal) -> Self {
		self.amount = Some(amount);
		self
	}

	pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
		self.currency = Some(currency.into());
		self
	}

	pub fn multiple_use(mut self, multiple_use: bool) -> Self {
		self.is_multiple_use = multiple_use;
		self
	}

	pub fn should_authenticate(mut self, should_authenticate: bool) -> Self {
		self.should_authenticate = should_authenticate;
		self
	}

	pub fn on_behalf_of(mut self, user_id: impl Into<String>) -> Self {
		self.on_behalf_of = Some(user_id.into());
		self
	}

	/// The CVN when one was actually entered.
	pub fn provided_cvn(&self) -> Option<&str> {
		self.cvn.as_deref().filter(|cvn| !cvn.is_empty())
	}

	/// Number with everything but the last four digits hidden.
	pub fn masked_number(&self) -> String {
		let visible = self.number.len().saturating_sub(4);
		let tail = self.number.get(visible..).unwrap_or_default();
		format!("{}{}", "X".repeat(visible), tail)
	}
}

impl std::fmt::Debug for CardInput {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CardInput")
			.field("number", &self.masked_number())
			.field("exp_month", &self.exp_month)
			.field("exp_year", &self.exp_year)
			.field("cvn", &self.cvn.as_ref().map(|_| "***"))
			.field("amount", &self.amount)
			.field("currency", &self.currency)
			.field("is_multiple_use", &self.is_multiple_use)
			.field("should_authenticate", &self.should_authenticate)
			.field("on_behalf_of", &self.on_behalf_of)
			.finish()
	}
}
