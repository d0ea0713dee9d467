//! Card brand classification from the number prefix (IIN range).
//!
//! Classification is first-match-wins in a fixed precedence order:
//!
//! 1. `4` - Visa, or Visa Electron for the known Electron prefixes
//! 2. `34` / `37` - American Express
//! 3. `50`..=`55` - Mastercard
//! 4. `644`..=`649`, `622126`..=`622925`, `65`, `6011` - Discover
//! 5. `3528`..=`3589` - JCB
//! 6. `5019` - Dankort
//!
//! Because Mastercard is checked before Dankort, a `5019` number classifies as
//! Mastercard. The order mirrors the gateway's brand table.
//!
//! # Examples
//!
//! ```
//! use cardgate_card::{CardBrand, classify};
//!
//! assert_eq!(classify("4111111111111111"), Some(CardBrand::Visa));
//! assert_eq!(classify("341111111111111"), Some(CardBrand::Amex));
//! assert_eq!(classify("0000000000000000"), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const VISA_ELECTRON_PREFIXES: [&str; 7] = ["4026", "417500", "4405", "4508", "4844", "4913", "4917"];

/// Card networks the gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardBrand {
	Visa,
	VisaElectron,
	Mastercard,
	Amex,
	Discover,
	Jcb,
	Dankort,
}

impl CardBrand {
	/// Canonical upper-case name, as used on the wire.
	pub fn as_str(&self) -> &'static str {
		match self {
			CardBrand::Visa => "VISA",
			CardBrand::VisaElectron => "VISA_ELECTRON",
			CardBrand::Mastercard => "MASTERCARD",
			CardBrand::Amex => "AMEX",
			CardBrand::Discover => "DISCOVER",
			CardBrand::Jcb => "JCB",
			CardBrand::Dankort => "DANKORT",
		}
	}

	/// Processor card type code sent to the third-party tokenization endpoint.
	pub fn processor_code(&self) -> &'static str {
		match self {
			CardBrand::Visa => "001",
			CardBrand::Mastercard => "002",
			CardBrand::Amex => "003",
			CardBrand::Discover => "004",
			CardBrand::Jcb => "007",
			CardBrand::VisaElectron => "033",
			CardBrand::Dankort => "034",
		}
	}

	/// Number of CVN digits printed on cards of this brand.
	pub fn cvn_length(&self) -> usize {
		match self {
			CardBrand::Amex => 4,
			_ => 3,
		}
	}

	/// All supported brands, in classification order.
	pub fn all() -> [CardBrand; 7] {
		[
			CardBrand::Visa,
			CardBrand::VisaElectron,
			CardBrand::Amex,
			CardBrand::Mastercard,
			CardBrand::Discover,
			CardBrand::Jcb,
			CardBrand::Dankort,
		]
	}
}

impl fmt::Display for CardBrand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unrecognised brand name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown card brand: {0}")]
pub struct ParseCardBrandError(pub String);

impl FromStr for CardBrand {
	type Err = ParseCardBrandError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		CardBrand::all()
			.into_iter()
			.find(|brand| brand.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| ParseCardBrandError(s.to_string()))
	}
}

/// Classifies a card number into a brand.
///
/// Returns `None` when no range matches; callers treat that as an invalid card.
pub fn classify(number: &str) -> Option<CardBrand> {
	if number.starts_with('4') {
		if is_visa_electron(number) {
			return Some(CardBrand::VisaElectron);
		}
		return Some(CardBrand::Visa);
	}

	if is_amex(number) {
		Some(CardBrand::Amex)
	} else if is_mastercard(number) {
		Some(CardBrand::Mastercard)
	} else if is_discover(number) {
		Some(CardBrand::Discover)
	} else if is_jcb(number) {
		Some(CardBrand::Jcb)
	} else if is_dankort(number) {
		Some(CardBrand::Dankort)
	} else {
		None
	}
}

/// Returns true for the American Express family (`34` / `37` prefixes).
pub fn is_amex(number: &str) -> bool {
	number.starts_with("34") || number.starts_with("37")
}

fn is_visa_electron(number: &str) -> bool {
	VISA_ELECTRON_PREFIXES
		.iter()
		.any(|prefix| number.starts_with(prefix))
}

fn is_mastercard(number: &str) -> bool {
	leading_number(number, 2).is_some_and(|n| (50..=55).contains(&n))
}

fn is_discover(number: &str) -> bool {
	leading_number(number, 3).is_some_and(|n| (644..=649).contains(&n))
		|| leading_number(number, 6).is_some_and(|n| (622126..=622925).contains(&n))
		|| number.starts_with("65")
		|| number.starts_with("6011")
}

// Compared numerically: a four-digit prefix outside 3528..=3589 is not JCB
// even when it sorts lexicographically inside the range.
fn is_jcb(number: &str) -> bool {
	leading_number(number, 4).is_some_and(|n| (3528..=3589).contains(&n))
}

fn is_dankort(number: &str) -> bool {
	number.starts_with("5019")
}

/// Parses up to `len` leading characters as an integer.
///
/// Shorter inputs use every character they have, so `"5"` reads as `5`.
fn leading_number(number: &str, len: usize) -> Option<u32> {
	let prefix: String = number.chars().take(len).collect();
	if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	prefix.parse().ok()
}
