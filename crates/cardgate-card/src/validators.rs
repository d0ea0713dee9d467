//! Pure card data validators.
//!
//! All functions are synchronous and deterministic; the same input always
//! produces the same answer.

use crate::brand::classify;

/// Shortest card number the gateway accepts.
pub const MIN_CARD_NUMBER_LENGTH: usize = 12;
/// Longest card number the gateway accepts.
pub const MAX_CARD_NUMBER_LENGTH: usize = 19;
/// Fixed acceptance window for expiry years.
pub const EXPIRY_YEAR_RANGE: std::ops::RangeInclusive<u64> = 2016..=2100;
/// Longest CVN accepted by [`is_cvn_valid`].
pub const MAX_CVN_LENGTH: usize = 4;

fn is_all_digits(value: &str) -> bool {
	!value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validates a card number: digits only, 12-19 long, a known brand and a
/// passing Luhn checksum.
///
/// ```
/// use cardgate_card::is_card_number_valid;
///
/// assert!(is_card_number_valid("4111111111111111"));
/// assert!(!is_card_number_valid("4111111111111112"));
/// ```
pub fn is_card_number_valid(number: &str) -> bool {
	is_all_digits(number)
		&& (MIN_CARD_NUMBER_LENGTH..=MAX_CARD_NUMBER_LENGTH).contains(&number.len())
		&& classify(number).is_some()
		&& is_luhn_valid(number)
}

/// Luhn (mod 10) checksum.
///
/// Walking from the rightmost digit, every second digit is doubled and
/// reduced by 9 when it exceeds 9. Non-digit characters are ignored.
pub fn is_luhn_valid(number: &str) -> bool {
	let sum: u32 = number
		.bytes()
		.filter(u8::is_ascii_digit)
		.rev()
		.enumerate()
		.map(|(index, byte)| {
			let digit = u32::from(byte - b'0');
			if index % 2 == 1 {
				let doubled = digit * 2;
				if doubled > 9 { doubled - 9 } else { doubled }
			} else {
				digit
			}
		})
		.sum();

	sum % 10 == 0
}

/// Validates an expiry month/year pair against the fixed acceptance window.
///
/// No comparison against the current date is made.
pub fn is_expiration_valid(month: &str, year: &str) -> bool {
	if !is_all_digits(month) || !is_all_digits(year) {
		return false;
	}

	let (Ok(month), Ok(year)) = (month.parse::<u64>(), year.parse::<u64>()) else {
		return false;
	};

	(1..=12).contains(&month) && EXPIRY_YEAR_RANGE.contains(&year)
}

/// Validates a CVN without reference to the card brand.
///
/// An absent or empty CVN is valid since the field is optional.
pub fn is_cvn_valid(cvn: Option<&str>) -> bool {
	match cvn {
		None | Some("") => true,
		Some(cvn) => is_all_digits(cvn) && cvn.len() <= MAX_CVN_LENGTH,
	}
}

/// Validates a CVN against the brand of `number`.
///
/// A present CVN must be numeric and nonzero, four digits long for the
/// American Express family and three digits otherwise.
pub fn is_cvn_valid_for_brand(cvn: Option<&str>, number: &str) -> bool {
	match cvn {
		None | Some("") => true,
		Some(cvn) => {
			if !is_all_digits(cvn) || cvn.bytes().all(|b| b == b'0') {
				return false;
			}
			let expected = classify(number).map_or(3, |brand| brand.cvn_length());
			cvn.len() == expected
		}
	}
}
