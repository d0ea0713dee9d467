//! Validation gates run before any network call.

use crate::types::{AuthenticationRequest, CardInput, PaymentError};
use cardgate_card::{
	CardBrand, classify, is_card_number_valid, is_cvn_valid, is_cvn_valid_for_brand,
	is_expiration_valid,
};
use rust_decimal::Decimal;

pub const INVALID_AMOUNT: &str = "Amount must be a number equal or greater than 0";
pub const INVALID_CARD_NUMBER: &str = "Card number is invalid";
pub const INVALID_EXPIRATION: &str = "Card expiration date is invalid";
pub const INVALID_CVN: &str = "Card CVN is invalid";
pub const INVALID_CVN_FOR_BRAND: &str = "Card CVN is invalid for this card type";
pub const INVALID_TOKEN_ID: &str = "Token id must be a string";

/// Checks card input in fixed order: amount, number, expiry, CVN, CVN for
/// brand. The first failing check is reported.
///
/// Returns the classified brand on success.
pub fn validate_card_input(input: &CardInput) -> Result<CardBrand, PaymentError> {
	if !input.is_multiple_use && !is_amount_valid(input.amount) {
		return Err(PaymentError::Validation(INVALID_AMOUNT.to_string()));
	}

	if !is_card_number_valid(&input.number) {
		return Err(PaymentError::Validation(INVALID_CARD_NUMBER.to_string()));
	}

	if !is_expiration_valid(&input.exp_month, &input.exp_year) {
		return Err(PaymentError::Validation(INVALID_EXPIRATION.to_string()));
	}

	let cvn = input.cvn.as_deref();
	if !is_cvn_valid(cvn) {
		return Err(PaymentError::Validation(INVALID_CVN.to_string()));
	}

	if !is_cvn_valid_for_brand(cvn, &input.number) {
		return Err(PaymentError::Validation(INVALID_CVN_FOR_BRAND.to_string()));
	}

	classify(&input.number).ok_or_else(|| PaymentError::Validation(INVALID_CARD_NUMBER.to_string()))
}

/// Checks an explicit authentication request: amount first, then token id.
pub fn validate_authentication_request(request: &AuthenticationRequest) -> Result<(), PaymentError> {
	if !is_amount_valid(Some(request.amount)) {
		return Err(PaymentError::Validation(INVALID_AMOUNT.to_string()));
	}

	if request.token_id.trim().is_empty() {
		return Err(PaymentError::Validation(INVALID_TOKEN_ID.to_string()));
	}

	Ok(())
}

fn is_amount_valid(amount: Option<Decimal>) -> bool {
	amount.is_some_and(|amount| !amount.is_sign_negative() || amount.is_zero())
}
