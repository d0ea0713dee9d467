//! # Cardgate Card
//!
//! Client-side checks run before any card data leaves the caller:
//!
//! - **Brand classification**: maps a card number prefix to a [`CardBrand`]
//! - **Card number**: digits only, 12-19 long, known brand, Luhn checksum
//! - **Expiry**: month 1-12, year inside a fixed 2016-2100 window
//! - **CVN**: optional; brand-aware length check (4 digits for Amex, 3 otherwise)
//!
//! Every function here is pure and performs no I/O.

pub mod brand;
pub mod validators;

pub use brand::{CardBrand, ParseCardBrandError, classify, is_amex};
pub use validators::{
	is_card_number_valid, is_cvn_valid, is_cvn_valid_for_brand, is_expiration_valid, is_luhn_valid,
};
