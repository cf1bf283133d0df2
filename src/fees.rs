// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::model::TicketError;

/// The smallest nominal a ticket may be opened for.
pub const MINIMUM_NOMINAL: u64 = 1_000;

/// Nominals above this are charged a percentage instead of a flat fee.
const PERCENT_THRESHOLD: u64 = 300_000;

/// One row of the service-fee schedule. Bounds are inclusive, and the table is
/// scanned in order: where two rows share a boundary, the earlier row wins.
struct FeeTier {
	min: u64,
	max: u64,
	fee: u64,
}

const FEE_TIERS: [FeeTier; 5] = [
	FeeTier {
		min: 1_000,
		max: 9_000,
		fee: 2_000,
	},
	FeeTier {
		min: 10_000,
		max: 49_000,
		fee: 3_000,
	},
	FeeTier {
		min: 50_000,
		max: 99_000,
		fee: 4_000,
	},
	FeeTier {
		min: 100_000,
		max: 150_000,
		fee: 7_000,
	},
	FeeTier {
		min: 150_000,
		max: 300_000,
		fee: 10_000,
	},
];

/// Computes the service fee for a transaction nominal.
pub fn fee(nominal: u64) -> u64 {
	for tier in &FEE_TIERS {
		if (tier.min..=tier.max).contains(&nominal) {
			return tier.fee;
		}
	}
	if nominal > PERCENT_THRESHOLD {
		// 5% of the nominal, rounded down
		return nominal / 20;
	}
	0
}

/// Reads a transaction nominal from form input. Non-digit characters (currency
/// prefixes, thousands separators) are stripped before parsing.
pub fn parse_nominal(raw: &str) -> Result<u64, TicketError> {
	let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
	if digits.is_empty() {
		return Err(TicketError::InvalidAmount);
	}
	let nominal: u64 = digits.parse().map_err(|_| TicketError::InvalidAmount)?;
	if nominal < MINIMUM_NOMINAL {
		return Err(TicketError::InvalidAmount);
	}
	Ok(nominal)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flat_tiers_cover_tabulated_ranges() {
		assert_eq!(fee(1_000), 2_000);
		assert_eq!(fee(9_000), 2_000);
		assert_eq!(fee(10_000), 3_000);
		assert_eq!(fee(30_000), 3_000);
		assert_eq!(fee(49_000), 3_000);
		assert_eq!(fee(50_000), 4_000);
		assert_eq!(fee(99_000), 4_000);
		assert_eq!(fee(100_000), 7_000);
	}

	#[test]
	fn shared_boundary_goes_to_the_earlier_tier() {
		// 150,000 appears in two rows; the first one listed wins.
		assert_eq!(fee(149_999), 7_000);
		assert_eq!(fee(150_000), 7_000);
		assert_eq!(fee(150_001), 10_000);
		assert_eq!(fee(300_000), 10_000);
	}

	#[test]
	fn large_nominals_pay_five_percent_rounded_down() {
		assert_eq!(fee(300_001), 15_000);
		assert_eq!(fee(400_000), 20_000);
		assert_eq!(fee(1_000_019), 50_000);
	}

	#[test]
	fn nominals_below_the_minimum_carry_no_fee() {
		assert_eq!(fee(999), 0);
		assert_eq!(fee(0), 0);
	}

	#[test]
	fn parse_strips_formatting_characters() {
		assert_eq!(parse_nominal("30000"), Ok(30_000));
		assert_eq!(parse_nominal("Rp 30.000"), Ok(30_000));
		assert_eq!(parse_nominal("150,000"), Ok(150_000));
	}

	#[test]
	fn parse_rejects_malformed_and_small_amounts() {
		assert_eq!(parse_nominal(""), Err(TicketError::InvalidAmount));
		assert_eq!(parse_nominal("gratis"), Err(TicketError::InvalidAmount));
		assert_eq!(parse_nominal("999"), Err(TicketError::InvalidAmount));
		assert_eq!(parse_nominal("99999999999999999999999999"), Err(TicketError::InvalidAmount));
	}
}
