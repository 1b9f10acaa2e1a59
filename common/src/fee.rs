//! Local model of the governance fee charge and of the cycles each service
//! method consumes, used to predict what the chain will deduct.
//!
//! ## Fee formula
//! ```text
//! fee      = floor(profit * profit_deduct_rate_per_million / 1_000_000)
//! fee      = floor(fee * discount_percent / 100)
//! fee      = max(fee, tx_floor_fee)
//! charged  = fee                if balance >= fee
//!          = tx_failure_fee     otherwise
//! ```
//! `discount_percent` comes from the highest discount level whose threshold
//! does not exceed the payer's balance, 100 when none applies.

use crate::service::governance::{DiscountLevel, GovernanceInfo};

const MILLION: u128 = 1_000_000;
const HUNDRED: u128 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeSchedule {
    pub tx_failure_fee: u64,
    pub tx_floor_fee: u64,
    pub profit_deduct_rate_per_million: u64,
    // Sorted by ascending threshold
    discounts: Vec<DiscountLevel>,
}

impl From<&GovernanceInfo> for FeeSchedule {
    fn from(info: &GovernanceInfo) -> Self {
        let mut discounts = info.tx_fee_discount.clone();
        discounts.sort_by_key(|level| level.threshold);

        Self {
            tx_failure_fee: info.tx_failure_fee,
            tx_floor_fee: info.tx_floor_fee,
            profit_deduct_rate_per_million: info.profit_deduct_rate_per_million,
            discounts,
        }
    }
}

impl FeeSchedule {
    pub fn discounts(&self) -> &[DiscountLevel] {
        &self.discounts
    }

    pub fn discount_percent(&self, balance: u64) -> u64 {
        self.discounts
            .iter()
            .rev()
            .find(|level| level.threshold <= balance)
            .map(|level| level.discount_percent)
            .unwrap_or(HUNDRED as u64)
    }

    /// Fee the chain computes for `profit` accumulated by a payer holding `balance`
    pub fn fee_for_profit(&self, balance: u64, profit: u64) -> Option<u64> {
        let fee = profit as u128 * self.profit_deduct_rate_per_million as u128 / MILLION;
        let fee = fee * self.discount_percent(balance) as u128 / HUNDRED;
        let fee = u64::try_from(fee).ok()?;
        Some(fee.max(self.tx_floor_fee))
    }

    /// Smallest profit whose fee is `actual_fee`, or the floor fee when
    /// `actual_fee` is below it. `None` when no profit yields that fee.
    pub fn profit_for_fee(&self, balance: u64, actual_fee: u64) -> Option<u64> {
        let target = actual_fee.max(self.tx_floor_fee);
        let discount = self.discount_percent(balance) as u128;
        let rate = self.profit_deduct_rate_per_million as u128;

        if discount == 0 || rate == 0 {
            // Every profit is charged exactly the floor fee
            return (target == self.tx_floor_fee).then_some(0);
        }

        let before_discount = (target as u128 * HUNDRED).div_ceil(discount);
        let profit = (before_discount * MILLION).div_ceil(rate);
        u64::try_from(profit).ok()
    }

    /// Amount deducted from a payer holding `balance` when the fee is `fee`
    pub fn expected_charge(&self, balance: u64, fee: u64) -> u64 {
        if balance >= fee {
            fee
        } else {
            self.tx_failure_fee
        }
    }

    pub fn charge_for_profit(&self, balance: u64, profit: u64) -> Option<u64> {
        self.fee_for_profit(balance, profit)
            .map(|fee| self.expected_charge(balance, fee))
    }
}

/// Cycles charged by service methods
pub mod cycles {
    /// Every write costs at least this much, whether it succeeds or not
    pub const BASIC_FEE: u64 = 51_000;
    pub const RELAY_SURCHARGE: u64 = 21_000;

    const PER_BYTE: u64 = 1_000;
    const PER_TAG: u64 = 10_000;
    // Fixed byte allowance added to every registered org
    const ORG_OVERHEAD_BYTES: u64 = 20;

    pub fn relay() -> u64 {
        BASIC_FEE + RELAY_SURCHARGE
    }

    pub fn kyc_register_org(name_len: usize, description_len: usize, tag_count: usize) -> u64 {
        BASIC_FEE
            + (name_len as u64 + description_len as u64 + ORG_OVERHEAD_BYTES) * PER_BYTE
            + tag_count as u64 * PER_TAG
    }

    pub fn kyc_update_supported_tags(tag_count: usize) -> u64 {
        BASIC_FEE + tag_count as u64 * PER_TAG
    }

    pub fn kyc_update_user_tags(tag_count: usize, values_per_tag: usize) -> u64 {
        BASIC_FEE + (tag_count as u64 + 1) * values_per_tag as u64 * PER_TAG
    }
}
