use crate::access::AccessManager;
use crate::types::{Error, SaleSchedule};
use soroban_sdk::{Address, Env};

/// The presale ladder is fixed at two tiers: the full-price tier opening at
/// the initial block and the discount tier opening at the discount block.
pub const TIER_COUNT: u32 = 2;

pub struct PricingManager;

impl PricingManager {
    /// Validate a schedule at initialize: exactly two tiers, boundaries
    /// strictly ordered inside the window, rates positive, whitelist rate
    /// above both public tiers
    pub fn validate_schedule(schedule: &SaleSchedule) -> Result<(), Error> {
        if schedule.start >= schedule.end || schedule.tiers.len() != TIER_COUNT {
            return Err(Error::InvalidSchedule);
        }
        if schedule.tiers.get_unchecked(0).opens_at != schedule.start {
            return Err(Error::InvalidSchedule);
        }
        if schedule.min_contribution <= 0 {
            return Err(Error::InvalidSchedule);
        }

        let mut prev_boundary = 0u64;
        let mut best_rate = 0i128;
        for (i, tier) in schedule.tiers.iter().enumerate() {
            if tier.rate <= 0 {
                return Err(Error::InvalidSchedule);
            }
            if i > 0 && tier.opens_at <= prev_boundary {
                return Err(Error::InvalidSchedule);
            }
            if tier.opens_at >= schedule.end {
                return Err(Error::InvalidSchedule);
            }
            prev_boundary = tier.opens_at;
            if tier.rate > best_rate {
                best_rate = tier.rate;
            }
        }

        if schedule.whitelist_rate <= best_rate {
            return Err(Error::InvalidSchedule);
        }

        Ok(())
    }

    /// Gate a contribution and price it. Whitelisted contributors bypass the
    /// block-window check and always receive the whitelist rate; the minimum
    /// contribution floor applies to everyone.
    pub fn price_for(
        env: &Env,
        schedule: &SaleSchedule,
        block: u64,
        contributor: &Address,
        amount: i128,
    ) -> Result<i128, Error> {
        let whitelisted = AccessManager::is_whitelisted(env, contributor);

        if !whitelisted && (block < schedule.start || block >= schedule.end) {
            return Err(Error::OutOfWindow);
        }

        if amount < schedule.min_contribution {
            return Err(Error::BelowMinimum);
        }

        if whitelisted {
            return Ok(schedule.whitelist_rate);
        }

        Ok(Self::rate_at(schedule, block))
    }

    /// Select the tier rate for a block. A block equal to the discount
    /// boundary already prices at the discount rate.
    fn rate_at(schedule: &SaleSchedule, block: u64) -> i128 {
        let mut rate = schedule.tiers.get_unchecked(0).rate;
        for tier in schedule.tiers.iter() {
            if block >= tier.opens_at {
                rate = tier.rate;
            }
        }
        rate
    }

    /// Tokens allocated for an amount at a rate, guarded against overflow
    pub fn allocation(amount: i128, rate: i128) -> Result<i128, Error> {
        amount.checked_mul(rate).ok_or(Error::Overflow)
    }
}
