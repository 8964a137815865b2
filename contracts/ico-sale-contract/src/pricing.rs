use crate::access::AccessManager;
use crate::types::{Error, SaleSchedule};
use soroban_sdk::{Address, Env};

pub struct PricingManager;

impl PricingManager {
    /// Validate a schedule at initialize: boundaries strictly ordered inside
    /// the window, rates positive, whitelist rate above every public tier
    pub fn validate_schedule(schedule: &SaleSchedule) -> Result<(), Error> {
        if schedule.start >= schedule.end || schedule.tiers.is_empty() {
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
    /// window check and always receive the whitelist rate; the minimum
    /// contribution floor applies to everyone.
    pub fn price_for(
        env: &Env,
        schedule: &SaleSchedule,
        coordinate: u64,
        contributor: &Address,
        amount: i128,
    ) -> Result<i128, Error> {
        let whitelisted = AccessManager::is_whitelisted(env, contributor);

        if !whitelisted && (coordinate < schedule.start || coordinate >= schedule.end) {
            return Err(Error::OutOfWindow);
        }

        if amount < schedule.min_contribution {
            return Err(Error::BelowMinimum);
        }

        if whitelisted {
            return Ok(schedule.whitelist_rate);
        }

        Ok(Self::rate_at(schedule, coordinate))
    }

    /// Select the tier rate for a coordinate. Tiers hold over half-open
    /// intervals: a coordinate equal to a boundary belongs to the tier that
    /// boundary opens.
    fn rate_at(schedule: &SaleSchedule, coordinate: u64) -> i128 {
        let mut rate = schedule.tiers.get_unchecked(0).rate;
        for tier in schedule.tiers.iter() {
            if coordinate >= tier.opens_at {
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
