#![no_std]
use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

mod access;
mod custody;
mod lifecycle;
mod pricing;
mod types;

use crate::access::AccessManager;
use crate::custody::{transfer_allocation, CustodyManager};
use crate::lifecycle::LifecycleManager;
use crate::pricing::PricingManager;
use crate::types::{CustodyDecision, DataKey, Error, SaleConfig, SaleSchedule, SaleState};

// Keep instance state live well past the sale's block window
const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;

#[contract]
pub struct PresaleContract;

#[contractimpl]
impl PresaleContract {
    /// Initialize the presale with its owner, token endpoints, block schedule
    /// and the minimum-funding threshold that decides escrow vs. forwarding
    pub fn initialize(
        env: Env,
        owner: Address,
        sale_token: Address,
        payment_token: Address,
        multisig: Address,
        schedule: SaleSchedule,
        min_funding: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }

        Self::extend_instance_ttl(&env);
        owner.require_auth();
        PricingManager::validate_schedule(&schedule)?;
        if min_funding <= 0 {
            return Err(Error::InvalidSchedule);
        }

        let config = SaleConfig {
            sale_token,
            payment_token,
            multisig,
            schedule,
            min_funding,
        };
        env.storage().instance().set(&DataKey::Config, &config);
        AccessManager::set_owner(&env, &owner);
        LifecycleManager::init(&env);

        env.events()
            .publish((Symbol::new(&env, "sale_initialized"),), owner);
        Ok(())
    }

    /// Contribute to the presale; returns the number of tokens allocated.
    /// Funds are escrowed or forwarded depending on the contribution size.
    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<i128, Error> {
        contributor.require_auth();
        Self::extend_instance_ttl(&env);

        LifecycleManager::require_active(&env)?;
        let config = Self::config(&env)?;

        let block = Self::current_block(&env);
        let rate = PricingManager::price_for(&env, &config.schedule, block, &contributor, amount)?;
        let tokens = PricingManager::allocation(amount, rate)?;

        if tokens > CustodyManager::remaining_supply(&env, &config) {
            return Err(Error::SupplyExhausted);
        }

        let decision = CustodyManager::route(&env, &config, &contributor, amount)?;
        transfer_allocation(&env, &config, &contributor, tokens);

        let topic = match decision {
            CustodyDecision::Escrowed => "escrowed",
            CustodyDecision::Forwarded => "forwarded",
        };
        env.events().publish(
            (Symbol::new(&env, topic), contributor),
            (amount, tokens, rate),
        );

        Ok(tokens)
    }

    /// Set the whitelist flag for a contributor (owner only)
    pub fn set_whitelist_status(
        env: Env,
        caller: Address,
        contributor: Address,
        status: bool,
    ) -> Result<(), Error> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);
        AccessManager::set_whitelist_status(&env, &caller, &contributor, status)
    }

    /// Sweep the whole held payment balance to the multisig (owner only).
    /// Escrow records survive the sweep.
    pub fn move_funds(env: Env, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);
        AccessManager::verify_owner(&env, &caller)?;
        LifecycleManager::require_active(&env)?;

        let config = Self::config(&env)?;
        CustodyManager::move_funds(&env, &config)
    }

    /// Close the presale for good: sweep residual tokens and funds to the
    /// multisig and hand the token admin over (owner only, after the final
    /// block)
    pub fn finalize_sale(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);
        let config = Self::config(&env)?;
        LifecycleManager::finalize_sale(&env, &caller, &config, Self::current_block(&env))
    }

    /// Claim back everything the caller still has in escrow. Open to anyone
    /// with a non-zero record once the final block has passed.
    pub fn refund(env: Env, contributor: Address) -> Result<i128, Error> {
        contributor.require_auth();
        Self::extend_instance_ttl(&env);
        let config = Self::config(&env)?;
        LifecycleManager::refund(&env, &contributor, &config, Self::current_block(&env))
    }

    /// Rewrite the three block boundaries, keeping the configured rates
    /// (owner only). Ordering is deliberately not re-validated here.
    pub fn change_sale_blocks(
        env: Env,
        caller: Address,
        initial_block: u64,
        discount_block: u64,
        final_block: u64,
    ) -> Result<(), Error> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);
        AccessManager::verify_owner(&env, &caller)?;

        let mut config = Self::config(&env)?;
        let mut tiers = config.schedule.tiers.clone();
        let mut full_price = tiers.get_unchecked(0);
        let mut discount = tiers.get_unchecked(1);
        full_price.opens_at = initial_block;
        discount.opens_at = discount_block;
        tiers.set(0, full_price);
        tiers.set(1, discount);

        config.schedule.start = initial_block;
        config.schedule.end = final_block;
        config.schedule.tiers = tiers;
        env.storage().instance().set(&DataKey::Config, &config);

        env.events().publish(
            (Symbol::new(&env, "blocks_changed"),),
            (initial_block, discount_block, final_block),
        );

        Ok(())
    }

    pub fn total_collected(env: Env) -> i128 {
        CustodyManager::total_collected(&env)
    }

    pub fn escrowed_of(env: Env, contributor: Address) -> i128 {
        CustodyManager::escrowed_of(&env, &contributor)
    }

    pub fn get_schedule(env: Env) -> Result<SaleSchedule, Error> {
        Ok(Self::config(&env)?.schedule)
    }

    pub fn get_min_funding(env: Env) -> Result<i128, Error> {
        Ok(Self::config(&env)?.min_funding)
    }

    pub fn is_whitelisted(env: Env, contributor: Address) -> bool {
        AccessManager::is_whitelisted(&env, &contributor)
    }

    pub fn is_finalized(env: Env) -> Result<bool, Error> {
        Ok(LifecycleManager::state(&env)? == SaleState::Finalized)
    }
}

impl PresaleContract {
    fn config(env: &Env) -> Result<SaleConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    /// The presale is gated on the ledger sequence number, not wall-clock time
    fn current_block(env: &Env) -> u64 {
        env.ledger().sequence() as u64
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }
}
