#![no_std]
use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

mod access;
mod custody;
mod lifecycle;
mod pricing;
mod types;

use crate::access::AccessManager;
use crate::custody::CustodyManager;
use crate::lifecycle::LifecycleManager;
use crate::pricing::PricingManager;
use crate::types::{DataKey, Error, SaleConfig, SaleSchedule, SaleState};

// Keep instance state live well past the sale window
const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;

#[contract]
pub struct IcoSaleContract;

#[contractimpl]
impl IcoSaleContract {
    /// Initialize the sale with its owner, token endpoints and pricing schedule
    pub fn initialize(
        env: Env,
        owner: Address,
        sale_token: Address,
        payment_token: Address,
        multisig: Address,
        schedule: SaleSchedule,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }

        Self::extend_instance_ttl(&env);
        owner.require_auth();
        PricingManager::validate_schedule(&schedule)?;

        let config = SaleConfig {
            sale_token,
            payment_token,
            multisig,
            schedule,
        };
        env.storage().instance().set(&DataKey::Config, &config);
        AccessManager::set_owner(&env, &owner);
        LifecycleManager::init(&env);

        env.events()
            .publish((Symbol::new(&env, "sale_initialized"),), owner);
        Ok(())
    }

    /// Contribute to the sale; returns the number of tokens allocated
    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<i128, Error> {
        contributor.require_auth();
        Self::extend_instance_ttl(&env);

        LifecycleManager::require_active(&env)?;
        let config = Self::config(&env)?;

        let coordinate = env.ledger().timestamp();
        let rate =
            PricingManager::price_for(&env, &config.schedule, coordinate, &contributor, amount)?;
        let tokens = PricingManager::allocation(amount, rate)?;

        if tokens > CustodyManager::remaining_supply(&env, &config) {
            return Err(Error::SupplyExhausted);
        }

        // Effects before interactions
        CustodyManager::record_contribution(&env, amount)?;
        CustodyManager::settle_contribution(&env, &config, &contributor, amount, tokens);

        env.events().publish(
            (Symbol::new(&env, "contributed"), contributor),
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

    /// Sweep the staged payment balance to the multisig (owner only).
    /// No-op when nothing is staged; callable any time while Active.
    pub fn move_funds(env: Env, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);
        AccessManager::verify_owner(&env, &caller)?;
        LifecycleManager::require_active(&env)?;

        let config = Self::config(&env)?;
        Ok(CustodyManager::move_funds(&env, &config))
    }

    /// Close the sale for good: sweep residual tokens and funds to the
    /// multisig (owner only, after the end boundary)
    pub fn finalize_sale(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);
        let config = Self::config(&env)?;
        LifecycleManager::finalize_sale(&env, &caller, &config)
    }

    pub fn total_collected(env: Env) -> i128 {
        CustodyManager::total_collected(&env)
    }

    pub fn get_schedule(env: Env) -> Result<SaleSchedule, Error> {
        Ok(Self::config(&env)?.schedule)
    }

    pub fn is_whitelisted(env: Env, contributor: Address) -> bool {
        AccessManager::is_whitelisted(&env, &contributor)
    }

    pub fn is_finalized(env: Env) -> Result<bool, Error> {
        Ok(LifecycleManager::state(&env)? == SaleState::Finalized)
    }
}

impl IcoSaleContract {
    fn config(env: &Env) -> Result<SaleConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }
}

#[cfg(test)]
mod test;
