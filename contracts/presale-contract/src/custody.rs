use crate::types::{CustodyDecision, DataKey, Error, SaleConfig};
use soroban_sdk::{token, Address, Env, Symbol};

pub struct CustodyManager;

impl CustodyManager {
    /// Cumulative amount ever contributed; never decremented, not even by
    /// refunds
    pub fn total_collected(env: &Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalCollected)
            .unwrap_or(0)
    }

    /// Amount a contributor can still claim back
    pub fn escrowed_of(env: &Env, contributor: &Address) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::Escrow(contributor.clone()))
            .unwrap_or(0)
    }

    /// Remaining sale supply, read live from the token contract
    pub fn remaining_supply(env: &Env, config: &SaleConfig) -> i128 {
        token::Client::new(env, &config.sale_token).balance(&env.current_contract_address())
    }

    /// Payment balance currently held by the sale contract
    pub fn held_balance(env: &Env, config: &SaleConfig) -> i128 {
        token::Client::new(env, &config.payment_token).balance(&env.current_contract_address())
    }

    /// Route a contribution's funds. Amounts at or above the minimum-funding
    /// threshold go straight to the multisig and are irrevocable; smaller
    /// amounts stay in the contract and are credited to the refund ledger.
    /// Ledger and counter writes happen before either transfer.
    pub fn route(
        env: &Env,
        config: &SaleConfig,
        contributor: &Address,
        amount: i128,
    ) -> Result<CustodyDecision, Error> {
        let total = Self::total_collected(env)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        env.storage().instance().set(&DataKey::TotalCollected, &total);

        if amount >= config.min_funding {
            transfer(env, &config.payment_token, contributor, &config.multisig, &amount);
            return Ok(CustodyDecision::Forwarded);
        }

        let escrowed = Self::escrowed_of(env, contributor)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        env.storage()
            .instance()
            .set(&DataKey::Escrow(contributor.clone()), &escrowed);

        transfer(
            env,
            &config.payment_token,
            contributor,
            &env.current_contract_address(),
            &amount,
        );

        Ok(CustodyDecision::Escrowed)
    }

    /// Pay a contributor back their whole recorded escrow. The record is
    /// zeroed (never deleted) before the transfer goes out.
    pub fn pay_out_escrow(
        env: &Env,
        config: &SaleConfig,
        contributor: &Address,
    ) -> Result<i128, Error> {
        let amount = Self::escrowed_of(env, contributor);
        if amount == 0 {
            return Err(Error::NothingToRefund);
        }

        // A sweep may have drained the contract; never under-pay
        if Self::held_balance(env, config) < amount {
            return Err(Error::InsufficientCustodyBalance);
        }

        env.storage()
            .instance()
            .set(&DataKey::Escrow(contributor.clone()), &0i128);

        transfer(
            env,
            &config.payment_token,
            &env.current_contract_address(),
            contributor,
            &amount,
        );

        Ok(amount)
    }

    /// Sweep the entire held payment balance to the multisig. Escrow records
    /// are left untouched; refund eligibility is driven by the ledger alone.
    pub fn move_funds(env: &Env, config: &SaleConfig) -> Result<i128, Error> {
        let balance = Self::held_balance(env, config);
        if balance == 0 {
            return Err(Error::InsufficientCustodyBalance);
        }

        transfer(
            env,
            &config.payment_token,
            &env.current_contract_address(),
            &config.multisig,
            &balance,
        );

        env.events().publish(
            (Symbol::new(env, "funds_moved"), config.multisig.clone()),
            balance,
        );

        Ok(balance)
    }
}

fn transfer(env: &Env, token: &Address, from: &Address, to: &Address, amount: &i128) {
    token::Client::new(env, token).transfer(from, to, amount);
}

/// Hand the allocation out of the sale's own balance
pub fn transfer_allocation(env: &Env, config: &SaleConfig, contributor: &Address, tokens: i128) {
    token::Client::new(env, &config.sale_token).transfer(
        &env.current_contract_address(),
        contributor,
        &tokens,
    );
}
