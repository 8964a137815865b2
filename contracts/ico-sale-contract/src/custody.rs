use crate::types::{DataKey, Error, SaleConfig};
use soroban_sdk::{token, Address, Env, Symbol};

pub struct CustodyManager;

impl CustodyManager {
    /// Cumulative amount ever contributed; never decremented
    pub fn total_collected(env: &Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalCollected)
            .unwrap_or(0)
    }

    /// Record a successful contribution before any token movement
    pub fn record_contribution(env: &Env, amount: i128) -> Result<(), Error> {
        let total = Self::total_collected(env)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        env.storage().instance().set(&DataKey::TotalCollected, &total);
        Ok(())
    }

    /// Remaining sale supply, read live from the token contract
    pub fn remaining_supply(env: &Env, config: &SaleConfig) -> i128 {
        token::Client::new(env, &config.sale_token).balance(&env.current_contract_address())
    }

    /// Payment balance currently staged in the sale contract
    pub fn staged_balance(env: &Env, config: &SaleConfig) -> i128 {
        token::Client::new(env, &config.payment_token).balance(&env.current_contract_address())
    }

    /// Pull a contribution into the staging balance and hand out the allocation
    pub fn settle_contribution(
        env: &Env,
        config: &SaleConfig,
        contributor: &Address,
        amount: i128,
        tokens: i128,
    ) {
        transfer_to_contract(env, &config.payment_token, contributor, &amount);
        transfer_from_contract(env, &config.sale_token, contributor, &tokens);
    }

    /// Sweep the entire staged payment balance to the multisig. A zero
    /// balance is an idempotent no-op.
    pub fn move_funds(env: &Env, config: &SaleConfig) -> i128 {
        let balance = Self::staged_balance(env, config);
        if balance == 0 {
            return 0;
        }

        transfer_from_contract(env, &config.payment_token, &config.multisig, &balance);

        env.events().publish(
            (Symbol::new(env, "funds_moved"), config.multisig.clone()),
            balance,
        );

        balance
    }
}

// Transfer tokens from contract
pub fn transfer_from_contract(env: &Env, token: &Address, to: &Address, amount: &i128) {
    token::Client::new(env, token).transfer(&env.current_contract_address(), to, amount);
}

// Transfer tokens to contract
pub fn transfer_to_contract(env: &Env, token: &Address, from: &Address, amount: &i128) {
    token::Client::new(env, token).transfer(from, &env.current_contract_address(), amount);
}
