use crate::access::AccessManager;
use crate::custody::CustodyManager;
use crate::types::{DataKey, Error, SaleConfig, SaleState};
use soroban_sdk::{token, Address, Env, Symbol};

pub struct LifecycleManager;

impl LifecycleManager {
    /// Mark the sale Active at initialize
    pub fn init(env: &Env) {
        env.storage()
            .instance()
            .set(&DataKey::State, &SaleState::Active);
    }

    pub fn state(env: &Env) -> Result<SaleState, Error> {
        env.storage()
            .instance()
            .get(&DataKey::State)
            .ok_or(Error::NotInitialized)
    }

    /// Reject any sale-mutating operation once Finalized
    pub fn require_active(env: &Env) -> Result<(), Error> {
        match Self::state(env)? {
            SaleState::Active => Ok(()),
            SaleState::Finalized => Err(Error::SaleFinalized),
        }
    }

    /// One-way Active -> Finalized transition: sweeps the residual sale-token
    /// balance and the whole held payment balance to the multisig, then hands
    /// the sale token's admin over to it. The state flip is committed before
    /// the external calls; the host rolls the entire invocation back if any
    /// of them fails.
    pub fn finalize_sale(
        env: &Env,
        caller: &Address,
        config: &SaleConfig,
        block: u64,
    ) -> Result<(), Error> {
        AccessManager::verify_owner(env, caller)?;
        Self::require_active(env)?;

        if block < config.schedule.end {
            return Err(Error::NotYetEnded);
        }

        env.storage()
            .instance()
            .set(&DataKey::State, &SaleState::Finalized);

        let residual_tokens = CustodyManager::remaining_supply(env, config);
        if residual_tokens > 0 {
            token::Client::new(env, &config.sale_token).transfer(
                &env.current_contract_address(),
                &config.multisig,
                &residual_tokens,
            );
        }

        let held = CustodyManager::held_balance(env, config);
        if held > 0 {
            token::Client::new(env, &config.payment_token).transfer(
                &env.current_contract_address(),
                &config.multisig,
                &held,
            );
        }

        // The multisig takes over token administration once the sale closes
        token::StellarAssetClient::new(env, &config.sale_token).set_admin(&config.multisig);

        env.events().publish(
            (Symbol::new(env, "sale_finalized"), config.multisig.clone()),
            (residual_tokens, held),
        );

        Ok(())
    }

    /// Refund the caller's whole recorded escrow, allowed once the final
    /// block has passed and independent of whether the sale was finalized
    pub fn refund(
        env: &Env,
        contributor: &Address,
        config: &SaleConfig,
        block: u64,
    ) -> Result<i128, Error> {
        if block < config.schedule.end {
            return Err(Error::NotYetEnded);
        }

        let amount = CustodyManager::pay_out_escrow(env, config, contributor)?;

        env.events()
            .publish((Symbol::new(env, "refunded"), contributor.clone()), amount);

        Ok(amount)
    }
}
