use crate::access::AccessManager;
use crate::custody::{transfer_from_contract, CustodyManager};
use crate::types::{DataKey, Error, SaleConfig, SaleState};
use soroban_sdk::{Address, Env, Symbol};

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
    /// balance and the whole staged payment balance to the multisig. The state
    /// flip is committed before the external transfers; the host rolls the
    /// entire invocation back if either transfer fails.
    pub fn finalize_sale(env: &Env, caller: &Address, config: &SaleConfig) -> Result<(), Error> {
        AccessManager::verify_owner(env, caller)?;
        Self::require_active(env)?;

        if env.ledger().timestamp() < config.schedule.end {
            return Err(Error::NotYetEnded);
        }

        env.storage()
            .instance()
            .set(&DataKey::State, &SaleState::Finalized);

        let residual_tokens = CustodyManager::remaining_supply(env, config);
        if residual_tokens > 0 {
            transfer_from_contract(env, &config.sale_token, &config.multisig, &residual_tokens);
        }

        let staged = CustodyManager::staged_balance(env, config);
        if staged > 0 {
            transfer_from_contract(env, &config.payment_token, &config.multisig, &staged);
        }

        env.events().publish(
            (Symbol::new(env, "sale_finalized"), config.multisig.clone()),
            (residual_tokens, staged),
        );

        Ok(())
    }
}
