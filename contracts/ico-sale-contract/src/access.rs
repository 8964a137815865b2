use crate::types::{DataKey, Error};
use soroban_sdk::{Address, Env, Symbol};

pub struct AccessManager;

impl AccessManager {
    /// Store the sale owner at initialize
    pub fn set_owner(env: &Env, owner: &Address) {
        env.storage().instance().set(&DataKey::Owner, owner);
    }

    /// Verify the caller is the stored sale owner
    pub fn verify_owner(env: &Env, caller: &Address) -> Result<(), Error> {
        let owner: Address = env
            .storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)?;

        if caller != &owner {
            return Err(Error::Unauthorized);
        }

        Ok(())
    }

    /// Set the whitelist flag for a contributor (owner only)
    pub fn set_whitelist_status(
        env: &Env,
        caller: &Address,
        contributor: &Address,
        status: bool,
    ) -> Result<(), Error> {
        Self::verify_owner(env, caller)?;

        env.storage()
            .instance()
            .set(&DataKey::Whitelist(contributor.clone()), &status);

        env.events().publish(
            (Symbol::new(env, "whitelist_updated"), contributor.clone()),
            status,
        );

        Ok(())
    }

    /// Check if a contributor is whitelisted
    pub fn is_whitelisted(env: &Env, contributor: &Address) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Whitelist(contributor.clone()))
            .unwrap_or(false)
    }
}
