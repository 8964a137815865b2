use soroban_sdk::{contracterror, contracttype, Address, Vec};

/// Storage keys for contract data
#[contracttype]
pub enum DataKey {
    Owner,              // Sale owner (the only identity allowed to administer)
    Config,             // SaleConfig
    State,              // SaleState
    TotalCollected,     // Cumulative amount ever contributed
    Whitelist(Address), // Contributor -> whitelisted flag
}

/// Immutable sale configuration, written once at initialize
#[contracttype]
#[derive(Clone)]
pub struct SaleConfig {
    pub sale_token: Address,    // Token being sold
    pub payment_token: Address, // Token contributions are paid in
    pub multisig: Address,      // Custodial wallet receiving proceeds
    pub schedule: SaleSchedule,
}

/// Sale window and tier pricing ladder
#[contracttype]
#[derive(Clone)]
pub struct SaleSchedule {
    pub start: u64,
    pub end: u64,
    pub tiers: Vec<PriceTier>, // Ordered, tiers[0].opens_at == start
    pub whitelist_rate: i128,  // Strictly above every public tier rate
    pub min_contribution: i128,
}

/// A pricing tier: holds from `opens_at` until the next tier opens
#[contracttype]
#[derive(Clone)]
pub struct PriceTier {
    pub opens_at: u64,
    pub rate: i128, // Sale-token units per payment-token unit
}

/// Sale lifecycle, one legal transition: Active -> Finalized
#[contracttype]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SaleState {
    Active,
    Finalized,
}

/// Contract error types
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,         // Contract already set up
    NotInitialized = 2,             // Contract not initialized
    Unauthorized = 3,               // Caller is not the sale owner
    InvalidSchedule = 4,            // Boundaries not ordered or rates invalid
    OutOfWindow = 5,                // Contribution outside the sale window
    BelowMinimum = 6,               // Contribution under the configured floor
    SupplyExhausted = 7,            // Allocation exceeds remaining sale supply
    SaleFinalized = 8,              // Sale already finalized
    NotYetEnded = 9,                // Finalize attempted before the end boundary
    InsufficientCustodyBalance = 11, // Sweep would pay out more than held
    Overflow = 12,                  // Arithmetic overflow in pricing
}
