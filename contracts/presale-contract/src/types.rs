use soroban_sdk::{contracterror, contracttype, Address, Vec};

/// Storage keys for contract data
#[contracttype]
pub enum DataKey {
    Owner,            // Sale owner (the only identity allowed to administer)
    Config,           // SaleConfig
    State,            // SaleState
    TotalCollected,   // Cumulative amount ever contributed
    Whitelist(Address), // Contributor -> whitelisted flag
    Escrow(Address),  // Contributor -> refundable amount held by the contract
}

/// Sale configuration; the block schedule is the only part the owner may
/// rewrite after initialize
#[contracttype]
#[derive(Clone)]
pub struct SaleConfig {
    pub sale_token: Address,    // Token being sold
    pub payment_token: Address, // Token contributions are paid in
    pub multisig: Address,      // Custodial wallet receiving proceeds
    pub schedule: SaleSchedule,
    pub min_funding: i128, // Single contributions at or above this forward straight to the multisig
}

/// Block-number window and the two-tier pricing ladder
#[contracttype]
#[derive(Clone)]
pub struct SaleSchedule {
    pub start: u64, // Initial block
    pub end: u64,   // Final block
    pub tiers: Vec<PriceTier>, // tiers[0] opens at start, tiers[1] at the discount block
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

/// Where a contribution's funds ended up
#[contracttype]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CustodyDecision {
    Escrowed,  // Held by the sale contract, refundable after the final block
    Forwarded, // Sent straight to the multisig, irrevocable
}

/// Contract error types
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,          // Contract already set up
    NotInitialized = 2,              // Contract not initialized
    Unauthorized = 3,                // Caller is not the sale owner
    InvalidSchedule = 4,             // Boundaries not ordered or rates invalid
    OutOfWindow = 5,                 // Contribution outside the sale window
    BelowMinimum = 6,                // Contribution under the configured floor
    SupplyExhausted = 7,             // Allocation exceeds remaining sale supply
    SaleFinalized = 8,               // Sale already finalized
    NotYetEnded = 9,                 // Operation attempted before the final block
    NothingToRefund = 10,            // Caller has no recorded escrow
    InsufficientCustodyBalance = 11, // Payout would exceed the held balance
    Overflow = 12,                   // Arithmetic overflow in pricing
}
