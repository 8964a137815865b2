#![cfg(test)]
extern crate std;

use crate::types::{PriceTier, SaleSchedule};
use crate::{IcoSaleContract, IcoSaleContractClient};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{token, vec, Address, Env};

// One whole payment/sale token (7 decimals, stroops)
const UNIT: i128 = 10_000_000;
const SUPPLY: i128 = 10_000 * UNIT;

struct Sale {
    env: Env,
    owner: Address,
    multisig: Address,
    client: IcoSaleContractClient<'static>,
    sale_token: TokenClient<'static>,
    payment_token: TokenClient<'static>,
    payment_admin: StellarAssetClient<'static>,
}

fn create_token_contract<'a>(
    e: &Env,
    admin: &Address,
) -> (token::Client<'a>, token::StellarAssetClient<'a>) {
    let sac = e.register_stellar_asset_contract_v2(admin.clone());
    (
        token::Client::new(e, &sac.address()),
        token::StellarAssetClient::new(e, &sac.address()),
    )
}

fn schedule(env: &Env) -> SaleSchedule {
    SaleSchedule {
        start: 10,
        end: 3_000_000,
        tiers: vec![
            env,
            PriceTier {
                opens_at: 10,
                rate: 1200,
            },
            PriceTier {
                opens_at: 20,
                rate: 1150,
            },
            PriceTier {
                opens_at: 30,
                rate: 1100,
            },
            PriceTier {
                opens_at: 40,
                rate: 1050,
            },
        ],
        whitelist_rate: 1400,
        min_contribution: UNIT / 10,
    }
}

impl Sale {
    fn new() -> Self {
        Self::with_supply(SUPPLY)
    }

    fn with_supply(supply: i128) -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let owner = Address::generate(&env);
        let multisig = Address::generate(&env);

        let sale_address = env.register(IcoSaleContract, ());
        let client = IcoSaleContractClient::new(&env, &sale_address);

        let (sale_token, sale_admin) = create_token_contract(&env, &owner);
        let (payment_token, payment_admin) = create_token_contract(&env, &owner);

        if supply > 0 {
            sale_admin.mint(&sale_address, &supply);
        }

        client.initialize(
            &owner,
            &sale_token.address,
            &payment_token.address,
            &multisig,
            &schedule(&env),
        );

        Sale {
            env,
            owner,
            multisig,
            client,
            sale_token,
            payment_token,
            payment_admin,
        }
    }

    fn fund_contributor(&self, amount: i128) -> Address {
        let contributor = Address::generate(&self.env);
        self.payment_admin.mint(&contributor, &amount);
        contributor
    }

    fn set_timestamp(&self, timestamp: u64) {
        self.env.ledger().with_mut(|ledger| {
            ledger.timestamp = timestamp;
        });
    }
}

#[test]
fn test_sale_holds_full_supply() {
    let sale = Sale::new();
    assert_eq!(
        sale.sale_token.balance(&sale.client.address),
        SUPPLY,
        "sale contract should hold the whole minted supply"
    );
}

#[test]
#[should_panic(expected = "#1")]
fn test_initialize_twice_rejected() {
    let sale = Sale::new();
    sale.client.initialize(
        &sale.owner,
        &sale.sale_token.address,
        &sale.payment_token.address,
        &sale.multisig,
        &schedule(&sale.env),
    );
}

#[test]
#[should_panic(expected = "#4")]
fn test_initialize_rejects_flat_whitelist_rate() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let multisig = Address::generate(&env);
    let sale_address = env.register(IcoSaleContract, ());
    let client = IcoSaleContractClient::new(&env, &sale_address);
    let (sale_token, _) = create_token_contract(&env, &owner);
    let (payment_token, _) = create_token_contract(&env, &owner);

    let mut bad = schedule(&env);
    bad.whitelist_rate = 1200; // Not strictly above the best public tier

    client.initialize(
        &owner,
        &sale_token.address,
        &payment_token.address,
        &multisig,
        &bad,
    );
}

#[test]
#[should_panic(expected = "#5")]
fn test_contribute_before_start_rejected() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(UNIT);
    sale.set_timestamp(5);
    sale.client.contribute(&contributor, &UNIT);
}

#[test]
#[should_panic(expected = "#5")]
fn test_contribute_after_end_rejected() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(UNIT);
    sale.set_timestamp(3_000_000);
    sale.client.contribute(&contributor, &UNIT);
}

#[test]
#[should_panic(expected = "#6")]
fn test_contribute_below_minimum_rejected() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(UNIT);
    sale.set_timestamp(10);
    sale.client.contribute(&contributor, &(UNIT / 100));
}

#[test]
fn test_tier_allocations() {
    // (coordinate, expected rate); boundaries open the tier they start
    let cases = [
        (10u64, 1200i128),
        (19, 1200),
        (20, 1150),
        (30, 1100),
        (40, 1050),
        (100, 1050),
        (2_999_999, 1050),
    ];

    for (coordinate, rate) in cases {
        let sale = Sale::new();
        let contributor = sale.fund_contributor(UNIT);
        sale.set_timestamp(coordinate);
        let tokens = sale.client.contribute(&contributor, &UNIT);
        assert_eq!(tokens, UNIT * rate, "wrong rate at coordinate {coordinate}");
        assert_eq!(sale.sale_token.balance(&contributor), UNIT * rate);
    }
}

#[test]
fn test_contribution_reduces_supply() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(UNIT);
    sale.set_timestamp(10);
    sale.client.contribute(&contributor, &UNIT);
    assert_eq!(
        sale.sale_token.balance(&sale.client.address),
        SUPPLY - 1200 * UNIT
    );
}

#[test]
fn test_whitelisted_contributor_bypasses_window() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(UNIT);
    sale.client
        .set_whitelist_status(&sale.owner, &contributor, &true);
    assert!(sale.client.is_whitelisted(&contributor));

    // Ledger time is 0, well before the sale opens
    let tokens = sale.client.contribute(&contributor, &UNIT);
    assert_eq!(tokens, 1400 * UNIT);
}

#[test]
fn test_whitelisted_contribution_after_end() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(UNIT);
    sale.client
        .set_whitelist_status(&sale.owner, &contributor, &true);

    sale.set_timestamp(3_000_000);
    let tokens = sale.client.contribute(&contributor, &UNIT);
    assert_eq!(tokens, 1400 * UNIT);
}

#[test]
#[should_panic(expected = "#6")]
fn test_whitelist_does_not_exempt_minimum() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(UNIT);
    sale.client
        .set_whitelist_status(&sale.owner, &contributor, &true);
    sale.client.contribute(&contributor, &(UNIT / 100));
}

#[test]
#[should_panic(expected = "#3")]
fn test_whitelist_update_requires_owner() {
    let sale = Sale::new();
    let intruder = Address::generate(&sale.env);
    let contributor = Address::generate(&sale.env);
    sale.client
        .set_whitelist_status(&intruder, &contributor, &true);
}

#[test]
#[should_panic(expected = "#7")]
fn test_oversized_contribution_rejected() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(9 * UNIT);
    sale.set_timestamp(10);
    // 9 * 1200 = 10_800 tokens against a 10_000 supply
    sale.client.contribute(&contributor, &(9 * UNIT));
}

#[test]
fn test_contribution_just_inside_supply() {
    let sale = Sale::new();
    let amount = 83 * UNIT / 10; // 8.3 units -> 9_960 tokens
    let contributor = sale.fund_contributor(amount);
    sale.set_timestamp(10);
    let tokens = sale.client.contribute(&contributor, &amount);
    assert_eq!(tokens, amount * 1200);
}

#[test]
#[should_panic(expected = "#7")]
fn test_contribute_with_no_supply_rejected() {
    let sale = Sale::with_supply(0);
    let contributor = sale.fund_contributor(UNIT);
    sale.set_timestamp(10);
    sale.client.contribute(&contributor, &UNIT);
}

#[test]
#[should_panic(expected = "#9")]
fn test_finalize_before_end_rejected() {
    let sale = Sale::new();
    sale.set_timestamp(2_999_999);
    sale.client.finalize_sale(&sale.owner);
}

#[test]
#[should_panic(expected = "#3")]
fn test_finalize_requires_owner() {
    let sale = Sale::new();
    let intruder = Address::generate(&sale.env);
    sale.set_timestamp(3_000_000);
    sale.client.finalize_sale(&intruder);
}

#[test]
fn test_finalize_sweeps_tokens_and_funds() {
    let sale = Sale::new();
    let first = sale.fund_contributor(2 * UNIT);
    let second = sale.fund_contributor(3 * UNIT);

    sale.set_timestamp(10);
    sale.client.contribute(&first, &(2 * UNIT));
    sale.set_timestamp(86_410);
    sale.client.contribute(&second, &(3 * UNIT));

    assert_eq!(sale.sale_token.balance(&sale.multisig), 0);

    sale.set_timestamp(3_000_000);
    sale.client.finalize_sale(&sale.owner);

    assert_eq!(sale.payment_token.balance(&sale.client.address), 0);
    assert_eq!(sale.sale_token.balance(&sale.client.address), 0);
    assert_eq!(sale.payment_token.balance(&sale.multisig), 5 * UNIT);
    assert_eq!(
        sale.sale_token.balance(&sale.multisig),
        SUPPLY - (2 * 1200 + 3 * 1050) * UNIT
    );
    assert!(sale.client.is_finalized());
}

#[test]
#[should_panic(expected = "#8")]
fn test_finalize_is_one_way() {
    let sale = Sale::new();
    sale.set_timestamp(3_000_000);
    sale.client.finalize_sale(&sale.owner);
    sale.client.finalize_sale(&sale.owner);
}

#[test]
#[should_panic(expected = "#8")]
fn test_no_contributions_after_finalize() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(UNIT);
    sale.client
        .set_whitelist_status(&sale.owner, &contributor, &true);

    sale.set_timestamp(3_000_000);
    sale.client.finalize_sale(&sale.owner);

    // Whitelisted, so only the lifecycle gate can stop this one
    sale.client.contribute(&contributor, &UNIT);
}

#[test]
fn test_move_funds_sweeps_staged_balance() {
    let sale = Sale::new();
    let contributor = sale.fund_contributor(2 * UNIT);
    sale.set_timestamp(10);
    sale.client.contribute(&contributor, &(2 * UNIT));

    let moved = sale.client.move_funds(&sale.owner);
    assert_eq!(moved, 2 * UNIT);
    assert_eq!(sale.payment_token.balance(&sale.client.address), 0);
    assert_eq!(sale.payment_token.balance(&sale.multisig), 2 * UNIT);
    // Tokens stay with their buyers; only funds move
    assert_eq!(sale.sale_token.balance(&sale.multisig), 0);
}

#[test]
fn test_move_funds_with_empty_balance_is_noop() {
    let sale = Sale::new();
    assert_eq!(sale.client.move_funds(&sale.owner), 0);
    assert_eq!(sale.payment_token.balance(&sale.multisig), 0);
}

#[test]
#[should_panic(expected = "#3")]
fn test_move_funds_requires_owner() {
    let sale = Sale::new();
    let intruder = Address::generate(&sale.env);
    sale.client.move_funds(&intruder);
}

#[test]
fn test_total_collected_tracks_contributions() {
    let sale = Sale::new();
    let first = sale.fund_contributor(2 * UNIT);
    let second = sale.fund_contributor(3 * UNIT);

    sale.set_timestamp(10);
    sale.client.contribute(&first, &(2 * UNIT));
    sale.set_timestamp(86_410);
    sale.client.contribute(&second, &(3 * UNIT));

    assert_eq!(sale.client.total_collected(), 5 * UNIT);
}
