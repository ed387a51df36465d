//! Single-caller redemption paths over the locked in-memory gateways.

use prize_wheel::{
    CodeStatus, InMemoryTable, LockedLedger, PrizeRecord, RedeemStatus, RedemptionCoordinator,
    Retention, RngSource, ScriptedSource, Table, FALLBACK_SEGMENT,
};

use crate::support::{
    code_of, forced_wheel, inventory, ledger, scenario_pool, stock_of, total_stock, wheel,
    CountingLedger, UnreachableInventory,
};

#[test]
fn unused_code_awards_an_in_stock_prize() {
    let wheel = wheel(scenario_pool(), &["X1"]);

    let outcome = wheel.redeem("x1", " Ann ");

    assert_eq!(outcome.status, RedeemStatus::Ok);
    let prize = outcome.prize.clone().unwrap();
    assert!(prize == "A" || prize == "C", "drew {}", prize);
    assert_eq!(outcome.all_names.as_deref().unwrap(), ["A", "B", "C"]);
    assert_eq!(outcome.total_segments, Some(3));
    let index = outcome.index.unwrap();
    assert_eq!(outcome.all_names.as_ref().unwrap()[index], prize);

    let record = code_of(&wheel, "X1").unwrap();
    assert_eq!(record.status(), CodeStatus::Redeemed);
    assert_eq!(record.redeemer(), Some("Ann"));
    assert_eq!(record.awarded_prize(), Some(prize.as_str()));

    let expected = |name: &str, initial: u32| if name == prize { initial - 1 } else { initial };
    assert_eq!(stock_of(&wheel, "A"), expected("A", 1));
    assert_eq!(stock_of(&wheel, "B"), 0);
    assert_eq!(stock_of(&wheel, "C"), expected("C", 5));
}

#[test]
fn redeemed_code_is_rejected_without_touching_stock() {
    let wheel = wheel(scenario_pool(), &["X1"]);
    assert!(wheel.redeem("X1", "Ann").is_ok());
    let before = wheel.inventory().table().rows().unwrap();

    let outcome = wheel.redeem("X1", "Bob");

    assert_eq!(outcome.status, RedeemStatus::CodeUsed);
    assert_eq!(outcome.prize, None);
    assert_eq!(wheel.inventory().table().rows().unwrap(), before);
    assert_eq!(code_of(&wheel, "X1").unwrap().redeemer(), Some("Ann"));
}

#[test]
fn unknown_code_is_invalid() {
    let wheel = wheel(scenario_pool(), &["X1"]);

    let outcome = wheel.redeem("NOPE", "Ann");

    assert_eq!(outcome.status, RedeemStatus::CodeInvalid);
    assert_eq!(total_stock(&wheel), 6);
}

#[test]
fn sold_out_pool_leaves_the_code_unused() {
    let prizes = vec![PrizeRecord::new("A", 1, 0), PrizeRecord::new("B", 3, 0)];
    let wheel = wheel(prizes, &["X1"]);

    let outcome = wheel.redeem("X1", "Ann");

    assert_eq!(outcome.status, RedeemStatus::PoolEmpty);
    assert!(!code_of(&wheel, "X1").unwrap().is_redeemed());
    assert_eq!(total_stock(&wheel), 0);
}

#[test]
fn sold_out_prize_is_never_drawn() {
    let codes: Vec<String> = (0..6).map(|i| format!("K{}", i)).collect();
    let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
    let wheel = wheel(scenario_pool(), &refs);

    // Six units in stock: A once, C five times, B never.
    for code in &refs {
        let outcome = wheel.redeem(code, "Ann");
        assert!(outcome.is_ok(), "{}: {:?}", code, outcome.status);
        assert_ne!(outcome.prize.as_deref(), Some("B"));
    }
    assert_eq!(total_stock(&wheel), 0);
}

#[test]
fn last_unit_goes_to_the_next_redemption() {
    let prizes = vec![PrizeRecord::new("Hoodie", 1, 1), PrizeRecord::new("Pin", 1, 0)];
    let wheel = wheel(prizes, &["X1", "X2"]);

    let first = wheel.redeem("X1", "Ann");
    let second = wheel.redeem("X2", "Bob");

    assert_eq!(first.prize.as_deref(), Some("Hoodie"));
    assert_eq!(second.status, RedeemStatus::PoolEmpty);
    assert_eq!(stock_of(&wheel, "Hoodie"), 0);
}

#[test]
fn forced_ticket_selects_matching_segment() {
    // A=[0,1), C=[1,3); B has no range.
    let wheel = forced_wheel(scenario_pool(), &["X1"], ScriptedSource::new(vec![2]));

    let outcome = wheel.redeem("X1", "Ann");

    assert_eq!(outcome.prize.as_deref(), Some("C"));
    assert_eq!(outcome.index, Some(2));
    assert_eq!(stock_of(&wheel, "C"), 4);
    assert_eq!(stock_of(&wheel, "A"), 1);
}

#[test]
fn zero_weight_pool_still_awards() {
    let prizes = vec![PrizeRecord::new("A", 0, 2), PrizeRecord::new("B", 0, 2)];
    let wheel = wheel(prizes, &["X1"]);

    let outcome = wheel.redeem("X1", "Ann");

    assert!(outcome.is_ok());
    assert_eq!(total_stock(&wheel), 3);
}

#[test]
fn blank_input_is_rejected_before_any_io() {
    let wheel = RedemptionCoordinator::new(UnreachableInventory, CountingLedger::new(&["X1"]));

    assert_eq!(wheel.redeem("", "Ann").status, RedeemStatus::BadInput);
    assert_eq!(wheel.redeem("   ", "Ann").status, RedeemStatus::BadInput);
    assert_eq!(wheel.redeem("X1", "").status, RedeemStatus::BadInput);
    assert_eq!(wheel.redeem("X1", " \t ").status, RedeemStatus::BadInput);

    assert_eq!(wheel.ledger().calls(), 0);
}

#[test]
fn display_lists_whole_pool_in_order() {
    let wheel = wheel(scenario_pool(), &[]);

    let pool = wheel.list_available_prizes_for_display();

    assert!(!pool.degraded);
    assert_eq!(pool.names(), vec!["A", "B", "C"]);
    let stocked: Vec<bool> = pool.segments.iter().map(|s| s.has_stock).collect();
    assert_eq!(stocked, vec![true, false, true]);
}

#[test]
fn display_is_idempotent() {
    let wheel = wheel(scenario_pool(), &[]);
    let before = wheel.inventory().table().rows().unwrap();

    let first = wheel.list_available_prizes_for_display();
    let second = wheel.list_available_prizes_for_display();

    assert_eq!(first, second);
    assert_eq!(wheel.inventory().table().rows().unwrap(), before);
}

#[test]
fn display_falls_back_when_prizes_are_unreachable() {
    let wheel = RedemptionCoordinator::new(UnreachableInventory, ledger(&[]));

    let pool = wheel.list_available_prizes_for_display();

    assert!(pool.degraded);
    assert_eq!(pool.names(), vec![FALLBACK_SEGMENT]);
}

#[test]
fn consumed_codes_disappear_from_the_ledger() {
    let codes = InMemoryTable::from_rows(vec![prize_wheel::CodeRecord::unused("X1")]).unwrap();
    let wheel = RedemptionCoordinator::new(
        inventory(scenario_pool()),
        LockedLedger::new(codes).with_retention(Retention::Consume),
    )
    .with_random_source(RngSource::seeded(3));

    assert!(wheel.redeem("X1", "Ann").is_ok());
    assert!(wheel.ledger().table().rows().unwrap().is_empty());

    let again = wheel.redeem("X1", "Ann");
    assert_eq!(again.status, RedeemStatus::CodeInvalid);
    assert_eq!(total_stock(&wheel), 5);
}
