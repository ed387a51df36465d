//! Stock races, ledger conflicts and unreachable gateways.

use std::time::Duration;

use prize_wheel::{
    InMemoryTable, LockManager, LockedInventory, PrizeRecord, RedeemStatus, RedemptionCoordinator,
    ScriptedSource, Table,
};

use crate::support::{
    inventory, ledger, scenario_pool, LedgerScript, RacedInventory, RedeemedElsewhereLedger,
    ScriptedLedger, UnreachableInventory,
};

fn raced_pool() -> Vec<PrizeRecord> {
    vec![PrizeRecord::new("Hot", 100, 0), PrizeRecord::new("Cold", 1, 5)]
}

#[test]
fn lost_stock_race_redraws_without_the_sold_out_prize() {
    // Ticket 0 lands on Hot first, then on the only remaining candidate.
    let wheel = RedemptionCoordinator::new(
        RacedInventory::new(raced_pool(), &["Hot"]),
        ledger(&["X1"]),
    )
    .with_random_source(ScriptedSource::first());

    let outcome = wheel.redeem("X1", "Ann");

    assert_eq!(outcome.status, RedeemStatus::Ok);
    assert_eq!(outcome.prize.as_deref(), Some("Cold"));
    assert_eq!(outcome.index, Some(1));
    let cold = wheel.inventory().inner.table().get("Cold").unwrap().unwrap();
    assert_eq!(cold.stock, 4);
}

#[test]
fn stock_race_after_max_attempts() {
    let prizes = vec![PrizeRecord::new("Hot", 1, 0), PrizeRecord::new("Warm", 1, 0)];
    let wheel = RedemptionCoordinator::new(
        RacedInventory::new(prizes, &["Hot", "Warm"]),
        ledger(&["X1"]),
    )
    .with_max_draw_attempts(2);

    let outcome = wheel.redeem("X1", "Ann");

    assert_eq!(outcome.status, RedeemStatus::StockRace);
    assert!(outcome.status.is_retryable());
    assert!(!wheel.ledger().table().get("X1").unwrap().unwrap().is_redeemed());
}

#[test]
fn every_candidate_lost_within_attempts_is_pool_empty() {
    let prizes = vec![PrizeRecord::new("Hot", 1, 0), PrizeRecord::new("Warm", 1, 0)];
    let wheel = RedemptionCoordinator::new(
        RacedInventory::new(prizes, &["Hot", "Warm"]),
        ledger(&["X1"]),
    )
    .with_max_draw_attempts(3);

    assert_eq!(wheel.redeem("X1", "Ann").status, RedeemStatus::PoolEmpty);
}

#[test]
fn code_redeemed_while_stock_ran_out_is_code_used() {
    let prizes = vec![PrizeRecord::new("Hot", 1, 0)];
    let wheel = RedemptionCoordinator::new(
        RacedInventory::new(prizes.clone(), &["Hot"]),
        RedeemedElsewhereLedger::new(&["X1"]),
    );

    assert_eq!(wheel.redeem("X1", "Ann").status, RedeemStatus::CodeUsed);

    // A genuinely sold-out pool still says so for an unused code.
    let wheel = RedemptionCoordinator::new(RacedInventory::new(prizes, &["Hot"]), ledger(&["X1"]));
    assert_eq!(wheel.redeem("X1", "Ann").status, RedeemStatus::PoolEmpty);
}

#[test]
fn lost_ledger_race_restores_reserved_unit() {
    let wheel = RedemptionCoordinator::new(
        inventory(scenario_pool()),
        ScriptedLedger::new(&["X1"], LedgerScript::LoseRace),
    );

    let outcome = wheel.redeem("X1", "Ann");

    assert_eq!(outcome.status, RedeemStatus::CodeUsed);
    assert_eq!(wheel.inventory().table().rows().unwrap(), scenario_pool());
}

#[test]
fn timed_out_commit_that_landed_is_honored() {
    let wheel = RedemptionCoordinator::new(
        inventory(scenario_pool()),
        ScriptedLedger::new(&["X1"], LedgerScript::TimeoutAfterCommit),
    )
    .with_random_source(ScriptedSource::first());

    let outcome = wheel.redeem("X1", "Ann");

    assert_eq!(outcome.status, RedeemStatus::Ok);
    assert_eq!(outcome.prize.as_deref(), Some("A"));
    assert_eq!(wheel.inventory().table().get("A").unwrap().unwrap().stock, 0);
    let record = wheel.ledger().inner.table().get("X1").unwrap().unwrap();
    assert_eq!(record.redeemer(), Some("Ann"));
    assert_eq!(record.awarded_prize(), Some("A"));
}

#[test]
fn timed_out_commit_that_never_landed_restores_stock() {
    let wheel = RedemptionCoordinator::new(
        inventory(scenario_pool()),
        ScriptedLedger::new(&["X1"], LedgerScript::TimeoutBeforeCommit),
    );

    let outcome = wheel.redeem("X1", "Ann");

    assert_eq!(outcome.status, RedeemStatus::Unavailable);
    assert_eq!(wheel.inventory().table().rows().unwrap(), scenario_pool());
    let record = wheel.ledger().inner.table().get("X1").unwrap().unwrap();
    assert!(!record.is_redeemed());
}

#[test]
fn undecidable_commit_keeps_reserved_unit() {
    let wheel = RedemptionCoordinator::new(
        inventory(scenario_pool()),
        ScriptedLedger::new(&["X1"], LedgerScript::TimeoutThenDark),
    )
    .with_random_source(ScriptedSource::first());

    let outcome = wheel.redeem("X1", "Ann");

    assert_eq!(outcome.status, RedeemStatus::Unavailable);
    // Never oversell: the unit stays out until an operator reconciles.
    assert_eq!(wheel.inventory().table().get("A").unwrap().unwrap().stock, 0);
}

#[test]
fn unreachable_inventory_is_unavailable() {
    let wheel = RedemptionCoordinator::new(UnreachableInventory, ledger(&["X1"]));

    let outcome = wheel.redeem("X1", "Ann");

    assert_eq!(outcome.status, RedeemStatus::Unavailable);
    let record = wheel.ledger().table().get("X1").unwrap().unwrap();
    assert!(!record.is_redeemed());
}

#[test]
fn stuck_prize_lock_times_out_without_mutation() {
    let table = InMemoryTable::from_rows(vec![PrizeRecord::new("Only", 1, 3)]).unwrap();
    let inventory = LockedInventory::new(table).with_timeout(Duration::from_millis(50));
    let wheel = RedemptionCoordinator::new(inventory, ledger(&["X1"]));

    let held = wheel
        .inventory()
        .locks()
        .acquire("prize:Only", Duration::from_secs(1))
        .unwrap();
    let outcome = wheel.redeem("X1", "Ann");
    drop(held);

    assert_eq!(outcome.status, RedeemStatus::Unavailable);
    assert_eq!(wheel.inventory().table().get("Only").unwrap().unwrap().stock, 3);
    assert!(!wheel.ledger().table().get("X1").unwrap().unwrap().is_redeemed());
}
