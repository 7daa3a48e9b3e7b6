// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bolsillo::missions::{compute_missions, live_count, savings_net};
use bolsillo::models::{
    is_savings_name, Mission, MissionKind, MissionStatus, Transaction, TxKind,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

fn tx(id: i64, kind: TxKind, amount: &str, category: &str) -> Transaction {
    Transaction {
        id,
        user_id: "default".into(),
        kind,
        amount: amount.parse().unwrap(),
        category: category.into(),
        is_savings: is_savings_name(category),
        description: None,
        date: NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
        created_at: None,
        updated_at: Utc::now(),
        original_amount: None,
        original_currency: None,
        rate_kind: None,
        rate_value: None,
        is_deleted: false,
    }
}

fn mission(
    id: i64,
    name: &str,
    kind: MissionKind,
    target: i64,
    status: MissionStatus,
) -> Mission {
    Mission {
        id,
        user_id: "default".into(),
        name: name.into(),
        kind,
        target: Decimal::from(target),
        status,
        sort_order: id,
    }
}

#[test]
fn savings_net_is_deposits_minus_withdrawals() {
    let mut deleted = tx(4, TxKind::Expense, "500", "ahorro");
    deleted.is_deleted = true;
    let txs = vec![
        tx(1, TxKind::Expense, "100", "ahorro"),
        tx(2, TxKind::Income, "40", "ahorro"),
        tx(3, TxKind::Expense, "999", "comida"), // not savings
        deleted,
    ];
    assert_eq!(savings_net(&txs), Decimal::from(60));
    assert_eq!(live_count(&txs), 3);
}

#[test]
fn savings_net_can_go_negative() {
    let txs = vec![tx(1, TxKind::Income, "30", "ahorro")];
    assert_eq!(savings_net(&txs), Decimal::from(-30));
}

#[test]
fn completion_unlocks_and_can_cascade_in_one_pass() {
    let missions = vec![
        mission(1, "habit", MissionKind::TxCount, 10, MissionStatus::Active),
        mission(2, "first", MissionKind::SavingsAmount, 50, MissionStatus::Active),
        mission(3, "cushion", MissionKind::SavingsAmount, 200, MissionStatus::Locked),
        mission(4, "big", MissionKind::SavingsAmount, 500, MissionStatus::Locked),
    ];
    // One deposit puts 220 in savings: "first" completes, which unlocks
    // "cushion", which is already past target and completes too, which
    // unlocks "big".
    let txs = vec![tx(1, TxKind::Expense, "220", "ahorro")];
    let states = compute_missions(&txs, &missions);

    assert_eq!(states[0].status, MissionStatus::Active);
    assert!(!states[0].changed);
    assert_eq!(states[1].status, MissionStatus::Completed);
    assert!(states[1].changed);
    assert_eq!(states[2].status, MissionStatus::Completed);
    assert!(states[2].changed);
    assert_eq!(states[3].status, MissionStatus::Active);
    assert!(states[3].changed);
}

#[test]
fn completed_never_reverts_when_the_ledger_drops() {
    let missions = vec![mission(
        1,
        "first",
        MissionKind::SavingsAmount,
        50,
        MissionStatus::Completed,
    )];
    let states = compute_missions(&[], &missions);
    assert_eq!(states[0].status, MissionStatus::Completed);
    assert!(!states[0].changed);
    assert_eq!(states[0].progress, Decimal::ZERO);
}

#[test]
fn an_already_completed_mission_does_not_unlock_again() {
    let missions = vec![
        mission(1, "first", MissionKind::SavingsAmount, 50, MissionStatus::Completed),
        mission(2, "next", MissionKind::SavingsAmount, 200, MissionStatus::Locked),
    ];
    let txs = vec![tx(1, TxKind::Expense, "60", "ahorro")];
    let states = compute_missions(&txs, &missions);
    assert_eq!(states[1].status, MissionStatus::Locked);
    assert!(!states[1].changed);
}

#[test]
fn locked_missions_reveal_no_progress() {
    let missions = vec![
        mission(1, "first", MissionKind::SavingsAmount, 500, MissionStatus::Active),
        mission(2, "next", MissionKind::SavingsAmount, 200, MissionStatus::Locked),
    ];
    let txs = vec![tx(1, TxKind::Expense, "60", "ahorro")];
    let states = compute_missions(&txs, &missions);
    assert_eq!(states[0].progress, Decimal::from(60));
    assert_eq!(states[1].status, MissionStatus::Locked);
    assert_eq!(states[1].progress, Decimal::ZERO);
    assert_eq!(states[1].pct, Decimal::ZERO);
}

#[test]
fn zero_target_never_completes_and_reports_zero_pct() {
    let missions = vec![mission(1, "odd", MissionKind::SavingsAmount, 0, MissionStatus::Active)];
    let txs = vec![tx(1, TxKind::Expense, "10", "ahorro")];
    let states = compute_missions(&txs, &missions);
    assert_eq!(states[0].status, MissionStatus::Active);
    assert_eq!(states[0].pct, Decimal::ZERO);
}

#[test]
fn pct_reports_the_raw_overshoot() {
    let missions = vec![mission(1, "first", MissionKind::SavingsAmount, 50, MissionStatus::Active)];
    let txs = vec![tx(1, TxKind::Expense, "75", "ahorro")];
    let states = compute_missions(&txs, &missions);
    assert_eq!(states[0].pct, Decimal::from(150));
    assert_eq!(states[0].status, MissionStatus::Completed);
}

#[test]
fn count_missions_track_live_rows_only() {
    let missions = vec![mission(1, "habit", MissionKind::TxCount, 3, MissionStatus::Active)];
    let mut deleted = tx(3, TxKind::Expense, "5", "comida");
    deleted.is_deleted = true;
    let txs = vec![
        tx(1, TxKind::Expense, "5", "comida"),
        tx(2, TxKind::Expense, "5", "comida"),
        deleted,
    ];
    let states = compute_missions(&txs, &missions);
    assert_eq!(states[0].progress, Decimal::from(2));
    assert_eq!(states[0].status, MissionStatus::Active);
}
