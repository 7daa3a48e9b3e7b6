// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bolsillo::ledger::{balance, display_ves, monthly_summaries, sort_recent};
use bolsillo::models::{is_savings_name, RateSet, Transaction, TxKind};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

fn tx(id: i64, kind: TxKind, amount: &str, category: &str, date: &str) -> Transaction {
    Transaction {
        id,
        user_id: "default".into(),
        kind,
        amount: amount.parse().unwrap(),
        category: category.into(),
        is_savings: is_savings_name(category),
        description: None,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        created_at: None,
        updated_at: Utc::now(),
        original_amount: None,
        original_currency: None,
        rate_kind: None,
        rate_value: None,
        is_deleted: false,
    }
}

#[test]
fn balance_subtracts_spending_and_savings_deposits() {
    let txs = vec![
        tx(1, TxKind::Income, "500", "sueldo", "2025-08-01"),
        tx(2, TxKind::Expense, "50", "comida", "2025-08-03"),
        tx(3, TxKind::Expense, "30", "ahorro", "2025-08-05"),
    ];
    assert_eq!(balance(&txs), Decimal::from(420));
}

#[test]
fn savings_withdrawal_returns_to_balance() {
    let txs = vec![
        tx(1, TxKind::Income, "500", "sueldo", "2025-08-01"),
        tx(2, TxKind::Expense, "100", "ahorro", "2025-08-03"),
        tx(3, TxKind::Income, "40", "ahorro", "2025-08-10"),
    ];
    assert_eq!(balance(&txs), Decimal::from(440));
}

#[test]
fn deleted_rows_never_count() {
    let mut gone = tx(2, TxKind::Expense, "50", "comida", "2025-08-03");
    gone.is_deleted = true;
    let txs = vec![tx(1, TxKind::Income, "500", "sueldo", "2025-08-01"), gone];
    assert_eq!(balance(&txs), Decimal::from(500));
}

#[test]
fn monthly_buckets_treat_savings_deposits_as_income_reduction() {
    let txs = vec![
        tx(1, TxKind::Income, "500", "sueldo", "2025-08-01"),
        tx(2, TxKind::Expense, "50", "comida", "2025-08-03"),
        tx(3, TxKind::Expense, "30", "ahorro", "2025-08-05"),
    ];
    let months = monthly_summaries(&txs);
    assert_eq!(months.len(), 1);
    let m = &months[0];
    assert_eq!(m.month, "2025-08");
    assert_eq!(m.income, Decimal::from(470));
    assert_eq!(m.expense, Decimal::from(50));
    assert_eq!(m.net, Decimal::from(420));
}

#[test]
fn months_come_newest_first() {
    let txs = vec![
        tx(1, TxKind::Income, "100", "sueldo", "2025-06-15"),
        tx(2, TxKind::Income, "100", "sueldo", "2025-08-15"),
        tx(3, TxKind::Income, "100", "sueldo", "2025-07-15"),
    ];
    let months = monthly_summaries(&txs);
    let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(keys, vec!["2025-08", "2025-07", "2025-06"]);
}

#[test]
fn recent_sort_prefers_created_at_then_date() {
    let mut early = tx(1, TxKind::Expense, "1", "comida", "2025-08-01");
    early.created_at = Some(Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap());
    let mut late = tx(2, TxKind::Expense, "1", "comida", "2025-08-01");
    late.created_at = Some(Utc.with_ymd_and_hms(2025, 8, 1, 18, 0, 0).unwrap());
    // No created_at: falls back to its date at midnight, which is newer here.
    let synced = tx(3, TxKind::Expense, "1", "comida", "2025-08-02");

    let mut txs = vec![early, synced, late];
    sort_recent(&mut txs);
    let ids: Vec<i64> = txs.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn ves_display_uses_the_entry_snapshot_when_present() {
    let rates = RateSet::defaults();
    let mut with_snapshot = tx(1, TxKind::Expense, "20", "comida", "2025-08-01");
    with_snapshot.rate_value = Some("341.74".parse().unwrap());
    assert_eq!(
        display_ves(&with_snapshot, &rates),
        "6834.8".parse::<Decimal>().unwrap()
    );

    let plain = tx(2, TxKind::Expense, "2", "comida", "2025-08-01");
    assert_eq!(display_ves(&plain, &rates), Decimal::from(2) * rates.bcv);
}
