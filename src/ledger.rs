// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{RateSet, Transaction, TxKind};

/// Spendable balance over the non-deleted ledger:
/// income - non-savings expenses - savings deposits.
///
/// Savings withdrawals are income transactions tagged savings and stay in
/// the income total, so moving money out of savings restores the balance
/// and moving it in (a savings-tagged expense) lowers it exactly once.
pub fn balance(txs: &[Transaction]) -> Decimal {
    let mut total = Decimal::ZERO;
    for t in txs.iter().filter(|t| !t.is_deleted) {
        match t.kind {
            TxKind::Income => total += t.amount,
            TxKind::Expense => total -= t.amount,
        }
    }
    total
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Bucket the ledger by calendar month of `date` (newest first). Savings
/// deposits reduce the month's income figure rather than counting as
/// expense; savings withdrawals count as income.
pub fn monthly_summaries(txs: &[Transaction]) -> Vec<MonthSummary> {
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in txs.iter().filter(|t| !t.is_deleted) {
        let month = t.date.format("%Y-%m").to_string();
        let entry = map.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));
        match (t.kind, t.is_savings) {
            (TxKind::Income, _) => entry.0 += t.amount,
            (TxKind::Expense, true) => entry.0 -= t.amount,
            (TxKind::Expense, false) => entry.1 += t.amount,
        }
    }
    map.into_iter()
        .rev()
        .map(|(month, (income, expense))| MonthSummary {
            month,
            income,
            expense,
            net: income - expense,
        })
        .collect()
}

fn effective_stamp(t: &Transaction) -> (DateTime<Utc>, i64) {
    // Insertion order is the truth for recency; the user-entered date only
    // stands in when no insertion stamp survived (e.g. synced legacy rows).
    let stamp = t
        .created_at
        .unwrap_or_else(|| t.date.and_time(chrono::NaiveTime::MIN).and_utc());
    (stamp, t.id)
}

/// Order for "recent" views: newest insertion first. A back-dated `date`
/// must not float an old entry to the top.
pub fn sort_recent(txs: &mut [Transaction]) {
    txs.sort_by(|a, b| effective_stamp(b).cmp(&effective_stamp(a)));
}

/// Re-express a canonical USD amount in VES for display. The transaction's
/// own snapshotted rate wins; without one the current BCV rate applies,
/// never euro/usdt for amounts that were not entered under those regimes.
pub fn display_ves(t: &Transaction, rates: &RateSet) -> Decimal {
    let rate = t.rate_value.unwrap_or(rates.bcv);
    t.amount * rate
}
