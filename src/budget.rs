// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{RecurringItem, Transaction, TxKind};

pub fn period_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Items declared for exactly this period. Periods do not inherit: a month
/// with no declarations is empty even if earlier months had budgets.
pub fn items_for_period<'a>(items: &'a [RecurringItem], period: &str) -> Vec<&'a RecurringItem> {
    items.iter().filter(|i| i.period == period).collect()
}

/// Latest period strictly before `period` that has any items (the source
/// for "copy previous month"). YYYY-MM keys order lexicographically.
pub fn previous_period_with_items(items: &[RecurringItem], period: &str) -> Option<String> {
    items
        .iter()
        .filter(|i| i.period.as_str() < period)
        .map(|i| i.period.clone())
        .max()
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgress {
    pub category: String,
    pub budgeted: Decimal,
    pub spent: Decimal,
    pub available: Decimal,
    /// Raw percentage; may exceed 100 when overspent.
    pub progress_pct: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub period: String,
    pub categories: Vec<CategoryProgress>,
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub global_pct: Decimal,
    /// Monthly savings target ("Ahorro" declaration), kept out of the
    /// category breakdown. Reserved money, not an envelope to spend.
    pub savings_target: Decimal,
    pub planned_income: Decimal,
}

/// Category identity as users type it: trimmed, case-insensitive.
pub(crate) fn category_eq(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn pct(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Clamp a raw percentage to [0, 100] for bar rendering. The raw value is
/// still reported so overspending shows its true figure.
pub fn display_pct(raw: Decimal) -> Decimal {
    raw.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}

/// Compute a period's plan against actual ledger spend.
///
/// Spending counts non-deleted expense transactions of the same calendar
/// month whose category matches the declaration (trimmed, case-insensitive;
/// categories arrive as free text). Only declared categories take part in
/// the totals.
pub fn period_progress(
    items: &[RecurringItem],
    txs: &[Transaction],
    period: &str,
) -> PeriodSummary {
    let effective = items_for_period(items, period);

    let mut savings_target = Decimal::ZERO;
    let mut planned_income = Decimal::ZERO;
    // Last declaration wins per (period, category); items arrive in id
    // order and category identity ignores case.
    let mut budgets: BTreeMap<String, (String, Decimal)> = BTreeMap::new();
    for item in &effective {
        if item.is_savings() {
            savings_target += item.amount;
        } else if item.kind == TxKind::Income {
            planned_income += item.amount;
        } else {
            let display = item.category.trim().to_string();
            budgets.insert(display.to_lowercase(), (display, item.amount));
        }
    }

    let in_month = |t: &Transaction| t.date.format("%Y-%m").to_string() == period;
    let mut categories = Vec::with_capacity(budgets.len());
    let mut total_budget = Decimal::ZERO;
    let mut total_spent = Decimal::ZERO;
    for (category, budgeted) in budgets.into_values() {
        let spent: Decimal = txs
            .iter()
            .filter(|t| {
                !t.is_deleted
                    && t.kind == TxKind::Expense
                    && !t.is_savings
                    && in_month(t)
                    && category_eq(&t.category, &category)
            })
            .map(|t| t.amount)
            .sum();
        let available = (budgeted - spent).max(Decimal::ZERO);
        total_budget += budgeted;
        total_spent += spent;
        categories.push(CategoryProgress {
            progress_pct: pct(spent, budgeted),
            category,
            budgeted,
            spent,
            available,
        });
    }

    PeriodSummary {
        period: period.to_string(),
        global_pct: pct(total_spent, total_budget),
        categories,
        total_budget,
        total_spent,
        savings_target,
        planned_income,
    }
}
