// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Mission, MissionKind, MissionStatus, Transaction, TxKind};

/// Net amount sitting in savings: deposits (savings-tagged expenses) minus
/// withdrawals (savings-tagged incomes). Negative when withdrawals ran
/// ahead of deposits; reported as-is, never clamped.
pub fn savings_net(txs: &[Transaction]) -> Decimal {
    let mut net = Decimal::ZERO;
    for t in txs.iter().filter(|t| !t.is_deleted && t.is_savings) {
        match t.kind {
            TxKind::Expense => net += t.amount,
            TxKind::Income => net -= t.amount,
        }
    }
    net
}

pub fn live_count(txs: &[Transaction]) -> i64 {
    txs.iter().filter(|t| !t.is_deleted).count() as i64
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionState {
    pub id: i64,
    pub name: String,
    pub kind: MissionKind,
    pub target: Decimal,
    pub progress: Decimal,
    /// Raw percentage; display clamps the bar, not the number.
    pub pct: Decimal,
    pub status: MissionStatus,
    /// True when `status` differs from what was persisted and should be
    /// written back. Progress itself is never persisted.
    pub changed: bool,
}

/// Recompute mission progress from the ledger. Plain function, invoked by
/// the caller on every view; stored progress is never trusted.
///
/// Rules: an active mission completes when progress reaches its target and
/// never reverts afterwards (one-way ratchet, even if later edits drop the
/// ledger below target). Each completion unlocks the next locked mission in
/// sort order within the same pass.
pub fn compute_missions(txs: &[Transaction], missions: &[Mission]) -> Vec<MissionState> {
    let net = savings_net(txs);
    let count = Decimal::from(live_count(txs));

    let mut ordered: Vec<&Mission> = missions.iter().collect();
    ordered.sort_by_key(|m| (m.sort_order, m.id));

    let mut pending_unlocks = 0usize;
    let mut out = Vec::with_capacity(ordered.len());
    for m in ordered {
        let progress = match m.kind {
            MissionKind::SavingsAmount => net,
            MissionKind::TxCount => count,
        };
        let mut status = m.status;
        if status == MissionStatus::Locked && pending_unlocks > 0 {
            pending_unlocks -= 1;
            status = MissionStatus::Active;
        }
        if status == MissionStatus::Active && m.target > Decimal::ZERO && progress >= m.target {
            status = MissionStatus::Completed;
        }
        if status == MissionStatus::Completed && m.status != MissionStatus::Completed {
            pending_unlocks += 1;
        }
        let pct = if m.target > Decimal::ZERO {
            progress / m.target * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        // Still-locked missions reveal no progress.
        let (progress, pct) = if status == MissionStatus::Locked {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            (progress, pct)
        };
        out.push(MissionState {
            id: m.id,
            name: m.name.clone(),
            kind: m.kind,
            target: m.target,
            progress,
            pct,
            status,
            changed: status != m.status,
        });
    }
    out
}

/// Seed set for a fresh profile: the habit mission and the first savings
/// goal start active, the bigger goals unlock in sequence.
pub fn default_missions() -> Vec<(&'static str, MissionKind, Decimal, MissionStatus)> {
    vec![
        (
            "Registra 10 movimientos",
            MissionKind::TxCount,
            Decimal::from(10),
            MissionStatus::Active,
        ),
        (
            "Primer ahorro: $50",
            MissionKind::SavingsAmount,
            Decimal::from(50),
            MissionStatus::Active,
        ),
        (
            "Colchón de $200",
            MissionKind::SavingsAmount,
            Decimal::from(200),
            MissionStatus::Locked,
        ),
        (
            "Meta grande: $500",
            MissionKind::SavingsAmount,
            Decimal::from(500),
            MissionStatus::Locked,
        ),
    ]
}
