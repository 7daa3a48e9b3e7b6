// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;

use crate::errors::DomainError;
use crate::missions::{default_missions, MissionState};
use crate::models::{
    is_savings_name, Mission, MissionStatus, NewTransaction, RecurringDraft, RecurringItem,
    Transaction, TxPatch,
};

const TX_COLUMNS: &str = "id, user_id, kind, amount, category, is_savings, description, date, \
     created_at, updated_at, original_amount, original_currency, rate_kind, rate_value, is_deleted";

fn parse_col<T, E>(idx: usize, res: Result<T, E>) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    res.map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn decimal_col(r: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    parse_col(idx, s.parse::<Decimal>())
}

fn decimal_col_opt(r: &Row, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    match r.get::<_, Option<String>>(idx)? {
        Some(s) => parse_col(idx, s.parse::<Decimal>()).map(Some),
        None => Ok(None),
    }
}

fn tx_from_row(r: &Row) -> rusqlite::Result<Transaction> {
    let kind: String = r.get(2)?;
    let original_currency: Option<String> = r.get(11)?;
    let rate_kind: Option<String> = r.get(12)?;
    Ok(Transaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        kind: parse_col(2, kind.parse())?,
        amount: decimal_col(r, 3)?,
        category: r.get(4)?,
        is_savings: r.get(5)?,
        description: r.get(6)?,
        date: r.get(7)?,
        created_at: r.get(8)?,
        updated_at: r.get(9)?,
        original_amount: decimal_col_opt(r, 10)?,
        original_currency: match original_currency {
            Some(s) => Some(parse_col(11, s.parse())?),
            None => None,
        },
        rate_kind: match rate_kind {
            Some(s) => Some(parse_col(12, s.parse())?),
            None => None,
        },
        rate_value: decimal_col_opt(r, 13)?,
        is_deleted: r.get(14)?,
    })
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!("amount must be positive, got {}", amount)).into());
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(DomainError::Validation("category must not be empty".into()).into());
    }
    Ok(())
}

pub fn create_transaction(
    conn: &Connection,
    user_id: &str,
    new: &NewTransaction,
) -> Result<Transaction> {
    validate_amount(new.amount)?;
    validate_category(&new.category)?;
    let now = Utc::now();
    conn.execute(
        "INSERT INTO transactions(user_id, kind, amount, category, is_savings, description, date,
            created_at, updated_at, original_amount, original_currency, rate_kind, rate_value, is_deleted)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,0)",
        params![
            user_id,
            new.kind.as_str(),
            new.amount.to_string(),
            new.category.trim(),
            is_savings_name(&new.category),
            new.description,
            new.date,
            now,
            now,
            new.original_amount.map(|d| d.to_string()),
            new.original_currency.map(|c| c.as_str()),
            new.rate_kind.map(|k| k.as_str()),
            new.rate_value.map(|d| d.to_string()),
        ],
    )?;
    get_transaction(conn, user_id, conn.last_insert_rowid())
}

pub fn get_transaction(conn: &Connection, user_id: &str, id: i64) -> Result<Transaction> {
    let sql = format!("SELECT {TX_COLUMNS} FROM transactions WHERE id=?1 AND user_id=?2");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id, user_id], tx_from_row)?;
    match rows.next() {
        Some(row) => Ok(row?),
        None => Err(DomainError::NotFound(format!("transaction {}", id)).into()),
    }
}

pub fn list_transactions(
    conn: &Connection,
    user_id: &str,
    since: Option<DateTime<Utc>>,
    include_deleted: bool,
) -> Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {TX_COLUMNS} FROM transactions WHERE user_id=?1");
    if !include_deleted {
        sql.push_str(" AND is_deleted=0");
    }
    if since.is_some() {
        sql.push_str(" AND updated_at>?2");
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let mut out = Vec::new();
    if let Some(ts) = since {
        let rows = stmt.query_map(params![user_id, ts], tx_from_row)?;
        for row in rows {
            out.push(row?);
        }
    } else {
        let rows = stmt.query_map(params![user_id], tx_from_row)?;
        for row in rows {
            out.push(row?);
        }
    }
    Ok(out)
}

/// Apply a patch to the editable fields. Conversion snapshots are audit
/// data and stay untouched; a category change re-derives the savings tag.
pub fn update_transaction(
    conn: &Connection,
    user_id: &str,
    id: i64,
    patch: &TxPatch,
) -> Result<Transaction> {
    if patch.is_empty() {
        return Err(DomainError::Validation("nothing to update".into()).into());
    }
    let current = get_transaction(conn, user_id, id)?;
    if current.is_deleted {
        return Err(DomainError::NotFound(format!("transaction {}", id)).into());
    }
    let kind = patch.kind.unwrap_or(current.kind);
    let amount = patch.amount.unwrap_or(current.amount);
    let category = patch.category.clone().unwrap_or(current.category);
    let description = patch.description.clone().or(current.description);
    let date = patch.date.unwrap_or(current.date);
    validate_amount(amount)?;
    validate_category(&category)?;
    conn.execute(
        "UPDATE transactions SET kind=?1, amount=?2, category=?3, is_savings=?4, description=?5,
            date=?6, updated_at=?7 WHERE id=?8 AND user_id=?9",
        params![
            kind.as_str(),
            amount.to_string(),
            category.trim(),
            is_savings_name(&category),
            description,
            date,
            Utc::now(),
            id,
            user_id,
        ],
    )?;
    get_transaction(conn, user_id, id)
}

/// Soft delete: the row stays for sync/audit, every aggregate ignores it.
pub fn soft_delete_transaction(conn: &Connection, user_id: &str, id: i64) -> Result<()> {
    let changed = conn.execute(
        "UPDATE transactions SET is_deleted=1, updated_at=?1 WHERE id=?2 AND user_id=?3 AND is_deleted=0",
        params![Utc::now(), id, user_id],
    )?;
    if changed == 0 {
        return Err(DomainError::NotFound(format!("transaction {}", id)).into());
    }
    Ok(())
}

fn recurring_from_row(r: &Row) -> rusqlite::Result<RecurringItem> {
    let kind: String = r.get(5)?;
    Ok(RecurringItem {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        category: r.get(3)?,
        amount: decimal_col(r, 4)?,
        kind: parse_col(5, kind.parse())?,
        day: r.get(6)?,
        period: r.get(7)?,
    })
}

pub fn list_recurring(
    conn: &Connection,
    user_id: &str,
    period: Option<&str>,
) -> Result<Vec<RecurringItem>> {
    let mut sql = String::from(
        "SELECT id, user_id, name, category, amount, kind, day, period FROM recurring WHERE user_id=?1",
    );
    if period.is_some() {
        sql.push_str(" AND period=?2");
    }
    sql.push_str(" ORDER BY period, id");
    let mut stmt = conn.prepare(&sql)?;
    let mut out = Vec::new();
    if let Some(p) = period {
        let rows = stmt.query_map(params![user_id, p], recurring_from_row)?;
        for row in rows {
            out.push(row?);
        }
    } else {
        let rows = stmt.query_map(params![user_id], recurring_from_row)?;
        for row in rows {
            out.push(row?);
        }
    }
    Ok(out)
}

fn validate_draft(d: &RecurringDraft) -> Result<()> {
    validate_category(&d.category)?;
    if d.name.trim().is_empty() {
        return Err(DomainError::Validation("item name must not be empty".into()).into());
    }
    if !(1..=31).contains(&d.day) {
        return Err(DomainError::Validation(format!("day {} outside 1-31", d.day)).into());
    }
    Ok(())
}

/// Wholesale replacement of one period's budget: every existing item for
/// `(user, period)` goes away, drafts with a positive amount come in.
/// Other periods are never touched.
pub fn replace_for_period(
    conn: &mut Connection,
    user_id: &str,
    period: &str,
    drafts: &[RecurringDraft],
) -> Result<Vec<RecurringItem>> {
    let keep: Vec<&RecurringDraft> = drafts.iter().filter(|d| d.amount > Decimal::ZERO).collect();
    for d in &keep {
        validate_draft(d)?;
    }
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM recurring WHERE user_id=?1 AND period=?2",
        params![user_id, period],
    )?;
    for d in &keep {
        tx.execute(
            "INSERT INTO recurring(user_id, name, category, amount, kind, day, period)
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                user_id,
                d.name.trim(),
                d.category.trim(),
                d.amount.to_string(),
                d.kind.as_str(),
                d.day,
                period,
            ],
        )?;
    }
    tx.commit()?;
    list_recurring(conn, user_id, Some(period))
}

pub fn clear_period(conn: &Connection, user_id: &str, period: &str) -> Result<usize> {
    let n = conn.execute(
        "DELETE FROM recurring WHERE user_id=?1 AND period=?2",
        params![user_id, period],
    )?;
    Ok(n)
}

/// Clone the nearest earlier non-empty period into `period` (fresh ids,
/// new period key), replacing whatever the current period held. Returns
/// the source period alongside the new items.
pub fn copy_previous(
    conn: &mut Connection,
    user_id: &str,
    period: &str,
) -> Result<(String, Vec<RecurringItem>)> {
    let all = list_recurring(conn, user_id, None)?;
    let source = crate::budget::previous_period_with_items(&all, period)
        .ok_or_else(|| DomainError::NotFound("no earlier budget to copy".to_string()))?;
    let drafts: Vec<RecurringDraft> = all
        .iter()
        .filter(|i| i.period == source)
        .map(|i| RecurringDraft {
            name: i.name.clone(),
            category: i.category.clone(),
            amount: i.amount,
            kind: i.kind,
            day: i.day,
        })
        .collect();
    let items = replace_for_period(conn, user_id, period, &drafts)?;
    Ok((source, items))
}

fn mission_from_row(r: &Row) -> rusqlite::Result<Mission> {
    let kind: String = r.get(3)?;
    let status: String = r.get(5)?;
    Ok(Mission {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        kind: parse_col(3, kind.parse())?,
        target: decimal_col(r, 4)?,
        status: parse_col(5, status.parse())?,
        sort_order: r.get(6)?,
    })
}

/// Missions for a profile, seeding the default set on first use.
pub fn list_missions(conn: &Connection, user_id: &str) -> Result<Vec<Mission>> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM missions WHERE user_id=?1",
        params![user_id],
        |r| r.get(0),
    )?;
    if count == 0 {
        for (order, (name, kind, target, status)) in default_missions().into_iter().enumerate() {
            conn.execute(
                "INSERT INTO missions(user_id, name, kind, target, status, sort_order)
                 VALUES (?1,?2,?3,?4,?5,?6)",
                params![
                    user_id,
                    name,
                    kind.as_str(),
                    target.to_string(),
                    status.as_str(),
                    (order + 1) as i64,
                ],
            )?;
        }
    }
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, kind, target, status, sort_order
         FROM missions WHERE user_id=?1 ORDER BY sort_order, id",
    )?;
    let rows = stmt.query_map(params![user_id], mission_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn set_mission_status(
    conn: &Connection,
    user_id: &str,
    id: i64,
    status: MissionStatus,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE missions SET status=?1 WHERE id=?2 AND user_id=?3",
        params![status.as_str(), id, user_id],
    )?;
    if changed == 0 {
        return Err(DomainError::NotFound(format!("mission {}", id)).into());
    }
    Ok(())
}

/// Persist the status transitions a recompute produced. Only status moves;
/// progress is always derived from the ledger.
pub fn apply_mission_states(
    conn: &Connection,
    user_id: &str,
    states: &[MissionState],
) -> Result<usize> {
    let mut n = 0;
    for s in states.iter().filter(|s| s.changed) {
        set_mission_status(conn, user_id, s.id, s.status)?;
        n += 1;
    }
    Ok(n)
}
