// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::warn;

use crate::errors::DomainError;
use crate::models::{
    Currency, ExpenseAnalysis, NewTransaction, RateKind, RateSet, Transaction, TxKind,
};
use crate::normalize;
use crate::rates::service_from_settings;
use crate::store;
use crate::utils::{active_user, fmt_usd, fmt_ves, maybe_print_json};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, m.get_one::<String>("user").map(String::as_str))?;

    if m.get_flag("stdin") {
        let raw = std::io::read_to_string(std::io::stdin()).context("read analysis from stdin")?;
        let analysis: ExpenseAnalysis =
            serde_json::from_str(&raw).context("decode analysis document")?;
        let t = ingest_one(conn, &user, &analysis)?;
        if !maybe_print_json(m.get_flag("json"), false, &t)? {
            print_ingested(&t);
        }
        return Ok(());
    }

    // Batch mode: one analysis document per line. Bad lines are counted
    // and skipped; good lines still land.
    let path = m.get_one::<String>("file").unwrap();
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("read analyses from {}", path))?;
    let mut ingested: Vec<Transaction> = Vec::new();
    let mut skipped = 0usize;
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let outcome = serde_json::from_str::<ExpenseAnalysis>(line)
            .context("decode analysis document")
            .and_then(|a| ingest_one(conn, &user, &a));
        match outcome {
            Ok(t) => ingested.push(t),
            Err(e) => {
                warn!(line = idx + 1, "skipping analysis: {e:#}");
                skipped += 1;
            }
        }
    }

    let summary = json!({
        "ingested": ingested.len(),
        "skipped": skipped,
        "transactions": ingested,
    });
    if !maybe_print_json(m.get_flag("json"), false, &summary)? {
        println!(
            "Ingested {} movements from {} ({} skipped)",
            ingested.len(),
            path,
            skipped
        );
        for t in &ingested {
            print_ingested(t);
        }
    }
    Ok(())
}

fn ingest_one(conn: &Connection, user: &str, analysis: &ExpenseAnalysis) -> Result<Transaction> {
    let draft = to_draft(analysis)?;
    let norm = if draft.currency == Currency::Ves {
        let current = service_from_settings(conn)?.get_all(conn)?;
        normalize::normalize(draft.amount, draft.currency, draft.rate_hint, &current)?
    } else {
        normalize::normalize(draft.amount, draft.currency, None, &RateSet::defaults())?
    };
    store::create_transaction(
        conn,
        user,
        &NewTransaction {
            kind: draft.kind,
            amount: norm.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            original_amount: norm.original_amount,
            original_currency: norm.original_currency,
            rate_kind: norm.rate_kind,
            rate_value: norm.rate_value,
        },
    )
}

fn print_ingested(t: &Transaction) {
    println!(
        "Ingested {} '{}' {} on {} (id {})",
        t.kind.as_str(),
        t.category,
        fmt_usd(t.amount),
        t.date,
        t.id
    );
    if let (Some(orig), Some(rk), Some(rv)) = (t.original_amount, t.rate_kind, t.rate_value) {
        println!("  entered as {} at {} {}", fmt_ves(orig), rk.as_str(), rv);
    }
}

#[derive(Debug)]
pub struct Draft {
    pub kind: TxKind,
    pub amount: Decimal,
    pub currency: Currency,
    pub category: String,
    pub description: Option<String>,
    pub date: chrono::NaiveDate,
    pub rate_hint: Option<RateKind>,
}

/// Turn an analysis document into an insertable draft, rejecting anything
/// the extraction service itself marked unusable.
pub fn to_draft(a: &ExpenseAnalysis) -> Result<Draft> {
    if a.is_invalid.unwrap_or(false) {
        let what = a
            .description
            .clone()
            .unwrap_or_else(|| "analysis marked invalid".to_string());
        return Err(DomainError::InvalidCommand(what).into());
    }
    let amount = match a.amount {
        Some(v) if v > 0.0 => Decimal::try_from(v)
            .map_err(|_| DomainError::InvalidCommand(format!("unusable amount {}", v)))?,
        Some(v) => {
            return Err(DomainError::InvalidCommand(format!("non-positive amount {}", v)).into())
        }
        None => return Err(DomainError::InvalidCommand("no amount detected".into()).into()),
    };
    let currency = match a.currency.as_deref() {
        Some(s) => s.parse::<Currency>()?,
        None => Currency::Usd,
    };
    let kind = match a.r#type.as_deref() {
        Some(s) => s.parse::<TxKind>()?,
        None => TxKind::Expense,
    };
    let category = match a.category.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => "otros".to_string(),
    };
    let date = match a.date.as_deref() {
        Some(s) => match chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                warn!(date = s, "unparseable date in analysis, using today");
                chrono::Local::now().date_naive()
            }
        },
        None => chrono::Local::now().date_naive(),
    };
    let rate_hint = match a.rate_type.as_deref() {
        Some(s) => match s.parse::<RateKind>() {
            Ok(k) => Some(k),
            Err(_) => {
                warn!(rate_type = s, "unknown rate type in analysis, defaulting to bcv");
                None
            }
        },
        None => None,
    };
    Ok(Draft {
        kind,
        amount,
        currency,
        category,
        description: a.description.clone(),
        date,
        rate_hint,
    })
}
