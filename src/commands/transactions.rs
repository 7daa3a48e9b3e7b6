// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::DomainError;
use crate::ledger;
use crate::models::{Currency, NewTransaction, RateKind, RateSet, Transaction, TxKind, TxPatch};
use crate::normalize;
use crate::rates::service_from_settings;
use crate::store;
use crate::utils::{
    active_user, fmt_usd, fmt_ves, maybe_print_json, parse_date, parse_decimal, pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let currency: Currency = sub.get_one::<String>("currency").unwrap().parse()?;
    let kind: TxKind = sub.get_one::<String>("type").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().clone();
    let description = sub.get_one::<String>("description").cloned();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let rate_hint = match sub.get_one::<String>("rate") {
        Some(s) => Some(s.parse::<RateKind>()?),
        None => None,
    };
    let via = match sub.get_one::<String>("via-rate") {
        Some(s) => Some(s.parse::<RateKind>()?),
        None => None,
    };

    let norm = if let Some(special) = via {
        if currency == Currency::Ves {
            return Err(
                DomainError::Validation("--via-rate values a USD amount, not VES".into()).into(),
            );
        }
        let current = service_from_settings(conn)?.get_all(conn)?;
        normalize::normalize_arbitrage(amount, special, &current)?
    } else if currency == Currency::Ves {
        let current = service_from_settings(conn)?.get_all(conn)?;
        normalize::normalize(amount, currency, rate_hint, &current)?
    } else {
        // USD entries never touch the rate feed.
        normalize::normalize(amount, currency, rate_hint, &RateSet::defaults())?
    };

    let t = store::create_transaction(
        conn,
        &user,
        &NewTransaction {
            kind,
            amount: norm.amount,
            category,
            description,
            date,
            original_amount: norm.original_amount,
            original_currency: norm.original_currency,
            rate_kind: norm.rate_kind,
            rate_value: norm.rate_value,
        },
    )?;

    if !maybe_print_json(sub.get_flag("json"), false, &t)? {
        println!(
            "Recorded {} '{}' {} on {} (id {})",
            t.kind.as_str(),
            t.category,
            fmt_usd(t.amount),
            t.date,
            t.id
        );
        if let (Some(orig), Some(rk), Some(rv)) = (t.original_amount, t.rate_kind, t.rate_value) {
            println!("  entered as {} at {} {}", fmt_ves(orig), rk.as_str(), rv);
        } else if let (Some(rk), Some(rv)) = (t.rate_kind, t.rate_value) {
            println!("  valued via {} at {}", rk.as_str(), rv);
        }
    }
    Ok(())
}

/// Rows for `tx list` after user scoping, filters, ordering and limit.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let since = match sub.get_one::<String>("since") {
        Some(s) => Some(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)),
        None => None,
    };
    let include_deleted = sub.get_flag("include-deleted");

    let mut data = store::list_transactions(conn, &user, since, include_deleted)?;
    if let Some(month) = sub.get_one::<String>("month") {
        data.retain(|t| crate::budget::period_key(t.date) == *month);
    }
    if let Some(category) = sub.get_one::<String>("category") {
        data.retain(|t| crate::budget::category_eq(&t.category, category));
    }
    ledger::sort_recent(&mut data);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    let include_deleted = sub.get_flag("include-deleted");

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }

    let show_ves = sub.get_flag("ves");
    let current = if show_ves {
        Some(service_from_settings(conn)?.get_all(conn)?)
    } else {
        None
    };
    let mut headers = vec!["ID", "Date", "Kind", "Category", "USD"];
    if show_ves {
        headers.push("VES");
    }
    headers.push("Description");
    if include_deleted {
        headers.push("Deleted");
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            let mut row = vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.as_str().to_string(),
                t.category.clone(),
                fmt_usd(t.amount),
            ];
            if let Some(rates) = &current {
                row.push(fmt_ves(ledger::display_ves(t, rates)));
            }
            row.push(t.description.clone().unwrap_or_default());
            if include_deleted {
                row.push(if t.is_deleted { "yes".into() } else { String::new() });
            }
            row
        })
        .collect();
    println!("{}", pretty_table(&headers, rows));
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let id = *sub.get_one::<i64>("id").unwrap();

    let mut patch = TxPatch::default();
    if let Some(s) = sub.get_one::<String>("amount") {
        patch.amount = Some(parse_decimal(s)?);
    }
    if let Some(s) = sub.get_one::<String>("type") {
        patch.kind = Some(s.parse::<TxKind>()?);
    }
    if let Some(s) = sub.get_one::<String>("category") {
        patch.category = Some(s.clone());
    }
    if let Some(s) = sub.get_one::<String>("description") {
        patch.description = Some(s.clone());
    }
    if let Some(s) = sub.get_one::<String>("date") {
        patch.date = Some(parse_date(s)?);
    }

    let t = store::update_transaction(conn, &user, id, &patch)?;
    if !maybe_print_json(sub.get_flag("json"), false, &t)? {
        print_one(&t);
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let id = *sub.get_one::<i64>("id").unwrap();
    store::soft_delete_transaction(conn, &user, id)?;
    println!("Removed movement {} (kept for audit)", id);
    Ok(())
}

fn print_one(t: &Transaction) {
    println!(
        "{} {} '{}' {} on {}{}",
        t.id,
        t.kind.as_str(),
        t.category,
        fmt_usd(t.amount),
        t.date,
        t.description
            .as_deref()
            .map(|d| format!(" ({})", d))
            .unwrap_or_default()
    );
}
