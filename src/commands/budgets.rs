// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::budget::{display_pct, period_key};
use crate::errors::DomainError;
use crate::models::{RecurringDraft, RecurringItem, TxKind};
use crate::store;
use crate::utils::{
    active_user, fmt_pct, fmt_usd, maybe_print_json, parse_decimal, parse_month, pretty_table,
};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("copy-prev", sub)) => copy_prev(conn, sub)?,
        Some(("clear", sub)) => clear(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_of(sub: &clap::ArgMatches) -> Result<String> {
    match sub.get_one::<String>("period") {
        Some(p) => parse_month(p),
        None => Ok(period_key(chrono::Local::now().date_naive())),
    }
}

pub fn parse_item(raw: &str) -> Result<RecurringDraft> {
    let parts: Vec<&str> = raw.split(':').collect();
    if !(4..=5).contains(&parts.len()) {
        return Err(DomainError::Validation(format!(
            "expected NAME:CATEGORY:AMOUNT:KIND[:DAY], got '{}'",
            raw
        ))
        .into());
    }
    let amount = parse_decimal(parts[2])?;
    let kind: TxKind = parts[3].parse()?;
    let day: u32 = if parts.len() == 5 {
        parts[4]
            .parse()
            .with_context(|| format!("Invalid day '{}'", parts[4]))?
    } else {
        1
    };
    Ok(RecurringDraft {
        name: parts[0].to_string(),
        category: parts[1].to_string(),
        amount,
        kind,
        day,
    })
}

fn items_table(items: &[RecurringItem]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|i| {
            vec![
                i.period.clone(),
                i.name.clone(),
                i.category.clone(),
                fmt_usd(i.amount),
                i.kind.as_str().to_string(),
                i.day.to_string(),
            ]
        })
        .collect()
}

fn set(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let period = period_of(sub)?;
    let drafts: Vec<RecurringDraft> = if let Some(vals) = sub.get_many::<String>("item") {
        vals.map(|s| parse_item(s)).collect::<Result<_>>()?
    } else {
        let path = sub.get_one::<String>("file").unwrap();
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("read items from {}", path))?;
        serde_json::from_str(&raw).context("decode budget items")?
    };
    let items = store::replace_for_period(conn, &user, &period, &drafts)?;
    if !maybe_print_json(sub.get_flag("json"), false, &items)? {
        println!(
            "Budget for {} now has {} items (previous contents replaced)",
            period,
            items.len()
        );
        println!(
            "{}",
            pretty_table(
                &["Period", "Name", "Category", "Amount", "Kind", "Day"],
                items_table(&items),
            )
        );
    }
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let period = period_of(sub)?;
    let items = store::list_recurring(conn, &user, Some(&period))?;
    let txs = store::list_transactions(conn, &user, None, false)?;
    let summary = crate::budget::period_progress(&items, &txs, &period);

    if maybe_print_json(sub.get_flag("json"), false, &summary)? {
        return Ok(());
    }
    println!(
        "Period {}: budget {} / spent {} ({})",
        summary.period,
        fmt_usd(summary.total_budget),
        fmt_usd(summary.total_spent),
        fmt_pct(display_pct(summary.global_pct)),
    );
    let rows: Vec<Vec<String>> = summary
        .categories
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_usd(c.budgeted),
                fmt_usd(c.spent),
                fmt_usd(c.available),
                fmt_pct(display_pct(c.progress_pct)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Budget", "Spent", "Available", "Used"], rows)
    );
    if summary.savings_target > rust_decimal::Decimal::ZERO {
        println!("Savings target: {}", fmt_usd(summary.savings_target));
    }
    if summary.planned_income > rust_decimal::Decimal::ZERO {
        println!("Planned income: {}", fmt_usd(summary.planned_income));
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let period = match sub.get_one::<String>("period") {
        Some(p) => Some(parse_month(p)?),
        None => None,
    };
    let items = store::list_recurring(conn, &user, period.as_deref())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        println!(
            "{}",
            pretty_table(
                &["Period", "Name", "Category", "Amount", "Kind", "Day"],
                items_table(&items),
            )
        );
    }
    Ok(())
}

fn copy_prev(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let period = period_of(sub)?;
    let (source, items) = store::copy_previous(conn, &user, &period)?;
    if !maybe_print_json(sub.get_flag("json"), false, &items)? {
        println!("Copied {} items from {} into {}", items.len(), source, period);
    }
    Ok(())
}

fn clear(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let period = period_of(sub)?;
    let n = store::clear_period(conn, &user, &period)?;
    println!("Cleared {} items from {}", n, period);
    Ok(())
}
