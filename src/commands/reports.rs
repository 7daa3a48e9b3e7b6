// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::ledger;
use crate::missions::savings_net;
use crate::rates::service_from_settings;
use crate::store;
use crate::utils::{active_user, fmt_usd, fmt_ves, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balance", sub)) => balance(conn, sub)?,
        Some(("months", sub)) => months(conn, sub)?,
        Some(("savings", sub)) => savings(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let txs = store::list_transactions(conn, &user, None, false)?;
    let bal = ledger::balance(&txs);

    if sub.get_flag("ves") {
        // Aggregates re-express at the current BCV rate, never per-entry.
        let rates = service_from_settings(conn)?.get_all(conn)?;
        let in_ves = bal * rates.bcv;
        let payload = json!({
            "user": user,
            "balance": bal,
            "ves": in_ves,
            "rate_value": rates.bcv,
        });
        if !maybe_print_json(sub.get_flag("json"), false, &payload)? {
            println!("Disposable balance: {}", fmt_usd(bal));
            println!("  {} at bcv {}", fmt_ves(in_ves), rates.bcv);
        }
        return Ok(());
    }

    let payload = json!({ "user": user, "balance": bal });
    if !maybe_print_json(sub.get_flag("json"), false, &payload)? {
        println!("Disposable balance: {}", fmt_usd(bal));
    }
    Ok(())
}

fn months(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let txs = store::list_transactions(conn, &user, None, false)?;
    let mut data = ledger::monthly_summaries(&txs);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.month.clone(),
                    fmt_usd(s.income),
                    fmt_usd(s.expense),
                    fmt_usd(s.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}

fn savings(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let txs = store::list_transactions(conn, &user, None, false)?;
    let net = savings_net(&txs);
    let payload = json!({ "user": user, "savings": net });
    if !maybe_print_json(sub.get_flag("json"), false, &payload)? {
        println!("Saved so far: {}", fmt_usd(net));
    }
    Ok(())
}
