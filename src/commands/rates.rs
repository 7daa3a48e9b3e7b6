// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::models::{Currency, RateKind, RateSet};
use crate::normalize::usable_rate;
use crate::rates::service_from_settings;
use crate::utils::{fmt_usd, fmt_ves, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("refresh", sub)) => refresh(conn, sub)?,
        Some(("invalidate", _)) => invalidate(conn)?,
        Some(("convert", sub)) => convert(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn print_rates(rates: &RateSet, json_flag: bool) -> Result<()> {
    if maybe_print_json(json_flag, false, rates)? {
        return Ok(());
    }
    let rows = vec![
        vec!["bcv".to_string(), rates.bcv.round_dp(4).to_string()],
        vec!["euro".to_string(), rates.euro.round_dp(4).to_string()],
        vec!["usdt".to_string(), rates.usdt.round_dp(4).to_string()],
    ];
    println!("{}", pretty_table(&["Rate", "VES per USD"], rows));
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rates = service_from_settings(conn)?.get_all(conn)?;
    print_rates(&rates, sub.get_flag("json"))
}

fn refresh(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rates = service_from_settings(conn)?.refresh(conn)?;
    if !sub.get_flag("json") {
        println!("Rates refreshed");
    }
    print_rates(&rates, sub.get_flag("json"))
}

fn invalidate(conn: &Connection) -> Result<()> {
    service_from_settings(conn)?.invalidate(conn)?;
    println!("Rate cache dropped; next read fetches live");
    Ok(())
}

fn convert(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from: Currency = sub.get_one::<String>("from").unwrap().parse()?;
    let kind: RateKind = sub.get_one::<String>("rate").unwrap().parse()?;

    let rates = service_from_settings(conn)?.get_all(conn)?;
    let rate = usable_rate(kind, &rates)?;
    let (usd, ves) = match from {
        Currency::Ves => (amount / rate, amount),
        Currency::Usd => (amount, amount * rate),
    };

    let payload = json!({
        "from": from.as_str(),
        "rate_kind": kind.as_str(),
        "rate_value": rate,
        "usd": usd.round_dp(2),
        "ves": ves.round_dp(2),
    });
    if !maybe_print_json(sub.get_flag("json"), false, &payload)? {
        println!(
            "{} = {} at {} {}",
            if from == Currency::Ves { fmt_ves(ves) } else { fmt_usd(usd) },
            if from == Currency::Ves { fmt_usd(usd) } else { fmt_ves(ves) },
            kind.as_str(),
            rate
        );
    }
    Ok(())
}
