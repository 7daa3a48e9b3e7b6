// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::errors::DomainError;
use crate::store;
use crate::utils::active_user;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let user = active_user(conn, sub.get_one::<String>("user").map(String::as_str))?;
    let include_deleted = sub.get_flag("include-deleted");

    let mut data = store::list_transactions(conn, &user, None, include_deleted)?;
    data.sort_by_key(|t| (t.date, t.id));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "kind",
                "category",
                "amount_usd",
                "is_savings",
                "description",
                "original_amount",
                "original_currency",
                "rate_kind",
                "rate_value",
                "is_deleted",
                "created_at",
                "updated_at",
            ])?;
            for t in &data {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.as_str().to_string(),
                    t.category.clone(),
                    t.amount.to_string(),
                    t.is_savings.to_string(),
                    t.description.clone().unwrap_or_default(),
                    t.original_amount.map(|d| d.to_string()).unwrap_or_default(),
                    t.original_currency
                        .map(|c| c.as_str().to_string())
                        .unwrap_or_default(),
                    t.rate_kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
                    t.rate_value.map(|d| d.to_string()).unwrap_or_default(),
                    t.is_deleted.to_string(),
                    t.created_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
                    t.updated_at.to_rfc3339(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&data)?)?;
        }
        other => {
            return Err(
                DomainError::Validation(format!("unknown format '{}' (use csv|json)", other))
                    .into(),
            );
        }
    }
    println!("Exported {} movements to {}", data.len(), out);
    Ok(())
}
