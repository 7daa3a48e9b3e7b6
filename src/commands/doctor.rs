// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::is_savings_name;
use crate::utils::{get_setting, parse_month, pretty_table};

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Amounts that no longer parse or are non-positive
    let mut stmt = conn.prepare("SELECT id, amount FROM transactions")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amt: String = r.get(1)?;
        match amt.parse::<Decimal>() {
            Ok(d) if d > Decimal::ZERO => {}
            Ok(d) => rows.push(vec!["non_positive_amount".into(), format!("tx {} = {}", id, d)]),
            Err(_) => rows.push(vec!["unparseable_amount".into(), format!("tx {} = '{}'", id, amt)]),
        }
    }

    // 2) Savings tag out of sync with the category text
    let mut stmt2 = conn.prepare("SELECT id, category, is_savings FROM transactions")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let category: String = r.get(1)?;
        let flagged: bool = r.get(2)?;
        if flagged != is_savings_name(&category) {
            rows.push(vec![
                "savings_tag_drift".into(),
                format!("tx {} category '{}'", id, category),
            ]);
        }
    }

    // 3) VES entries missing their conversion snapshot
    let mut stmt3 = conn.prepare(
        "SELECT id FROM transactions WHERE original_currency='VES'
         AND (original_amount IS NULL OR rate_kind IS NULL OR rate_value IS NULL)",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["incomplete_snapshot".into(), format!("tx {}", id)]);
    }

    // 4) Snapshot rates that could not have produced the stored amount
    let mut stmt4 =
        conn.prepare("SELECT id, rate_value FROM transactions WHERE rate_value IS NOT NULL")?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        let rv: String = r.get(1)?;
        match rv.parse::<Decimal>() {
            Ok(d) if d > Decimal::ZERO => {}
            _ => rows.push(vec!["bad_snapshot_rate".into(), format!("tx {} = '{}'", id, rv)]),
        }
    }

    // 5) Budget periods that are not YYYY-MM
    let mut stmt5 = conn.prepare("SELECT DISTINCT period FROM recurring")?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let p: String = r.get(0)?;
        if parse_month(&p).is_err() {
            rows.push(vec!["bad_period".into(), p]);
        }
    }

    // 6) Unreadable rate cache (stale format or hand-edited)
    if let Some(raw) = get_setting(conn, crate::rates::CACHE_KEY)? {
        if serde_json::from_str::<serde_json::Value>(&raw).is_err() {
            rows.push(vec!["unreadable_rate_cache".into(), "settings".into()]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
