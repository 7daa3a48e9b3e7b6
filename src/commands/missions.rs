// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::missions::compute_missions;
use crate::models::{MissionKind, MissionStatus};
use crate::store;
use crate::utils::{active_user, fmt_pct, fmt_usd, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn, m.get_one::<String>("user").map(String::as_str))?;
    let missions = store::list_missions(conn, &user)?;
    let txs = store::list_transactions(conn, &user, None, false)?;
    let states = compute_missions(&txs, &missions);
    store::apply_mission_states(conn, &user, &states)?;

    if maybe_print_json(m.get_flag("json"), false, &states)? {
        return Ok(());
    }

    for s in states.iter().filter(|s| s.changed) {
        match s.status {
            MissionStatus::Completed => println!("Mission completed: {}", s.name),
            MissionStatus::Active => println!("Mission unlocked: {}", s.name),
            MissionStatus::Locked => {}
        }
    }

    let rows: Vec<Vec<String>> = states
        .iter()
        .map(|s| {
            let (target, progress) = match s.kind {
                MissionKind::SavingsAmount => (fmt_usd(s.target), fmt_usd(s.progress)),
                MissionKind::TxCount => (s.target.to_string(), s.progress.to_string()),
            };
            vec![
                s.name.clone(),
                target,
                progress,
                fmt_pct(s.pct),
                s.status.as_str().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Mission", "Target", "Progress", "Done", "Status"], rows)
    );
    Ok(())
}
