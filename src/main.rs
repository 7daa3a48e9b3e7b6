// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use bolsillo::{cli, commands, db, log, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    log::init_logging(matches.get_flag("verbose"));

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", sub)) => {
            if let Some(user) = sub.get_one::<String>("user") {
                utils::set_active_user(&conn, user)?;
                println!("Active profile: {}", user);
            }
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("ingest", sub)) => commands::ingest::handle(&conn, sub)?,
        Some(("rates", sub)) => commands::rates::handle(&conn, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut conn, sub)?,
        Some(("missions", sub)) => commands::missions::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
