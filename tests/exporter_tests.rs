// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bolsillo::models::{Currency, NewTransaction, RateKind, TxKind};
use bolsillo::{cli, commands::exporter, db, store};
use chrono::NaiveDate;
use tempfile::tempdir;

fn seed(conn: &rusqlite::Connection, user: &str) {
    store::create_transaction(
        conn,
        user,
        &NewTransaction {
            kind: TxKind::Income,
            amount: "800".parse().unwrap(),
            category: "sueldo".into(),
            description: None,
            date: NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
            original_amount: None,
            original_currency: None,
            rate_kind: None,
            rate_value: None,
        },
    )
    .unwrap();
    store::create_transaction(
        conn,
        user,
        &NewTransaction {
            kind: TxKind::Expense,
            amount: "20".parse().unwrap(),
            category: "comida".into(),
            description: Some("mercado".into()),
            date: NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
            original_amount: Some("6834.8".parse().unwrap()),
            original_currency: Some(Currency::Ves),
            rate_kind: Some(RateKind::Bcv),
            rate_value: Some("341.74".parse().unwrap()),
        },
    )
    .unwrap();
}

#[test]
fn export_transactions_streams_pretty_json() {
    let conn = db::open_in_memory().unwrap();
    seed(&conn, "default");

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "bolsillo",
        "export",
        "transactions",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Oldest first in exports.
    assert_eq!(rows[0]["category"], "comida");
    assert_eq!(rows[0]["amount"], "20");
    assert_eq!(rows[0]["original_currency"], "VES");
    assert_eq!(rows[0]["rate_kind"], "bcv");
    assert_eq!(rows[1]["category"], "sueldo");
    assert!(rows[1].get("original_amount").is_none());
}

#[test]
fn export_transactions_writes_csv_with_headers() {
    let conn = db::open_in_memory().unwrap();
    seed(&conn, "default");

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "bolsillo",
        "export",
        "transactions",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,date,kind,category,amount_usd,is_savings"));
    assert_eq!(lines.clone().count(), 2);
    assert!(lines.any(|l| l.contains("comida") && l.contains("6834.8")));
}

#[test]
fn deleted_rows_stay_out_unless_asked() {
    let conn = db::open_in_memory().unwrap();
    seed(&conn, "maria");
    let live = store::list_transactions(&conn, "maria", None, false).unwrap();
    store::soft_delete_transaction(&conn, "maria", live[0].id).unwrap();

    let dir = tempdir().unwrap();
    let default_path = dir.path().join("live.json");
    let all_path = dir.path().join("all.json");

    for (path, with_deleted) in [(&default_path, false), (&all_path, true)] {
        let out_str = path.to_string_lossy().to_string();
        let mut argv = vec![
            "bolsillo".to_string(),
            "--user".to_string(),
            "maria".to_string(),
            "export".to_string(),
            "transactions".to_string(),
            "--format".to_string(),
            "json".to_string(),
            "--out".to_string(),
            out_str,
        ];
        if with_deleted {
            argv.push("--include-deleted".to_string());
        }
        let matches = cli::build_cli().get_matches_from(argv);
        if let Some(("export", export_m)) = matches.subcommand() {
            exporter::handle(&conn, export_m).unwrap();
        } else {
            panic!("no export subcommand");
        }
    }

    let live: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&default_path).unwrap()).unwrap();
    let all: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&all_path).unwrap()).unwrap();
    assert_eq!(live.as_array().unwrap().len(), 1);
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = db::open_in_memory().unwrap();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "bolsillo",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(exporter::handle(&conn, export_m).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}
