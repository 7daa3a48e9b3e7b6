// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bolsillo::models::{Currency, RateKind, TxKind};
use bolsillo::utils::set_setting;
use bolsillo::{cli, commands::transactions, db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

/// A fresh cache snapshot keeps `tx add --currency VES` off the network.
fn seed_rates(conn: &Connection, bcv: &str, euro: &str, usdt: &str) {
    let snapshot = format!(
        r#"{{"bcv":"{}","euro":"{}","usdt":"{}","fetched_at":"{}"}}"#,
        bcv,
        euro,
        usdt,
        chrono::Utc::now().to_rfc3339()
    );
    set_setting(conn, "rates_cache", &snapshot).unwrap();
}

fn run(conn: &Connection, argv: &[&str]) {
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_records_a_usd_movement_without_touching_rates() {
    let conn = setup();
    run(
        &conn,
        &[
            "bolsillo", "tx", "add", "--amount", "25.50", "--category", "comida", "--date",
            "2025-08-03",
        ],
    );

    let rows = store::list_transactions(&conn, "default", None, false).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, "25.50".parse::<Decimal>().unwrap());
    assert_eq!(rows[0].kind, TxKind::Expense);
    assert_eq!(rows[0].original_currency, None);
    assert_eq!(rows[0].rate_kind, None);
}

#[test]
fn add_converts_ves_through_the_cached_rate() {
    let conn = setup();
    seed_rates(&conn, "400", "462", "560");
    run(
        &conn,
        &[
            "bolsillo", "tx", "add", "--amount", "2000", "--currency", "VES", "--category",
            "transporte", "--date", "2025-08-03",
        ],
    );

    let rows = store::list_transactions(&conn, "default", None, false).unwrap();
    assert_eq!(rows[0].amount, Decimal::from(5));
    assert_eq!(rows[0].original_amount, Some(Decimal::from(2000)));
    assert_eq!(rows[0].original_currency, Some(Currency::Ves));
    assert_eq!(rows[0].rate_kind, Some(RateKind::Bcv));
    assert_eq!(rows[0].rate_value, Some(Decimal::from(400)));
}

#[test]
fn add_honors_a_named_rate() {
    let conn = setup();
    seed_rates(&conn, "400", "462", "560");
    run(
        &conn,
        &[
            "bolsillo", "tx", "add", "--amount", "560", "--currency", "VES", "--rate", "usdt",
            "--category", "comida",
        ],
    );

    let rows = store::list_transactions(&conn, "default", None, false).unwrap();
    assert_eq!(rows[0].amount, Decimal::from(1));
    assert_eq!(rows[0].rate_kind, Some(RateKind::Usdt));
}

#[test]
fn add_via_rate_values_usd_through_the_parallel_market() {
    let conn = setup();
    seed_rates(&conn, "400", "462", "560");
    run(
        &conn,
        &[
            "bolsillo", "tx", "add", "--amount", "100", "--via-rate", "usdt", "--category",
            "remesa", "--type", "income",
        ],
    );

    let rows = store::list_transactions(&conn, "default", None, false).unwrap();
    // 100 * 560 / 400
    assert_eq!(rows[0].amount, Decimal::from(140));
    assert_eq!(rows[0].rate_kind, Some(RateKind::Usdt));
    assert_eq!(rows[0].original_amount, None);
}

#[test]
fn add_rejects_via_rate_on_ves_amounts() {
    let conn = setup();
    seed_rates(&conn, "400", "462", "560");
    let matches = cli::build_cli().get_matches_from([
        "bolsillo", "tx", "add", "--amount", "2000", "--currency", "VES", "--via-rate", "usdt",
        "--category", "comida",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        assert!(transactions::handle(&conn, tx_m).is_err());
    } else {
        panic!("no tx subcommand");
    }
    assert!(store::list_transactions(&conn, "default", None, false)
        .unwrap()
        .is_empty());
}

#[test]
fn list_limit_and_month_filters_apply() {
    let conn = setup();
    for (amount, date) in [("10", "2025-07-30"), ("20", "2025-08-01"), ("30", "2025-08-02")] {
        run(
            &conn,
            &[
                "bolsillo", "tx", "add", "--amount", amount, "--category", "comida", "--date",
                date,
            ],
        );
    }

    let matches = cli::build_cli().get_matches_from(["bolsillo", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].amount, Decimal::from(30));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }

    let matches =
        cli::build_cli().get_matches_from(["bolsillo", "tx", "list", "--month", "2025-07"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].amount, Decimal::from(10));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn edit_and_rm_round_trip_through_the_cli() {
    let conn = setup();
    run(
        &conn,
        &["bolsillo", "tx", "add", "--amount", "15", "--category", "comida"],
    );
    let id = store::list_transactions(&conn, "default", None, false).unwrap()[0]
        .id
        .to_string();

    run(
        &conn,
        &["bolsillo", "tx", "edit", &id, "--category", "ahorro"],
    );
    let rows = store::list_transactions(&conn, "default", None, false).unwrap();
    assert!(rows[0].is_savings);

    run(&conn, &["bolsillo", "tx", "rm", &id]);
    assert!(store::list_transactions(&conn, "default", None, false)
        .unwrap()
        .is_empty());
}
