// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print pretty JSON instead of a table")
}

fn jsonl_flag() -> Arg {
    Arg::new("jsonl")
        .long("jsonl")
        .action(ArgAction::SetTrue)
        .help("Print one JSON object per line")
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .value_name("YYYY-MM")
        .help("Budget period (defaults to the current month)")
}

pub fn build_cli() -> Command {
    Command::new("bolsillo")
        .about("Dual-rate (USD/VES) personal finance: ledger, monthly budgets, savings missions")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .value_name("NAME")
                .help("Profile to operate on (defaults to the active profile)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug diagnostics on stderr"),
        )
        .subcommand(
            Command::new("init")
                .about("Create the database; with --user, persist it as the active profile"),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and manage movements")
                .subcommand(
                    Command::new("add")
                        .about("Record a movement, in USD directly or in VES at a named rate")
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Amount in --currency units"),
                        )
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .default_value("USD")
                                .help("USD or VES"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .help("expense or income"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("Free-text category; anything containing 'ahorro' counts as savings"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .value_name("bcv|euro|usdt")
                                .help("Rate used to convert a VES amount (default bcv)"),
                        )
                        .arg(
                            Arg::new("via-rate")
                                .long("via-rate")
                                .value_name("euro|usdt")
                                .conflicts_with("rate")
                                .help("Value a USD amount through this market against the BCV rate"),
                        )
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("list")
                        .about("List movements, most recent first")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .value_name("YYYY-MM")
                                .help("Only movements dated in this month"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Only movements in this category (case-insensitive)"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("since")
                                .long("since")
                                .value_name("RFC3339")
                                .help("Only movements updated after this instant"),
                        )
                        .arg(
                            Arg::new("ves")
                                .long("ves")
                                .action(ArgAction::SetTrue)
                                .help("Add a VES column valued at each movement's own rate"),
                        )
                        .arg(
                            Arg::new("include-deleted")
                                .long("include-deleted")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(json_flag())
                        .arg(jsonl_flag()),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change editable fields of a movement; conversion snapshots never change")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").help("New amount in USD"))
                        .arg(Arg::new("type").long("type").help("expense or income"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Soft-delete a movement; aggregates drop it, the row stays")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("ingest")
                .about("Record movements from extraction-service JSON documents")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_name("PATH")
                        .help("JSONL file, one analysis per line; bad lines are skipped"),
                )
                .arg(
                    Arg::new("stdin")
                        .long("stdin")
                        .action(ArgAction::SetTrue)
                        .help("Read a single analysis JSON from stdin"),
                )
                .group(ArgGroup::new("input").args(["file", "stdin"]).required(true))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("rates")
                .about("VES exchange rates: bcv, euro, usdt")
                .subcommand(
                    Command::new("show")
                        .about("Current rates (cache, then live source, then defaults)")
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("refresh")
                        .about("Force a live fetch and update the cache")
                        .arg(json_flag()),
                )
                .subcommand(Command::new("invalidate").about("Drop the cached rates"))
                .subcommand(
                    Command::new("convert")
                        .about("Convert an amount between VES and USD at a named rate")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .default_value("VES")
                                .help("USD or VES"),
                        )
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .default_value("bcv")
                                .value_name("bcv|euro|usdt"),
                        )
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Planned monthly items per period")
                .subcommand(
                    Command::new("set")
                        .about("Replace a period's items wholesale")
                        .arg(period_arg())
                        .arg(
                            Arg::new("item")
                                .long("item")
                                .action(ArgAction::Append)
                                .value_name("NAME:CATEGORY:AMOUNT:KIND[:DAY]")
                                .help("Repeatable; KIND is expense or income"),
                        )
                        .arg(
                            Arg::new("file")
                                .long("file")
                                .value_name("PATH")
                                .help("JSON array of items"),
                        )
                        .group(ArgGroup::new("items").args(["item", "file"]).required(true))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("status")
                        .about("Per-category progress against the period's plan")
                        .arg(period_arg())
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("list")
                        .about("Planned items, all periods or one")
                        .arg(period_arg())
                        .arg(json_flag())
                        .arg(jsonl_flag()),
                )
                .subcommand(
                    Command::new("copy-prev")
                        .about("Seed a period from the nearest earlier one with items")
                        .arg(period_arg())
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("clear")
                        .about("Delete every item in a period")
                        .arg(period_arg()),
                ),
        )
        .subcommand(
            Command::new("missions")
                .about("Savings missions: progress, completions, unlocks")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("report")
                .about("Ledger aggregates")
                .subcommand(
                    Command::new("balance")
                        .about("Disposable balance")
                        .arg(
                            Arg::new("ves")
                                .long("ves")
                                .action(ArgAction::SetTrue)
                                .help("Also show the balance in VES at the current BCV rate"),
                        )
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("months")
                        .about("Monthly income/expense/net, newest first")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .arg(json_flag())
                        .arg(jsonl_flag()),
                )
                .subcommand(
                    Command::new("savings")
                        .about("Net amount parked in savings")
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Dump data to files")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true).value_name("PATH"))
                        .arg(
                            Arg::new("include-deleted")
                                .long("include-deleted")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Data sanity checks"))
}
