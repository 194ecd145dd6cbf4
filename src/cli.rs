// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print JSON instead of a table")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print JSON Lines instead of a table")
            .action(ArgAction::SetTrue),
    )
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Single-owner shop ledger: transactions, bills, goals, and period reports")
        .version(clap::crate_version!())
        .arg(
            Arg::new("owner")
                .long("owner")
                .global(true)
                .help("Owner id scoping every record"),
        )
        .subcommand(Command::new("init").about("Create the database if missing and print its path"))
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_parser(["sale", "expense", "investment"]),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("Transaction date, YYYY-MM-DD"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest filters first")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["sale", "expense", "investment"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm").about("Delete a transaction").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("bill")
                .about("Capture bills and approve them into expenses")
                .subcommand(
                    Command::new("upload")
                        .about("Upload a bill file and store the extracted draft")
                        .arg(Arg::new("path").required(true).help("Bill file (jpg/png/pdf)")),
                )
                .subcommand(json_flags(Command::new("list").about("List uploaded bills")))
                .subcommand(json_flags(
                    Command::new("show").about("Show one bill with its line items").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ))
                .subcommand(
                    Command::new("approve")
                        .about("Approve a draft bill; records the matching expense")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("goal")
                .about("Set goals and track progress")
                .subcommand(
                    Command::new("set")
                        .about("Set a goal")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_parser(["sales", "profit", "expense-reduction"]),
                        )
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(
                            Arg::new("deadline")
                                .long("deadline")
                                .required(true)
                                .help("Deadline, YYYY-MM-DD"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List goals, active then completed"),
                ))
                .subcommand(json_flags(
                    Command::new("progress")
                        .about("Evaluate one goal's progress")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("window-start")
                                .long("window-start")
                                .requires("window-end")
                                .help("Override the evaluation window start, YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("window-end")
                                .long("window-end")
                                .requires("window-start")
                                .help("Override the evaluation window end, YYYY-MM-DD"),
                        ),
                ))
                .subcommand(
                    Command::new("rm").about("Delete a goal").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views over the ledger")
                .subcommand(json_flags(
                    Command::new("daily")
                        .about("One day's totals")
                        .arg(Arg::new("date").long("date").help("Defaults to today")),
                ))
                .subcommand(json_flags(
                    Command::new("weekly")
                        .about("Seven daily summaries from a week start")
                        .arg(
                            Arg::new("week-start")
                                .long("week-start")
                                .help("Defaults to the most recent Sunday"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("period")
                        .about("Totals for a month (YYYY-MM) or quarter (YYYY-Qn)")
                        .arg(Arg::new("period").long("period").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("trend")
                        .about("Trailing month-by-month totals")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32))
                                .default_value("6"),
                        )
                        .arg(
                            Arg::new("anchor")
                                .long("anchor")
                                .help("Anchor date, YYYY-MM-DD; defaults to today"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Expense totals per category for a period")
                        .arg(Arg::new("period").long("period").required(true)),
                ))
                .subcommand(
                    Command::new("snapshot")
                        .about("Compute a day's summary and cache it")
                        .arg(Arg::new("date").long("date").help("Defaults to today")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export collections to files")
                .subcommand(
                    Command::new("transactions")
                        .about("Export transactions as CSV or JSON")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Run ledger consistency checks"))
}
