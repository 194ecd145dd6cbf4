// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use tallybook::models::{NewTransaction, TxKind};
use tallybook::store::Store;
use tallybook::{cli, commands};

fn seeded() -> Store {
    let store = Store::open_in_memory().unwrap();
    for i in 1..=3 {
        store
            .add_transaction(
                "u1",
                NewTransaction {
                    kind: TxKind::Expense,
                    amount: Decimal::from(10 * i),
                    description: "Stock".to_string(),
                    category: "Supplies".to_string(),
                    date: NaiveDate::parse_from_str(&format!("2025-01-0{}", i), "%Y-%m-%d")
                        .unwrap(),
                    bill_id: None,
                },
            )
            .unwrap();
    }
    store
}

#[test]
fn list_limit_respected() {
    let store = seeded();
    let cli = cli::build_cli();
    let matches =
        cli.get_matches_from(["tallybook", "tx", "list", "--owner", "u1", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = commands::transactions::query(&store, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date.to_string(), "2025-01-01");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn owner_flag_is_required_by_the_store() {
    let store = seeded();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["tallybook", "tx", "list"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let err = commands::transactions::query(&store, list_m).unwrap_err();
            assert!(err.to_string().contains("Owner id is required"));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn upload_stores_a_draft_bill() {
    let store = seeded();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.pdf");
    std::fs::write(&path, b"%PDF-1.4 fake").unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "tallybook",
        "bill",
        "upload",
        path.to_str().unwrap(),
        "--owner",
        "u1",
    ]);
    if let Some(("bill", bill_m)) = matches.subcommand() {
        if let Some(("upload", up_m)) = bill_m.subcommand() {
            commands::bills::upload(&store, &tallybook::extract::StubExtractor, up_m).unwrap();
        } else {
            panic!("no upload subcommand");
        }
    } else {
        panic!("no bill subcommand");
    }

    let bills = store.list_bills("u1").unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].file_name, "scan.pdf");
    assert_eq!(bills[0].file_type, "application/pdf");
    assert_eq!(bills[0].extracted.amount, Decimal::from(1250));
}
