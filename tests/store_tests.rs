// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use tallybook::error::StoreError;
use tallybook::models::{DailySummary, GoalKind, GoalPatch, NewTransaction, TxKind};
use tallybook::store::{Store, TransactionFilter};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_tx(kind: TxKind, amount: i64, date: &str) -> NewTransaction {
    NewTransaction {
        kind,
        amount: Decimal::from(amount),
        description: "Walk-in".to_string(),
        category: "General".to_string(),
        date: day(date),
        bill_id: None,
    }
}

#[test]
fn owner_isolation() {
    let store = Store::open_in_memory().unwrap();
    store
        .add_transaction("u1", new_tx(TxKind::Sale, 100, "2024-03-10"))
        .unwrap();
    store
        .add_transaction("u2", new_tx(TxKind::Sale, 999, "2024-03-10"))
        .unwrap();

    let u1 = store
        .list_transactions("u1", &TransactionFilter::default())
        .unwrap();
    assert_eq!(u1.len(), 1);
    assert!(u1.iter().all(|t| t.owner_id == "u1"));
}

#[test]
fn list_is_idempotent_and_insertion_ordered() {
    let store = Store::open_in_memory().unwrap();
    for (amount, date) in [(10, "2024-03-03"), (20, "2024-03-01"), (30, "2024-03-02")] {
        store
            .add_transaction("u1", new_tx(TxKind::Expense, amount, date))
            .unwrap();
    }
    let first = store
        .list_transactions("u1", &TransactionFilter::default())
        .unwrap();
    let second = store
        .list_transactions("u1", &TransactionFilter::default())
        .unwrap();
    let ids: Vec<i64> = first.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(
        ids,
        second.iter().map(|t| t.id).collect::<Vec<_>>(),
        "same sequence on repeated reads"
    );
}

#[test]
fn missing_owner_rejected() {
    let store = Store::open_in_memory().unwrap();
    let err = store
        .add_transaction("", new_tx(TxKind::Sale, 1, "2024-01-01"))
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingOwner));
    let err = store
        .list_transactions("  ", &TransactionFilter::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingOwner));
}

#[test]
fn invalid_records_rejected() {
    let store = Store::open_in_memory().unwrap();
    let mut blank = new_tx(TxKind::Sale, 10, "2024-01-01");
    blank.description = "  ".to_string();
    assert!(matches!(
        store.add_transaction("u1", blank).unwrap_err(),
        StoreError::InvalidRecord(_)
    ));

    let mut negative = new_tx(TxKind::Expense, 0, "2024-01-01");
    negative.amount = Decimal::from(-5);
    assert!(matches!(
        store.add_transaction("u1", negative).unwrap_err(),
        StoreError::InvalidRecord(_)
    ));
}

#[test]
fn delete_signals_not_found() {
    let store = Store::open_in_memory().unwrap();
    let id = store
        .add_transaction("u1", new_tx(TxKind::Sale, 10, "2024-01-01"))
        .unwrap();

    assert!(matches!(
        store.delete_transaction("u1", 999).unwrap_err(),
        StoreError::NotFound {
            what: "transaction",
            ..
        }
    ));
    // another owner's id is invisible, not deletable
    assert!(matches!(
        store.delete_transaction("u2", id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
    store.delete_transaction("u1", id).unwrap();
    assert!(
        store
            .list_transactions("u1", &TransactionFilter::default())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn transaction_filters() {
    let store = Store::open_in_memory().unwrap();
    store
        .add_transaction("u1", new_tx(TxKind::Sale, 10, "2024-03-10"))
        .unwrap();
    store
        .add_transaction("u1", new_tx(TxKind::Expense, 20, "2024-03-11"))
        .unwrap();
    store
        .add_transaction("u1", new_tx(TxKind::Expense, 30, "2024-04-01"))
        .unwrap();

    let march_expenses = store
        .list_transactions(
            "u1",
            &TransactionFilter {
                month: Some("2024-03".to_string()),
                kind: Some(TxKind::Expense),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(march_expenses.len(), 1);
    assert_eq!(march_expenses[0].amount, Decimal::from(20));

    let limited = store
        .list_transactions(
            "u1",
            &TransactionFilter {
                limit: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn goal_validation_and_update() {
    let store = Store::open_in_memory().unwrap();
    assert!(matches!(
        store
            .add_goal("u1", GoalKind::Sales, "", Decimal::from(100), day("2024-06-30"))
            .unwrap_err(),
        StoreError::InvalidRecord(_)
    ));
    assert!(matches!(
        store
            .add_goal("u1", GoalKind::Sales, "March sales", Decimal::ZERO, day("2024-06-30"))
            .unwrap_err(),
        StoreError::InvalidRecord(_)
    ));

    let id = store
        .add_goal(
            "u1",
            GoalKind::Profit,
            "Quarter profit",
            Decimal::from(5000),
            day("2024-06-30"),
        )
        .unwrap();

    store
        .update_goal(
            "u1",
            id,
            &GoalPatch {
                target_amount: Some(Decimal::from(6000)),
                ..Default::default()
            },
        )
        .unwrap();
    let g = store.get_goal("u1", id).unwrap();
    assert_eq!(g.target_amount, Decimal::from(6000));

    // an empty patch touches nothing, even for a missing id
    assert!(store.update_goal("u1", 999, &GoalPatch::default()).is_ok());
    assert!(matches!(
        store
            .update_goal(
                "u1",
                999,
                &GoalPatch {
                    title: Some("x".to_string()),
                    ..Default::default()
                }
            )
            .unwrap_err(),
        StoreError::NotFound { what: "goal", .. }
    ));
}

#[test]
fn daily_summary_upserts_in_place() {
    let store = Store::open_in_memory().unwrap();
    let mut summary = DailySummary {
        date: day("2024-03-10"),
        owner_id: "u1".to_string(),
        total_sales: Decimal::from(500),
        total_expenses: Decimal::from(200),
        total_investment: Decimal::ZERO,
        profit: Decimal::from(300),
    };
    store.upsert_daily_summary("u1", &summary).unwrap();

    summary.total_sales = Decimal::from(800);
    summary.profit = Decimal::from(600);
    store.upsert_daily_summary("u1", &summary).unwrap();

    let cached = store.list_daily_summaries("u1").unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].total_sales, Decimal::from(800));
    assert_eq!(cached[0].profit, Decimal::from(600));
}

#[test]
fn schema_version_mismatch_is_rejected() {
    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    tallybook::db::init_schema(&mut conn).unwrap();
    conn.execute(
        "UPDATE settings SET value='99' WHERE key='schema_version'",
        [],
    )
    .unwrap();
    let err = tallybook::db::init_schema(&mut conn).unwrap_err();
    assert!(err.to_string().contains("Schema version 99"));
}
