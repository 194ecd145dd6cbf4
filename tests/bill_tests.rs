// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::path::Path;

use tallybook::error::StoreError;
use tallybook::extract::{BillExtractor, StubExtractor};
use tallybook::models::{BillItem, BillStatus, ExtractedFields, TxKind};
use tallybook::store::{Store, TransactionFilter};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn sample_extracted() -> ExtractedFields {
    ExtractedFields {
        bill_number: "BILL-1".to_string(),
        date: day("2024-05-10"),
        vendor: "Sample Vendor Inc.".to_string(),
        amount: Decimal::from(1250),
        tax: Decimal::from(225),
        items: vec![BillItem {
            name: "Office Supplies".to_string(),
            quantity: 1,
            price: Decimal::from(1000),
        }],
    }
}

#[test]
fn approval_creates_exactly_one_expense() {
    let mut store = Store::open_in_memory().unwrap();
    let bill_id = store
        .add_bill("u1", "scan.pdf", "application/pdf", Utc::now(), &sample_extracted())
        .unwrap();

    let tx_id = store.approve_bill("u1", bill_id).unwrap();

    let txns = store
        .list_transactions("u1", &TransactionFilter::default())
        .unwrap();
    assert_eq!(txns.len(), 1);
    let t = &txns[0];
    assert_eq!(t.id, tx_id);
    assert_eq!(t.kind, TxKind::Expense);
    assert_eq!(t.amount, Decimal::from(1250));
    assert_eq!(t.date, day("2024-05-10"));
    assert_eq!(t.description, "Bill from Sample Vendor Inc.");
    assert_eq!(t.category, "Business Expense");
    assert_eq!(t.bill_id, Some(bill_id));

    let bill = store.get_bill("u1", bill_id).unwrap();
    assert_eq!(bill.status, BillStatus::Approved);
}

#[test]
fn approval_is_one_way() {
    let mut store = Store::open_in_memory().unwrap();
    let bill_id = store
        .add_bill("u1", "scan.pdf", "application/pdf", Utc::now(), &sample_extracted())
        .unwrap();
    store.approve_bill("u1", bill_id).unwrap();

    assert!(matches!(
        store.approve_bill("u1", bill_id).unwrap_err(),
        StoreError::InvalidRecord(_)
    ));
    // still exactly one expense
    let txns = store
        .list_transactions("u1", &TransactionFilter::default())
        .unwrap();
    assert_eq!(txns.len(), 1);
}

#[test]
fn approve_missing_or_foreign_bill_not_found() {
    let mut store = Store::open_in_memory().unwrap();
    assert!(matches!(
        store.approve_bill("u1", 42).unwrap_err(),
        StoreError::NotFound { what: "bill", .. }
    ));

    let bill_id = store
        .add_bill("u1", "scan.pdf", "application/pdf", Utc::now(), &sample_extracted())
        .unwrap();
    assert!(matches!(
        store.approve_bill("u2", bill_id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn corrupt_extracted_document_is_signaled() {
    let store = Store::open_in_memory().unwrap();
    store
        .conn()
        .execute(
            "INSERT INTO bills(owner_id, file_name, file_type, upload_date, status, extracted)
             VALUES ('u1', 'bad.pdf', 'application/pdf', '2024-05-10T00:00:00+00:00', 'draft', 'not json')",
            [],
        )
        .unwrap();

    assert!(matches!(
        store.list_bills("u1").unwrap_err(),
        StoreError::Corrupt { what: "bill", .. }
    ));
}

#[test]
fn stub_extractor_fixed_payload() {
    let fields = StubExtractor.extract(Path::new("anything.pdf")).unwrap();
    assert!(fields.bill_number.starts_with("BILL-"));
    assert_eq!(fields.vendor, "Sample Vendor Inc.");
    assert_eq!(fields.amount, Decimal::from(1250));
    assert_eq!(fields.tax, Decimal::from(225));
    assert_eq!(fields.items.len(), 2);
    assert_eq!(fields.items[0].name, "Office Supplies");
    assert_eq!(fields.items[1].price, Decimal::from(250));
}

#[test]
fn bill_roundtrip_preserves_items() {
    let store = Store::open_in_memory().unwrap();
    let id = store
        .add_bill("u1", "scan.png", "image/png", Utc::now(), &sample_extracted())
        .unwrap();
    let bill = store.get_bill("u1", id).unwrap();
    assert_eq!(bill.file_name, "scan.png");
    assert_eq!(bill.status, BillStatus::Draft);
    assert_eq!(bill.extracted.items.len(), 1);
    assert_eq!(bill.extracted.items[0].quantity, 1);
}
