// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::BillStatus;
use crate::store::{Store, TransactionFilter};
use crate::utils::pretty_table;

pub fn handle(store: &Store) -> Result<()> {
    let mut rows = Vec::new();

    for owner in store.owners()? {
        let txns = store.list_transactions(&owner, &TransactionFilter::default())?;

        // 1) Approved bills must have their expense transaction
        let bills = match store.list_bills(&owner) {
            Ok(bills) => bills,
            Err(e @ StoreError::Corrupt { .. }) => {
                rows.push(vec!["corrupt_bill".into(), format!("{} (owner {})", e, owner)]);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        for bill in &bills {
            if bill.status != BillStatus::Approved {
                continue;
            }
            match txns.iter().find(|t| t.bill_id == Some(bill.id)) {
                None => rows.push(vec![
                    "approved_bill_missing_tx".into(),
                    format!("bill #{} (owner {})", bill.id, owner),
                ]),
                Some(t) if t.amount != bill.extracted.amount || t.date != bill.extracted.date => {
                    rows.push(vec![
                        "approved_bill_tx_mismatch".into(),
                        format!("bill #{} vs tx #{} (owner {})", bill.id, t.id, owner),
                    ])
                }
                Some(_) => {}
            }
        }

        // 2) Transactions pointing at bills that no longer exist
        for t in &txns {
            if let Some(bill_id) = t.bill_id {
                if !bills.iter().any(|b| b.id == bill_id) {
                    rows.push(vec![
                        "tx_orphan_bill_ref".into(),
                        format!("tx #{} -> bill #{} (owner {})", t.id, bill_id, owner),
                    ]);
                }
            }
        }

        // 3) Goal targets that slipped past validation
        for g in store.list_goals(&owner)? {
            if g.target_amount <= Decimal::ZERO {
                rows.push(vec![
                    "goal_nonpositive_target".into(),
                    format!("goal #{} '{}' (owner {})", g.id, g.title, owner),
                ]);
            }
        }

        // 4) Cached daily summaries must satisfy profit = sales - expenses
        for s in store.list_daily_summaries(&owner)? {
            if s.profit != s.total_sales - s.total_expenses {
                rows.push(vec![
                    "summary_profit_mismatch".into(),
                    format!("{} (owner {})", s.date, owner),
                ]);
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
