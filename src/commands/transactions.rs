// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};

use crate::models::{NewTransaction, Transaction, TxKind};
use crate::store::{Store, TransactionFilter};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};

use super::owner_of;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let kind_s = sub.get_one::<String>("kind").unwrap();
    let kind = TxKind::parse(kind_s).ok_or_else(|| anyhow!("Unknown kind '{}'", kind_s))?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().to_string();
    let category = sub.get_one::<String>("category").unwrap().to_string();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;

    let id = store.add_transaction(
        owner,
        NewTransaction {
            kind,
            amount,
            description: description.clone(),
            category,
            date,
            bill_id: None,
        },
    )?;
    println!(
        "Recorded {} '{}' of {} on {} (#{})",
        kind.as_str(),
        description,
        amount,
        date,
        id
    );
    Ok(())
}

pub fn query(store: &Store, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let owner = owner_of(sub);
    let mut filter = TransactionFilter::default();
    if let Some(month) = sub.get_one::<String>("month") {
        parse_month(month)?;
        filter.month = Some(month.clone());
    }
    if let Some(kind_s) = sub.get_one::<String>("kind") {
        filter.kind =
            Some(TxKind::parse(kind_s).ok_or_else(|| anyhow!("Unknown kind '{}'", kind_s))?);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        filter.category = Some(cat.clone());
    }
    filter.limit = sub.get_one::<usize>("limit").copied();
    Ok(store.list_transactions(owner, &filter)?)
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.as_str().to_string(),
                    format!("{:.2}", t.amount),
                    t.category.clone(),
                    t.description.clone(),
                    t.bill_id.map(|b| format!("#{}", b)).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Kind", "Amount", "Category", "Description", "Bill"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let id = *sub.get_one::<i64>("id").unwrap();
    store.delete_transaction(owner, id)?;
    println!("Deleted transaction #{}", id);
    Ok(())
}
