// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use std::path::Path;

use crate::error::StoreError;
use crate::extract::{BillExtractor, StubExtractor};
use crate::models::Bill;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};

use super::owner_of;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("upload", sub)) => upload(store, &StubExtractor, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        Some(("approve", sub)) => approve(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn file_type_of(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "pdf" => Ok("application/pdf"),
        other => Err(anyhow!(
            "Unsupported bill file type '{}' (use jpg, png, or pdf)",
            other
        )),
    }
}

pub fn upload(store: &Store, extractor: &dyn BillExtractor, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let path_s = sub.get_one::<String>("path").unwrap();
    let path = Path::new(path_s);
    std::fs::metadata(path).with_context(|| format!("Open bill file {}", path_s))?;
    let file_type = file_type_of(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid file name '{}'", path_s))?;

    let extracted = extractor.extract(path)?;
    let id = store.add_bill(owner, file_name, file_type, Utc::now(), &extracted)?;
    println!(
        "Stored draft bill #{} from {} ({}, amount {}, tax {})",
        id, file_name, extracted.vendor, extracted.amount, extracted.tax
    );
    println!("Review the extracted fields, then approve with: bill approve --id {}", id);
    Ok(())
}

/// Corrupt rows surface as a warning and an empty listing instead of
/// taking the command down.
fn list_or_empty(store: &Store, owner: &str) -> Result<Vec<Bill>> {
    match store.list_bills(owner) {
        Ok(bills) => Ok(bills),
        Err(e @ StoreError::Corrupt { .. }) => {
            eprintln!("warning: {}", e);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let bills = list_or_empty(store, owner_of(sub))?;
    if !maybe_print_json(json_flag, jsonl_flag, &bills)? {
        let rows: Vec<Vec<String>> = bills
            .iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    b.file_name.clone(),
                    b.upload_date.format("%Y-%m-%d").to_string(),
                    b.status.as_str().to_string(),
                    b.extracted.vendor.clone(),
                    format!("{:.2}", b.extracted.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "File", "Uploaded", "Status", "Vendor", "Amount"], rows)
        );
    }
    Ok(())
}

fn show(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let id = *sub.get_one::<i64>("id").unwrap();
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let bill = store.get_bill(owner, id)?;
    if maybe_print_json(json_flag, jsonl_flag, &bill)? {
        return Ok(());
    }
    println!(
        "Bill #{} [{}] {} — {} ({})",
        bill.id,
        bill.status.as_str(),
        bill.extracted.bill_number,
        bill.extracted.vendor,
        bill.extracted.date
    );
    println!("File: {} ({})", bill.file_name, bill.file_type);
    let rows: Vec<Vec<String>> = bill
        .extracted
        .items
        .iter()
        .map(|i| {
            vec![
                i.name.clone(),
                i.quantity.to_string(),
                format!("{:.2}", i.price),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Item", "Qty", "Price"], rows));
    println!(
        "Amount {:.2}, tax {:.2}",
        bill.extracted.amount, bill.extracted.tax
    );
    Ok(())
}

fn approve(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub).to_string();
    let id = *sub.get_one::<i64>("id").unwrap();
    let tx_id = store.approve_bill(&owner, id)?;
    println!(
        "Approved bill #{}; recorded expense transaction #{}",
        id, tx_id
    );
    Ok(())
}
