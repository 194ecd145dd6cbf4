// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TxKind};
use crate::report;
use crate::store::{Store, TransactionFilter};
use crate::utils::{
    maybe_print_json, parse_date, parse_month, parse_quarter, pretty_table, recent_sunday,
};

use super::owner_of;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("daily", sub)) => daily(store, sub)?,
        Some(("weekly", sub)) => weekly(store, sub)?,
        Some(("period", sub)) => period(store, sub)?,
        Some(("trend", sub)) => trend(store, sub)?,
        Some(("categories", sub)) => categories(store, sub)?,
        Some(("snapshot", sub)) => snapshot(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn all_transactions(store: &Store, owner: &str) -> Result<Vec<Transaction>> {
    Ok(store.list_transactions(owner, &TransactionFilter::default())?)
}

fn date_or_today(sub: &clap::ArgMatches, name: &str) -> Result<NaiveDate> {
    match sub.get_one::<String>(name) {
        Some(s) => parse_date(s),
        None => Ok(Utc::now().date_naive()),
    }
}

/// A month token (2024-03) or quarter token (2024-Q3) to its
/// inclusive date range.
fn period_range(token: &str) -> Result<(NaiveDate, NaiveDate)> {
    if let Ok((year, month)) = parse_month(token) {
        return report::month_range(year, month);
    }
    if let Ok((year, quarter)) = parse_quarter(token) {
        return report::quarter_range(year, quarter);
    }
    Err(anyhow!(
        "Invalid period '{}', expected YYYY-MM or YYYY-Qn",
        token
    ))
}

fn daily(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let date = date_or_today(sub, "date")?;
    let txns = all_transactions(store, owner)?;
    let s = report::daily_summary(&txns, owner, date);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!(
            "{}",
            pretty_table(
                &["Date", "Sales", "Expenses", "Investment", "Profit"],
                vec![vec![
                    s.date.to_string(),
                    format!("{:.2}", s.total_sales),
                    format!("{:.2}", s.total_expenses),
                    format!("{:.2}", s.total_investment),
                    format!("{:.2}", s.profit),
                ]],
            )
        );
    }
    Ok(())
}

fn weekly(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let week_start = match sub.get_one::<String>("week-start") {
        Some(s) => parse_date(s)?,
        None => recent_sunday(Utc::now().date_naive()),
    };
    let txns = all_transactions(store, owner)?;
    let days = report::weekly_cash_flow(&txns, owner, week_start);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &days)? {
        let rows: Vec<Vec<String>> = days
            .iter()
            .map(|d| {
                vec![
                    d.date.format("%a %Y-%m-%d").to_string(),
                    format!("{:.2}", d.sales),
                    format!("{:.2}", d.expenses),
                    format!("{:.2}", d.profit),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Day", "Sales", "Expenses", "Profit"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct PeriodRow {
    period: String,
    sales: Decimal,
    expenses: Decimal,
    investments: Decimal,
    profit: Decimal,
    transactions: usize,
}

fn period(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let token = sub.get_one::<String>("period").unwrap();
    let (start, end) = period_range(token)?;
    let txns = all_transactions(store, owner)?;
    let s = report::period_summary(&txns, owner, start, end);
    let row = PeriodRow {
        period: token.clone(),
        sales: s.sales,
        expenses: s.expenses,
        investments: s.investments,
        profit: s.profit,
        transactions: s.matched.len(),
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &row)? {
        println!(
            "{}",
            pretty_table(
                &["Period", "Sales", "Expenses", "Investments", "Profit", "Txns"],
                vec![vec![
                    row.period,
                    format!("{:.2}", row.sales),
                    format!("{:.2}", row.expenses),
                    format!("{:.2}", row.investments),
                    format!("{:.2}", row.profit),
                    row.transactions.to_string(),
                ]],
            )
        );
    }
    Ok(())
}

fn trend(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let months = *sub.get_one::<u32>("months").unwrap();
    let anchor = date_or_today(sub, "anchor")?;
    let txns = all_transactions(store, owner)?;
    let series = report::trailing_months(&txns, owner, months, anchor)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        let rows: Vec<Vec<String>> = series
            .iter()
            .map(|msum| {
                vec![
                    format!("{}-{:02}", msum.year, msum.month),
                    format!("{:.2}", msum.sales),
                    format!("{:.2}", msum.expenses),
                    format!("{:.2}", msum.investments),
                    format!("{:.2}", msum.profit),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Sales", "Expenses", "Investments", "Profit"],
                rows
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    transactions: usize,
    amount: Decimal,
    share: Decimal,
}

fn categories(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let token = sub.get_one::<String>("period").unwrap();
    let (start, end) = period_range(token)?;
    let txns = all_transactions(store, owner)?;
    let s = report::period_summary(&txns, owner, start, end);
    let breakdown = report::category_breakdown(&s.matched, TxKind::Expense);

    let rows: Vec<CategoryRow> = breakdown
        .into_iter()
        .map(|(category, amount)| {
            let count = s
                .matched
                .iter()
                .filter(|t| t.kind == TxKind::Expense && t.category == category)
                .count();
            let share = if s.expenses > Decimal::ZERO {
                amount / s.expenses * Decimal::from(100)
            } else {
                Decimal::ZERO
            };
            CategoryRow {
                category,
                transactions: count,
                amount,
                share,
            }
        })
        .collect();

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let table: Vec<Vec<String>> = rows
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.transactions.to_string(),
                    format!("{:.2}", r.amount),
                    format!("{:.1}%", r.share),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Txns", "Amount", "Share"], table)
        );
    }
    Ok(())
}

fn snapshot(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let date = date_or_today(sub, "date")?;
    let txns = all_transactions(store, owner)?;
    let s = report::daily_summary(&txns, owner, date);
    store.upsert_daily_summary(owner, &s)?;
    println!(
        "Cached summary for {}: sales {:.2}, expenses {:.2}, profit {:.2}",
        s.date, s.total_sales, s.total_expenses, s.profit
    );
    Ok(())
}
