// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{DailySummary, Transaction, TxKind};

/// Sales/expenses/investments totals over an inclusive date range,
/// plus the transactions that matched. Profit excludes investment.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub sales: Decimal,
    pub expenses: Decimal,
    pub investments: Decimal,
    pub profit: Decimal,
    pub matched: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub sales: Decimal,
    pub expenses: Decimal,
    pub investments: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub sales: Decimal,
    pub expenses: Decimal,
    pub investments: Decimal,
    pub profit: Decimal,
}

/// Sum transactions for `owner` with dates in `[start, end]`, grouped
/// by kind. Comparison is at day granularity.
pub fn period_summary(
    txns: &[Transaction],
    owner: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> PeriodSummary {
    let mut sales = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    let mut investments = Decimal::ZERO;
    let mut matched = Vec::new();
    for t in txns {
        if t.owner_id != owner || t.date < start || t.date > end {
            continue;
        }
        match t.kind {
            TxKind::Sale => sales += t.amount,
            TxKind::Expense => expenses += t.amount,
            TxKind::Investment => investments += t.amount,
        }
        matched.push(t.clone());
    }
    PeriodSummary {
        sales,
        expenses,
        investments,
        profit: sales - expenses,
        matched,
    }
}

/// First through last calendar day of the given year-month.
pub fn month_range(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("Invalid month {}-{:02}", year, month))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = next
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| anyhow!("Invalid month {}-{:02}", year, month))?;
    Ok((start, end))
}

/// Quarters are 1-indexed: Q1 = Jan 1 .. Mar 31.
pub fn quarter_range(year: i32, quarter: u32) -> Result<(NaiveDate, NaiveDate)> {
    if !(1..=4).contains(&quarter) {
        return Err(anyhow!("Invalid quarter {} (use 1-4)", quarter));
    }
    let (start, _) = month_range(year, (quarter - 1) * 3 + 1)?;
    let (_, end) = month_range(year, quarter * 3)?;
    Ok((start, end))
}

/// Per-category totals for one transaction kind, in first-occurrence
/// order over the given set.
pub fn category_breakdown(txns: &[Transaction], kind: TxKind) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for t in txns {
        if t.kind != kind {
            continue;
        }
        match totals.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, sum)) => *sum += t.amount,
            None => totals.push((t.category.clone(), t.amount)),
        }
    }
    totals
}

/// `n` consecutive month summaries ending at the anchor's month,
/// oldest first.
pub fn trailing_months(
    txns: &[Transaction],
    owner: &str,
    n: u32,
    anchor: NaiveDate,
) -> Result<Vec<MonthSummary>> {
    let mut year = anchor.year();
    let mut month = anchor.month();
    let mut out = Vec::new();
    for _ in 0..n {
        let (start, end) = month_range(year, month)?;
        let s = period_summary(txns, owner, start, end);
        out.push(MonthSummary {
            year,
            month,
            sales: s.sales,
            expenses: s.expenses,
            investments: s.investments,
            profit: s.profit,
        });
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    out.reverse();
    Ok(out)
}

/// Always exactly seven entries, `week_start` through
/// `week_start + 6`; days with no transactions come back zeroed.
pub fn weekly_cash_flow(txns: &[Transaction], owner: &str, week_start: NaiveDate) -> Vec<DaySummary> {
    (0..7)
        .map(|i| {
            let date = week_start + Duration::days(i);
            let s = period_summary(txns, owner, date, date);
            DaySummary {
                date,
                sales: s.sales,
                expenses: s.expenses,
                investments: s.investments,
                profit: s.profit,
            }
        })
        .collect()
}

/// Single-day projection for the daily-summary cache.
pub fn daily_summary(txns: &[Transaction], owner: &str, date: NaiveDate) -> DailySummary {
    let s = period_summary(txns, owner, date, date);
    DailySummary {
        date,
        owner_id: owner.to_string(),
        total_sales: s.sales,
        total_expenses: s.expenses,
        total_investment: s.investments,
        profit: s.profit,
    }
}
