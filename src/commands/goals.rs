// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::Utc;
use serde::Serialize;

use crate::goal::{self, GoalWindow};
use crate::models::{Goal, GoalKind};
use crate::store::{Store, TransactionFilter};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

use super::owner_of;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("progress", sub)) => progress(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let kind_s = sub.get_one::<String>("kind").unwrap();
    let kind = GoalKind::parse(kind_s).ok_or_else(|| anyhow!("Unknown goal kind '{}'", kind_s))?;
    let title = sub.get_one::<String>("title").unwrap();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    let deadline = parse_date(sub.get_one::<String>("deadline").unwrap())?;
    let id = store.add_goal(owner, kind, title, target, deadline)?;
    println!(
        "Set {} goal '{}' (#{}) targeting {} by {}",
        kind.as_str(),
        title,
        id,
        target,
        deadline
    );
    Ok(())
}

#[derive(Serialize)]
struct GoalRow {
    #[serde(flatten)]
    goal: Goal,
    current_amount: rust_decimal::Decimal,
    percentage: rust_decimal::Decimal,
    status: crate::goal::GoalStatus,
    active: bool,
}

fn evaluated_rows(store: &Store, owner: &str) -> Result<Vec<GoalRow>> {
    let goals = store.list_goals(owner)?;
    let txns = store.list_transactions(owner, &TransactionFilter::default())?;
    let today = Utc::now().date_naive();
    Ok(goals
        .into_iter()
        .map(|g| {
            let p = goal::evaluate(&g, &txns, GoalWindow::ending_at(g.deadline));
            let active = goal::is_active(&g, today);
            GoalRow {
                current_amount: p.current_amount,
                percentage: p.percentage,
                status: p.status,
                active,
                goal: g,
            }
        })
        .collect())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let rows = evaluated_rows(store, owner_of(sub))?;
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let table_rows = |active: bool| -> Vec<Vec<String>> {
        rows.iter()
            .filter(|r| r.active == active)
            .map(|r| {
                vec![
                    r.goal.id.to_string(),
                    r.goal.title.clone(),
                    r.goal.kind.as_str().to_string(),
                    format!("{:.2}", r.goal.target_amount),
                    format!("{:.2}", r.current_amount),
                    format!("{:.1}%", r.percentage),
                    r.status.as_str().to_string(),
                    r.goal.deadline.to_string(),
                ]
            })
            .collect()
    };
    let headers = [
        "Id", "Title", "Kind", "Target", "Current", "Progress", "Status", "Deadline",
    ];
    println!("Active goals");
    println!("{}", pretty_table(&headers, table_rows(true)));
    let completed = table_rows(false);
    if !completed.is_empty() {
        println!("Completed goals");
        println!("{}", pretty_table(&headers, completed));
    }
    Ok(())
}

fn progress(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let id = *sub.get_one::<i64>("id").unwrap();
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let g = store.get_goal(owner, id)?;
    let txns = store.list_transactions(owner, &TransactionFilter::default())?;
    let window = match (
        sub.get_one::<String>("window-start"),
        sub.get_one::<String>("window-end"),
    ) {
        (Some(start), Some(end)) => GoalWindow {
            start: parse_date(start)?,
            end: parse_date(end)?,
        },
        _ => GoalWindow::ending_at(g.deadline),
    };
    let p = goal::evaluate(&g, &txns, window);

    if maybe_print_json(json_flag, jsonl_flag, &p)? {
        return Ok(());
    }
    println!(
        "Goal '{}' ({}) over {}..{}",
        g.title,
        g.kind.as_str(),
        window.start,
        window.end
    );
    println!(
        "Current {:.2} of target {:.2} — {:.1}% ({})",
        p.current_amount,
        g.target_amount,
        p.percentage,
        p.status.as_str()
    );
    Ok(())
}

fn rm(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let owner = owner_of(sub);
    let id = *sub.get_one::<i64>("id").unwrap();
    store.delete_goal(owner, id)?;
    println!("Deleted goal #{}", id);
    Ok(())
}
