// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Goal, GoalKind, Transaction, TxKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    Achieved,
    OnTrack,
    AtRisk,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Achieved => "achieved",
            GoalStatus::OnTrack => "on-track",
            GoalStatus::AtRisk => "at-risk",
        }
    }
}

/// Date range a goal is evaluated over, inclusive on both ends.
#[derive(Debug, Clone, Copy)]
pub struct GoalWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl GoalWindow {
    /// The default window: one month ending at the deadline. A fixed
    /// lookback regardless of when the goal was set — kept for parity
    /// with the historical behavior, hence the parameterized type.
    pub fn ending_at(deadline: NaiveDate) -> Self {
        let start = deadline
            .checked_sub_months(Months::new(1))
            .unwrap_or(deadline);
        GoalWindow {
            start,
            end: deadline,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub current_amount: Decimal,
    pub percentage: Decimal,
    pub status: GoalStatus,
}

/// Derive a goal's live progress from its owner's transactions.
/// Status is always computed here, never read back from storage.
pub fn evaluate(goal: &Goal, txns: &[Transaction], window: GoalWindow) -> GoalProgress {
    let mut sales = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for t in txns {
        if t.owner_id != goal.owner_id || t.date < window.start || t.date > window.end {
            continue;
        }
        match t.kind {
            TxKind::Sale => sales += t.amount,
            TxKind::Expense => expenses += t.amount,
            TxKind::Investment => {}
        }
    }

    let current_amount = match goal.kind {
        GoalKind::Sales => sales,
        GoalKind::Profit => sales - expenses,
        // "Amount saved relative to target", not a literal expense
        // total; floors at zero once spending passes the target.
        GoalKind::ExpenseReduction => (goal.target_amount - expenses).max(Decimal::ZERO),
    };

    let percentage = if goal.target_amount <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        (current_amount / goal.target_amount * Decimal::from(100)).min(Decimal::from(100))
    };

    let status = if percentage >= Decimal::from(100) {
        GoalStatus::Achieved
    } else if percentage < Decimal::from(50) {
        GoalStatus::AtRisk
    } else {
        GoalStatus::OnTrack
    };

    GoalProgress {
        current_amount,
        percentage,
        status,
    }
}

/// Active means the deadline has not passed, compared at day
/// granularity.
pub fn is_active(goal: &Goal, today: NaiveDate) -> bool {
    goal.deadline >= today
}
