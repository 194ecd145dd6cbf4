// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Sale,
    Expense,
    Investment,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Sale => "sale",
            TxKind::Expense => "expense",
            TxKind::Investment => "investment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sale" => Some(TxKind::Sale),
            "expense" => Some(TxKind::Expense),
            "investment" => Some(TxKind::Investment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner_id: String,
    pub kind: TxKind,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub bill_id: Option<i64>,
}

/// Insert payload; the store assigns the id and stamps the owner.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub bill_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Draft,
    Approved,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Draft => "draft",
            BillStatus::Approved => "approved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(BillStatus::Draft),
            "approved" => Some(BillStatus::Approved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItem {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// Structured fields pulled off an uploaded bill. The extraction
/// collaborator fills these in; the store only round-trips them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub bill_number: String,
    pub date: NaiveDate,
    pub vendor: String,
    pub amount: Decimal,
    pub tax: Decimal,
    pub items: Vec<BillItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub owner_id: String,
    pub file_name: String,
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
    pub status: BillStatus,
    pub extracted: ExtractedFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalKind {
    Sales,
    Profit,
    ExpenseReduction,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Sales => "sales",
            GoalKind::Profit => "profit",
            GoalKind::ExpenseReduction => "expense-reduction",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sales" => Some(GoalKind::Sales),
            "profit" => Some(GoalKind::Profit),
            "expense-reduction" => Some(GoalKind::ExpenseReduction),
            _ => None,
        }
    }
}

/// Carries no status column: status is derived from live transactions
/// on every read, never trusted from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub owner_id: String,
    pub kind: GoalKind,
    pub title: String,
    pub target_amount: Decimal,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub target_amount: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub owner_id: String,
    pub total_sales: Decimal,
    pub total_expenses: Decimal,
    pub total_investment: Decimal,
    pub profit: Decimal,
}
