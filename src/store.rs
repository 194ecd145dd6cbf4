// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::db;
use crate::error::{Result, StoreError};
use crate::models::{
    Bill, BillStatus, DailySummary, ExtractedFields, Goal, GoalKind, GoalPatch, NewTransaction,
    Transaction, TxKind,
};

/// Owner-scoped record store over the four collections. Every read
/// filters by the caller's owner id; there is no cross-owner
/// visibility. Rows come back in insertion (id) order.
pub struct Store {
    conn: Connection,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub month: Option<String>,
    pub kind: Option<TxKind>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

fn require_owner(owner: &str) -> Result<()> {
    if owner.trim().is_empty() {
        return Err(StoreError::MissingOwner);
    }
    Ok(())
}

impl Store {
    pub fn open() -> anyhow::Result<Self> {
        Ok(Store {
            conn: db::open_or_init()?,
        })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        db::init_schema(&mut conn)?;
        Ok(Store { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Every owner id that appears in any collection.
    pub fn owners(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT owner_id FROM transactions
             UNION SELECT owner_id FROM bills
             UNION SELECT owner_id FROM goals
             UNION SELECT owner_id FROM daily_summaries
             ORDER BY owner_id",
        )?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    // ---- transactions ----

    pub fn add_transaction(&self, owner: &str, tx: NewTransaction) -> Result<i64> {
        require_owner(owner)?;
        if tx.description.trim().is_empty() {
            return Err(StoreError::invalid("transaction description is required"));
        }
        if tx.category.trim().is_empty() {
            return Err(StoreError::invalid("transaction category is required"));
        }
        if tx.amount.is_sign_negative() {
            return Err(StoreError::invalid(format!(
                "transaction amount '{}' must be non-negative",
                tx.amount
            )));
        }
        self.conn.execute(
            "INSERT INTO transactions(owner_id, kind, amount, description, category, date, bill_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                owner,
                tx.kind.as_str(),
                tx.amount.to_string(),
                tx.description,
                tx.category,
                tx.date.to_string(),
                tx.bill_id
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_transactions(
        &self,
        owner: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        require_owner(owner)?;
        let mut sql = String::from(
            "SELECT id, owner_id, kind, amount, description, category, date, bill_id
             FROM transactions WHERE owner_id=?",
        );
        let mut args: Vec<String> = vec![owner.to_string()];
        if let Some(month) = &filter.month {
            sql.push_str(" AND substr(date,1,7)=?");
            args.push(month.clone());
        }
        if let Some(kind) = filter.kind {
            sql.push_str(" AND kind=?");
            args.push(kind.as_str().to_string());
        }
        if let Some(cat) = &filter.category {
            sql.push_str(" AND category=?");
            args.push(cat.clone());
        }
        sql.push_str(" ORDER BY id");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            args.push(limit.to_string());
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(args.iter()))?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let owner_id: String = r.get(1)?;
            let kind: String = r.get(2)?;
            let amount: String = r.get(3)?;
            let description: String = r.get(4)?;
            let category: String = r.get(5)?;
            let date: String = r.get(6)?;
            let bill_id: Option<i64> = r.get(7)?;
            out.push(Transaction {
                id,
                owner_id,
                kind: parse_kind(&kind, id)?,
                amount: parse_amount(&amount, "transaction", id)?,
                description,
                category,
                date: parse_day(&date, "transaction", id)?,
                bill_id,
            });
        }
        Ok(out)
    }

    pub fn delete_transaction(&self, owner: &str, id: i64) -> Result<()> {
        require_owner(owner)?;
        let n = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND owner_id=?2",
            params![id, owner],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound {
                what: "transaction",
                id,
            });
        }
        Ok(())
    }

    // ---- bills ----

    pub fn add_bill(
        &self,
        owner: &str,
        file_name: &str,
        file_type: &str,
        upload_date: DateTime<Utc>,
        extracted: &ExtractedFields,
    ) -> Result<i64> {
        require_owner(owner)?;
        if file_name.trim().is_empty() {
            return Err(StoreError::invalid("bill file name is required"));
        }
        let doc = serde_json::to_string(extracted)?;
        self.conn.execute(
            "INSERT INTO bills(owner_id, file_name, file_type, upload_date, status, extracted)
             VALUES (?1, ?2, ?3, ?4, 'draft', ?5)",
            params![owner, file_name, file_type, upload_date.to_rfc3339(), doc],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_bill(&self, owner: &str, id: i64) -> Result<Bill> {
        require_owner(owner)?;
        let row: Option<(i64, String, String, String, String, String, String)> = self
            .conn
            .query_row(
                "SELECT id, owner_id, file_name, file_type, upload_date, status, extracted
                 FROM bills WHERE id=?1 AND owner_id=?2",
                params![id, owner],
                |r| {
                    Ok((
                        r.get(0)?,
                        r.get(1)?,
                        r.get(2)?,
                        r.get(3)?,
                        r.get(4)?,
                        r.get(5)?,
                        r.get(6)?,
                    ))
                },
            )
            .optional()?;
        match row {
            Some(raw) => bill_from_row(raw),
            None => Err(StoreError::NotFound { what: "bill", id }),
        }
    }

    pub fn list_bills(&self, owner: &str) -> Result<Vec<Bill>> {
        require_owner(owner)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, file_name, file_type, upload_date, status, extracted
             FROM bills WHERE owner_id=?1 ORDER BY id",
        )?;
        let mut rows = stmt.query(params![owner])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let raw = (
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
                r.get(6)?,
            );
            out.push(bill_from_row(raw)?);
        }
        Ok(out)
    }

    /// Flip a draft bill to approved and record the matching expense
    /// transaction in one step. Returns the new transaction id.
    /// Approval is one-way; a second call fails with InvalidRecord.
    pub fn approve_bill(&mut self, owner: &str, id: i64) -> Result<i64> {
        require_owner(owner)?;
        let bill = self.get_bill(owner, id)?;
        if bill.status != BillStatus::Draft {
            return Err(StoreError::invalid(format!(
                "bill {} is already approved",
                id
            )));
        }
        let sql_tx = self.conn.transaction()?;
        sql_tx.execute(
            "UPDATE bills SET status='approved' WHERE id=?1 AND owner_id=?2",
            params![id, owner],
        )?;
        sql_tx.execute(
            "INSERT INTO transactions(owner_id, kind, amount, description, category, date, bill_id)
             VALUES (?1, 'expense', ?2, ?3, 'Business Expense', ?4, ?5)",
            params![
                owner,
                bill.extracted.amount.to_string(),
                format!("Bill from {}", bill.extracted.vendor),
                bill.extracted.date.to_string(),
                id
            ],
        )?;
        let tx_id = sql_tx.last_insert_rowid();
        sql_tx.commit()?;
        Ok(tx_id)
    }

    // ---- goals ----

    pub fn add_goal(
        &self,
        owner: &str,
        kind: GoalKind,
        title: &str,
        target_amount: Decimal,
        deadline: NaiveDate,
    ) -> Result<i64> {
        require_owner(owner)?;
        if title.trim().is_empty() {
            return Err(StoreError::invalid("goal title is required"));
        }
        if target_amount <= Decimal::ZERO {
            return Err(StoreError::invalid(format!(
                "goal target '{}' must be positive",
                target_amount
            )));
        }
        self.conn.execute(
            "INSERT INTO goals(owner_id, kind, title, target_amount, deadline)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                owner,
                kind.as_str(),
                title,
                target_amount.to_string(),
                deadline.to_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_goals(&self, owner: &str) -> Result<Vec<Goal>> {
        require_owner(owner)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, kind, title, target_amount, deadline
             FROM goals WHERE owner_id=?1 ORDER BY id",
        )?;
        let mut rows = stmt.query(params![owner])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let owner_id: String = r.get(1)?;
            let kind: String = r.get(2)?;
            let title: String = r.get(3)?;
            let target: String = r.get(4)?;
            let deadline: String = r.get(5)?;
            let kind = GoalKind::parse(&kind).ok_or(StoreError::Corrupt { what: "goal", id })?;
            out.push(Goal {
                id,
                owner_id,
                kind,
                title,
                target_amount: parse_amount(&target, "goal", id)?,
                deadline: parse_day(&deadline, "goal", id)?,
            });
        }
        Ok(out)
    }

    pub fn get_goal(&self, owner: &str, id: i64) -> Result<Goal> {
        let goals = self.list_goals(owner)?;
        goals
            .into_iter()
            .find(|g| g.id == id)
            .ok_or(StoreError::NotFound { what: "goal", id })
    }

    pub fn update_goal(&self, owner: &str, id: i64, patch: &GoalPatch) -> Result<()> {
        require_owner(owner)?;
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(StoreError::invalid("goal title is required"));
            }
        }
        if let Some(target) = patch.target_amount {
            if target <= Decimal::ZERO {
                return Err(StoreError::invalid(format!(
                    "goal target '{}' must be positive",
                    target
                )));
            }
        }
        let mut sets = Vec::new();
        let mut args: Vec<String> = Vec::new();
        if let Some(title) = &patch.title {
            sets.push("title=?");
            args.push(title.clone());
        }
        if let Some(target) = patch.target_amount {
            sets.push("target_amount=?");
            args.push(target.to_string());
        }
        if let Some(deadline) = patch.deadline {
            sets.push("deadline=?");
            args.push(deadline.to_string());
        }
        if sets.is_empty() {
            return Ok(());
        }
        let sql = format!("UPDATE goals SET {} WHERE id=? AND owner_id=?", sets.join(", "));
        args.push(id.to_string());
        args.push(owner.to_string());
        let n = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(args.iter()))?;
        if n == 0 {
            return Err(StoreError::NotFound { what: "goal", id });
        }
        Ok(())
    }

    pub fn delete_goal(&self, owner: &str, id: i64) -> Result<()> {
        require_owner(owner)?;
        let n = self.conn.execute(
            "DELETE FROM goals WHERE id=?1 AND owner_id=?2",
            params![id, owner],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { what: "goal", id });
        }
        Ok(())
    }

    // ---- daily summaries ----

    /// Upsert keyed on (owner, date): update if the day is already
    /// cached, insert otherwise.
    pub fn upsert_daily_summary(&self, owner: &str, summary: &DailySummary) -> Result<()> {
        require_owner(owner)?;
        self.conn.execute(
            "INSERT INTO daily_summaries(owner_id, date, total_sales, total_expenses, total_investment, profit)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(owner_id, date) DO UPDATE SET
                total_sales=excluded.total_sales,
                total_expenses=excluded.total_expenses,
                total_investment=excluded.total_investment,
                profit=excluded.profit",
            params![
                owner,
                summary.date.to_string(),
                summary.total_sales.to_string(),
                summary.total_expenses.to_string(),
                summary.total_investment.to_string(),
                summary.profit.to_string()
            ],
        )?;
        Ok(())
    }

    pub fn list_daily_summaries(&self, owner: &str) -> Result<Vec<DailySummary>> {
        require_owner(owner)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, date, total_sales, total_expenses, total_investment, profit
             FROM daily_summaries WHERE owner_id=?1 ORDER BY date",
        )?;
        let mut rows = stmt.query(params![owner])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let date: String = r.get(1)?;
            let sales: String = r.get(2)?;
            let expenses: String = r.get(3)?;
            let investment: String = r.get(4)?;
            let profit: String = r.get(5)?;
            out.push(DailySummary {
                date: parse_day(&date, "daily summary", id)?,
                owner_id: owner.to_string(),
                total_sales: parse_amount(&sales, "daily summary", id)?,
                total_expenses: parse_amount(&expenses, "daily summary", id)?,
                total_investment: parse_amount(&investment, "daily summary", id)?,
                profit: parse_amount(&profit, "daily summary", id)?,
            });
        }
        Ok(out)
    }
}

fn parse_kind(s: &str, id: i64) -> Result<TxKind> {
    TxKind::parse(s).ok_or(StoreError::Corrupt {
        what: "transaction",
        id,
    })
}

fn parse_amount(s: &str, what: &'static str, id: i64) -> Result<Decimal> {
    s.parse::<Decimal>()
        .map_err(|_| StoreError::Corrupt { what, id })
}

fn parse_day(s: &str, what: &'static str, id: i64) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| StoreError::Corrupt { what, id })
}

fn bill_from_row(
    raw: (i64, String, String, String, String, String, String),
) -> Result<Bill> {
    let (id, owner_id, file_name, file_type, upload_date, status, extracted) = raw;
    let status = BillStatus::parse(&status).ok_or(StoreError::Corrupt { what: "bill", id })?;
    // A bill whose extracted document no longer parses is reported as
    // corrupt, not dropped on the floor.
    let extracted: ExtractedFields = serde_json::from_str(&extracted)
        .map_err(|_| StoreError::Corrupt { what: "bill", id })?;
    let upload_date = DateTime::parse_from_rfc3339(&upload_date)
        .map_err(|_| StoreError::Corrupt { what: "bill", id })?
        .with_timezone(&Utc);
    Ok(Bill {
        id,
        owner_id,
        file_name,
        file_type,
        upload_date,
        status,
        extracted,
    })
}
