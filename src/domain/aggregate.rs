//! Pure summaries over a set of transactions. Nothing here mutates the ledger;
//! every function takes whatever slice, filter or search the caller hands it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{BudgetCheck, BudgetStatus, Cents, Period, Transaction, TransactionKind};

/// Income, expense and balance for a window, with expenses split by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
    pub by_category: HashMap<String, Cents>,
}

/// One slice of a category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    /// Share of the kind's total, 0.0 to 100.0
    pub percentage: f64,
}

fn total_of_kind<'a, I>(transactions: I, kind: TransactionKind) -> Cents
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| t.kind == kind)
        .fold(0, |total: Cents, t| total.saturating_add(t.amount_cents))
}

pub fn total_income<'a, I>(transactions: I) -> Cents
where
    I: IntoIterator<Item = &'a Transaction>,
{
    total_of_kind(transactions, TransactionKind::Income)
}

pub fn total_expense<'a, I>(transactions: I) -> Cents
where
    I: IntoIterator<Item = &'a Transaction>,
{
    total_of_kind(transactions, TransactionKind::Expense)
}

/// Income minus expense.
pub fn balance<'a, I>(transactions: I) -> Cents
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().fold(0, |balance, t| match t.kind {
        TransactionKind::Income => balance.saturating_add(t.amount_cents),
        TransactionKind::Expense => balance.saturating_sub(t.amount_cents),
    })
}

/// Expense totals per category. Categories summing to zero are left out.
pub fn by_category<'a, I>(transactions: I) -> HashMap<String, Cents>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    by_category_of_kind(transactions, TransactionKind::Expense)
}

/// Totals per category for one kind. Categories summing to zero are left out.
pub fn by_category_of_kind<'a, I>(transactions: I, kind: TransactionKind) -> HashMap<String, Cents>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: HashMap<String, Cents> = HashMap::new();
    for t in transactions.into_iter().filter(|t| t.kind == kind) {
        let total = totals.entry(t.category.clone()).or_insert(0);
        *total = total.saturating_add(t.amount_cents);
    }
    totals.retain(|_, total| *total != 0);
    totals
}

/// Summarize everything handed in, in a single pass.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = Summary::default();
    for t in transactions {
        match t.kind {
            TransactionKind::Income => {
                summary.total_income = summary.total_income.saturating_add(t.amount_cents)
            }
            TransactionKind::Expense => {
                summary.total_expense = summary.total_expense.saturating_add(t.amount_cents);
                let total = summary.by_category.entry(t.category.clone()).or_insert(0);
                *total = total.saturating_add(t.amount_cents);
            }
        }
    }
    summary.by_category.retain(|_, total| *total != 0);
    summary.balance = summary.total_income.saturating_sub(summary.total_expense);
    summary
}

/// Summarize the transactions that fall inside `period`.
pub fn period_summary<'a, I>(transactions: I, period: Period) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    summarize(transactions.into_iter().filter(|t| period.contains(t.date)))
}

/// Summary for one calendar month. An empty (or nonexistent) month is all zeros.
pub fn monthly_summary<'a, I>(transactions: I, year: i32, month: u32) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    period_summary(transactions, Period::Month { year, month })
}

/// Summary for one calendar year.
pub fn yearly_summary<'a, I>(transactions: I, year: i32) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    period_summary(transactions, Period::Year(year))
}

/// Twelve monthly summaries for `year`, January first.
pub fn monthly_breakdown(transactions: &[Transaction], year: i32) -> Vec<(u32, Summary)> {
    (1..=12)
        .map(|month| (month, monthly_summary(transactions, year, month)))
        .collect()
}

/// Per-category totals with counts and percentages, largest first.
/// This is the data behind a pie chart.
pub fn category_breakdown<'a, I>(transactions: I, kind: TransactionKind) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: HashMap<&str, (Cents, usize)> = HashMap::new();
    for t in transactions.into_iter().filter(|t| t.kind == kind) {
        let entry = groups.entry(t.category.as_str()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(t.amount_cents);
        entry.1 += 1;
    }

    let grand_total = groups
        .values()
        .fold(0, |sum: Cents, (total, _)| sum.saturating_add(*total));

    let mut shares: Vec<CategoryShare> = groups
        .into_iter()
        .filter(|(_, (total, _))| *total != 0)
        .map(|(category, (total, count))| CategoryShare {
            category: category.to_string(),
            total,
            count,
            percentage: if grand_total == 0 {
                0.0
            } else {
                total as f64 / grand_total as f64 * 100.0
            },
        })
        .collect();

    shares.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    shares
}

/// Compare expenses in `category` against `limit`.
/// The category is matched exactly, as in the other aggregates.
pub fn check_budget<'a, I>(transactions: I, category: &str, limit: Cents) -> BudgetCheck
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let total = total_expense(transactions.into_iter().filter(|t| t.category == category));
    BudgetCheck {
        category: Some(category.to_string()),
        status: BudgetStatus::evaluate(total, limit),
        total,
        limit,
    }
}

/// Compare all expenses against `limit`.
pub fn check_total_budget<'a, I>(transactions: I, limit: Cents) -> BudgetCheck
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let total = total_expense(transactions);
    BudgetCheck {
        category: None,
        status: BudgetStatus::evaluate(total, limit),
        total,
        limit,
    }
}
