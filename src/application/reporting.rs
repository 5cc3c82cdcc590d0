use serde::{Deserialize, Serialize};

use crate::domain::{BudgetCheck, CategoryShare, Cents, Period, Summary, TransactionKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub period: Period,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
    /// Expense categories, largest first
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub months: Vec<MonthRow>,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRow {
    pub month: u32,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
}

impl MonthRow {
    pub fn from_summary(month: u32, summary: &Summary) -> Self {
        Self {
            month,
            total_income: summary.total_income,
            total_expense: summary.total_expense,
            balance: summary.balance,
        }
    }
}

/// Category split for one kind over a period; the data behind a pie chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub period: Period,
    pub kind: TransactionKind,
    pub total: Cents,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReport {
    pub period: Period,
    #[serde(flatten)]
    pub check: BudgetCheck,
    pub remaining: Cents,
}
