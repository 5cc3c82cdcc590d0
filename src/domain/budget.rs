use serde::{Deserialize, Serialize};

use super::{Cents, Period, Transaction, check_budget, check_total_budget};

/// Spending at or above this share of the limit (in percent) raises a warning.
pub const WARNING_THRESHOLD_PERCENT: Cents = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Ok,
    Warning,
    Exceeded,
}

impl BudgetStatus {
    /// Classify a spent total against a limit.
    pub fn evaluate(total: Cents, limit: Cents) -> Self {
        if total > limit {
            BudgetStatus::Exceeded
        } else if (total as i128) * 100 >= (limit as i128) * (WARNING_THRESHOLD_PERCENT as i128) {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Ok => "ok",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of comparing expenses against a limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCheck {
    /// `None` when the check covered all expense categories
    pub category: Option<String>,
    pub status: BudgetStatus,
    pub total: Cents,
    pub limit: Cents,
}

impl BudgetCheck {
    pub fn remaining(&self) -> Cents {
        self.limit.saturating_sub(self.total)
    }
}

/// A spending limit over a period, either for one category or for all expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub category: Option<String>,
    pub limit_cents: Cents,
    pub period: Period,
}

impl Budget {
    pub fn for_category(category: impl Into<String>, limit_cents: Cents, period: Period) -> Self {
        Self {
            category: Some(category.into()),
            limit_cents,
            period,
        }
    }

    pub fn overall(limit_cents: Cents, period: Period) -> Self {
        Self {
            category: None,
            limit_cents,
            period,
        }
    }

    /// Evaluate the budget against the transactions that fall inside its period.
    pub fn check<'a, I>(&self, transactions: I) -> BudgetCheck
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let in_period = transactions
            .into_iter()
            .filter(|t| self.period.contains(t.date));
        match &self.category {
            Some(category) => check_budget(in_period, category, self.limit_cents),
            None => check_total_budget(in_period, self.limit_cents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_date;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(BudgetStatus::evaluate(0, 10000), BudgetStatus::Ok);
        assert_eq!(BudgetStatus::evaluate(8999, 10000), BudgetStatus::Ok);
        assert_eq!(BudgetStatus::evaluate(9000, 10000), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::evaluate(10000, 10000), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::evaluate(10001, 10000), BudgetStatus::Exceeded);
    }

    #[test]
    fn test_zero_limit() {
        assert_eq!(BudgetStatus::evaluate(0, 0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::evaluate(1, 0), BudgetStatus::Exceeded);
    }

    #[test]
    fn test_remaining() {
        let check = BudgetCheck {
            category: Some("Food".into()),
            status: BudgetStatus::Exceeded,
            total: 2000,
            limit: 1500,
        };
        assert_eq!(check.remaining(), -500);
    }

    #[test]
    fn test_budget_respects_period() {
        let transactions = vec![
            Transaction::expense(parse_date("2024-01-05").unwrap(), "Food", 2000),
            Transaction::expense(parse_date("2024-02-05").unwrap(), "Food", 9000),
            Transaction::expense(parse_date("2024-01-07").unwrap(), "Rent", 50000),
        ];
        let january = Period::Month {
            year: 2024,
            month: 1,
        };

        let food = Budget::for_category("Food", 5000, january).check(&transactions);
        assert_eq!(food.total, 2000);
        assert_eq!(food.status, BudgetStatus::Ok);

        let overall = Budget::overall(40000, january).check(&transactions);
        assert_eq!(overall.total, 52000);
        assert_eq!(overall.status, BudgetStatus::Exceeded);
        assert_eq!(overall.category, None);
    }
}
