use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, format_cents};

pub type TransactionId = Uuid;

/// Canonical textual form of a transaction date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest amount a single transaction may carry: one trillion units.
pub const MAX_AMOUNT_CENTS: Cents = 100_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded income or expense.
/// Transactions are never edited in place: a correction is a remove followed by a new add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Synthetic identifier, assigned by the ledger on add
    pub id: TransactionId,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    /// Label used for grouping, compared case-sensitively in aggregates
    pub category: String,
    /// Amount in cents, never negative; the direction is carried by `kind`
    pub amount_cents: Cents,
    pub note: Option<String>,
}

impl Transaction {
    /// Create a transaction with no id yet. The ledger assigns one on add.
    pub fn new(
        date: NaiveDate,
        kind: TransactionKind,
        category: impl Into<String>,
        amount_cents: Cents,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            date,
            kind,
            category: category.into(),
            amount_cents,
            note: None,
        }
    }

    pub fn income(date: NaiveDate, category: impl Into<String>, amount_cents: Cents) -> Self {
        Self::new(date, TransactionKind::Income, category, amount_cents)
    }

    pub fn expense(date: NaiveDate, category: impl Into<String>, amount_cents: Cents) -> Self {
        Self::new(date, TransactionKind::Expense, category, amount_cents)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Check field domains without touching the value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount_cents < 0 {
            return Err(ValidationError::NegativeAmount(self.amount_cents));
        }
        if self.amount_cents > MAX_AMOUNT_CENTS {
            return Err(ValidationError::AmountTooLarge(self.amount_cents));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(())
    }

    /// Validate, then trim the category and drop a blank note.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.validate()?;
        let trimmed = self.category.trim();
        if trimmed.len() != self.category.len() {
            self.category = trimmed.to_string();
        }
        self.note = self
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Ok(self)
    }

    /// True when `needle` (already lowercased) occurs in the category, ignoring case.
    pub(crate) fn category_contains(&self, needle: &str) -> bool {
        self.category.to_lowercase().contains(needle)
    }

    /// Same fields apart from the synthetic id.
    pub fn same_entry(&self, other: &Transaction) -> bool {
        self.date == other.date
            && self.kind == other.kind
            && self.category == other.category
            && self.amount_cents == other.amount_cents
            && self.note == other.note
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NegativeAmount(Cents),
    AmountTooLarge(Cents),
    EmptyCategory,
    InvalidDate(String),
    InvalidAmount(String),
    InvalidKind(String),
    InvalidPeriod(String),
    DuplicateId(TransactionId),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NegativeAmount(cents) => {
                write!(f, "amount must not be negative (got {} cents)", cents)
            }
            ValidationError::AmountTooLarge(cents) => write!(
                f,
                "amount must not exceed {} (got {})",
                format_cents(MAX_AMOUNT_CENTS),
                format_cents(*cents)
            ),
            ValidationError::EmptyCategory => write!(f, "category must not be empty"),
            ValidationError::InvalidDate(s) => {
                write!(f, "invalid date '{}', expected YYYY-MM-DD", s)
            }
            ValidationError::InvalidAmount(s) => write!(f, "invalid amount '{}'", s),
            ValidationError::InvalidKind(s) => {
                write!(f, "invalid kind '{}', expected income or expense", s)
            }
            ValidationError::InvalidPeriod(s) => {
                write!(f, "invalid period '{}', expected all, YYYY or YYYY-MM", s)
            }
            ValidationError::DuplicateId(id) => write!(f, "duplicate transaction id {}", id),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_create_transaction() {
        let tx = Transaction::expense(day("2024-01-05"), "Food", 2000).with_note("lunch");

        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.category, "Food");
        assert_eq!(tx.amount_cents, 2000);
        assert_eq!(tx.note, Some("lunch".to_string()));
        assert!(tx.id.is_nil());
        assert!(tx.is_expense());
        assert!(!tx.is_income());
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            assert_eq!(TransactionKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(
            TransactionKind::from_str("Income"),
            Some(TransactionKind::Income)
        );
        assert_eq!(TransactionKind::from_str("refund"), None);
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let tx = Transaction::expense(day("2024-01-05"), "Food", -1);
        assert_eq!(tx.validate(), Err(ValidationError::NegativeAmount(-1)));
    }

    #[test]
    fn test_validate_amount_ceiling() {
        let at_max = Transaction::expense(day("2024-01-05"), "Food", MAX_AMOUNT_CENTS);
        assert!(at_max.validate().is_ok());

        let over = Transaction::expense(day("2024-01-05"), "Food", MAX_AMOUNT_CENTS + 1);
        assert_eq!(
            over.validate(),
            Err(ValidationError::AmountTooLarge(MAX_AMOUNT_CENTS + 1))
        );
    }

    #[test]
    fn test_validate_rejects_blank_category() {
        let tx = Transaction::income(day("2024-01-05"), "   ", 100);
        assert_eq!(tx.validate(), Err(ValidationError::EmptyCategory));
    }

    #[test]
    fn test_zero_amount_is_valid() {
        let tx = Transaction::expense(day("2024-01-05"), "Food", 0);
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_normalized_trims_category_and_note() {
        let tx = Transaction::expense(day("2024-01-05"), "  Food ", 100)
            .with_note("  ")
            .normalized()
            .unwrap();
        assert_eq!(tx.category, "Food");
        assert_eq!(tx.note, None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap().to_string(),
            "2024-02-29"
        );
        assert!(matches!(
            parse_date("2023-02-29"),
            Err(ValidationError::InvalidDate(_))
        ));
        assert!(parse_date("05/01/2024").is_err());
    }
}
