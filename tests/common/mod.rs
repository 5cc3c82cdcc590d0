// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use spendlog::application::LedgerService;
use spendlog::domain::Transaction;
use spendlog::storage::CsvStore;
use tempfile::TempDir;

/// Helper to create a service backed by a CSV file in a temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(CsvStore::new(temp_dir.path().join("ledger.csv")))?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn expense(date: &str, category: &str, amount: i64) -> Transaction {
    Transaction::expense(parse_date(date), category, amount)
}

pub fn income(date: &str, category: &str, amount: i64) -> Transaction {
    Transaction::income(parse_date(date), category, amount)
}

/// Test fixture: a few months of typical activity
pub struct SampleData;

impl SampleData {
    pub fn transactions() -> Vec<Transaction> {
        vec![
            income("2024-01-01", "Salary", 300000),
            expense("2024-01-03", "Rent", 120000),
            expense("2024-01-05", "Food", 2000),
            expense("2024-01-12", "Food", 4550).with_note("weekly shop"),
            expense("2024-01-20", "Transport", 3000),
            income("2024-02-01", "Salary", 300000),
            expense("2024-02-03", "Rent", 120000),
            expense("2024-02-14", "Food", 7825),
            income("2024-02-20", "Freelance", 45000),
            expense("2023-12-24", "Gifts", 15000),
        ]
    }

    pub fn load(service: &mut LedgerService) -> Result<()> {
        for transaction in Self::transactions() {
            service.add_transaction(transaction)?;
        }
        Ok(())
    }
}
