use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::domain::{DATE_FORMAT, Transaction, TransactionKind, format_cents, parse_cents};

use super::{StorageError, TransactionStore};

/// Header written on save. Column order is fixed; loading goes by header name.
pub const CSV_HEADER: [&str; 6] = ["id", "date", "kind", "category", "amount", "note"];

/// Date-time form written by older data files; only the date part is kept.
const LEGACY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Stores transactions in a single CSV file, one row per transaction.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TransactionStore for CsvStore {
    /// A missing file loads as an empty set.
    fn load(&self) -> Result<Vec<Transaction>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        read_transactions(file)
    }

    fn save(&self, transactions: &[Transaction]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        write_transactions(file, transactions)?;
        Ok(())
    }
}

/// Write a header and one row per transaction. Returns the number of rows.
pub fn write_transactions<W: Write>(
    writer: W,
    transactions: &[Transaction],
) -> Result<usize, StorageError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for t in transactions {
        csv_writer.write_record([
            t.id.to_string(),
            t.date.format(DATE_FORMAT).to_string(),
            t.kind.as_str().to_string(),
            t.category.clone(),
            format_cents(t.amount_cents),
            t.note.clone().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(transactions.len())
}

/// Column positions resolved from the header row.
struct Columns {
    id: Option<usize>,
    date: usize,
    kind: usize,
    category: usize,
    amount: usize,
    note: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, StorageError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };

        Ok(Self {
            id: find(&["id"]),
            date: find(&["date"]).ok_or(StorageError::MissingColumn("date"))?,
            // "type" is the column name used by older files
            kind: find(&["kind", "type"]).ok_or(StorageError::MissingColumn("kind"))?,
            category: find(&["category"]).ok_or(StorageError::MissingColumn("category"))?,
            amount: find(&["amount"]).ok_or(StorageError::MissingColumn("amount"))?,
            note: find(&["note"]),
        })
    }
}

/// Read every row into a transaction. Any bad row fails the whole read.
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, StorageError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let columns = Columns::from_headers(headers)?;

    let mut transactions = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let transaction = parse_record(&record, &columns)
            .map_err(|reason| StorageError::Malformed { line, reason })?;
        transactions.push(transaction);
    }

    Ok(transactions)
}

fn parse_record(record: &csv::StringRecord, columns: &Columns) -> Result<Transaction, String> {
    let field = |index: usize, name: &str| {
        record
            .get(index)
            .map(str::trim)
            .ok_or_else(|| format!("missing {} field", name))
    };

    let id = match columns.id.and_then(|i| record.get(i)).map(str::trim) {
        None | Some("") => Uuid::nil(),
        Some(s) => Uuid::parse_str(s).map_err(|_| format!("invalid id '{}'", s))?,
    };

    let date = parse_stored_date(field(columns.date, "date")?)?;

    let kind_str = field(columns.kind, "kind")?;
    let kind = TransactionKind::from_str(kind_str)
        .ok_or_else(|| format!("invalid kind '{}'", kind_str))?;

    let amount_str = field(columns.amount, "amount")?;
    let amount_cents =
        parse_cents(amount_str).map_err(|e| format!("invalid amount '{}': {}", amount_str, e))?;

    let category = field(columns.category, "category")?;

    let note = columns
        .note
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut transaction = Transaction::new(date, kind, category, amount_cents);
    transaction.id = id;
    transaction.note = note;
    transaction.validate().map_err(|e| e.to_string())?;
    Ok(transaction)
}

fn parse_stored_date(s: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(s, LEGACY_DATETIME_FORMAT) {
        return Ok(datetime.date());
    }
    Err(format!("invalid date '{}'", s))
}
