use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::{Transaction, TransactionId, ValidationError};

/// The authoritative, insertion-ordered set of transactions for a session.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a transaction, returning its freshly assigned id.
    /// Any id already on the value is replaced, so adding the same value twice
    /// yields two independent entries.
    pub fn add(&mut self, transaction: Transaction) -> Result<TransactionId, LedgerError> {
        let mut transaction = transaction.normalized()?;
        transaction.id = Uuid::new_v4();
        let id = transaction.id;
        self.transactions.push(transaction);
        Ok(id)
    }

    /// Remove the entry with the given id.
    pub fn remove(&mut self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        Ok(self.transactions.remove(index))
    }

    /// Remove every entry matching `predicate`. Fails when nothing matched.
    pub fn remove_matching<F>(&mut self, mut predicate: F) -> Result<usize, LedgerError>
    where
        F: FnMut(&Transaction) -> bool,
    {
        let before = self.transactions.len();
        self.transactions.retain(|t| !predicate(t));
        match before - self.transactions.len() {
            0 => Err(LedgerError::NoMatch),
            removed => Ok(removed),
        }
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Lazily yield entries whose category contains `term`, ignoring case.
    /// An empty term matches everything.
    pub fn search(&self, term: &str) -> Search<'_> {
        Search {
            inner: self.transactions.iter(),
            needle: term.trim().to_lowercase(),
        }
    }

    /// Snapshot of the current contents in insertion order.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Discard the current contents and install `transactions`.
    /// Every entry is validated first; on failure the ledger is left untouched.
    /// Entries with a nil id are given a fresh one.
    pub fn replace_all(&mut self, transactions: Vec<Transaction>) -> Result<usize, LedgerError> {
        let mut seen = HashSet::with_capacity(transactions.len());
        let mut incoming = Vec::with_capacity(transactions.len());

        for transaction in transactions {
            let mut transaction = transaction.normalized()?;
            if transaction.id.is_nil() {
                transaction.id = Uuid::new_v4();
            }
            if !seen.insert(transaction.id) {
                return Err(ValidationError::DuplicateId(transaction.id).into());
            }
            incoming.push(transaction);
        }

        self.transactions = incoming;
        Ok(self.transactions.len())
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Restartable category search over a ledger. Clone it to iterate again.
#[derive(Debug, Clone)]
pub struct Search<'a> {
    inner: std::slice::Iter<'a, Transaction>,
    needle: String,
}

impl<'a> Iterator for Search<'a> {
    type Item = &'a Transaction;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = &self.needle;
        self.inner.find(|t| t.category_contains(needle))
    }
}

/// A ledger guarded by a mutex, for callers that share one across threads
/// (a background autosave, for example). Mutations and reads are serialized.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    // Every ledger mutation is all-or-nothing, so a poisoned lock still guards valid state.
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add(&self, transaction: Transaction) -> Result<TransactionId, LedgerError> {
        self.lock().add(transaction)
    }

    pub fn remove(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        self.lock().remove(id)
    }

    pub fn replace_all(&self, transactions: Vec<Transaction>) -> Result<usize, LedgerError> {
        self.lock().replace_all(transactions)
    }

    /// Owned copy of the contents at the time of the call.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.lock().all().to_vec()
    }

    pub fn search(&self, term: &str) -> Vec<Transaction> {
        self.lock().search(term).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    Validation(ValidationError),
    NotFound(TransactionId),
    NoMatch,
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Validation(err)
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Validation(err) => write!(f, "{}", err),
            LedgerError::NotFound(id) => write!(f, "transaction not found: {}", id),
            LedgerError::NoMatch => write!(f, "no transaction matched"),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::domain::parse_date;

    fn expense(date: &str, category: &str, amount: i64) -> Transaction {
        Transaction::expense(parse_date(date).unwrap(), category, amount)
    }

    fn income(date: &str, category: &str, amount: i64) -> Transaction {
        Transaction::income(parse_date(date).unwrap(), category, amount)
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add(expense("2024-01-05", "Food", 2000)).unwrap();
        ledger.add(income("2024-01-10", "Salary", 50000)).unwrap();
        ledger
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut ledger = Ledger::new();
        let tx = expense("2024-01-05", "Food", 2000);

        let first = ledger.add(tx.clone()).unwrap();
        let second = ledger.add(tx).unwrap();

        assert_ne!(first, second);
        assert!(!first.is_nil());
        assert_eq!(ledger.len(), 2);
        assert!(ledger.all()[0].same_entry(&ledger.all()[1]));
    }

    #[test]
    fn test_add_rejects_invalid() {
        let mut ledger = sample_ledger();

        let negative = ledger.add(expense("2024-01-05", "Food", -5));
        assert_eq!(
            negative,
            Err(LedgerError::Validation(ValidationError::NegativeAmount(-5)))
        );

        let blank = ledger.add(expense("2024-01-05", "", 5));
        assert_eq!(
            blank,
            Err(LedgerError::Validation(ValidationError::EmptyCategory))
        );

        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_add_then_remove_restores_state() {
        let mut ledger = sample_ledger();
        let before = ledger.all().to_vec();

        let id = ledger.add(expense("2024-02-01", "Rent", 90000)).unwrap();
        let removed = ledger.remove(id).unwrap();

        assert_eq!(removed.category, "Rent");
        assert_eq!(ledger.all(), before.as_slice());
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut ledger = sample_ledger();
        let id = Uuid::new_v4();
        assert_eq!(ledger.remove(id), Err(LedgerError::NotFound(id)));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_remove_matching() {
        let mut ledger = sample_ledger();
        ledger.add(expense("2024-01-06", "Food", 700)).unwrap();

        let removed = ledger.remove_matching(|t| t.category == "Food").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(ledger.len(), 1);

        assert_eq!(
            ledger.remove_matching(|t| t.category == "Food"),
            Err(LedgerError::NoMatch)
        );
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let ledger = sample_ledger();

        let found: Vec<_> = ledger.search("foo").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, "Food");

        assert_eq!(ledger.search("Rent").count(), 0);
        assert_eq!(ledger.search("SAL").count(), 1);
        assert_eq!(ledger.search("").count(), 2);
    }

    #[test]
    fn test_search_is_restartable() {
        let ledger = sample_ledger();
        let search = ledger.search("o");

        assert_eq!(search.clone().count(), 1);
        assert_eq!(search.count(), 1);
    }

    #[test]
    fn test_replace_all_installs_new_set() {
        let mut ledger = sample_ledger();
        let count = ledger
            .replace_all(vec![expense("2023-12-31", "Gifts", 4500)])
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(ledger.all()[0].category, "Gifts");
        assert!(!ledger.all()[0].id.is_nil());
    }

    #[test]
    fn test_replace_all_is_atomic() {
        let mut ledger = sample_ledger();
        let before = ledger.all().to_vec();

        let result = ledger.replace_all(vec![
            expense("2024-03-01", "Books", 1500),
            expense("2024-03-02", "Books", -1),
        ]);

        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert_eq!(ledger.all(), before.as_slice());
    }

    #[test]
    fn test_replace_all_rejects_duplicate_ids() {
        let mut ledger = sample_ledger();
        let mut tx = expense("2024-03-01", "Books", 1500);
        tx.id = Uuid::new_v4();

        let result = ledger.replace_all(vec![tx.clone(), tx.clone()]);

        assert_eq!(
            result,
            Err(LedgerError::Validation(ValidationError::DuplicateId(tx.id)))
        );
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_replace_all_keeps_existing_ids() {
        let mut ledger = Ledger::new();
        let mut tx = expense("2024-03-01", "Books", 1500);
        tx.id = Uuid::new_v4();

        ledger.replace_all(vec![tx.clone()]).unwrap();

        assert_eq!(ledger.get(tx.id), Some(&tx));
    }

    #[test]
    fn test_shared_ledger_across_threads() {
        let shared = SharedLedger::new(Ledger::new());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.add(expense("2024-01-01", "Food", i)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len(), 100);
        assert_eq!(shared.search("food").len(), 100);
        assert_eq!(shared.snapshot().len(), 100);
    }
}
