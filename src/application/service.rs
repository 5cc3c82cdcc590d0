use tracing::{debug, info};

use crate::domain::{
    Budget, BudgetStatus, Cents, Ledger, Period, Search, Transaction, TransactionId,
    TransactionKind, category_breakdown, monthly_breakdown, period_summary,
};
use crate::storage::{CsvStore, TransactionStore};

use super::{AppError, BudgetReport, CategoryReport, MonthRow, MonthlyReport, SummaryReport};

/// Owns the ledger for one session together with the store it was loaded from.
/// This is the primary interface for any front end (CLI, TUI, etc.).
pub struct LedgerService<S: TransactionStore = CsvStore> {
    ledger: Ledger,
    store: S,
    dirty: bool,
}

impl<S: TransactionStore> LedgerService<S> {
    /// Load the store's contents into a fresh ledger.
    pub fn open(store: S) -> Result<Self, AppError> {
        let mut ledger = Ledger::new();
        let count = ledger.replace_all(store.load()?)?;
        info!("Loaded {} transactions", count);

        Ok(Self {
            ledger,
            store,
            dirty: false,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// True when the ledger has changed since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ========================
    // Mutations
    // ========================

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<TransactionId, AppError> {
        let id = self.ledger.add(transaction)?;
        self.dirty = true;
        debug!("Added transaction {}", id);
        Ok(id)
    }

    pub fn remove_transaction(&mut self, id: TransactionId) -> Result<Transaction, AppError> {
        let removed = self.ledger.remove(id)?;
        self.dirty = true;
        debug!("Removed transaction {}", id);
        Ok(removed)
    }

    /// Remove `id` and add `replacement` in its place. The replacement gets a new id.
    /// Nothing changes if the replacement is invalid or `id` is unknown.
    pub fn replace_transaction(
        &mut self,
        id: TransactionId,
        replacement: Transaction,
    ) -> Result<TransactionId, AppError> {
        replacement.validate()?;
        self.ledger
            .get(id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))?;

        self.ledger.remove(id)?;
        let new_id = self.ledger.add(replacement)?;
        self.dirty = true;
        debug!("Replaced transaction {} with {}", id, new_id);
        Ok(new_id)
    }

    /// Replace the whole ledger with the contents of another store.
    /// The current contents survive if the source fails to load or validate.
    pub fn import_from<T: TransactionStore>(&mut self, source: &T) -> Result<usize, AppError> {
        let incoming = source.load()?;
        let count = self.ledger.replace_all(incoming)?;
        self.dirty = true;
        info!("Imported {} transactions", count);
        Ok(count)
    }

    /// Write the ledger back to its store.
    pub fn save(&mut self) -> Result<usize, AppError> {
        self.store.save(self.ledger.all())?;
        self.dirty = false;
        info!("Saved {} transactions", self.ledger.len());
        Ok(self.ledger.len())
    }

    // ========================
    // Queries
    // ========================

    /// Resolve a full id or a unique prefix of one (as shown in listings).
    pub fn find_transaction(&self, id_or_prefix: &str) -> Result<&Transaction, AppError> {
        let needle = id_or_prefix.trim().to_lowercase();
        if needle.is_empty() {
            return Err(AppError::TransactionNotFound(id_or_prefix.to_string()));
        }

        let mut matches = self
            .ledger
            .all()
            .iter()
            .filter(|t| t.id.to_string().starts_with(&needle));

        match (matches.next(), matches.next()) {
            (Some(t), None) => Ok(t),
            (Some(_), Some(_)) => Err(AppError::AmbiguousId(id_or_prefix.to_string())),
            (None, _) => Err(AppError::TransactionNotFound(id_or_prefix.to_string())),
        }
    }

    pub fn search(&self, term: &str) -> Search<'_> {
        self.ledger.search(term)
    }

    /// Transactions inside `period`, oldest first. Entries on the same day keep insertion order.
    pub fn list(&self, period: Period) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self
            .ledger
            .all()
            .iter()
            .filter(|t| period.contains(t.date))
            .collect();
        transactions.sort_by_key(|t| t.date);
        transactions
    }

    pub fn summary(&self, period: Period) -> SummaryReport {
        let transactions = self.ledger.all();
        let summary = period_summary(transactions, period);

        SummaryReport {
            period,
            total_income: summary.total_income,
            total_expense: summary.total_expense,
            balance: summary.balance,
            categories: category_breakdown(
                transactions.iter().filter(|t| period.contains(t.date)),
                TransactionKind::Expense,
            ),
        }
    }

    pub fn monthly_report(&self, year: i32) -> MonthlyReport {
        let months: Vec<MonthRow> = monthly_breakdown(self.ledger.all(), year)
            .iter()
            .map(|(month, summary)| MonthRow::from_summary(*month, summary))
            .collect();

        let total_income = months
            .iter()
            .fold(0, |sum: Cents, m| sum.saturating_add(m.total_income));
        let total_expense = months
            .iter()
            .fold(0, |sum: Cents, m| sum.saturating_add(m.total_expense));

        MonthlyReport {
            year,
            months,
            total_income,
            total_expense,
            balance: total_income.saturating_sub(total_expense),
        }
    }

    pub fn category_report(&self, period: Period, kind: TransactionKind) -> CategoryReport {
        let categories = category_breakdown(
            self.ledger.all().iter().filter(|t| period.contains(t.date)),
            kind,
        );
        let total = categories
            .iter()
            .fold(0, |sum: Cents, c| sum.saturating_add(c.total));

        CategoryReport {
            period,
            kind,
            total,
            categories,
        }
    }

    pub fn check_budget(&self, budget: &Budget) -> BudgetReport {
        let check = budget.check(self.ledger.all());
        if check.status != BudgetStatus::Ok {
            debug!(
                "Budget {} for {}: spent {} of {} cents",
                check.status,
                check.category.as_deref().unwrap_or("all expenses"),
                check.total,
                check.limit
            );
        }

        BudgetReport {
            period: budget.period,
            remaining: check.remaining(),
            check,
        }
    }
}
