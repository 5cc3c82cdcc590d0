use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{BudgetReport, LedgerService};
use crate::domain::{
    Budget, BudgetStatus, Period, Transaction, TransactionKind, format_cents, parse_cents,
    parse_date,
};
use crate::storage::{CsvStore, TransactionStore};

/// Spendlog - personal income and expense tracker
#[derive(Parser)]
#[command(name = "spendlog")]
#[command(about = "Record income and expenses, summarize them, and watch budgets")]
#[command(version)]
pub struct Cli {
    /// Data file path
    #[arg(
        short,
        long,
        global = true,
        env = "SPENDLOG_FILE",
        default_value = "spendlog.csv"
    )]
    pub file: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty data file
    Init,

    /// Record a transaction
    Add {
        /// Amount (e.g., "20.00" or "20")
        amount: String,

        /// Kind: income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,

        /// Category (e.g., "Food", "Rent", "Salary")
        #[arg(short, long)]
        category: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Monthly spending limit to check after recording an expense
        #[arg(long)]
        budget: Option<String>,
    },

    /// Delete a transaction by id (or unique id prefix)
    Remove {
        /// Transaction id or prefix
        id: String,
    },

    /// Replace a transaction with a corrected copy (the copy gets a new id)
    Edit {
        /// Transaction id or prefix
        id: String,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short, long)]
        kind: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        date: Option<String>,

        /// New note (pass an empty string to clear it)
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List transactions
    List {
        /// Period: all, month, year, YYYY or YYYY-MM
        #[arg(short, long, default_value = "all")]
        period: String,
    },

    /// Find transactions whose category contains a term (case-insensitive)
    Search {
        term: String,
    },

    /// Show income, expense and balance
    Summary {
        /// Period: all, month, year, YYYY or YYYY-MM
        #[arg(short, long, default_value = "all")]
        period: String,

        /// Break a year down month by month
        #[arg(long)]
        by_month: bool,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show how amounts split across categories
    Chart {
        /// Period: all, month, year, YYYY or YYYY-MM
        #[arg(short, long, default_value = "all")]
        period: String,

        /// Kind: income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Check spending against a limit
    Budget {
        /// Category to check (omit for all expenses)
        #[arg(short, long)]
        category: Option<String>,

        /// Spending limit (e.g., "400" or "400.00")
        #[arg(short, long)]
        limit: String,

        /// Period: all, month, year, YYYY or YYYY-MM
        #[arg(short, long, default_value = "month")]
        period: String,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export transactions to CSV or JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Format: csv, json
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Replace all transactions with the contents of another CSV file
    Import {
        /// Input CSV file
        input: PathBuf,
    },
}

fn open_service(file: &Path) -> Result<LedgerService> {
    LedgerService::open(CsvStore::new(file))
        .with_context(|| format!("Failed to load {}", file.display()))
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let Cli { file, command, .. } = self;
        let today = Local::now().date_naive();

        match command {
            Commands::Init => {
                let store = CsvStore::new(&file);
                if store.exists() {
                    bail!("Data file already exists: {}", store.path().display());
                }
                store.save(&[])?;
                println!("Data file initialized: {}", store.path().display());
            }

            Commands::Add {
                amount,
                kind,
                category,
                date,
                note,
                budget,
            } => {
                let mut service = open_service(&file)?;
                let amount_cents = parse_amount(&amount)?;
                let kind = parse_kind(&kind)?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => today,
                };

                let mut transaction = Transaction::new(date, kind, category, amount_cents);
                if let Some(note) = note {
                    transaction = transaction.with_note(note);
                }

                let id = service.add_transaction(transaction)?;
                service.save()?;
                println!(
                    "Recorded {}: {} {} on {} ({})",
                    kind,
                    format_cents(amount_cents),
                    service.ledger().get(id).map(|t| t.category.as_str()).unwrap_or(""),
                    date,
                    id
                );

                if let (TransactionKind::Expense, Some(limit)) = (kind, budget) {
                    let budget =
                        Budget::overall(parse_amount(&limit)?, Period::current_month(date));
                    print_budget_alert(&service.check_budget(&budget));
                }
            }

            Commands::Remove { id } => {
                let mut service = open_service(&file)?;
                let id = service.find_transaction(&id)?.id;
                let removed = service.remove_transaction(id)?;
                service.save()?;
                println!(
                    "Removed {}: {} {} {} ({})",
                    removed.kind,
                    format_cents(removed.amount_cents),
                    removed.category,
                    removed.date,
                    removed.id
                );
            }

            Commands::Edit {
                id,
                amount,
                kind,
                category,
                date,
                note,
            } => {
                let mut service = open_service(&file)?;
                let original = service.find_transaction(&id)?.clone();
                let mut replacement = original.clone();
                if let Some(amount) = amount {
                    replacement.amount_cents = parse_amount(&amount)?;
                }
                if let Some(kind) = kind {
                    replacement.kind = parse_kind(&kind)?;
                }
                if let Some(category) = category {
                    replacement.category = category;
                }
                if let Some(date) = date {
                    replacement.date = parse_date(&date)?;
                }
                if let Some(note) = note {
                    replacement.note = Some(note);
                }

                let new_id = service.replace_transaction(original.id, replacement)?;
                service.save()?;
                println!("Updated transaction: {} -> {}", original.id, new_id);
            }

            Commands::List { period } => {
                let service = open_service(&file)?;
                let period = resolve_period(&period, today)?;
                print_transactions(&service.list(period));
            }

            Commands::Search { term } => {
                let service = open_service(&file)?;
                let found: Vec<&Transaction> = service.search(&term).collect();
                print_transactions(&found);
            }

            Commands::Summary {
                period,
                by_month,
                format,
            } => {
                let service = open_service(&file)?;
                let period = resolve_period(&period, today)?;
                if by_month {
                    let Period::Year(year) = period else {
                        bail!("--by-month needs a yearly period (e.g. --period 2024)");
                    };
                    run_monthly_report(&service, year, &format)?;
                } else {
                    run_summary(&service, period, &format)?;
                }
            }

            Commands::Chart {
                period,
                kind,
                format,
            } => {
                let service = open_service(&file)?;
                let period = resolve_period(&period, today)?;
                run_chart(&service, period, parse_kind(&kind)?, &format)?;
            }

            Commands::Budget {
                category,
                limit,
                period,
                format,
            } => {
                let service = open_service(&file)?;
                let period = resolve_period(&period, today)?;
                let limit_cents = parse_amount(&limit)?;
                let budget = match category {
                    Some(category) => Budget::for_category(category, limit_cents, period),
                    None => Budget::overall(limit_cents, period),
                };
                let report = service.check_budget(&budget);

                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                    "table" => print_budget(&report),
                    other => bail!("Invalid format '{}'. Valid formats: table, json", other),
                }
            }

            Commands::Export { output, format } => {
                let service = open_service(&file)?;
                run_export_command(&service, output.as_deref(), &format)?;
            }

            Commands::Import { input } => {
                let mut service = open_service(&file)?;
                let source = CsvStore::new(input);
                if !source.exists() {
                    bail!("Input file not found: {}", source.path().display());
                }
                let count = service
                    .import_from(&source)
                    .with_context(|| format!("Failed to import {}", source.path().display()))?;
                service.save()?;
                println!(
                    "Imported {} transactions from {}",
                    count,
                    source.path().display()
                );
            }
        }

        Ok(())
    }
}

fn parse_amount(input: &str) -> Result<i64> {
    let cents = parse_cents(input)
        .with_context(|| format!("Invalid amount '{}'. Use '20.00' or '20'", input))?;
    if cents < 0 {
        bail!("Amount must not be negative; use --kind to record income or expense");
    }
    Ok(cents)
}

fn parse_kind(input: &str) -> Result<TransactionKind> {
    TransactionKind::from_str(input)
        .with_context(|| format!("Invalid kind '{}'. Valid kinds: income, expense", input))
}

/// `month` and `year` mean the current ones; anything else goes through `Period::parse`.
fn resolve_period(input: &str, today: NaiveDate) -> Result<Period> {
    match input.trim().to_lowercase().as_str() {
        "month" => Ok(Period::current_month(today)),
        "year" => Ok(Period::current_year(today)),
        _ => Ok(Period::parse(input)?),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn print_transactions(transactions: &[&Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<10} {:<12} {:<8} {:<16} {:>12} NOTE",
        "ID", "DATE", "KIND", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(72));
    for t in transactions {
        let id = t.id.to_string();
        println!(
            "{:<10} {:<12} {:<8} {:<16} {:>12} {}",
            &id[..8],
            t.date,
            t.kind,
            truncate(&t.category, 16),
            format_cents(t.amount_cents),
            truncate(t.note.as_deref().unwrap_or(""), 30)
        );
    }
}

fn run_summary<S: TransactionStore>(
    service: &LedgerService<S>,
    period: Period,
    format: &str,
) -> Result<()> {
    let report = service.summary(period);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "csv" => {
            println!("type,amount");
            println!("income,{}", format_cents(report.total_income));
            println!("expense,{}", format_cents(report.total_expense));
            println!("balance,{}", format_cents(report.balance));
        }
        "table" => {
            println!("Summary ({})", report.period);
            println!();
            println!("Total Income:   {:>15}", format_cents(report.total_income));
            println!("Total Expense:  {:>15}", format_cents(report.total_expense));
            println!("{}", "-".repeat(32));
            println!("Balance:        {:>15}", format_cents(report.balance));

            if !report.categories.is_empty() {
                println!();
                println!("Expenses by category:");
                for cat in &report.categories {
                    println!(
                        "  {:<20} {:>12} {:>6.1}%",
                        truncate(&cat.category, 20),
                        format_cents(cat.total),
                        cat.percentage
                    );
                }
            }
        }
        other => bail!("Invalid format '{}'. Valid formats: table, json, csv", other),
    }

    Ok(())
}

fn run_monthly_report<S: TransactionStore>(
    service: &LedgerService<S>,
    year: i32,
    format: &str,
) -> Result<()> {
    let report = service.monthly_report(year);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "csv" => {
            println!("month,income,expense,balance");
            for row in &report.months {
                println!(
                    "{:04}-{:02},{},{},{}",
                    report.year,
                    row.month,
                    format_cents(row.total_income),
                    format_cents(row.total_expense),
                    format_cents(row.balance)
                );
            }
        }
        "table" => {
            println!("Monthly Summary {}", report.year);
            println!();
            println!(
                "{:<10} {:>14} {:>14} {:>14}",
                "MONTH", "INCOME", "EXPENSE", "BALANCE"
            );
            println!("{}", "-".repeat(55));
            for row in &report.months {
                println!(
                    "{:<10} {:>14} {:>14} {:>14}",
                    format!("{:04}-{:02}", report.year, row.month),
                    format_cents(row.total_income),
                    format_cents(row.total_expense),
                    format_cents(row.balance)
                );
            }
            println!("{}", "-".repeat(55));
            println!(
                "{:<10} {:>14} {:>14} {:>14}",
                "TOTAL",
                format_cents(report.total_income),
                format_cents(report.total_expense),
                format_cents(report.balance)
            );
        }
        other => bail!("Invalid format '{}'. Valid formats: table, json, csv", other),
    }

    Ok(())
}

const CHART_WIDTH: f64 = 40.0;

fn run_chart<S: TransactionStore>(
    service: &LedgerService<S>,
    period: Period,
    kind: TransactionKind,
    format: &str,
) -> Result<()> {
    let report = service.category_report(period, kind);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "csv" => {
            println!("category,total,count,percentage");
            for cat in &report.categories {
                println!(
                    "{},{},{},{:.2}",
                    cat.category,
                    format_cents(cat.total),
                    cat.count,
                    cat.percentage
                );
            }
        }
        "table" => {
            if report.categories.is_empty() {
                println!("No {} transactions to chart.", kind);
                return Ok(());
            }

            println!("{} breakdown by category ({})", capitalize(kind.as_str()), period);
            println!();
            for cat in &report.categories {
                let bar_len = (cat.percentage / 100.0 * CHART_WIDTH).round() as usize;
                println!(
                    "{:<16} {:>12} {:>6.1}% {}",
                    truncate(&cat.category, 16),
                    format_cents(cat.total),
                    cat.percentage,
                    "#".repeat(bar_len)
                );
            }
            println!("{}", "-".repeat(37));
            println!("{:<16} {:>12}", "TOTAL", format_cents(report.total));
        }
        other => bail!("Invalid format '{}'. Valid formats: table, json, csv", other),
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn print_budget(report: &BudgetReport) {
    let check = &report.check;
    println!(
        "Budget for {} ({})",
        check.category.as_deref().unwrap_or("all expenses"),
        report.period
    );
    println!("  Spent:     {:>12}", format_cents(check.total));
    println!("  Limit:     {:>12}", format_cents(check.limit));
    println!("  Remaining: {:>12}", format_cents(report.remaining));
    println!("  Status:    {:>12}", check.status.as_str().to_uppercase());
}

fn print_budget_alert(report: &BudgetReport) {
    let check = &report.check;
    match check.status {
        BudgetStatus::Exceeded => println!(
            "Budget exceeded: spent {} of {} in {}",
            format_cents(check.total),
            format_cents(check.limit),
            report.period
        ),
        BudgetStatus::Warning => println!(
            "Budget warning: spent {} of {} in {}",
            format_cents(check.total),
            format_cents(check.limit),
            report.period
        ),
        BudgetStatus::Ok => {}
    }
}

fn run_export_command<S: TransactionStore>(
    service: &LedgerService<S>,
    output: Option<&Path>,
    format: &str,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        "csv" => {
            let count = exporter.export_csv(writer)?;
            if let Some(path) = output {
                eprintln!("Exported {} transactions to {}", count, path.display());
            }
        }
        "json" => {
            let snapshot = exporter.export_json(writer)?;
            if let Some(path) = output {
                eprintln!(
                    "Exported {} transactions to {}",
                    snapshot.transactions.len(),
                    path.display()
                );
            }
        }
        other => bail!("Invalid export format '{}'. Valid formats: csv, json", other),
    }

    Ok(())
}
