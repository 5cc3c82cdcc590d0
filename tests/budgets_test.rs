mod common;

use anyhow::Result;
use common::{SampleData, expense, income, test_service};
use spendlog::domain::{
    Budget, BudgetStatus, Ledger, Period, WARNING_THRESHOLD_PERCENT, check_budget,
};

#[test]
fn test_budget_exceeded_scenario() -> Result<()> {
    let mut ledger = Ledger::new();
    ledger.add(expense("2024-01-05", "Food", 2000))?;
    ledger.add(income("2024-01-10", "Salary", 50000))?;

    let check = check_budget(ledger.all(), "Food", 1500);
    assert_eq!(check.status, BudgetStatus::Exceeded);
    assert_eq!(check.total, 2000);
    assert_eq!(check.limit, 1500);
    Ok(())
}

#[test]
fn test_warning_threshold_boundary() -> Result<()> {
    assert_eq!(WARNING_THRESHOLD_PERCENT, 90);

    let mut ledger = Ledger::new();
    ledger.add(expense("2024-01-05", "Food", 9000))?;

    assert_eq!(
        check_budget(ledger.all(), "Food", 10000).status,
        BudgetStatus::Warning
    );
    assert_eq!(
        check_budget(ledger.all(), "Food", 10001).status,
        BudgetStatus::Ok
    );
    assert_eq!(
        check_budget(ledger.all(), "Food", 9000).status,
        BudgetStatus::Warning
    );
    assert_eq!(
        check_budget(ledger.all(), "Food", 8999).status,
        BudgetStatus::Exceeded
    );
    Ok(())
}

#[test]
fn test_budget_over_caller_window() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    SampleData::load(&mut service)?;

    let january = Period::Month {
        year: 2024,
        month: 1,
    };

    let food_january = service.check_budget(&Budget::for_category("Food", 10000, january));
    assert_eq!(food_january.check.total, 6550);
    assert_eq!(food_january.check.status, BudgetStatus::Ok);
    assert_eq!(food_january.remaining, 3450);

    let food_all = service.check_budget(&Budget::for_category("Food", 15000, Period::All));
    assert_eq!(food_all.check.total, 14375);
    assert_eq!(food_all.check.status, BudgetStatus::Warning);
    Ok(())
}

#[test]
fn test_overall_monthly_budget() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    SampleData::load(&mut service)?;

    let february = Period::Month {
        year: 2024,
        month: 2,
    };
    let report = service.check_budget(&Budget::overall(125000, february));

    assert_eq!(report.check.category, None);
    assert_eq!(report.check.total, 127825);
    assert_eq!(report.check.status, BudgetStatus::Exceeded);
    assert_eq!(report.remaining, -2825);
    assert_eq!(report.period, february);
    Ok(())
}

#[test]
fn test_budget_category_is_exact_match() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    SampleData::load(&mut service)?;

    let report = service.check_budget(&Budget::for_category("food", 100, Period::All));
    assert_eq!(report.check.total, 0);
    assert_eq!(report.check.status, BudgetStatus::Ok);
    Ok(())
}

#[test]
fn test_budget_check_does_not_mutate() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    SampleData::load(&mut service)?;
    service.save()?;
    let before = service.ledger().all().to_vec();

    service.check_budget(&Budget::overall(1, Period::All));

    assert_eq!(service.ledger().all(), before.as_slice());
    assert!(!service.is_dirty());
    Ok(())
}
