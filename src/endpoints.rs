//! Core implementation of the menu operations.
//!
//! This is split from `cli` because these functions are the largest subset
//! of logic that can be tested without driving a terminal: they take
//! already-parsed values, talk to the store and return the strings the
//! shell prints.

use chrono::NaiveDate;

use crate::{
    database::Store,
    debts::{build_debt_matrix, compute_net_debts, settlements},
    formatter::{format_debt_matrix, format_expenses, format_settlements, format_share_details},
    types::NewExpense,
    validator::{validate_cost, validate_creditor, validate_debtor_names},
};

/// Record a new expense split equally between the debtors, one of whom is
/// the creditor. Returns the generated expense id.
pub fn add_expense<S: Store>(
    store: &mut S,
    date: NaiveDate,
    establishment: &str,
    item: &str,
    cost: f64,
    debtor_names: Vec<String>,
    creditor_name: &str,
) -> anyhow::Result<i64> {
    validate_debtor_names(&debtor_names)?;
    validate_creditor(creditor_name, &debtor_names)?;
    validate_cost(cost)?;

    let expense = NewExpense::new(date, establishment, item, cost, debtor_names, creditor_name);
    let expense_id = store.create_expense(expense)?;
    Ok(expense_id)
}

/// Compute the net settlement report: the raw debt matrix followed by one
/// "X owes Y amount" line per pair that is not settled.
pub fn net_debts_report<S: Store>(store: &S) -> anyhow::Result<String> {
    let records = store.get_unpaid_debts()?;
    if records.is_empty() {
        return Ok("There are no debts.".to_string());
    }

    let names = store.get_participants()?;
    if names.is_empty() {
        return Ok("There are no participants.".to_string());
    }

    let matrix = build_debt_matrix(&records, &names);
    let net = compute_net_debts(&matrix);
    let statements = settlements(&net, &names);

    let mut report = String::from("Debt Matrix:\n");
    report += &format_debt_matrix(&names, &matrix);
    report += "\n";
    report += &format_settlements(&statements);
    Ok(report)
}

pub fn expenses_report<S: Store>(store: &S) -> anyhow::Result<String> {
    let expenses = store.get_expenses()?;
    Ok(format_expenses(&expenses))
}

pub fn shares_report<S: Store>(store: &S, expense_id: Option<i64>) -> anyhow::Result<String> {
    let shares = store.get_share_details(expense_id)?;
    Ok(format_share_details(&shares))
}
