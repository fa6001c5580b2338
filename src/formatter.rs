//! Produce the strings that are printed by the menu shell.
//!
//! The formatting consists in fixed-width tables for expenses and shares,
//! the debt matrix and the plain-language settlement statements. All
//! amounts are displayed rounded to two decimals; the numbers themselves
//! are never modified here.

use crate::types::{SavedExpense, Settlement, ShareDetail};

const DATE_DISPLAY_FORMAT: &str = "%d/%m/%Y";

pub fn format_expenses(expenses: &[SavedExpense]) -> String {
    if expenses.is_empty() {
        return "Nothing to show!".to_string();
    }

    let mut result = format!(
        "{:<6} {:<12} {:<20} {:<20} {:>10} {:>6} {}\n",
        "id", "date", "establishment", "item", "cost", "split", "creditor"
    );
    for expense in expenses {
        result += &format!(
            "{:<6} {:<12} {:<20} {:<20} {:>10.2} {:>6} {}\n",
            expense.id,
            expense.date.format(DATE_DISPLAY_FORMAT).to_string(),
            expense.establishment,
            expense.item,
            expense.total_cost,
            expense.split_count,
            expense.creditor_name
        );
    }
    result
}

pub fn format_share_details(shares: &[ShareDetail]) -> String {
    if shares.is_empty() {
        return "Nothing to show!".to_string();
    }

    let mut result = format!(
        "{:<6} {:<12} {:<20} {:<20} {:<16} {:>6} {:<16} {:>10} {}\n",
        "id", "date", "establishment", "item", "creditor", "d. id", "debtor", "amount", "paid"
    );
    for share in shares {
        result += &format!(
            "{:<6} {:<12} {:<20} {:<20} {:<16} {:>6} {:<16} {:>10.2} {}\n",
            share.expense_id,
            share.date.format(DATE_DISPLAY_FORMAT).to_string(),
            share.establishment,
            share.item,
            share.creditor_name,
            share.debtor_id,
            share.debtor_name,
            share.amount_owed,
            share.status.as_code()
        );
    }
    result
}

/// Format the raw debt matrix: rows are debtors, columns are creditors,
/// so the cell at (row `i`, column `j`) is what person `i` owes person `j`.
pub fn format_debt_matrix(names: &[String], matrix: &[Vec<f64>]) -> String {
    let mut result = format!("{:>10}", "");
    for name in names {
        result += &format!("{:>10}", name);
    }
    result += "\n";

    for (i, name) in names.iter().enumerate() {
        result += &format!("{:>10}", name);
        for j in 0..names.len() {
            result += &format!("{:>10.2}", matrix[j][i]);
        }
        result += "\n";
    }

    result
}

pub fn format_settlements(settlements: &[Settlement]) -> String {
    settlements
        .iter()
        .map(|s| format!("{} owes {} {:.2}", s.debtor, s.creditor, s.amount))
        .fold(String::new(), |a, b| a + &b + "\n")
}
