//! Keeps the amount/split-count invariant when debtors or cost change.
//!
//! Each path runs inside the caller's transaction: every check happens
//! before the first write, so a rejected operation leaves no trace and a
//! failed one rolls back with the transaction.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::database::sqlite::ledger;
use crate::error::LedgerError;

/// The header fields the recalculation paths read.
pub struct ExpenseHeader {
    pub total_cost: f64,
    pub split_count: i64,
    pub creditor_id: i64,
}

pub fn expense_header(
    connection: &Connection,
    expense_id: i64,
) -> anyhow::Result<Option<ExpenseHeader>> {
    let mut stmt = connection.prepare_cached(
        "SELECT total_cost, split_count, creditor_id FROM expense WHERE id = ?1",
    )?;
    let header = stmt
        .query_row(params![&expense_id], |row| {
            Ok(ExpenseHeader {
                total_cost: row.get(0)?,
                split_count: row.get(1)?,
                creditor_id: row.get(2)?,
            })
        })
        .optional()?;
    Ok(header)
}

fn set_split_count(connection: &Connection, expense_id: i64, count: i64) -> anyhow::Result<()> {
    let mut stmt =
        connection.prepare_cached("UPDATE expense SET split_count = ?1 WHERE id = ?2")?;
    stmt.execute(params![&count, &expense_id])?;
    Ok(())
}

/// A new debtor joins the split: grow the count, re-quote every share and
/// insert the newcomer's share.
pub fn on_debtor_added(
    connection: &Connection,
    expense_id: i64,
    new_debtor_id: i64,
) -> anyhow::Result<()> {
    let header = expense_header(connection, expense_id)?
        .ok_or_else(|| LedgerError::not_found(format!("expense {expense_id}")))?;

    if ledger::share_exists(connection, expense_id, new_debtor_id)? {
        return Err(
            LedgerError::invariant("this person is already splitting the expense").into(),
        );
    }

    let new_count = header.split_count + 1;
    let amount_each = header.total_cost / new_count as f64;
    debug!("expense {expense_id}: split {new_count} ways, {amount_each} each");

    set_split_count(connection, expense_id, new_count)?;
    ledger::update_amounts(connection, expense_id, amount_each)?;
    ledger::insert_share(
        connection,
        expense_id,
        header.creditor_id,
        new_debtor_id,
        amount_each,
    )?;

    Ok(())
}

/// A debtor leaves the split: drop their share, shrink the count and
/// re-quote the remaining shares.
///
/// The creditor cannot leave, and the last debtor cannot leave either
/// (delete the expense instead).
pub fn on_debtor_removed(
    connection: &Connection,
    expense_id: i64,
    removed_debtor_id: i64,
) -> anyhow::Result<()> {
    let header = expense_header(connection, expense_id)?
        .ok_or_else(|| LedgerError::not_found(format!("expense {expense_id}")))?;

    if removed_debtor_id == header.creditor_id {
        return Err(
            LedgerError::invariant("cannot remove this debtor: they are the creditor").into(),
        );
    }

    if !ledger::share_exists(connection, expense_id, removed_debtor_id)? {
        return Err(LedgerError::not_found(format!(
            "share of debtor {removed_debtor_id} in expense {expense_id}"
        ))
        .into());
    }

    let new_count = header.split_count - 1;
    if new_count == 0 {
        return Err(LedgerError::invariant(
            "cannot remove the last debtor; delete the expense instead",
        )
        .into());
    }

    ledger::remove_share(connection, expense_id, removed_debtor_id)?;

    let amount_each = header.total_cost / new_count as f64;
    debug!("expense {expense_id}: split {new_count} ways, {amount_each} each");

    set_split_count(connection, expense_id, new_count)?;
    ledger::update_amounts(connection, expense_id, amount_each)?;

    Ok(())
}

/// The total changed: re-quote every share, split count untouched.
pub fn on_cost_changed(
    connection: &Connection,
    expense_id: i64,
    new_cost: f64,
) -> anyhow::Result<()> {
    let header = expense_header(connection, expense_id)?
        .ok_or_else(|| LedgerError::not_found(format!("expense {expense_id}")))?;

    let mut stmt = connection.prepare_cached("UPDATE expense SET total_cost = ?1 WHERE id = ?2")?;
    stmt.execute(params![&new_cost, &expense_id])?;

    let amount_each = new_cost / header.split_count as f64;
    debug!("expense {expense_id}: new cost {new_cost}, {amount_each} each");

    ledger::update_amounts(connection, expense_id, amount_each)?;

    Ok(())
}
