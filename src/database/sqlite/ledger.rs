//! Share rows: one per (expense, debtor) pair.
//!
//! Like the registry, everything here takes a plain connection so it can
//! run inside a caller's transaction.

use rusqlite::{params, Connection};

use crate::types::{DebtRecord, PaymentStatus};

/// Insert one unpaid share per debtor, all at the same per-head amount.
pub fn insert_shares(
    connection: &Connection,
    expense_id: i64,
    creditor_id: i64,
    debtor_ids: &[i64],
    amount_each: f64,
) -> anyhow::Result<()> {
    let mut insert_stmt = connection.prepare_cached(
        "INSERT INTO expense_share (expense_id, creditor_id, debtor_id, amount_owed, payment_status)
         VALUES (?1, ?2, ?3, ?4, 'n')",
    )?;

    for debtor_id in debtor_ids {
        insert_stmt.execute(params![&expense_id, &creditor_id, debtor_id, &amount_each])?;
    }
    Ok(())
}

/// Insert a single unpaid share.
pub fn insert_share(
    connection: &Connection,
    expense_id: i64,
    creditor_id: i64,
    debtor_id: i64,
    amount: f64,
) -> anyhow::Result<()> {
    insert_shares(connection, expense_id, creditor_id, &[debtor_id], amount)
}

/// Check whether a share exists for the given (expense, debtor) pair.
pub fn share_exists(connection: &Connection, expense_id: i64, debtor_id: i64) -> anyhow::Result<bool> {
    let mut stmt = connection.prepare_cached(
        "SELECT COUNT(*) FROM expense_share WHERE expense_id = ?1 AND debtor_id = ?2",
    )?;
    let count: i64 = stmt.query_row(params![&expense_id, &debtor_id], |row| row.get(0))?;
    Ok(count > 0)
}

/// Update the payment status of a single share. Returns the number of
/// affected rows so the caller can report a missing share.
pub fn set_payment_status(
    connection: &Connection,
    expense_id: i64,
    debtor_id: i64,
    status: PaymentStatus,
) -> anyhow::Result<usize> {
    let mut stmt = connection.prepare_cached(
        "UPDATE expense_share SET payment_status = ?1 WHERE expense_id = ?2 AND debtor_id = ?3",
    )?;
    let rows = stmt.execute(params![&status.as_code(), &expense_id, &debtor_id])?;
    Ok(rows)
}

/// Delete a single share. Returns the number of affected rows.
///
/// The creditor-protection rule is enforced by the recalculation path
/// before this runs.
pub fn remove_share(
    connection: &Connection,
    expense_id: i64,
    debtor_id: i64,
) -> anyhow::Result<usize> {
    let mut stmt = connection
        .prepare_cached("DELETE FROM expense_share WHERE expense_id = ?1 AND debtor_id = ?2")?;
    let rows = stmt.execute(params![&expense_id, &debtor_id])?;
    Ok(rows)
}

/// Overwrite the amount of every share of an expense with the given
/// per-head amount.
pub fn update_amounts(
    connection: &Connection,
    expense_id: i64,
    amount_each: f64,
) -> anyhow::Result<()> {
    let mut stmt = connection
        .prepare_cached("UPDATE expense_share SET amount_owed = ?1 WHERE expense_id = ?2")?;
    stmt.execute(params![&amount_each, &expense_id])?;
    Ok(())
}

/// Re-point every share of an expense at a new creditor.
pub fn update_creditor(
    connection: &Connection,
    expense_id: i64,
    creditor_id: i64,
) -> anyhow::Result<()> {
    let mut stmt = connection
        .prepare_cached("UPDATE expense_share SET creditor_id = ?1 WHERE expense_id = ?2")?;
    stmt.execute(params![&creditor_id, &expense_id])?;
    Ok(())
}

/// Delete all shares of an expense. Returns the number of affected rows.
pub fn remove_all_shares(connection: &Connection, expense_id: i64) -> anyhow::Result<usize> {
    let mut stmt =
        connection.prepare_cached("DELETE FROM expense_share WHERE expense_id = ?1")?;
    let rows = stmt.execute(params![&expense_id])?;
    Ok(rows)
}

/// Sum the unpaid amounts per (creditor, debtor) pair across all expenses.
///
/// Shares where the debtor is the creditor are the creditor's own quota of
/// the bill and are not debts, so they are filtered out.
pub fn unpaid_by_pair(connection: &Connection) -> anyhow::Result<Vec<DebtRecord>> {
    let mut stmt = connection.prepare_cached(
        "SELECT creditor_name, debtor_name, SUM(amount_owed) AS total_amount_owed
         FROM combined_share
         WHERE creditor_id <> debtor_id AND payment_status = 'n'
         GROUP BY creditor_name, debtor_name",
    )?;

    let record_iter = stmt.query_map([], |row| {
        let creditor: String = row.get(0)?;
        let debtor: String = row.get(1)?;
        Ok(DebtRecord::new(&creditor, &debtor, row.get(2)?))
    })?;

    let records = record_iter.collect::<Result<_, _>>()?;
    Ok(records)
}
