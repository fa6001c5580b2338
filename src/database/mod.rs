//! Internal representation of data.

use chrono::NaiveDate;

use crate::error::LedgerResult;
use crate::types::{DebtRecord, NewExpense, PaymentStatus, SavedExpense, ShareDetail};

pub mod sqlite;

/// This trait abstracts over the type of store.
///
/// The implementation could keep the data in any suitable relational
/// database or even in memory. Every mutating operation must either apply
/// all of its changes or none of them.
pub trait Store {
    /// Save a new expense, registering any participant seen for the first
    /// time and creating one unpaid share per debtor.
    ///
    /// Returns the generated expense id. Fails if the debtor list is empty.
    fn create_expense(&mut self, expense: NewExpense) -> LedgerResult<i64>;

    /// Change the date of an expense. Shares are unaffected.
    fn update_date(&mut self, expense_id: i64, new_date: NaiveDate) -> LedgerResult<()>;

    /// Change the establishment name of an expense. Shares are unaffected.
    fn update_establishment(&mut self, expense_id: i64, name: &str) -> LedgerResult<()>;

    /// Change the item name of an expense. Shares are unaffected.
    fn update_item_name(&mut self, expense_id: i64, name: &str) -> LedgerResult<()>;

    /// Change the total cost of an expense and re-quote every share to
    /// the new per-head amount.
    fn update_cost(&mut self, expense_id: i64, new_cost: f64) -> LedgerResult<()>;

    /// Add a debtor to an expense: the split count grows by one, every
    /// share is re-quoted and a new unpaid share is created.
    ///
    /// The debtor is registered if not already known. Fails if they
    /// already take part in the expense.
    fn add_debtor(&mut self, expense_id: i64, debtor_name: &str) -> LedgerResult<()>;

    /// Remove a debtor from an expense: their share is deleted, the split
    /// count shrinks by one and the remaining shares are re-quoted.
    ///
    /// Fails if the debtor is the creditor of the expense, or if removing
    /// them would leave the expense with nobody to split the cost.
    fn remove_debtor(&mut self, expense_id: i64, debtor_name: &str) -> LedgerResult<()>;

    /// Make someone else the creditor of an expense, registering them if
    /// not already known. All shares are re-pointed at the new creditor.
    fn update_creditor(&mut self, expense_id: i64, creditor_name: &str) -> LedgerResult<()>;

    /// Mark a single debtor's share of an expense as paid or unpaid.
    fn update_payment_status(
        &mut self,
        expense_id: i64,
        debtor_id: i64,
        status: PaymentStatus,
    ) -> LedgerResult<()>;

    /// Delete an expense together with all its shares, then drop every
    /// participant no longer referenced anywhere.
    fn delete_expense(&mut self, expense_id: i64) -> LedgerResult<()>;

    /// Check whether an expense with the given id exists.
    fn expense_exists(&self, expense_id: i64) -> LedgerResult<bool>;

    /// Get all expense headers, ordered for display by date,
    /// establishment, item and creditor.
    fn get_expenses(&self) -> LedgerResult<Vec<SavedExpense>>;

    /// Get the share rows of the combined join view, optionally restricted
    /// to one expense, ordered for display by date, establishment, item,
    /// creditor and debtor.
    fn get_share_details(&self, expense_id: Option<i64>) -> LedgerResult<Vec<ShareDetail>>;

    /// Sum the unpaid amounts per (creditor, debtor) pair across all
    /// expenses. Rows where the debtor is the creditor are excluded.
    ///
    /// This is the sole aggregation primitive the debt computation
    /// depends on.
    fn get_unpaid_debts(&self) -> LedgerResult<Vec<DebtRecord>>;

    /// Get the names of all registered participants.
    fn get_participants(&self) -> LedgerResult<Vec<String>>;

    /// Drop everything and recreate the empty schema.
    fn clear_data(&mut self) -> LedgerResult<()>;
}
