//! The implementation of the store using Sqlite.

use std::path::Path;

use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    error::{LedgerError, LedgerResult},
    types::{DebtRecord, NewExpense, PaymentStatus, SavedExpense, ShareDetail},
};

use super::Store;

pub mod ledger;
pub mod recalc;
pub mod registry;
pub mod schema;

pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> LedgerResult<SqliteStore> {
        let fn_impl = || -> anyhow::Result<Connection> {
            let connection = Connection::open(path)?;
            connection.execute_batch("PRAGMA foreign_keys = ON")?;
            schema::create_all_tables(&connection)?;
            Ok(connection)
        };

        let connection = fn_impl().map_err(|e| map_error("cannot open database", e))?;
        Ok(SqliteStore { connection })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> LedgerResult<SqliteStore> {
        let fn_impl = || -> anyhow::Result<Connection> {
            let connection = Connection::open_in_memory()?;
            connection.execute_batch("PRAGMA foreign_keys = ON")?;
            schema::create_all_tables(&connection)?;
            Ok(connection)
        };

        let connection = fn_impl().map_err(|e| map_error("cannot open database", e))?;
        Ok(SqliteStore { connection })
    }
}

impl Store for SqliteStore {
    fn create_expense(&mut self, expense: NewExpense) -> LedgerResult<i64> {
        if expense.debtor_names.is_empty() {
            return Err(LedgerError::invariant(
                "an expense must be split between at least one debtor",
            ));
        }

        let mut fn_impl = || -> anyhow::Result<i64> {
            let tx = self.connection.transaction()?;

            let creditor_id = registry::resolve(&tx, &expense.creditor_name)?;
            let mut debtor_ids = Vec::with_capacity(expense.debtor_names.len());
            for name in &expense.debtor_names {
                debtor_ids.push(registry::resolve(&tx, name)?);
            }

            let split_count = expense.debtor_names.len() as i64;
            let expense_id: i64 = {
                let mut insert_expense_stmt = tx.prepare_cached(
                    "INSERT INTO expense (expense_date, establishment_name, expense_name,
                     total_cost, split_count, creditor_id, creditor_name)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
                )?;

                insert_expense_stmt.query_row(
                    params![
                        &expense.date,
                        &expense.establishment,
                        &expense.item,
                        &expense.total_cost,
                        &split_count,
                        &creditor_id,
                        &expense.creditor_name,
                    ],
                    |row| row.get(0),
                )?
            };

            debug!("expense_id is {expense_id}");

            let amount_each = expense.total_cost / split_count as f64;
            ledger::insert_shares(&tx, expense_id, creditor_id, &debtor_ids, amount_each)?;

            tx.commit()?;

            Ok(expense_id)
        };

        fn_impl().map_err(|e| map_error("cannot create expense", e))
    }

    fn update_date(&mut self, expense_id: i64, new_date: NaiveDate) -> LedgerResult<()> {
        let fn_impl = || -> anyhow::Result<()> {
            let rows = self.connection.execute(
                "UPDATE expense SET expense_date = ?1 WHERE id = ?2",
                params![&new_date, &expense_id],
            )?;
            if rows == 0 {
                return Err(LedgerError::not_found(format!("expense {expense_id}")).into());
            }
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot update expense date", e))
    }

    fn update_establishment(&mut self, expense_id: i64, name: &str) -> LedgerResult<()> {
        let fn_impl = || -> anyhow::Result<()> {
            let rows = self.connection.execute(
                "UPDATE expense SET establishment_name = ?1 WHERE id = ?2",
                params![&name, &expense_id],
            )?;
            if rows == 0 {
                return Err(LedgerError::not_found(format!("expense {expense_id}")).into());
            }
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot update establishment name", e))
    }

    fn update_item_name(&mut self, expense_id: i64, name: &str) -> LedgerResult<()> {
        let fn_impl = || -> anyhow::Result<()> {
            let rows = self.connection.execute(
                "UPDATE expense SET expense_name = ?1 WHERE id = ?2",
                params![&name, &expense_id],
            )?;
            if rows == 0 {
                return Err(LedgerError::not_found(format!("expense {expense_id}")).into());
            }
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot update item name", e))
    }

    fn update_cost(&mut self, expense_id: i64, new_cost: f64) -> LedgerResult<()> {
        let mut fn_impl = || -> anyhow::Result<()> {
            let tx = self.connection.transaction()?;
            recalc::on_cost_changed(&tx, expense_id, new_cost)?;
            tx.commit()?;
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot update expense cost", e))
    }

    fn add_debtor(&mut self, expense_id: i64, debtor_name: &str) -> LedgerResult<()> {
        debug!("Adding debtor. Expense ID: {expense_id}. Debtor: {debtor_name}");
        let mut fn_impl = || -> anyhow::Result<()> {
            let tx = self.connection.transaction()?;
            // Registering the debtor is rolled back together with the rest
            // if any later step fails.
            let debtor_id = registry::resolve(&tx, debtor_name)?;
            recalc::on_debtor_added(&tx, expense_id, debtor_id)?;
            tx.commit()?;
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot add debtor", e))
    }

    fn remove_debtor(&mut self, expense_id: i64, debtor_name: &str) -> LedgerResult<()> {
        debug!("Removing debtor. Expense ID: {expense_id}. Debtor: {debtor_name}");
        let mut fn_impl = || -> anyhow::Result<()> {
            let tx = self.connection.transaction()?;
            let debtor_id = registry::lookup(&tx, debtor_name)?
                .ok_or_else(|| LedgerError::not_found(format!("participant `{debtor_name}`")))?;
            recalc::on_debtor_removed(&tx, expense_id, debtor_id)?;
            tx.commit()?;
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot remove debtor", e))
    }

    fn update_creditor(&mut self, expense_id: i64, creditor_name: &str) -> LedgerResult<()> {
        let mut fn_impl = || -> anyhow::Result<()> {
            let tx = self.connection.transaction()?;

            if recalc::expense_header(&tx, expense_id)?.is_none() {
                return Err(LedgerError::not_found(format!("expense {expense_id}")).into());
            }

            let creditor_id = registry::resolve(&tx, creditor_name)?;

            {
                let mut update_expense_stmt = tx.prepare_cached(
                    "UPDATE expense SET creditor_id = ?1, creditor_name = ?2 WHERE id = ?3",
                )?;
                update_expense_stmt.execute(params![&creditor_id, &creditor_name, &expense_id])?;
            }

            ledger::update_creditor(&tx, expense_id, creditor_id)?;

            tx.commit()?;
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot update creditor", e))
    }

    fn update_payment_status(
        &mut self,
        expense_id: i64,
        debtor_id: i64,
        status: PaymentStatus,
    ) -> LedgerResult<()> {
        let fn_impl = || -> anyhow::Result<()> {
            let rows = ledger::set_payment_status(&self.connection, expense_id, debtor_id, status)?;
            if rows == 0 {
                return Err(LedgerError::not_found(format!(
                    "share of debtor {debtor_id} in expense {expense_id}"
                ))
                .into());
            }
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot update payment status", e))
    }

    fn delete_expense(&mut self, expense_id: i64) -> LedgerResult<()> {
        debug!("Deleting expense. Expense ID: {expense_id}");
        let mut fn_impl = || -> anyhow::Result<()> {
            let tx = self.connection.transaction()?;

            ledger::remove_all_shares(&tx, expense_id)?;

            let rows = tx.execute("DELETE FROM expense WHERE id = ?1", params![&expense_id])?;
            if rows == 0 {
                return Err(LedgerError::not_found(format!("expense {expense_id}")).into());
            }

            registry::delete_orphans(&tx)?;

            tx.commit()?;
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot delete expense", e))
    }

    fn expense_exists(&self, expense_id: i64) -> LedgerResult<bool> {
        let fn_impl = || -> anyhow::Result<bool> {
            let id: Option<i64> = self
                .connection
                .query_row(
                    "SELECT id FROM expense WHERE id = ?1",
                    params![&expense_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id.is_some())
        };

        fn_impl().map_err(|e| map_error("cannot check if expense exists", e))
    }

    fn get_expenses(&self) -> LedgerResult<Vec<SavedExpense>> {
        let fn_impl = || -> anyhow::Result<Vec<SavedExpense>> {
            let mut stmt = self.connection.prepare_cached(
                "SELECT id, expense_date, establishment_name, expense_name,
                        total_cost, split_count, creditor_name
                 FROM expense
                 ORDER BY expense_date, establishment_name, expense_name, creditor_name",
            )?;

            let expense_iter = stmt.query_map([], |row| {
                Ok(SavedExpense {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    establishment: row.get(2)?,
                    item: row.get(3)?,
                    total_cost: row.get(4)?,
                    split_count: row.get(5)?,
                    creditor_name: row.get(6)?,
                })
            })?;

            let expenses = expense_iter.collect::<Result<_, _>>()?;
            Ok(expenses)
        };

        fn_impl().map_err(|e| map_error("cannot get expenses", e))
    }

    fn get_share_details(&self, expense_id: Option<i64>) -> LedgerResult<Vec<ShareDetail>> {
        let fn_impl = || -> anyhow::Result<Vec<ShareDetail>> {
            let rows = match expense_id {
                Some(id) => {
                    let mut stmt = self.connection.prepare_cached(
                        "SELECT expense_id, expense_date, establishment_name, expense_name,
                                creditor_name, debtor_id, debtor_name, amount_owed, payment_status
                         FROM combined_share
                         WHERE expense_id = ?1
                         ORDER BY expense_date, establishment_name, expense_name,
                                  creditor_name, debtor_name",
                    )?;
                    let row_iter = stmt.query_map(params![&id], read_share_row)?;
                    row_iter.collect::<Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = self.connection.prepare_cached(
                        "SELECT expense_id, expense_date, establishment_name, expense_name,
                                creditor_name, debtor_id, debtor_name, amount_owed, payment_status
                         FROM combined_share
                         ORDER BY expense_date, establishment_name, expense_name,
                                  creditor_name, debtor_name",
                    )?;
                    let row_iter = stmt.query_map([], read_share_row)?;
                    row_iter.collect::<Result<Vec<_>, _>>()?
                }
            };

            rows.into_iter().map(decode_share_row).collect()
        };

        fn_impl().map_err(|e| map_error("cannot get share details", e))
    }

    fn get_unpaid_debts(&self) -> LedgerResult<Vec<DebtRecord>> {
        let fn_impl = || ledger::unpaid_by_pair(&self.connection);
        fn_impl().map_err(|e| map_error("cannot get unpaid debts", e))
    }

    fn get_participants(&self) -> LedgerResult<Vec<String>> {
        let fn_impl = || registry::all_names(&self.connection);
        fn_impl().map_err(|e| map_error("cannot get participants", e))
    }

    fn clear_data(&mut self) -> LedgerResult<()> {
        debug!("Dropping all tables and recreating the schema");
        let fn_impl = || -> anyhow::Result<()> {
            schema::drop_all_tables(&self.connection)?;
            schema::create_all_tables(&self.connection)?;
            Ok(())
        };

        fn_impl().map_err(|e| map_error("cannot clear data", e))
    }
}

struct ShareRow {
    expense_id: i64,
    date: NaiveDate,
    establishment: String,
    item: String,
    creditor_name: String,
    debtor_id: i64,
    debtor_name: String,
    amount_owed: f64,
    status_code: String,
}

fn read_share_row(row: &rusqlite::Row) -> rusqlite::Result<ShareRow> {
    Ok(ShareRow {
        expense_id: row.get(0)?,
        date: row.get(1)?,
        establishment: row.get(2)?,
        item: row.get(3)?,
        creditor_name: row.get(4)?,
        debtor_id: row.get(5)?,
        debtor_name: row.get(6)?,
        amount_owed: row.get(7)?,
        status_code: row.get(8)?,
    })
}

fn decode_share_row(row: ShareRow) -> anyhow::Result<ShareDetail> {
    let status = PaymentStatus::from_code(&row.status_code)
        .ok_or_else(|| anyhow::anyhow!("unknown payment status code `{}`", row.status_code))?;

    Ok(ShareDetail {
        expense_id: row.expense_id,
        date: row.date,
        establishment: row.establishment,
        item: row.item,
        creditor_name: row.creditor_name,
        debtor_id: row.debtor_id,
        debtor_name: row.debtor_name,
        amount_owed: row.amount_owed,
        status,
    })
}

fn map_error<T: AsRef<str>>(message: T, e: anyhow::Error) -> LedgerError {
    match e.downcast::<LedgerError>() {
        Ok(e) => e,
        Err(e) => LedgerError::persistence(message, e),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("cannot open in-memory store")
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("test")
    }

    fn dinner(total: f64, debtors: &[&str], creditor: &str) -> NewExpense {
        NewExpense::new(
            date(2024, 3, 1),
            "cafe",
            "dinner",
            total,
            debtors.iter().map(|n| n.to_string()).collect(),
            creditor,
        )
    }

    fn share_sum(store: &SqliteStore, expense_id: i64) -> f64 {
        store
            .get_share_details(Some(expense_id))
            .expect("test")
            .iter()
            .map(|s| s.amount_owed)
            .sum()
    }

    #[test]
    fn test_create_expense_persists_header_and_shares() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob", "carl"], "anna"))
            .expect("test");

        let expenses = store.get_expenses().expect("test");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, id);
        assert_eq!(expenses[0].split_count, 3);
        assert_eq!(expenses[0].creditor_name, "anna");
        assert_abs_diff_eq!(expenses[0].total_cost, 30.0);

        let shares = store.get_share_details(Some(id)).expect("test");
        assert_eq!(shares.len(), 3);
        for share in &shares {
            assert_abs_diff_eq!(share.amount_owed, 10.0);
            assert_eq!(share.status, PaymentStatus::Unpaid);
            assert_eq!(share.creditor_name, "anna");
        }
        assert_abs_diff_eq!(share_sum(&store, id), 30.0);
    }

    #[test]
    fn test_create_expense_without_debtors_is_rejected() {
        let mut store = store();
        let result = store.create_expense(dinner(30.0, &[], "anna"));

        assert!(matches!(result, Err(LedgerError::InvariantViolation(_))));
        assert!(store.get_expenses().expect("test").is_empty());
        assert!(store.get_participants().expect("test").is_empty());
    }

    #[test]
    fn test_create_expense_reuses_participants() {
        let mut store = store();
        store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");
        store
            .create_expense(dinner(12.0, &["bob", "carl"], "bob"))
            .expect("test");

        let participants = store.get_participants().expect("test");
        assert_eq!(participants, vec!["anna", "bob", "carl"]);
    }

    #[test]
    fn test_add_debtor_requotes_every_share() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob", "carl"], "anna"))
            .expect("test");

        store.add_debtor(id, "dora").expect("test");

        let expenses = store.get_expenses().expect("test");
        assert_eq!(expenses[0].split_count, 4);

        let shares = store.get_share_details(Some(id)).expect("test");
        assert_eq!(shares.len(), 4);
        for share in &shares {
            assert_abs_diff_eq!(share.amount_owed, 7.5);
        }
        let dora = shares
            .iter()
            .find(|s| s.debtor_name == "dora")
            .expect("test");
        assert_eq!(dora.status, PaymentStatus::Unpaid);
        assert_abs_diff_eq!(share_sum(&store, id), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_add_debtor_twice_is_rejected() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");

        let result = store.add_debtor(id, "bob");
        assert!(matches!(result, Err(LedgerError::InvariantViolation(_))));

        // Nothing changed.
        let expenses = store.get_expenses().expect("test");
        assert_eq!(expenses[0].split_count, 2);
        assert_eq!(store.get_share_details(Some(id)).expect("test").len(), 2);
    }

    #[test]
    fn test_add_debtor_to_missing_expense_rolls_back_registration() {
        let mut store = store();
        store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");

        let result = store.add_debtor(999, "zoe");
        assert!(matches!(result, Err(LedgerError::NotFound(_))));

        // The transaction rolled back, so `zoe` was never registered.
        let participants = store.get_participants().expect("test");
        assert_eq!(participants, vec!["anna", "bob"]);
    }

    #[test]
    fn test_remove_debtor_requotes_remaining_shares() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob", "carl"], "anna"))
            .expect("test");

        store.remove_debtor(id, "carl").expect("test");

        let expenses = store.get_expenses().expect("test");
        assert_eq!(expenses[0].split_count, 2);

        let shares = store.get_share_details(Some(id)).expect("test");
        assert_eq!(shares.len(), 2);
        for share in &shares {
            assert_abs_diff_eq!(share.amount_owed, 15.0);
            assert_ne!(share.debtor_name, "carl");
        }
        assert_abs_diff_eq!(share_sum(&store, id), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_remove_creditor_is_rejected() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob", "carl"], "anna"))
            .expect("test");

        let result = store.remove_debtor(id, "anna");
        assert!(matches!(result, Err(LedgerError::InvariantViolation(_))));

        let shares = store.get_share_details(Some(id)).expect("test");
        assert_eq!(shares.len(), 3);
        for share in &shares {
            assert_abs_diff_eq!(share.amount_owed, 10.0);
        }
    }

    #[test]
    fn test_remove_unknown_debtor_is_not_found() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");

        assert!(matches!(
            store.remove_debtor(id, "zoe"),
            Err(LedgerError::NotFound(_))
        ));

        // Known participant but no share in this expense.
        store
            .create_expense(dinner(10.0, &["zoe"], "zoe"))
            .expect("test");
        assert!(matches!(
            store.remove_debtor(id, "zoe"),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_last_debtor_is_rejected() {
        let mut store = store();
        let id = store
            .create_expense(dinner(8.0, &["anna"], "anna"))
            .expect("test");

        // Hand the expense to an outsider so that `anna` is removable in
        // principle, then removing her would leave a zero-way split.
        store.update_creditor(id, "bob").expect("test");

        let result = store.remove_debtor(id, "anna");
        assert!(matches!(result, Err(LedgerError::InvariantViolation(_))));

        let shares = store.get_share_details(Some(id)).expect("test");
        assert_eq!(shares.len(), 1);
        assert_eq!(store.get_expenses().expect("test")[0].split_count, 1);
    }

    #[test]
    fn test_update_cost_requotes_every_share() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob", "carl"], "anna"))
            .expect("test");

        store.update_cost(id, 45.0).expect("test");

        let expenses = store.get_expenses().expect("test");
        assert_abs_diff_eq!(expenses[0].total_cost, 45.0);
        assert_eq!(expenses[0].split_count, 3);

        let shares = store.get_share_details(Some(id)).expect("test");
        for share in &shares {
            assert_abs_diff_eq!(share.amount_owed, 15.0);
        }
        assert_abs_diff_eq!(share_sum(&store, id), 45.0, epsilon = 1e-9);

        assert!(matches!(
            store.update_cost(999, 45.0),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_field_updates_do_not_touch_shares() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");

        store.update_date(id, date(2024, 4, 2)).expect("test");
        store.update_establishment(id, "trattoria").expect("test");
        store.update_item_name(id, "pizza").expect("test");

        let expenses = store.get_expenses().expect("test");
        assert_eq!(expenses[0].date, date(2024, 4, 2));
        assert_eq!(expenses[0].establishment, "trattoria");
        assert_eq!(expenses[0].item, "pizza");

        let shares = store.get_share_details(Some(id)).expect("test");
        assert_eq!(shares.len(), 2);
        for share in &shares {
            assert_abs_diff_eq!(share.amount_owed, 15.0);
        }

        assert!(matches!(
            store.update_date(999, date(2024, 4, 2)),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            store.update_establishment(999, "trattoria"),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            store.update_item_name(999, "pizza"),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_payment_status_excludes_share_from_debts() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob", "carl"], "anna"))
            .expect("test");

        let shares = store.get_share_details(Some(id)).expect("test");
        let bob = shares
            .iter()
            .find(|s| s.debtor_name == "bob")
            .expect("test");

        store
            .update_payment_status(id, bob.debtor_id, PaymentStatus::Paid)
            .expect("test");

        let debts = store.get_unpaid_debts().expect("test");
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].debtor, "carl");
        assert_eq!(debts[0].creditor, "anna");
        assert_abs_diff_eq!(debts[0].amount, 10.0);

        store
            .update_payment_status(id, bob.debtor_id, PaymentStatus::Unpaid)
            .expect("test");
        assert_eq!(store.get_unpaid_debts().expect("test").len(), 2);

        assert!(matches!(
            store.update_payment_status(id, 999, PaymentStatus::Paid),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_unpaid_debts_per_pair() {
        let mut store = store();
        store
            .create_expense(dinner(30.0, &["anna", "bob", "carl"], "anna"))
            .expect("test");

        let mut debts = store.get_unpaid_debts().expect("test");
        debts.sort_by(|a, b| a.debtor.cmp(&b.debtor));

        // The creditor's own share is not a debt.
        assert_eq!(debts.len(), 2);
        assert_eq!(debts[0].debtor, "bob");
        assert_eq!(debts[0].creditor, "anna");
        assert_abs_diff_eq!(debts[0].amount, 10.0);
        assert_eq!(debts[1].debtor, "carl");
        assert_eq!(debts[1].creditor, "anna");
        assert_abs_diff_eq!(debts[1].amount, 10.0);
    }

    #[test]
    fn test_unpaid_debts_sum_across_expenses() {
        let mut store = store();
        store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");
        store
            .create_expense(dinner(20.0, &["anna", "bob"], "anna"))
            .expect("test");

        let debts = store.get_unpaid_debts().expect("test");
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].debtor, "bob");
        assert_eq!(debts[0].creditor, "anna");
        assert_abs_diff_eq!(debts[0].amount, 25.0);
    }

    #[test]
    fn test_update_creditor_redirects_debts() {
        let mut store = store();
        let id = store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");

        store.update_creditor(id, "bob").expect("test");

        let expenses = store.get_expenses().expect("test");
        assert_eq!(expenses[0].creditor_name, "bob");

        // Now it is anna who owes bob; bob's own share is excluded.
        let debts = store.get_unpaid_debts().expect("test");
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].debtor, "anna");
        assert_eq!(debts[0].creditor, "bob");
        assert_abs_diff_eq!(debts[0].amount, 15.0);

        assert!(matches!(
            store.update_creditor(999, "bob"),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_expense_cascades_and_sweeps_orphans() {
        let mut store = store();
        let first = store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");
        let second = store
            .create_expense(dinner(12.0, &["bob", "carl"], "bob"))
            .expect("test");

        store.delete_expense(second).expect("test");

        assert!(!store.expense_exists(second).expect("test"));
        assert!(store.get_share_details(Some(second)).expect("test").is_empty());

        // carl only appeared in the deleted expense; anna and bob survive.
        let participants = store.get_participants().expect("test");
        assert_eq!(participants, vec!["anna", "bob"]);

        store.delete_expense(first).expect("test");
        assert!(store.get_participants().expect("test").is_empty());

        assert!(matches!(
            store.delete_expense(first),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_then_delete_restores_registry() {
        let mut store = store();
        store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");
        let before = store.get_participants().expect("test");

        let id = store
            .create_expense(dinner(50.0, &["anna", "dora"], "dora"))
            .expect("test");
        store.delete_expense(id).expect("test");

        assert_eq!(store.get_participants().expect("test"), before);
    }

    #[test]
    fn test_share_sum_tracks_total_through_edits() {
        let mut store = store();
        let id = store
            .create_expense(dinner(10.0, &["anna", "bob", "carl"], "bob"))
            .expect("test");
        assert_abs_diff_eq!(share_sum(&store, id), 10.0, epsilon = 1e-9);

        store.add_debtor(id, "dora").expect("test");
        assert_abs_diff_eq!(share_sum(&store, id), 10.0, epsilon = 1e-9);

        store.remove_debtor(id, "anna").expect("test");
        assert_abs_diff_eq!(share_sum(&store, id), 10.0, epsilon = 1e-9);

        store.update_cost(id, 17.3).expect("test");
        assert_abs_diff_eq!(share_sum(&store, id), 17.3, epsilon = 1e-9);
    }

    #[test]
    fn test_get_share_details_filter_and_order() {
        let mut store = store();
        let first = store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");
        store
            .create_expense(NewExpense::new(
                date(2024, 2, 1),
                "bar",
                "coffee",
                6.0,
                vec!["bob".to_string(), "carl".to_string()],
                "carl",
            ))
            .expect("test");

        let all = store.get_share_details(None).expect("test");
        assert_eq!(all.len(), 4);
        // The older expense (February) sorts first.
        assert_eq!(all[0].item, "coffee");
        assert_eq!(all[2].item, "dinner");

        let filtered = store.get_share_details(Some(first)).expect("test");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|s| s.expense_id == first));
    }

    #[test]
    fn test_clear_data_resets_everything() {
        let mut store = store();
        store
            .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
            .expect("test");

        store.clear_data().expect("test");

        assert!(store.get_expenses().expect("test").is_empty());
        assert!(store.get_participants().expect("test").is_empty());
        assert!(store.get_unpaid_debts().expect("test").is_empty());

        // The store is usable again after the reset.
        store
            .create_expense(dinner(8.0, &["anna", "bob"], "bob"))
            .expect("test");
        assert_eq!(store.get_expenses().expect("test").len(), 1);
    }

    #[test]
    fn test_file_backed_store_round_trip() {
        let dir = tempdir::TempDir::new("billsplit-test").expect("cannot create temp dir");
        let path = dir.path().join("billsplit.db");

        {
            let mut store = SqliteStore::open(&path).expect("test");
            store
                .create_expense(dinner(30.0, &["anna", "bob"], "anna"))
                .expect("test");
        }

        let store = SqliteStore::open(&path).expect("test");
        let expenses = store.get_expenses().expect("test");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].creditor_name, "anna");
        assert_eq!(store.get_share_details(None).expect("test").len(), 2);
    }
}
