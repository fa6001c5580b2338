const CREATE_PERSON_TABLE: &str = "CREATE TABLE IF NOT EXISTS person (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE
)";

const CREATE_EXPENSE_TABLE: &str = "CREATE TABLE IF NOT EXISTS expense (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  expense_date DATE NOT NULL,
  establishment_name TEXT NOT NULL,
  expense_name TEXT NOT NULL,
  total_cost REAL NOT NULL,
  split_count INTEGER NOT NULL,
  creditor_id INTEGER NOT NULL,
  creditor_name TEXT NOT NULL,
  FOREIGN KEY (creditor_id) REFERENCES person(id)
)";

const CREATE_EXPENSE_SHARE_TABLE: &str = "CREATE TABLE IF NOT EXISTS expense_share (
  expense_id INTEGER NOT NULL,
  creditor_id INTEGER NOT NULL,
  debtor_id INTEGER NOT NULL,
  amount_owed REAL NOT NULL,
  payment_status TEXT NOT NULL DEFAULT 'n' CHECK (payment_status IN ('y', 'n')),
  PRIMARY KEY (expense_id, debtor_id),
  FOREIGN KEY (expense_id) REFERENCES expense(id),
  FOREIGN KEY (debtor_id) REFERENCES person(id)
)";

const CREATE_COMBINED_SHARE_VIEW: &str = "CREATE VIEW IF NOT EXISTS combined_share AS
  SELECT es.expense_id, e.expense_date, e.establishment_name, e.expense_name,
         es.creditor_id, p1.name AS creditor_name,
         es.debtor_id, p2.name AS debtor_name, es.amount_owed, es.payment_status
  FROM expense_share es
  JOIN person p1 ON es.creditor_id = p1.id
  JOIN person p2 ON es.debtor_id = p2.id
  JOIN expense e ON es.expense_id = e.id";

pub fn create_all_tables(connection: &rusqlite::Connection) -> anyhow::Result<()> {
    connection.execute(CREATE_PERSON_TABLE, ())?;
    connection.execute(CREATE_EXPENSE_TABLE, ())?;
    connection.execute(CREATE_EXPENSE_SHARE_TABLE, ())?;
    connection.execute(CREATE_COMBINED_SHARE_VIEW, ())?;
    Ok(())
}

pub fn drop_all_tables(connection: &rusqlite::Connection) -> anyhow::Result<()> {
    connection.execute("DROP VIEW IF EXISTS combined_share", ())?;
    connection.execute("DROP TABLE IF EXISTS expense_share", ())?;
    connection.execute("DROP TABLE IF EXISTS expense", ())?;
    connection.execute("DROP TABLE IF EXISTS person", ())?;
    Ok(())
}
