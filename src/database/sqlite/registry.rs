//! Name-to-id resolution for participants.
//!
//! These functions take a plain connection so that they compose inside a
//! caller's transaction (a rusqlite `Transaction` derefs to `Connection`).

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Look up a participant by exact name, inserting them if absent.
///
/// No case folding or whitespace normalization: two spellings are two
/// participants.
pub fn resolve(connection: &Connection, name: &str) -> anyhow::Result<i64> {
    let existing = lookup(connection, name)?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let mut insert_stmt =
        connection.prepare_cached("INSERT INTO person (name) VALUES (?1) RETURNING id")?;
    let id: i64 = insert_stmt.query_row(params![&name], |row| row.get(0))?;

    debug!("registered participant `{name}` with id {id}");
    Ok(id)
}

/// Look up a participant by exact name without registering them.
pub fn lookup(connection: &Connection, name: &str) -> anyhow::Result<Option<i64>> {
    let mut select_stmt =
        connection.prepare_cached("SELECT id FROM person WHERE name = ?1 LIMIT 1")?;
    let id = select_stmt
        .query_row(params![&name], |row| row.get(0))
        .optional()?;
    Ok(id)
}

/// Get the names of all registered participants.
pub fn all_names(connection: &Connection) -> anyhow::Result<Vec<String>> {
    let mut stmt = connection.prepare_cached("SELECT name FROM person ORDER BY name")?;
    let name_iter = stmt.query_map([], |row| row.get(0))?;
    let names = name_iter.collect::<Result<_, _>>()?;
    Ok(names)
}

/// Delete every participant that no share references as a debtor and no
/// expense references as its creditor.
pub fn delete_orphans(connection: &Connection) -> anyhow::Result<()> {
    let deleted = connection.execute(
        "DELETE FROM person
         WHERE id NOT IN (SELECT debtor_id FROM expense_share)
           AND id NOT IN (SELECT creditor_id FROM expense)",
        (),
    )?;

    if deleted > 0 {
        debug!("swept {deleted} orphan participant(s)");
    }
    Ok(())
}
