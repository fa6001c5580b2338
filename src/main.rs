use log::{error, info};

mod cli;
mod database;
mod debts;
mod endpoints;
mod error;
mod formatter;
mod parser;
mod types;
mod validator;

use crate::database::sqlite::SqliteStore;

const DATABASE_PATH: &str = "billsplit.db";

fn main() {
    pretty_env_logger::init();

    info!("Opening database...");
    let mut store = SqliteStore::open(DATABASE_PATH)
        .map_err(|e| error!("Cannot open database: {}", e))
        .expect("Cannot open database");

    if let Err(e) = cli::run(&mut store) {
        error!("Cannot read user input: {}", e);
    }
}
