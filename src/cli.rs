//! The interactive menu shell.
//!
//! Everything here is prompting, retry loops and printing; parsing lives
//! in `parser`, the checks in `validator` and the actual operations in
//! `endpoints` and the store. Leaving a prompt blank cancels the current
//! operation and returns to the menu.

use std::io::{self, BufRead, Write};

use log::error;

use crate::database::Store;
use crate::endpoints;
use crate::error::InputError;
use crate::parser;
use crate::types::PaymentStatus;
use crate::validator;

pub fn run<S: Store>(store: &mut S) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Welcome to the bill splitter.");

    loop {
        println!();
        println!("Please select an option:");
        println!("1. Add an expense");
        println!("2. Edit an expense");
        println!("3. Display expenses");
        println!("4. Display combined expenses");
        println!("5. Display net debt");
        println!("6. Clear data");
        println!("7. Exit");
        println!();

        let choice = read_line(&mut input)?;
        match choice.trim() {
            "1" => add_expense(store, &mut input)?,
            "2" => edit_expense(store, &mut input)?,
            "3" => print_report(endpoints::expenses_report(store)),
            "4" => print_report(endpoints::shares_report(store, None)),
            "5" => print_report(endpoints::net_debts_report(store)),
            "6" => clear_data(store, &mut input)?,
            "7" => break,
            _ => println!("Invalid input. Please try again."),
        }
    }

    println!("Thank you for using the bill splitter.");
    Ok(())
}

fn add_expense<S: Store, R: BufRead>(store: &mut S, input: &mut R) -> io::Result<()> {
    println!("Adding an expense. Leave any prompt blank to cancel.");

    let Some(date) = prompt(input, "Enter the date [dd/mm/yyyy]", |s| {
        parser::date_from_input(s)
    })?
    else {
        return Ok(());
    };
    let Some(establishment) = prompt(input, "Enter the establishment name", |s| {
        Ok(s.to_string())
    })?
    else {
        return Ok(());
    };
    let Some(item) = prompt(input, "Enter the item name", |s| Ok(s.to_string()))? else {
        return Ok(());
    };
    let Some(cost) = prompt(input, "Enter the total cost", |s| {
        let cost = parser::amount_from_input(s)?;
        validator::validate_cost(cost)?;
        Ok(cost)
    })?
    else {
        return Ok(());
    };
    let Some(debtors) = prompt(input, "Enter the debtor names, separated by spaces", |s| {
        let names = parser::names_from_input(s)?;
        validator::validate_debtor_names(&names)?;
        Ok(names)
    })?
    else {
        return Ok(());
    };
    let Some(creditor) = prompt(input, "Enter the creditor (one of the debtors)", |s| {
        validator::validate_creditor(s, &debtors)?;
        Ok(s.to_string())
    })?
    else {
        return Ok(());
    };

    match endpoints::add_expense(store, date, &establishment, &item, cost, debtors, &creditor) {
        Ok(expense_id) => println!("Expense {expense_id} recorded."),
        Err(e) => print_error(e),
    }
    Ok(())
}

fn edit_expense<S: Store, R: BufRead>(store: &mut S, input: &mut R) -> io::Result<()> {
    println!("Displaying all combined expenses...");
    println!();
    print_report(endpoints::shares_report(store, None));
    println!();

    let Some(expense_id) = prompt(input, "Enter the expense ID ('0' to cancel)", |s| {
        parser::expense_id_from_input(s)
    })?
    else {
        return Ok(());
    };
    if expense_id == 0 {
        return Ok(());
    }

    match store.expense_exists(expense_id) {
        Ok(true) => {}
        Ok(false) => {
            println!("There is no expense with ID {expense_id}.");
            return Ok(());
        }
        Err(e) => {
            print_error(e.into());
            return Ok(());
        }
    }

    println!();
    print_report(endpoints::shares_report(store, Some(expense_id)));
    println!();

    println!("What would you like to edit?");
    println!("1. Update expense date");
    println!("2. Update establishment name");
    println!("3. Update item name");
    println!("4. Update expense cost");
    println!("5. Add debtor");
    println!("6. Remove debtor");
    println!("7. Update creditor");
    println!("8. Update payment status");
    println!("9. Delete expense");
    println!("0. Cancel");

    let choice = read_line(input)?;
    let result: anyhow::Result<()> = match choice.trim() {
        "1" => {
            let Some(date) = prompt(input, "Enter the new date [dd/mm/yyyy]", |s| {
                parser::date_from_input(s)
            })?
            else {
                return Ok(());
            };
            store.update_date(expense_id, date).map_err(Into::into)
        }
        "2" => {
            let Some(name) = prompt(input, "Enter the new establishment name", |s| {
                Ok(s.to_string())
            })?
            else {
                return Ok(());
            };
            store
                .update_establishment(expense_id, &name)
                .map_err(Into::into)
        }
        "3" => {
            let Some(name) = prompt(input, "Enter the new item name", |s| Ok(s.to_string()))?
            else {
                return Ok(());
            };
            store.update_item_name(expense_id, &name).map_err(Into::into)
        }
        "4" => {
            let Some(cost) = prompt(input, "Enter the new expense cost", |s| {
                let cost = parser::amount_from_input(s)?;
                validator::validate_cost(cost)?;
                Ok(cost)
            })?
            else {
                return Ok(());
            };
            store.update_cost(expense_id, cost).map_err(Into::into)
        }
        "5" => {
            let Some(name) = prompt(input, "Enter the debtor's name", |s| {
                validator::validate_name(s)?;
                Ok(s.to_string())
            })?
            else {
                return Ok(());
            };
            store.add_debtor(expense_id, &name).map_err(Into::into)
        }
        "6" => {
            let Some(name) = prompt(input, "Enter the debtor name to remove", |s| {
                validator::validate_name(s)?;
                Ok(s.to_string())
            })?
            else {
                return Ok(());
            };
            store.remove_debtor(expense_id, &name).map_err(Into::into)
        }
        "7" => {
            let Some(name) = prompt(input, "Enter the new creditor name", |s| {
                validator::validate_name(s)?;
                Ok(s.to_string())
            })?
            else {
                return Ok(());
            };
            store.update_creditor(expense_id, &name).map_err(Into::into)
        }
        "8" => {
            let Some(debtor_id) = prompt(input, "Enter the ID of the debtor to modify", |s| {
                parser::debtor_id_from_input(s)
            })?
            else {
                return Ok(());
            };
            let Some(status) = prompt(input, "Enter the new payment status [y/n]", |s| {
                PaymentStatus::from_code(s)
                    .ok_or_else(|| InputError::invalid_payment_status(s.to_string()))
            })?
            else {
                return Ok(());
            };
            store
                .update_payment_status(expense_id, debtor_id, status)
                .map_err(Into::into)
        }
        "9" => store.delete_expense(expense_id).map_err(Into::into),
        "0" => return Ok(()),
        _ => {
            println!("Invalid update option.");
            return Ok(());
        }
    };

    match result {
        Ok(()) => println!("Update successful."),
        Err(e) => print_error(e),
    }
    Ok(())
}

fn clear_data<S: Store, R: BufRead>(store: &mut S, input: &mut R) -> io::Result<()> {
    print!("Are you sure you want to clear all data? This action cannot be undone. [y/N]: ");
    io::stdout().flush()?;

    let confirm = read_line(input)?;
    match confirm.trim().to_lowercase().as_str() {
        "y" | "yes" => match store.clear_data() {
            Ok(()) => println!("All data cleared."),
            Err(e) => print_error(e.into()),
        },
        _ => println!("Operation cancelled. The data was not cleared."),
    }
    Ok(())
}

/// Ask until the answer parses, or the user leaves the line blank to
/// cancel (in which case `None` is returned).
fn prompt<R: BufRead, T>(
    input: &mut R,
    message: &str,
    parse: impl Fn(&str) -> Result<T, InputError>,
) -> io::Result<Option<T>> {
    loop {
        print!("{message} ");
        io::stdout().flush()?;

        let line = read_line(input)?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        match parse(line) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => println!("{e}. Please try again."),
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    let bytes = input.read_line(&mut line)?;
    if bytes == 0 {
        // Stdin was closed: there is no way to keep prompting.
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "end of input",
        ));
    }
    Ok(line)
}

fn print_report(report: anyhow::Result<String>) {
    match report {
        Ok(report) => println!("{report}"),
        Err(e) => print_error(e),
    }
}

fn print_error(e: anyhow::Error) {
    error!("{e:?}");
    println!("Error: {e}");
}
