//! Functions that check the validity of user input.
//!
//! These functions are called after the parsing phase and execute
//! checks that are not easily done by the parser.

use std::collections::HashSet;

use crate::error::InputError;

/// Names must be ASCII alphanumeric and start with a letter.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

pub fn validate_name(name: &str) -> Result<(), InputError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(InputError::invalid_name(name.to_string()))
    }
}

/// Check a debtor list: at least one name, every name well-formed, no name
/// twice (a person cannot owe two shares of the same bill).
pub fn validate_debtor_names<T: AsRef<str>>(names: &[T]) -> Result<(), InputError> {
    if names.is_empty() {
        return Err(InputError::debtors_not_provided());
    }

    let mut seen = HashSet::new();
    for name in names {
        validate_name(name.as_ref())?;
        if !seen.insert(name.as_ref()) {
            return Err(InputError::duplicate_debtor(name.as_ref().to_string()));
        }
    }

    Ok(())
}

/// Check that the creditor is well-formed and takes part in the split:
/// whoever pays the bill also sits at the table.
pub fn validate_creditor<T: AsRef<str>>(creditor: &str, debtors: &[T]) -> Result<(), InputError> {
    validate_name(creditor)?;

    if debtors.iter().any(|d| d.as_ref() == creditor) {
        Ok(())
    } else {
        Err(InputError::creditor_not_among_debtors(creditor.to_string()))
    }
}

/// Check that a cost is a usable positive amount.
pub fn validate_cost(cost: f64) -> Result<(), InputError> {
    if cost.is_finite() && cost > 0.0 {
        Ok(())
    } else {
        Err(InputError::invalid_cost(cost.to_string()))
    }
}
