use thiserror::Error;

/// Errors produced by the ledger core.
///
/// `NotFound` and `InvariantViolation` are detected before any write, so an
/// operation returning one of them has not touched the store. `Persistence`
/// aborts the surrounding transaction entirely.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0} does not exist")]
    NotFound(String),

    #[error("{0}")]
    InvariantViolation(String),

    #[error("storage failure: {message}")]
    Persistence {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl LedgerError {
    pub fn not_found(what: impl Into<String>) -> Self {
        LedgerError::NotFound(what.into())
    }

    pub fn invariant(reason: impl Into<String>) -> Self {
        LedgerError::InvariantViolation(reason.into())
    }

    pub fn persistence<T: AsRef<str>>(message: T, e: anyhow::Error) -> Self {
        LedgerError::Persistence {
            message: message.as_ref().to_string(),
            source: e,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors raised by the input layer before anything reaches the core.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("invalid date `{0}`: expected dd/mm/yyyy")]
    InvalidDate(String),

    #[error("invalid cost `{0}`: expected a positive amount like 42 or 42.50")]
    InvalidCost(String),

    #[error(
        "invalid name `{0}`: names must be alphanumeric, can only \
             include ASCII characters and must start with a letter"
    )]
    InvalidName(String),

    #[error("there must be at least one debtor. Format must be 'name [name...]'")]
    DebtorsNotProvided,

    #[error("`{0}` appears more than once in the debtor list")]
    DuplicateDebtor(String),

    #[error("the creditor `{0}` must be one of the debtors")]
    CreditorNotAmongDebtors(String),

    #[error("invalid value `{0}` for expense ID: expected an integer")]
    InvalidExpenseId(String),

    #[error("invalid value `{0}` for debtor ID: expected an integer")]
    InvalidDebtorId(String),

    #[error("invalid payment status `{0}`: expected 'y' (paid) or 'n' (unpaid)")]
    InvalidPaymentStatus(String),
}

impl InputError {
    pub fn invalid_date(s: String) -> Self {
        InputError::InvalidDate(s)
    }

    pub fn invalid_cost(s: String) -> Self {
        InputError::InvalidCost(s)
    }

    pub fn invalid_name(name: String) -> Self {
        InputError::InvalidName(name)
    }

    pub fn debtors_not_provided() -> Self {
        InputError::DebtorsNotProvided
    }

    pub fn duplicate_debtor(name: String) -> Self {
        InputError::DuplicateDebtor(name)
    }

    pub fn creditor_not_among_debtors(name: String) -> Self {
        InputError::CreditorNotAmongDebtors(name)
    }

    pub fn invalid_expense_id(id: String) -> Self {
        InputError::InvalidExpenseId(id)
    }

    pub fn invalid_debtor_id(id: String) -> Self {
        InputError::InvalidDebtorId(id)
    }

    pub fn invalid_payment_status(s: String) -> Self {
        InputError::InvalidPaymentStatus(s)
    }
}
