use chrono::NaiveDate;

/// Whether a debtor has settled their share of an expense.
///
/// The store encodes this as a single character ('y'/'n'); the rest of the
/// code only ever sees this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "y",
            PaymentStatus::Unpaid => "n",
        }
    }

    pub fn from_code(code: &str) -> Option<PaymentStatus> {
        match code {
            "y" => Some(PaymentStatus::Paid),
            "n" => Some(PaymentStatus::Unpaid),
            _ => None,
        }
    }
}

/// An expense as submitted by the user, before it has an id.
///
/// The creditor must be one of the debtors: whoever pays also takes part in
/// the split. The input layer enforces this before the expense gets here.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub establishment: String,
    pub item: String,
    pub total_cost: f64,
    pub debtor_names: Vec<String>,
    pub creditor_name: String,
}

impl NewExpense {
    pub fn new(
        date: NaiveDate,
        establishment: &str,
        item: &str,
        total_cost: f64,
        debtor_names: Vec<String>,
        creditor_name: &str,
    ) -> NewExpense {
        NewExpense {
            date,
            establishment: establishment.to_string(),
            item: item.to_string(),
            total_cost,
            debtor_names,
            creditor_name: creditor_name.to_string(),
        }
    }
}

/// An expense header as stored, with its generated id.
#[derive(Clone, Debug)]
pub struct SavedExpense {
    pub id: i64,
    pub date: NaiveDate,
    pub establishment: String,
    pub item: String,
    pub total_cost: f64,
    pub split_count: i64,
    pub creditor_name: String,
}

/// One row of the combined join view: a debtor's share of one expense,
/// with the names already resolved for display.
#[derive(Clone, Debug)]
pub struct ShareDetail {
    pub expense_id: i64,
    pub date: NaiveDate,
    pub establishment: String,
    pub item: String,
    pub creditor_name: String,
    pub debtor_id: i64,
    pub debtor_name: String,
    pub amount_owed: f64,
    pub status: PaymentStatus,
}

/// Total unpaid amount one person owes another, summed across all expenses.
#[derive(Clone, Debug)]
pub struct DebtRecord {
    pub creditor: String,
    pub debtor: String,
    pub amount: f64,
}

impl DebtRecord {
    pub fn new(creditor: &str, debtor: &str, amount: f64) -> DebtRecord {
        DebtRecord {
            creditor: creditor.to_string(),
            debtor: debtor.to_string(),
            amount,
        }
    }
}

/// A single net transfer: after netting reciprocal debts, `debtor` owes
/// `creditor` exactly `amount`.
#[derive(Clone, Debug)]
pub struct Settlement {
    pub debtor: String,
    pub creditor: String,
    pub amount: f64,
}

impl Settlement {
    pub fn new(debtor: &str, creditor: &str, amount: f64) -> Settlement {
        Settlement {
            debtor: debtor.to_string(),
            creditor: creditor.to_string(),
            amount,
        }
    }
}
