//! The core of the settlement logic. It contains the algorithm that nets
//! pairwise debts down to the minimal transfers between participants.
//!
//! The computation is split in three pure steps:
//! - build a square debt matrix from the per-pair unpaid sums
//! - collapse reciprocal entries into a net matrix (upper triangle only)
//! - read the nonzero net entries back out as settlement statements
//!
//! We use floating-point math throughout: equal splits rarely divide
//! evenly, so amounts within half a cent of zero are treated as settled.

use log::warn;

use crate::types::{DebtRecord, Settlement};

/// Two amounts within this distance are considered equal. Equal splits
/// cannot always be represented exactly, so we tolerate half a cent.
const SETTLED_TOLERANCE: f64 = 0.005;

/// Build the debt matrix: `matrix[creditor][debtor]` is the total unpaid
/// amount the debtor owes the creditor, indexed by position in `names`.
/// Pairs without a record stay zero.
pub fn build_debt_matrix(records: &[DebtRecord], names: &[String]) -> Vec<Vec<f64>> {
    let n = names.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for record in records {
        let creditor_index = names.iter().position(|name| *name == record.creditor);
        let debtor_index = names.iter().position(|name| *name == record.debtor);

        match (creditor_index, debtor_index) {
            (Some(creditor_index), Some(debtor_index)) => {
                matrix[creditor_index][debtor_index] = record.amount;
            }
            _ => {
                // A record naming someone outside the participant list means
                // the store and the registry disagree; skip it rather than
                // produce a bogus matrix.
                warn!(
                    "debt record {} -> {} does not match any participant",
                    record.debtor, record.creditor
                );
            }
        }
    }

    matrix
}

/// Collapse reciprocal debts: for every pair `i < j`,
/// `net[i][j] = matrix[i][j] - matrix[j][i]`.
///
/// A positive entry means participant `j` owes participant `i`, negative
/// the other way around. Only the upper triangle is populated; the lower
/// triangle and the diagonal stay zero.
pub fn compute_net_debts(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = matrix.len();
    let mut net = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            net[i][j] = matrix[i][j] - matrix[j][i];
        }
    }

    net
}

/// Read the settlement statements out of the net matrix: one entry per
/// pair whose net debt is not settled, oriented so the amount is positive.
pub fn settlements(net: &[Vec<f64>], names: &[String]) -> Vec<Settlement> {
    let n = names.len();
    let mut result = vec![];

    for i in 0..n {
        for j in (i + 1)..n {
            let net_debt = net[i][j];
            if net_debt > SETTLED_TOLERANCE {
                result.push(Settlement::new(&names[j], &names[i], net_debt));
            } else if net_debt < -SETTLED_TOLERANCE {
                result.push(Settlement::new(&names[i], &names[j], -net_debt));
            }
        }
    }

    result
}
