//! Derivation of payment figures out of a unit price.

use common::{Money, Percent};

use crate::domain::project::AdditionalExpense;

/// Payment figures derived for a unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Quote {
    /// Price of the unit with all the additional expenses applied.
    pub final_price: Money,

    /// Part of the [`Quote::final_price`] left to be paid by installments.
    pub remaining: Money,
}

/// Applies the provided [`AdditionalExpense`]s to the `base_price` in order.
///
/// Percentage expenses compound: each one is charged against the running
/// price, already adjusted by all the preceding expenses.
#[must_use]
pub fn final_price(base_price: Money, expenses: &[AdditionalExpense]) -> Money {
    expenses
        .iter()
        .fold(base_price, |running, e| running + e.charge(running))
}

/// Calculates the down payment suggested for a unit of the provided
/// `base_price`.
#[must_use]
pub fn default_down_payment(base_price: Money, deposit: Percent) -> Money {
    deposit.of(base_price)
}

/// Derives a [`Quote`] of a unit.
///
/// Always starts from the `base_price`, so repeated calls with the same
/// inputs produce the same [`Quote`].
#[must_use]
pub fn quote(
    base_price: Money,
    expenses: &[AdditionalExpense],
    down_payment: Money,
) -> Quote {
    let final_price = final_price(base_price, expenses);
    Quote {
        final_price,
        remaining: final_price - down_payment,
    }
}
