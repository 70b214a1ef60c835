//! [`Project`] definitions.

use common::{define_kind, Money, Percent};
use derive_more::{AsRef, Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing as log;

use crate::domain::installment;

/// Real-estate project units are sold within.
///
/// Read-only reference data: the form never mutates a [`Project`].
#[derive(Clone, Debug, Deserialize)]
pub struct Project {
    /// ID of this [`Project`].
    pub id: Id,

    /// [`Name`] of this [`Project`].
    pub name: Name,

    /// Indicator whether this [`Project`] is active.
    #[serde(default, alias = "active")]
    pub is_active: bool,

    /// Installment track kinds allowed in this [`Project`].
    ///
    /// Ordered and unique.
    #[serde(
        default,
        rename = "installment_types",
        deserialize_with = "unique_kinds"
    )]
    pub installment_kinds: Vec<installment::Kind>,

    /// Default share of a unit price seeding the down payment.
    #[serde(default)]
    pub deposit_percentage: Percent,

    /// [`AdditionalExpense`]s applied on top of a unit price, in order.
    #[serde(default)]
    pub additional_expenses: Vec<AdditionalExpense>,
}

impl Project {
    /// Returns the only installment track kind of this [`Project`], if it
    /// allows exactly one.
    #[must_use]
    pub fn sole_installment_kind(&self) -> Option<installment::Kind> {
        match self.installment_kinds.as_slice() {
            [kind] => Some(*kind),
            _ => None,
        }
    }
}

/// ID of a [`Project`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(u64);

/// Name of a [`Project`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, From, PartialEq)]
#[as_ref(forward)]
#[from(&str, String)]
pub struct Name(String);

/// Surcharge applied to a unit price within a [`Project`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct AdditionalExpense {
    /// Display label of this [`AdditionalExpense`].
    pub name: String,

    /// [`ExpenseKind`] of this [`AdditionalExpense`].
    #[serde(rename = "type", alias = "kind")]
    pub kind: ExpenseKind,

    /// Either an amount of money or percentage points, depending on the
    /// [`ExpenseKind`].
    pub value: Decimal,
}

impl AdditionalExpense {
    /// Calculates the amount this [`AdditionalExpense`] adds to the provided
    /// running price.
    #[must_use]
    pub fn charge(&self, running_price: Money) -> Money {
        match self.kind {
            ExpenseKind::Fixed => Money::new(self.value),
            ExpenseKind::Percentage => Money::new(
                running_price.amount() * self.value / Decimal::ONE_HUNDRED,
            ),
        }
    }
}

define_kind! {
    #[doc = "Kind of an [`AdditionalExpense`]."]
    enum ExpenseKind {
        #[doc = "Fixed amount of money."]
        Fixed,

        #[doc = "Percentage of the running price."]
        Percentage,
    }
}

/// Deserializes installment track kinds dropping repeated and unknown ones.
fn unique_kinds<'de, D>(d: D) -> Result<Vec<installment::Kind>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(d)?;
    let mut kinds = Vec::with_capacity(names.len());
    for name in names {
        match name.parse::<installment::Kind>() {
            Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
            Ok(_) => {}
            Err(_) => {
                log::debug!("skipping unknown installment kind `{name}`");
            }
        }
    }
    Ok(kinds)
}

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{AdditionalExpense, ExpenseKind};

    #[test]
    fn charges_expenses_by_kind() {
        let fixed = AdditionalExpense {
            name: "Maintenance".into(),
            kind: ExpenseKind::Fixed,
            value: 5000.into(),
        };
        let percentage = AdditionalExpense {
            name: "Club".into(),
            kind: ExpenseKind::Percentage,
            value: 10.into(),
        };

        assert_eq!(fixed.charge(Money::from(1)), Money::from(5000));
        assert_eq!(
            percentage.charge(Money::from(105_000)),
            Money::from(10_500),
        );
    }
}
