//! Installment track definitions.

use common::{define_kind, Money};

define_kind! {
    #[doc = "Kind of an installment track."]
    enum Kind {
        #[doc = "Installment paid every month."]
        Monthly,

        #[doc = "Installment paid every three months."]
        Quarterly,

        #[doc = "Installment paid every six months."]
        SemiAnnual,

        #[doc = "Installment paid every year."]
        Annual,
    }
}

/// Allocation of a single installment track.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Detail {
    /// [`Kind`] of the track.
    pub kind: Kind,

    /// Number of installments in the track.
    pub count: u32,

    /// Amount of money paid per installment.
    pub amount: Money,
}

impl Detail {
    /// Creates a new zeroed [`Detail`] of the provided [`Kind`].
    #[must_use]
    pub fn zeroed(kind: Kind) -> Self {
        Self {
            kind,
            count: 0,
            amount: Money::ZERO,
        }
    }

    /// Returns total amount of money paid by this track.
    #[must_use]
    pub fn total(&self) -> Money {
        self.amount * self.count
    }
}
