//! [`Money`]-related definitions.

use std::{fmt, iter::Sum, ops, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};

/// Amount of money.
///
/// The currency is implied by the backend the amount comes from, so only the
/// amount itself is carried around.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Tolerance used by [`Money::approx_eq()`] to absorb rounding of
    /// divided amounts.
    pub const EPSILON: Self = Self(Decimal::from_parts(1, 0, 0, false, 2));

    /// Number of fractional digits [`Money`] is rendered with.
    pub const SCALE: u32 = 2;

    /// Creates a new [`Money`] from the provided amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Indicates whether this [`Money`] differs from the `other` one by no
    /// more than [`Money::EPSILON`].
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        (self.0 - other.0).abs() <= Self::EPSILON.0
    }

    /// Rounds this [`Money`] to [`Money::SCALE`] fractional digits, half away
    /// from zero.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self(self.0.round_dp_with_strategy(
            Self::SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        ))
    }

    /// Renders this [`Money`] with all its fractional digits, but no less
    /// than [`Money::SCALE`] of them.
    ///
    /// Unlike [`Display`], never rounds, so multiplying the rendered amount
    /// back gives the same total.
    ///
    /// [`Display`]: fmt::Display
    #[must_use]
    pub fn to_exact_string(self) -> String {
        let mut amount = self.0.normalize();
        if amount.scale() < Self::SCALE {
            amount.rescale(Self::SCALE);
        }
        amount.to_string()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Money {
    fn from(amount: u32) -> Self {
        Self(amount.into())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self.rounded().0;
        amount.rescale(Self::SCALE);
        write!(f, "{amount}")
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty amount");
        }
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map(Self)
            .map_err(|_| "invalid amount")
    }
}

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl ops::Mul<u32> for Money {
    type Output = Self;

    fn mul(self, count: u32) -> Self::Output {
        Self(self.0 * Decimal::from(count))
    }
}

impl ops::Div<u32> for Money {
    type Output = Self;

    /// Splits this [`Money`] into `count` equal parts.
    ///
    /// # Panics
    ///
    /// If `count` is zero.
    fn div(self, count: u32) -> Self::Output {
        Self(self.0 / Decimal::from(count))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

mod serde {
    //! Module providing integration with [`serde`] crate.

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Money;

    impl Serialize for Money {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Money {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            <Decimal as Deserialize<'de>>::deserialize(d).map(Self)
        }
    }
}
